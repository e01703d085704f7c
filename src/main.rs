fn main() -> anyhow::Result<()> {
    bcltally::cli::run::entry()
}
