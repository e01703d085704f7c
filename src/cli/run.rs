use crate::cli::args::{Cli, Commands, CountArgs};
use crate::core::engine::{self, RunConfig};
use crate::core::extract::BaseTable;
use crate::report;
use anyhow::{Context, Result, bail};
use clap::Parser;
use log::info;
use std::path::Path;

pub fn entry() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .format_timestamp(None)
        .format_target(false)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Count(args) => count(args),
    }
}

pub fn count(args: CountArgs) -> Result<()> {
    if !args.lane_dir.is_dir() {
        bail!("lane directory not found: {}", args.lane_dir.display());
    }
    if args.cycle_length == 0 {
        bail!("--cycle-length must be >= 1");
    }
    if args.workers == 0 {
        bail!("--workers must be >= 1");
    }

    let lane = lane_number(&args.lane_dir)?;
    let config = RunConfig {
        lane_dir: args.lane_dir.clone(),
        lane,
        start_cycle: args.start_cycle,
        cycle_length: args.cycle_length,
        workers: args.workers,
        base_table: BaseTable::default(),
    };

    let counts = engine::run(config)?;

    report::index_txt::write(&args.out, &counts)
        .with_context(|| format!("failed to write {}", args.out.display()))?;
    info!("wrote {}", args.out.display());
    Ok(())
}

/// The lane number is the trailing digit of the lane directory name
/// (`L001` -> 1) and names the tile index inside it (`s_1.bci`).
fn lane_number(dir: &Path) -> Result<u32> {
    let name = dir
        .file_name()
        .and_then(|s| s.to_str())
        .with_context(|| format!("cannot derive a lane name from {}", dir.display()))?;
    name.chars()
        .last()
        .and_then(|c| c.to_digit(10))
        .with_context(|| format!("lane directory `{name}` does not end in a lane digit"))
}
