use crate::core::engine::DEFAULT_WORKERS;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "bcltally", version, about = "Index-read census for NextSeq BCL lanes")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    Count(CountArgs),
}

#[derive(Parser)]
pub struct CountArgs {
    pub lane_dir: PathBuf,

    #[arg(long)]
    pub start_cycle: u32,

    #[arg(long)]
    pub cycle_length: u32,

    #[arg(long)]
    pub out: PathBuf,

    #[arg(long, default_value_t = DEFAULT_WORKERS)]
    pub workers: usize,
}
