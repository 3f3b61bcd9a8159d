//! CLI argument definitions

use clap::Parser;
use std::path::PathBuf;

/// Parsed CLI arguments
#[derive(Parser, Debug)]
#[command(name = "speechcheckr", version)]
#[command(
    about = "Check speech recordings: loudness, loudness range, interruptions, intelligibility"
)]
pub struct Args {
    /// Input file or directory
    #[arg(short, long)]
    pub input: PathBuf,

    /// Print JSON reports instead of the table
    #[arg(long)]
    pub json: bool,

    /// Write <name>.quality.json for every analyzed file into this directory
    #[arg(short = 'o', long)]
    pub export_dir: Option<PathBuf>,

    /// Analysis configuration file (JSON)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}
