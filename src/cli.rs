//! Command-line interface definitions

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// framenorm - batch border normalizer for scanned and captured images
#[derive(Debug, Parser)]
#[command(name = "framenorm", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Normalize image borders to a uniform frame width
    Normalize(NormalizeArgs),
    /// Show environment and configuration information
    Info,
}

#[derive(Debug, Args)]
pub struct NormalizeArgs {
    /// Input image file or directory of images
    pub input: PathBuf,

    /// Output directory for normalized images
    #[arg(short, long, default_value = "normalized")]
    pub output: PathBuf,

    /// Target border thickness in pixels
    #[arg(long, default_value_t = crate::border::DEFAULT_FRAME_WIDTH)]
    pub frame_width: u32,

    /// Config file path (default: ./framenorm.toml, then user config dir)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Re-encode photographic results as JPEG
    #[arg(long)]
    pub photo_recode: bool,

    /// Distinct-color count at or above which an image counts as photographic
    #[arg(long, default_value_t = crate::recode::DEFAULT_PHOTO_COLOR_THRESHOLD)]
    pub photo_color_threshold: u32,

    /// JPEG quality for photographic re-encoding (1-100)
    #[arg(long, default_value_t = 90)]
    pub jpeg_quality: u8,

    /// Worker threads (default: all cores)
    #[arg(long)]
    pub threads: Option<usize>,

    /// Skip images whose output file already exists
    #[arg(long)]
    pub skip_existing: bool,

    /// Re-process even when the output file exists
    #[arg(long)]
    pub force: bool,

    /// Print the execution plan without processing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress the summary output
    #[arg(short, long)]
    pub quiet: bool,
}
