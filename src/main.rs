//! framenorm - batch border normalizer
//!
//! CLI entry point

use anyhow::Context;
use clap::Parser;
use framenorm::{
    exit_codes, Cli, CliOverrides, Commands, Config, NormalizeArgs, NormalizeError,
    NormalizePipeline, OutputMode, ProgressTracker,
};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicI32, AtomicUsize, Ordering};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// Image extensions picked up when the input is a directory
const IMAGE_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let code = match cli.command {
        Commands::Normalize(args) => run_normalize(&args),
        Commands::Info => run_info(),
    };

    std::process::exit(code);
}

// ============ Normalize Command ============

fn run_normalize(args: &NormalizeArgs) -> i32 {
    let start_time = Instant::now();

    if !args.input.exists() {
        eprintln!("Error: Input path does not exist: {}", args.input.display());
        return exit_codes::INPUT_NOT_FOUND;
    }

    let images = match collect_image_files(&args.input) {
        Ok(images) => images,
        Err(e) => {
            eprintln!("Error: {e:#}");
            return exit_codes::GENERAL_ERROR;
        }
    };
    if images.is_empty() {
        eprintln!("Error: No image files found in input path");
        return exit_codes::INPUT_NOT_FOUND;
    }

    // Config file layered under CLI arguments; CLI wins
    let file_config = match &args.config {
        Some(path) => match Config::load_from_path(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("Warning: Failed to load config file: {e}");
                Config::default()
            }
        },
        None => Config::load().unwrap_or_default(),
    };
    let config = file_config.merge_with_cli(&create_cli_overrides(args));

    if args.dry_run {
        print_execution_plan(args, &images, &config);
        return exit_codes::SUCCESS;
    }

    if let Err(e) = std::fs::create_dir_all(&args.output) {
        eprintln!("Error: cannot create output directory: {e}");
        return exit_codes::GENERAL_ERROR;
    }

    // a killed process runs no destructors; make sure half-encoded
    // temp files in the output directory are removed on SIGINT/SIGTERM
    if let Err(e) = ctrlc::set_handler(|| {
        framenorm::remove_pending_temp_files();
        std::process::exit(130);
    }) {
        eprintln!("Warning: cannot install signal handler: {e}");
    }

    if let Some(threads) = config.threads {
        if let Err(e) = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
        {
            eprintln!("Warning: thread pool already initialized: {e}");
        }
    }

    let mode = if args.quiet {
        OutputMode::Quiet
    } else {
        OutputMode::from_verbosity(args.verbose)
    };

    let pipeline = NormalizePipeline::new(config);
    let bar = make_progress_bar(images.len() as u64, mode);

    let ok_count = AtomicUsize::new(0);
    let skip_count = AtomicUsize::new(0);
    let error_count = AtomicUsize::new(0);
    let worst_exit = AtomicI32::new(exit_codes::SUCCESS);

    // Images are independent, so processing order does not matter
    images.par_iter().for_each(|input| {
        let output = pipeline.output_path(input, &args.output);
        // photo re-encoding commits under a .jpg name instead
        let already_done = output.exists()
            || (pipeline.config().photo_recode && output.with_extension("jpg").exists());

        if args.skip_existing && !args.force && already_done {
            if mode.is_verbose() {
                bar.println(format!("Skipping (exists): {}", input.display()));
            }
            skip_count.fetch_add(1, Ordering::Relaxed);
            bar.inc(1);
            return;
        }

        match pipeline.process(input, &args.output) {
            Ok(outcome) => {
                ok_count.fetch_add(1, Ordering::Relaxed);
                if mode.is_verbose() {
                    bar.println(format!(
                        "{} -> {} (border: {})",
                        input.display(),
                        outcome.output.display(),
                        outcome.kind,
                    ));
                }
            }
            Err(e) => {
                error_count.fetch_add(1, Ordering::Relaxed);
                record_exit_code(&worst_exit, &e);
                bar.println(format!("Error processing {}: {e}", input.display()));
            }
        }
        bar.inc(1);
    });

    bar.finish_and_clear();

    let ok = ok_count.load(Ordering::Relaxed);
    let skipped = skip_count.load(Ordering::Relaxed);
    let errors = error_count.load(Ordering::Relaxed);

    if !args.quiet {
        ProgressTracker::print_summary(images.len(), ok, skipped, errors);
        println!("Total time: {:.2}s", start_time.elapsed().as_secs_f64());
    }

    if errors > 0 {
        let code = worst_exit.load(Ordering::Relaxed);
        if code == exit_codes::SUCCESS {
            exit_codes::GENERAL_ERROR
        } else {
            code
        }
    } else {
        exit_codes::SUCCESS
    }
}

/// Keep the most specific failure code seen across the batch;
/// resource exhaustion outranks the generic error code
fn record_exit_code(worst: &AtomicI32, error: &NormalizeError) {
    let code = error.exit_code();
    worst
        .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |current| {
            if current == exit_codes::SUCCESS || code == exit_codes::RESOURCE_ERROR {
                Some(code)
            } else {
                None
            }
        })
        .ok();
}

fn make_progress_bar(len: u64, mode: OutputMode) -> ProgressBar {
    if mode == OutputMode::Quiet {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(len);
    bar.set_style(
        ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    bar
}

// ============ Helper Functions ============

/// Create CLI overrides from NormalizeArgs.
///
/// Only values that differ from the clap defaults become overrides, so
/// config file settings are not clobbered by defaults the user never
/// typed.
fn create_cli_overrides(args: &NormalizeArgs) -> CliOverrides {
    const DEFAULT_JPEG_QUALITY: u8 = 90;

    let mut overrides = CliOverrides::new();

    if args.frame_width != framenorm::DEFAULT_FRAME_WIDTH {
        overrides.frame_width = Some(args.frame_width);
    }
    if args.photo_recode {
        overrides.photo_recode = Some(true);
    }
    if args.photo_color_threshold != framenorm::DEFAULT_PHOTO_COLOR_THRESHOLD {
        overrides.photo_color_threshold = Some(args.photo_color_threshold);
    }
    if args.jpeg_quality != DEFAULT_JPEG_QUALITY {
        overrides.jpeg_quality = Some(args.jpeg_quality);
    }
    overrides.threads = args.threads;

    overrides
}

/// Collect image files from the input path (file or directory)
fn collect_image_files(input: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut images = Vec::new();

    if input.is_file() {
        if has_image_extension(input) {
            images.push(input.to_path_buf());
        }
    } else if input.is_dir() {
        let entries = std::fs::read_dir(input)
            .with_context(|| format!("cannot read input directory {}", input.display()))?;
        for entry in entries {
            let path = entry?.path();
            if path.is_file() && has_image_extension(&path) {
                images.push(path);
            }
        }
        images.sort();
    }

    Ok(images)
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| IMAGE_EXTENSIONS.iter().any(|i| ext.eq_ignore_ascii_case(i)))
}

/// Print execution plan for dry-run mode
fn print_execution_plan(args: &NormalizeArgs, images: &[PathBuf], config: &Config) {
    println!("=== Dry Run - Execution Plan ===");
    println!();
    println!("Input: {}", args.input.display());
    println!("Output: {}", args.output.display());
    println!("Files to process: {}", images.len());
    println!();
    println!("Pipeline Configuration:");
    println!("  Frame width: {}px", config.frame_width);
    if config.photo_recode {
        println!(
            "  Photo re-encoding: ENABLED (threshold: {} colors, JPEG quality: {})",
            config.photo_color_threshold, config.jpeg_quality
        );
    } else {
        println!("  Photo re-encoding: DISABLED");
    }
    println!();
    println!("Processing Options:");
    println!("  Threads: {}", config.threads.unwrap_or_else(num_cpus::get));
    println!(
        "  Skip existing: {}",
        if args.skip_existing { "YES" } else { "NO" }
    );
    println!("  Force re-process: {}", if args.force { "YES" } else { "NO" });
    println!();
    println!("Files:");
    for (i, file) in images.iter().enumerate() {
        println!("  {}. {}", i + 1, file.display());
    }
}

// ============ Info Command ============

fn run_info() -> i32 {
    println!("framenorm v{}", env!("CARGO_PKG_VERSION"));
    println!();

    println!("System Information:");
    println!("  Platform: {}", std::env::consts::OS);
    println!("  Arch: {}", std::env::consts::ARCH);
    println!("  CPUs: {}", num_cpus::get());

    println!();
    println!("Defaults:");
    println!("  Frame width: {}px", framenorm::DEFAULT_FRAME_WIDTH);
    println!(
        "  Photo color threshold: {} colors",
        framenorm::DEFAULT_PHOTO_COLOR_THRESHOLD
    );

    println!();
    println!("Config File Locations:");
    println!("  Local: ./framenorm.toml");
    if let Some(config_dir) = dirs::config_dir() {
        println!(
            "  User:  {}",
            config_dir.join("framenorm/config.toml").display()
        );
    }

    exit_codes::SUCCESS
}
