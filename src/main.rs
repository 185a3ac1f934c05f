use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use backdrop_kit::{
    DownloadArtifact, RecolorTool, RngColorSource, StandardBackend, Threshold, ToolOutput,
    WallpaperMethod, WallpaperTool,
};
use clap::{Parser, Subcommand, ValueEnum};
use log::{debug, info};

/// Background recoloring and 1200x2600 wallpaper composition
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Increase logging verbosity (default: warn, -v: info, -vv: debug, -vvv+: trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    verbosity: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replace a near-uniform background (sampled at the top-left pixel) with a random color
    Recolor {
        /// Image to recolor (PNG, JPEG, WEBP)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Background detection threshold, 5-100 in steps of 5; larger values treat more pixels as background
        #[arg(short = 't', long = "threshold", value_name = "N", default_value_t = Threshold::DEFAULT)]
        threshold: u32,

        /// Where to write the result (default: ./random_bg_image.png)
        #[arg(short = 'o', long = "output", value_name = "FILE")]
        output: Option<PathBuf>,

        /// Seed for the random color, for reproducible output
        #[arg(long = "seed", value_name = "SEED")]
        seed: Option<u64>,
    },

    /// Fit an image into a 1200x2600 wallpaper canvas
    Wallpaper {
        /// Source image (JPEG, PNG)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// How to fill the canvas around the image
        #[arg(short = 'm', long = "method", value_enum, default_value_t = MethodArg::Blurred)]
        method: MethodArg,

        /// Where to write the result (default: ./wallpaper_1200x2600.png)
        #[arg(short = 'o', long = "output", value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum MethodArg {
    /// Blurred background
    Blurred,
    /// Solid color (average)
    Solid,
}

impl From<MethodArg> for WallpaperMethod {
    fn from(arg: MethodArg) -> Self {
        match arg {
            MethodArg::Blurred => Self::BlurredBackground,
            MethodArg::Solid => Self::SolidAverageColor,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logger(args.verbosity);

    match args.command {
        Command::Recolor {
            input,
            threshold,
            output,
            seed,
        } => run_recolor(&input, threshold, output, seed),
        Command::Wallpaper {
            input,
            method,
            output,
        } => run_wallpaper(&input, method.into(), output),
    }
}

fn init_logger(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    // RUST_LOG still wins when set
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp_millis()
        .init();
}

fn run_recolor(input: &Path, threshold: u32, output: Option<PathBuf>, seed: Option<u64>) -> Result<()> {
    let threshold = Threshold::new(threshold)?;
    let upload = read_upload(input)?;
    let tool = RecolorTool::new(StandardBackend);

    let result = match seed {
        Some(seed) => {
            debug!("using seeded color source ({seed})");
            tool.run(&upload, threshold, &mut RngColorSource::seeded(seed))
        }
        None => tool.run(&upload, threshold, &mut RngColorSource::thread_local()),
    }
    .with_context(|| format!("Failed to recolor {}", input.display()))?;

    save_output(&result, output)
}

fn run_wallpaper(input: &Path, method: WallpaperMethod, output: Option<PathBuf>) -> Result<()> {
    let upload = read_upload(input)?;

    let result = WallpaperTool::new(StandardBackend, StandardBackend)
        .run(&upload, method)
        .with_context(|| format!("Failed to compose wallpaper from {}", input.display()))?;

    save_output(&result, output)
}

fn read_upload(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn save_output(result: &ToolOutput, output: Option<PathBuf>) -> Result<()> {
    let path = output_path(&result.artifact, output);
    fs::write(&path, &result.artifact.bytes)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    info!(
        "{}x{} -> {}x{}, wrote {} ({}, {} bytes)",
        result.original.width(),
        result.original.height(),
        result.result.width(),
        result.result.height(),
        path.display(),
        result.artifact.mime,
        result.artifact.bytes.len()
    );
    println!("{}", path.display());
    Ok(())
}

fn output_path(artifact: &DownloadArtifact, requested: Option<PathBuf>) -> PathBuf {
    requested.unwrap_or_else(|| PathBuf::from(artifact.file_name))
}
