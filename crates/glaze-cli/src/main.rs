//! glaze - compositing pipeline CLI
//!
//! Renders the luminance / invert / highlight / gradient / texture pipeline
//! over an image file.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use glaze_ops::BlendMode;
use glaze_ops::resize::{Filter, PREVIEW_MAX_SIZE};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "glaze")]
#[command(author, version, about = "Image compositing pipeline")]
#[command(long_about = "
Runs a fixed compositing pipeline over an image: luminance scale, invert,
highlight overlay, gradient-map blend and texture overlay.

Examples:
  glaze info photo.jpg
  glaze render photo.jpg -o out.png --luminance 1.3 --invert
  glaze render photo.jpg -o out.png --gradient map.png --blend overlay
  glaze render photo.jpg -o out.jpg --params look.yaml --texture grain.png
  glaze preview photo.jpg -o thumb.png --params look.yaml
  glaze preview photo.jpg -o thumb.png --max-size 256 --filter bilinear
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Number of threads (0 = auto)
    #[arg(short = 'j', long, global = true, default_value = "0")]
    threads: usize,
}

#[derive(Subcommand)]
enum Commands {
    /// Display image information
    #[command(visible_alias = "i")]
    Info(InfoArgs),

    /// Run the pipeline at full resolution
    #[command(visible_alias = "r")]
    Render(RenderArgs),

    /// Run the pipeline on a downscaled copy
    #[command(visible_alias = "p")]
    Preview(PreviewArgs),
}

#[derive(Args)]
struct InfoArgs {
    /// Input image(s)
    #[arg(required = true)]
    input: Vec<PathBuf>,
}

/// Pipeline parameters shared by `render` and `preview`.
///
/// Flags override values from `--params`.
#[derive(Args, Debug, Default, Clone)]
struct AdjustArgs {
    /// YAML parameter file
    #[arg(short, long)]
    params: Option<PathBuf>,

    /// Luminance factor (1.0 = unchanged)
    #[arg(short, long)]
    luminance: Option<f32>,

    /// Invert colors, keeping alpha
    #[arg(long)]
    invert: bool,

    /// Highlight color as R,G,B
    #[arg(long, value_parser = commands::parse_rgb)]
    highlight: Option<[u8; 3]>,

    /// Gradient map image
    #[arg(short, long)]
    gradient: Option<PathBuf>,

    /// Gradient blend mode: normal, multiply, screen, overlay
    #[arg(short, long)]
    blend: Option<BlendMode>,

    /// Texture image composited on top
    #[arg(short, long)]
    texture: Option<PathBuf>,
}

#[derive(Args)]
struct RenderArgs {
    /// Input image
    input: PathBuf,

    /// Output image
    #[arg(short, long)]
    output: PathBuf,

    #[command(flatten)]
    adjust: AdjustArgs,

    /// JPEG quality (1-100)
    #[arg(short, long, default_value = "90")]
    quality: u8,

    /// Print the effective parameters as YAML
    #[arg(long)]
    dump_params: bool,
}

#[derive(Args)]
struct PreviewArgs {
    /// Input image
    input: PathBuf,

    /// Output image
    #[arg(short, long)]
    output: PathBuf,

    #[command(flatten)]
    adjust: AdjustArgs,

    /// Longest side of the preview
    #[arg(short = 's', long, default_value_t = PREVIEW_MAX_SIZE)]
    max_size: u32,

    /// Downscale filter: nearest, bilinear, bicubic, lanczos3
    #[arg(short, long, default_value_t = Filter::Lanczos3)]
    filter: Filter,

    /// JPEG quality (1-100)
    #[arg(short, long, default_value = "90")]
    quality: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Configure thread pool
    if cli.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(cli.threads)
            .build_global()
            .context("Failed to configure thread pool")?;
    }

    match cli.command {
        Commands::Info(args) => commands::info::run(args),
        Commands::Render(args) => commands::render::run(args),
        Commands::Preview(args) => commands::preview::run(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_filter_flag() {
        let cli = Cli::try_parse_from(["glaze", "preview", "in.png", "-o", "out.png"]).unwrap();
        let Commands::Preview(args) = cli.command else {
            panic!("expected preview");
        };
        assert_eq!(args.filter, Filter::Lanczos3);
        assert_eq!(args.max_size, PREVIEW_MAX_SIZE);

        let cli = Cli::try_parse_from([
            "glaze", "p", "in.png", "-o", "out.png", "--filter", "Bilinear", "-s", "128",
        ])
        .unwrap();
        let Commands::Preview(args) = cli.command else {
            panic!("expected preview");
        };
        assert_eq!(args.filter, Filter::Bilinear);
        assert_eq!(args.max_size, 128);

        assert!(Cli::try_parse_from(["glaze", "preview", "in.png", "-o", "o.png", "-f", "box"]).is_err());
    }
}
