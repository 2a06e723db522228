//! Render command
//!
//! Runs the full pipeline at the input's resolution.

use crate::RenderArgs;
use anyhow::{Context, Result};
use std::time::Instant;
use tracing::info;

pub fn run(args: RenderArgs) -> Result<()> {
    let resolved = args.adjust.resolve()?;
    if args.dump_params {
        print!("{}", resolved.to_yaml()?);
    }

    let base = super::load_image(&args.input)?;
    let params = resolved.into_params()?;

    let start = Instant::now();
    let output = glaze_ops::apply(&base, &params).context("Pipeline failed")?;
    info!(
        width = output.width(),
        height = output.height(),
        format = %output.format(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "rendered {}",
        args.input.display()
    );

    super::save_image(&args.output, &output, args.quality)
}
