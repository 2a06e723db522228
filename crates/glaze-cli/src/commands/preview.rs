//! Preview command
//!
//! Downscales the input to fit `--max-size` before running the pipeline, so
//! gradient maps and textures are resampled to the preview size too.

use crate::PreviewArgs;
use anyhow::{Context, Result};
use glaze_ops::resize::fit_within_with_filter;
use tracing::info;

pub fn run(args: PreviewArgs) -> Result<()> {
    let image = super::load_image(&args.input)?;
    let params = args.adjust.build()?;

    let base = fit_within_with_filter(&image, args.max_size, args.max_size, args.filter)
        .context("Failed to downscale preview")?;
    info!(
        from_width = image.width(),
        from_height = image.height(),
        width = base.width(),
        height = base.height(),
        filter = %args.filter,
        "preview size"
    );

    let output = glaze_ops::apply(&base, &params).context("Pipeline failed")?;
    super::save_image(&args.output, &output, args.quality)
}
