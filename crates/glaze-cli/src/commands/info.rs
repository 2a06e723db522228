//! Image info command.

use crate::InfoArgs;
use anyhow::{Context, Result};
use glaze_io::Format;
use std::fs;

pub fn run(args: InfoArgs) -> Result<()> {
    for (i, path) in args.input.iter().enumerate() {
        if i > 0 {
            println!();
        }
        let file_size = fs::metadata(path)
            .with_context(|| format!("Failed to stat: {}", path.display()))?
            .len();
        let format = Format::detect(path)
            .with_context(|| format!("Unknown format: {}", path.display()))?;
        let image = super::load_image(path)?;

        println!("{}", path.display());
        println!("  Format:     {format}");
        println!("  Resolution: {}x{}", image.width(), image.height());
        println!("  Layout:     {} ({} channels)", image.format(), image.channels());
        println!("  Pixels:     {}", image.pixel_count());
        println!("  File size:  {}", super::format_size(file_size));
    }
    Ok(())
}
