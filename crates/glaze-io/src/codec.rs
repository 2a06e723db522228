//! Mapping between [`Raster`] and the `image` crate's buffers.

use std::io::{BufWriter, Seek, Write};

use glaze_core::{PixelFormat, Raster};
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, GrayImage, RgbImage, RgbaImage};

use crate::{Format, IoError, IoResult};

/// Converts a decoded image into a raster.
///
/// 8-bit gray, RGB and RGBA map directly. Gray+alpha, paletted and other
/// layouts with alpha become RGBA; 16-bit and float layouts are reduced to
/// 8 bits in the matching layout.
pub(crate) fn from_dynamic(img: DynamicImage) -> IoResult<Raster> {
    let (width, height) = (img.width(), img.height());

    let (format, data) = match img {
        DynamicImage::ImageLuma8(buf) => (PixelFormat::Gray, buf.into_raw()),
        DynamicImage::ImageRgb8(buf) => (PixelFormat::Rgb, buf.into_raw()),
        DynamicImage::ImageRgba8(buf) => (PixelFormat::Rgba, buf.into_raw()),
        DynamicImage::ImageLuma16(_) => (PixelFormat::Gray, img.to_luma8().into_raw()),
        DynamicImage::ImageRgb16(_) | DynamicImage::ImageRgb32F(_) => {
            (PixelFormat::Rgb, img.to_rgb8().into_raw())
        }
        other => (PixelFormat::Rgba, other.to_rgba8().into_raw()),
    };

    Ok(Raster::new(width, height, format, data)?)
}

/// Copies a raster into a decoded-image buffer.
pub(crate) fn to_dynamic(raster: &Raster) -> IoResult<DynamicImage> {
    let (width, height) = raster.dimensions();
    let data = raster.data().to_vec();
    let mismatch = || IoError::Encode(format!("buffer does not fit {width}x{height}"));

    let img = match raster.format() {
        PixelFormat::Gray => {
            DynamicImage::ImageLuma8(GrayImage::from_raw(width, height, data).ok_or_else(mismatch)?)
        }
        PixelFormat::Rgb => {
            DynamicImage::ImageRgb8(RgbImage::from_raw(width, height, data).ok_or_else(mismatch)?)
        }
        PixelFormat::Rgba => {
            DynamicImage::ImageRgba8(RgbaImage::from_raw(width, height, data).ok_or_else(mismatch)?)
        }
    };
    Ok(img)
}

/// Encodes `raster` as `format` into `writer`.
pub(crate) fn encode<W: Write + Seek>(
    writer: W,
    raster: &Raster,
    format: Format,
    jpeg_quality: u8,
) -> IoResult<()> {
    if raster.has_alpha() && !format.supports_alpha() {
        return Err(IoError::AlphaUnsupported(format));
    }
    let img = to_dynamic(raster)?;
    let mut writer = BufWriter::new(writer);

    let result = match format {
        Format::Jpeg => {
            let encoder = JpegEncoder::new_with_quality(&mut writer, jpeg_quality.clamp(1, 100));
            img.write_with_encoder(encoder)
        }
        other => img.write_to(&mut writer, other.image_format()),
    };
    result.map_err(|e| IoError::Encode(e.to_string()))?;

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, LumaA};

    #[test]
    fn test_gray_alpha_becomes_rgba() {
        let buf: ImageBuffer<LumaA<u8>, Vec<u8>> =
            ImageBuffer::from_raw(2, 1, vec![10, 255, 200, 0]).unwrap();
        let raster = from_dynamic(DynamicImage::ImageLumaA8(buf)).unwrap();
        assert_eq!(raster.format(), PixelFormat::Rgba);
        assert_eq!(raster.pixel(0, 0).unwrap(), &[10, 10, 10, 255]);
        assert_eq!(raster.pixel(1, 0).unwrap(), &[200, 200, 200, 0]);
    }

    #[test]
    fn test_rgb16_is_reduced() {
        let img = DynamicImage::ImageRgb16(ImageBuffer::from_raw(1, 1, vec![65535u16, 0, 32896]).unwrap());
        let raster = from_dynamic(img).unwrap();
        assert_eq!(raster.format(), PixelFormat::Rgb);
        assert_eq!(raster.pixel(0, 0).unwrap(), &[255, 0, 128]);
    }

    #[test]
    fn test_to_dynamic_keeps_layout() {
        let raster = Raster::filled(3, 2, PixelFormat::Rgba, &[1, 2, 3, 4]).unwrap();
        let img = to_dynamic(&raster).unwrap();
        assert!(matches!(img, DynamicImage::ImageRgba8(_)));
        assert_eq!(from_dynamic(img).unwrap(), raster);
    }

    #[test]
    fn test_alpha_rejected_for_jpeg() {
        let raster = Raster::filled(2, 2, PixelFormat::Rgba, &[1, 2, 3, 4]).unwrap();
        let mut out = std::io::Cursor::new(Vec::new());
        assert!(matches!(
            encode(&mut out, &raster, Format::Jpeg, 90),
            Err(IoError::AlphaUnsupported(Format::Jpeg))
        ));
        assert!(out.get_ref().is_empty());
    }
}
