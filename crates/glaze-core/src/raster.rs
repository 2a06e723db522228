//! The in-memory raster buffer.
//!
//! # Memory Layout
//!
//! Samples are stored **row-major**, top-to-bottom, channels interleaved:
//!
//! ```text
//! RGBA: [R G B A R G B A ...]  <- row 0
//!       [R G B A R G B A ...]  <- row 1
//! ```
//!
//! The buffer lives in an [`Arc<Vec<u8>>`]. Cloning a raster is cheap and
//! shares the samples; the first mutation of a shared raster copies them
//! (copy-on-write), so a stage that mutates its own raster never touches the
//! raster it was cloned from.
//!
//! # Usage
//!
//! ```rust
//! use glaze_core::{PixelFormat, Raster};
//!
//! let mut img = Raster::filled(4, 4, PixelFormat::Rgb, &[10, 20, 30]).unwrap();
//! img.set_pixel(1, 2, &[255, 0, 0]).unwrap();
//! assert_eq!(img.pixel(1, 2).unwrap(), &[255, 0, 0]);
//!
//! let rgba = img.to_format(PixelFormat::Rgba);
//! assert_eq!(rgba.pixel(0, 0).unwrap(), &[10, 20, 30, 255]);
//! ```

use crate::pixel::luma_rec601;
use crate::{Error, PixelFormat, Result};
use rayon::prelude::*;
use std::sync::Arc;

/// Owned 8-bit raster with a fixed channel layout.
#[derive(Clone, PartialEq, Eq)]
pub struct Raster {
    /// Sample buffer (Arc for cheap cloning)
    data: Arc<Vec<u8>>,
    width: u32,
    height: u32,
    format: PixelFormat,
}

fn check_dimensions(width: u32, height: u32) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(Error::invalid_dimensions(
            width,
            height,
            "width and height must be > 0",
        ));
    }
    Ok(())
}

impl Raster {
    /// Wraps an existing sample buffer.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidDimensions`] if `width` or `height` is zero.
    /// - [`Error::BufferSizeMismatch`] if `data.len()` is not
    ///   `width * height * format.channels()`.
    pub fn new(width: u32, height: u32, format: PixelFormat, data: Vec<u8>) -> Result<Self> {
        check_dimensions(width, height)?;
        let expected = width as usize * height as usize * format.channels();
        if data.len() != expected {
            return Err(Error::buffer_size_mismatch(expected, data.len()));
        }
        Ok(Self {
            data: Arc::new(data),
            width,
            height,
            format,
        })
    }

    /// Creates a raster with every pixel set to `pixel`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidDimensions`] for a zero size, [`Error::ChannelMismatch`]
    /// if `pixel` does not have `format.channels()` samples.
    pub fn filled(width: u32, height: u32, format: PixelFormat, pixel: &[u8]) -> Result<Self> {
        check_dimensions(width, height)?;
        if pixel.len() != format.channels() {
            return Err(Error::channel_mismatch(
                format.channels() as u8,
                pixel.len() as u8,
            ));
        }
        let data = pixel.repeat(width as usize * height as usize);
        Ok(Self {
            data: Arc::new(data),
            width,
            height,
            format,
        })
    }

    /// Creates a zero-filled raster (transparent black for RGBA).
    pub fn blank(width: u32, height: u32, format: PixelFormat) -> Result<Self> {
        check_dimensions(width, height)?;
        let data = vec![0u8; width as usize * height as usize * format.channels()];
        Ok(Self {
            data: Arc::new(data),
            width,
            height,
            format,
        })
    }

    /// Raster width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Raster height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// `(width, height)`.
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Channel layout.
    #[inline]
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Samples per pixel.
    #[inline]
    pub fn channels(&self) -> usize {
        self.format.channels()
    }

    /// Whether the raster carries alpha.
    #[inline]
    pub fn has_alpha(&self) -> bool {
        self.format.has_alpha()
    }

    /// Total number of pixels.
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Samples in one row.
    #[inline]
    pub fn row_len(&self) -> usize {
        self.width as usize * self.channels()
    }

    /// Raw samples.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Mutable samples; copies the buffer first if it is shared.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [u8] {
        Arc::make_mut(&mut self.data).as_mut_slice()
    }

    /// Consumes the raster and returns its samples.
    pub fn into_data(self) -> Vec<u8> {
        Arc::try_unwrap(self.data).unwrap_or_else(|shared| (*shared).clone())
    }

    /// Whether `other` has the same width and height.
    #[inline]
    pub fn same_size(&self, other: &Raster) -> bool {
        self.dimensions() == other.dimensions()
    }

    /// Fails with [`Error::DimensionMismatch`] unless `other` has the same size.
    pub fn ensure_same_size(&self, other: &Raster) -> Result<()> {
        if self.same_size(other) {
            Ok(())
        } else {
            Err(Error::dimension_mismatch(
                self.dimensions(),
                other.dimensions(),
            ))
        }
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> Result<usize> {
        if x >= self.width || y >= self.height {
            return Err(Error::out_of_bounds(x, y, self.width, self.height));
        }
        Ok((y as usize * self.width as usize + x as usize) * self.channels())
    }

    /// Samples of the pixel at (x, y).
    ///
    /// # Errors
    ///
    /// [`Error::OutOfBounds`] outside `[0, width) x [0, height)`.
    pub fn pixel(&self, x: u32, y: u32) -> Result<&[u8]> {
        let offset = self.offset(x, y)?;
        Ok(&self.data[offset..offset + self.channels()])
    }

    /// Overwrites the pixel at (x, y).
    ///
    /// # Errors
    ///
    /// [`Error::OutOfBounds`] outside the raster, [`Error::ChannelMismatch`]
    /// if `pixel` has the wrong number of samples.
    pub fn set_pixel(&mut self, x: u32, y: u32, pixel: &[u8]) -> Result<()> {
        let offset = self.offset(x, y)?;
        let n = self.channels();
        if pixel.len() != n {
            return Err(Error::channel_mismatch(n as u8, pixel.len() as u8));
        }
        self.data_mut()[offset..offset + n].copy_from_slice(pixel);
        Ok(())
    }

    /// Iterates over pixels in row-major order.
    pub fn pixels(&self) -> std::slice::ChunksExact<'_, u8> {
        self.data.chunks_exact(self.channels())
    }

    /// Applies `f` to every pixel in place, rows in parallel.
    pub fn map_pixels<F>(&mut self, f: F)
    where
        F: Fn(&mut [u8]) + Sync,
    {
        let n = self.channels();
        let row_len = self.row_len();
        self.data_mut()
            .par_chunks_mut(row_len)
            .for_each(|row| row.chunks_exact_mut(n).for_each(&f));
    }

    /// Builds a raster of the same size in `format`, computing each output
    /// pixel from the matching input pixel. Rows run in parallel.
    pub fn map_into<F>(&self, format: PixelFormat, f: F) -> Raster
    where
        F: Fn(&[u8], &mut [u8]) + Sync,
    {
        let src_n = self.channels();
        let dst_n = format.channels();
        let mut data = vec![0u8; self.pixel_count() * dst_n];

        data.par_chunks_mut(self.width as usize * dst_n)
            .zip(self.data.par_chunks(self.row_len()))
            .for_each(|(dst_row, src_row)| {
                for (dst, src) in dst_row
                    .chunks_exact_mut(dst_n)
                    .zip(src_row.chunks_exact(src_n))
                {
                    f(src, dst);
                }
            });

        Raster {
            data: Arc::new(data),
            width: self.width,
            height: self.height,
            format,
        }
    }

    /// Like [`map_into`](Self::map_into) over two equally sized rasters.
    ///
    /// # Errors
    ///
    /// [`Error::DimensionMismatch`] if `other` has a different size.
    pub fn combine<F>(&self, other: &Raster, format: PixelFormat, f: F) -> Result<Raster>
    where
        F: Fn(&[u8], &[u8], &mut [u8]) + Sync,
    {
        self.ensure_same_size(other)?;
        let a_n = self.channels();
        let b_n = other.channels();
        let dst_n = format.channels();
        let mut data = vec![0u8; self.pixel_count() * dst_n];

        data.par_chunks_mut(self.width as usize * dst_n)
            .zip(self.data.par_chunks(self.row_len()))
            .zip(other.data.par_chunks(other.row_len()))
            .for_each(|((dst_row, a_row), b_row)| {
                for ((dst, a), b) in dst_row
                    .chunks_exact_mut(dst_n)
                    .zip(a_row.chunks_exact(a_n))
                    .zip(b_row.chunks_exact(b_n))
                {
                    f(a, b, dst);
                }
            });

        Ok(Raster {
            data: Arc::new(data),
            width: self.width,
            height: self.height,
            format,
        })
    }

    /// Converts to another channel layout.
    ///
    /// - RGB -> RGBA inserts full opacity.
    /// - RGBA -> RGB drops alpha.
    /// - Gray -> RGB/RGBA replicates the sample.
    /// - RGB/RGBA -> Gray takes BT.601 luma, ignoring alpha.
    ///
    /// Converting to the current format returns a cheap clone.
    pub fn to_format(&self, format: PixelFormat) -> Raster {
        if format == self.format {
            return self.clone();
        }
        let from = self.format;
        self.map_into(format, |src, dst| convert_pixel(src, from, dst, format))
    }

    /// Shorthand for `to_format(PixelFormat::Rgb)`.
    #[inline]
    pub fn to_rgb(&self) -> Raster {
        self.to_format(PixelFormat::Rgb)
    }

    /// Shorthand for `to_format(PixelFormat::Rgba)`.
    #[inline]
    pub fn to_rgba(&self) -> Raster {
        self.to_format(PixelFormat::Rgba)
    }

    /// Drops alpha for encoders that cannot store it. Alpha-less rasters are
    /// returned as-is.
    pub fn flatten(&self) -> Raster {
        match self.format {
            PixelFormat::Rgba => self.to_rgb(),
            _ => self.clone(),
        }
    }

    /// Extracts each channel as a separate Gray raster (R, G, B[, A]).
    pub fn split_channels(&self) -> Vec<Raster> {
        let n = self.channels();
        (0..n)
            .map(|c| {
                let plane: Vec<u8> = self.data.iter().skip(c).step_by(n).copied().collect();
                Raster {
                    data: Arc::new(plane),
                    width: self.width,
                    height: self.height,
                    format: PixelFormat::Gray,
                }
            })
            .collect()
    }

    /// Interleaves Gray planes into a raster of `format`.
    ///
    /// # Errors
    ///
    /// - [`Error::ChannelMismatch`] if the plane count differs from
    ///   `format.channels()` or a plane is not single-channel.
    /// - [`Error::DimensionMismatch`] if the planes differ in size.
    pub fn merge_channels(planes: &[Raster], format: PixelFormat) -> Result<Raster> {
        let n = format.channels();
        if planes.len() != n {
            return Err(Error::channel_mismatch(n as u8, planes.len() as u8));
        }
        let first = &planes[0];
        for plane in planes {
            if plane.format != PixelFormat::Gray {
                return Err(Error::channel_mismatch(1, plane.channels() as u8));
            }
            first.ensure_same_size(plane)?;
        }

        let mut data = vec![0u8; first.pixel_count() * n];
        for (c, plane) in planes.iter().enumerate() {
            for (dst, &v) in data.chunks_exact_mut(n).zip(plane.data.iter()) {
                dst[c] = v;
            }
        }
        Raster::new(first.width, first.height, format, data)
    }
}

fn convert_pixel(src: &[u8], from: PixelFormat, dst: &mut [u8], to: PixelFormat) {
    let (rgb, alpha) = match from {
        PixelFormat::Gray => ([src[0]; 3], 255),
        PixelFormat::Rgb => ([src[0], src[1], src[2]], 255),
        PixelFormat::Rgba => ([src[0], src[1], src[2]], src[3]),
    };
    match to {
        PixelFormat::Gray => dst[0] = luma_rec601(rgb[0], rgb[1], rgb[2]),
        PixelFormat::Rgb => dst.copy_from_slice(&rgb),
        PixelFormat::Rgba => {
            dst[..3].copy_from_slice(&rgb);
            dst[3] = alpha;
        }
    }
}

impl std::fmt::Debug for Raster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Raster")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("format", &self.format)
            .finish()
    }
}
