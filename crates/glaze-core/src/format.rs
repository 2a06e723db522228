//! Pixel channel layouts.
//!
//! A [`PixelFormat`] fixes how many 8-bit samples make up one pixel and
//! whether the last of them is alpha.

use std::fmt;

/// Channel layout of a [`crate::Raster`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// Single luma channel.
    Gray,
    /// Red, green, blue.
    Rgb,
    /// Red, green, blue, straight (non-premultiplied) alpha.
    Rgba,
}

impl PixelFormat {
    /// Samples per pixel.
    #[inline]
    pub const fn channels(&self) -> usize {
        match self {
            Self::Gray => 1,
            Self::Rgb => 3,
            Self::Rgba => 4,
        }
    }

    /// Whether the format carries an alpha channel.
    #[inline]
    pub const fn has_alpha(&self) -> bool {
        matches!(self, Self::Rgba)
    }

    /// Number of color (non-alpha) channels.
    #[inline]
    pub const fn color_channels(&self) -> usize {
        match self {
            Self::Gray => 1,
            Self::Rgb | Self::Rgba => 3,
        }
    }

    /// Format for a given channel count, if one exists.
    pub const fn from_channels(channels: usize) -> Option<Self> {
        match channels {
            1 => Some(Self::Gray),
            3 => Some(Self::Rgb),
            4 => Some(Self::Rgba),
            _ => None,
        }
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gray => write!(f, "Gray"),
            Self::Rgb => write!(f, "RGB"),
            Self::Rgba => write!(f, "RGBA"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_counts() {
        assert_eq!(PixelFormat::Gray.channels(), 1);
        assert_eq!(PixelFormat::Rgb.channels(), 3);
        assert_eq!(PixelFormat::Rgba.channels(), 4);
        assert_eq!(PixelFormat::Rgba.color_channels(), 3);
    }

    #[test]
    fn test_from_channels() {
        for fmt in [PixelFormat::Gray, PixelFormat::Rgb, PixelFormat::Rgba] {
            assert_eq!(PixelFormat::from_channels(fmt.channels()), Some(fmt));
        }
        assert_eq!(PixelFormat::from_channels(2), None);
    }
}
