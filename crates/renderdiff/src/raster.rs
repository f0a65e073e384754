//! Decoded RGBA rasters and the whole-image comparator.
//!
//! Decoding and encoding go through the `image` crate; this module only
//! owns the pixel-level comparison.

use std::path::Path;

use image::RgbaImage;

use crate::error::{CompareError, Result};
use crate::pixel::{compare_pixels, pack_rgba, PackedPixel};

/// An RGBA8 image opened for comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    inner: RgbaImage,
}

impl RasterImage {
    /// Create a fully transparent image.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            inner: RgbaImage::new(width, height),
        }
    }

    /// Create an image filled with a single color.
    pub fn filled(width: u32, height: u32, r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            inner: RgbaImage::from_pixel(width, height, image::Rgba([r, g, b, a])),
        }
    }

    /// Decode an image file, converting any color type to RGBA8.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let decoded = image::open(path).map_err(|source| match source {
            image::ImageError::IoError(io) => CompareError::io(path, io),
            source => CompareError::Decode {
                path: path.to_path_buf(),
                source,
            },
        })?;
        log::debug!(
            "decoded {} ({}x{}, {:?})",
            path.display(),
            decoded.width(),
            decoded.height(),
            decoded.color()
        );
        Ok(Self {
            inner: decoded.into_rgba8(),
        })
    }

    /// Encode the image, format chosen by the file extension.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        self.inner.save(path).map_err(|source| match source {
            image::ImageError::IoError(io) => CompareError::io(path, io),
            source => CompareError::Decode {
                path: path.to_path_buf(),
                source,
            },
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.inner.width()
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.inner.height()
    }

    /// Total number of pixels.
    pub fn pixel_count(&self) -> u64 {
        u64::from(self.width()) * u64::from(self.height())
    }

    /// Packed pixel at a position.
    pub fn pixel(&self, x: u32, y: u32) -> Option<PackedPixel> {
        self.inner
            .get_pixel_checked(x, y)
            .map(|p| pack_rgba(p[0], p[1], p[2], p[3]))
    }

    /// Set a pixel; out-of-bounds writes are ignored.
    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        if let Some(p) = self.inner.get_pixel_mut_checked(x, y) {
            *p = image::Rgba(rgba);
        }
    }

    /// Iterate over all pixels in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = PackedPixel> + '_ {
        self.inner
            .pixels()
            .map(|p| pack_rgba(p[0], p[1], p[2], p[3]))
    }

    /// Count the pixels that differ from `other`.
    ///
    /// Channels may differ by up to `threshold` and still match; alpha is
    /// compared only when `include_alpha` is set. Rasters whose width or
    /// height differ are entirely different and the result is
    /// `self.pixel_count()`.
    pub fn compare(&self, other: &Self, threshold: u8, include_alpha: bool) -> u64 {
        if self.width() != other.width() || self.height() != other.height() {
            return self.pixel_count();
        }

        self.pixels()
            .zip(other.pixels())
            .filter(|&(a, b)| compare_pixels(a, b, include_alpha, threshold))
            .count() as u64
    }
}

impl From<RgbaImage> for RasterImage {
    fn from(inner: RgbaImage) -> Self {
        Self { inner }
    }
}
