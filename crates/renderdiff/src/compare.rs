//! Image comparison by path.

use std::path::Path;

use crate::error::Result;
use crate::raster::RasterImage;

/// Compare two image files and return the number of differing pixels.
///
/// When the total pixel counts differ, no per-pixel scan is made and the
/// absolute difference of the counts is returned instead: 10x10 against
/// 5x5 gives 75. Images with the same area but a different shape pass that
/// check and are handed to [`RasterImage::compare`], which reports every
/// pixel as different.
pub fn compare(
    actual: impl AsRef<Path>,
    expected: impl AsRef<Path>,
    include_alpha: bool,
) -> Result<u64> {
    compare_with_threshold(actual, expected, 0, include_alpha)
}

/// Like [`compare`], with a per-channel tolerance for the pixel scan.
pub fn compare_with_threshold(
    actual: impl AsRef<Path>,
    expected: impl AsRef<Path>,
    pixel_threshold: u8,
    include_alpha: bool,
) -> Result<u64> {
    compare_images(actual, expected, pixel_threshold, include_alpha).map(|d| d.diff)
}

/// Outcome of [`compare_images`]: the difference count plus both sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageDiff {
    /// Differing pixels, or the pixel-count delta when the areas differ.
    pub diff: u64,
    /// `(width, height)` of the rendered image.
    pub actual_size: (u32, u32),
    /// `(width, height)` of the reference image.
    pub expected_size: (u32, u32),
}

impl ImageDiff {
    /// True when both images have the same width and height.
    ///
    /// When false, `diff` is not a pixel count and no allowance applies.
    pub fn same_size(&self) -> bool {
        self.actual_size == self.expected_size
    }
}

/// Like [`compare_with_threshold`], keeping the dimensions of both images.
pub fn compare_images(
    actual: impl AsRef<Path>,
    expected: impl AsRef<Path>,
    pixel_threshold: u8,
    include_alpha: bool,
) -> Result<ImageDiff> {
    let (actual, expected) = (actual.as_ref(), expected.as_ref());
    let im1 = RasterImage::open(actual)?;
    let im2 = RasterImage::open(expected)?;
    let actual_size = (im1.width(), im1.height());
    let expected_size = (im2.width(), im2.height());

    let pixels = im1.pixel_count();
    let delta_pixels = im2.pixel_count().abs_diff(pixels);
    if delta_pixels != 0 {
        log::warn!(
            "{} has {} pixels but {} has {}",
            actual.display(),
            pixels,
            expected.display(),
            im2.pixel_count()
        );
        return Ok(ImageDiff {
            diff: delta_pixels,
            actual_size,
            expected_size,
        });
    }

    let diff = im1.compare(&im2, pixel_threshold, include_alpha);
    log::debug!(
        "{} vs {}: {diff} differing pixels",
        actual.display(),
        expected.display()
    );
    Ok(ImageDiff {
        diff,
        actual_size,
        expected_size,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CompareError;

    fn write_png(dir: &Path, name: &str, image: &RasterImage) -> std::path::PathBuf {
        let path = dir.join(name);
        image.save(&path).unwrap();
        path
    }

    #[test]
    fn test_same_file_is_zero() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path(), "a.png", &RasterImage::filled(8, 8, 1, 2, 3, 255));
        assert_eq!(compare(&path, &path, true).unwrap(), 0);
    }

    #[test]
    fn test_pixel_count_mismatch_returns_delta() {
        let dir = tempfile::tempdir().unwrap();
        let big = write_png(dir.path(), "big.png", &RasterImage::new(10, 10));
        let small = write_png(dir.path(), "small.png", &RasterImage::new(5, 5));
        assert_eq!(compare(&big, &small, true).unwrap(), 75);
        assert_eq!(compare(&small, &big, true).unwrap(), 75);
    }

    #[test]
    fn test_transposed_shape_bypasses_count_check() {
        let dir = tempfile::tempdir().unwrap();
        let wide = write_png(dir.path(), "wide.png", &RasterImage::new(20, 10));
        let tall = write_png(dir.path(), "tall.png", &RasterImage::new(10, 20));
        assert_eq!(compare(&wide, &tall, true).unwrap(), 200);
    }

    #[test]
    fn test_all_different_is_bounded_by_pixel_count() {
        let dir = tempfile::tempdir().unwrap();
        let red = write_png(dir.path(), "r.png", &RasterImage::filled(6, 4, 255, 0, 0, 255));
        let green = write_png(dir.path(), "g.png", &RasterImage::filled(6, 4, 0, 255, 0, 255));
        let diff = compare(&red, &green, true).unwrap();
        assert!(diff > 0 && diff <= 24);
    }

    #[test]
    fn test_alpha_flag_passes_through() {
        let dir = tempfile::tempdir().unwrap();
        let opaque = write_png(dir.path(), "o.png", &RasterImage::filled(4, 4, 50, 50, 50, 255));
        let faded = write_png(dir.path(), "f.png", &RasterImage::filled(4, 4, 50, 50, 50, 10));
        assert_eq!(compare(&opaque, &faded, true).unwrap(), 16);
        assert_eq!(compare(&opaque, &faded, false).unwrap(), 0);
    }

    #[test]
    fn test_threshold_tolerates_small_drift() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_png(dir.path(), "a.png", &RasterImage::filled(4, 4, 100, 100, 100, 255));
        let b = write_png(dir.path(), "b.png", &RasterImage::filled(4, 4, 102, 99, 100, 255));
        assert_eq!(compare(&a, &b, true).unwrap(), 16);
        assert_eq!(compare_with_threshold(&a, &b, 2, true).unwrap(), 0);
        assert_eq!(compare_with_threshold(&a, &b, 1, true).unwrap(), 16);
    }

    #[test]
    fn test_image_diff_keeps_dimensions() {
        let dir = tempfile::tempdir().unwrap();
        let big = write_png(dir.path(), "big.png", &RasterImage::new(10, 10));
        let small = write_png(dir.path(), "small.png", &RasterImage::new(5, 5));
        let result = compare_images(&big, &small, 0, true).unwrap();
        assert_eq!(result.diff, 75);
        assert_eq!(result.actual_size, (10, 10));
        assert_eq!(result.expected_size, (5, 5));
        assert!(!result.same_size());

        let wide = write_png(dir.path(), "wide.png", &RasterImage::new(20, 10));
        let tall = write_png(dir.path(), "tall.png", &RasterImage::new(10, 20));
        assert!(!compare_images(&wide, &tall, 0, true).unwrap().same_size());
        assert!(compare_images(&big, &big, 0, true).unwrap().same_size());
    }

    #[test]
    fn test_missing_expected_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_png(dir.path(), "a.png", &RasterImage::new(1, 1));
        let err = compare(&a, dir.path().join("missing.png"), true).unwrap_err();
        assert!(matches!(err, CompareError::Io { .. }));
    }
}
