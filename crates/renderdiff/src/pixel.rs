//! Packed RGBA pixels and the per-pixel tolerance check.
//!
//! A pixel is a `u32` with red in bits 0-7, green in 8-15, blue in 16-23 and
//! alpha in 24-31. This is the byte order of an RGBA8 buffer read as a
//! little-endian word, so `u32::from_le_bytes([r, g, b, a])` packs a pixel.

/// A packed 32-bit RGBA pixel.
pub type PackedPixel = u32;

/// Per-channel tolerance used when the caller does not pass one.
pub const DEFAULT_PIXEL_THRESHOLD: u8 = 0;

/// Pack four channels into a pixel.
#[inline]
pub const fn pack_rgba(r: u8, g: u8, b: u8, a: u8) -> PackedPixel {
    u32::from_le_bytes([r, g, b, a])
}

/// Split a pixel into `[r, g, b, a]`.
#[inline]
pub const fn unpack_rgba(pixel: PackedPixel) -> [u8; 4] {
    pixel.to_le_bytes()
}

/// Red channel.
#[inline]
pub const fn red(pixel: PackedPixel) -> u8 {
    (pixel & 0xff) as u8
}

/// Green channel.
#[inline]
pub const fn green(pixel: PackedPixel) -> u8 {
    ((pixel >> 8) & 0xff) as u8
}

/// Blue channel.
#[inline]
pub const fn blue(pixel: PackedPixel) -> u8 {
    ((pixel >> 16) & 0xff) as u8
}

/// Alpha channel.
#[inline]
pub const fn alpha(pixel: PackedPixel) -> u8 {
    ((pixel >> 24) & 0xff) as u8
}

/// Returns true if the two pixels are visually different.
///
/// Each compared channel may differ by up to `pixel_threshold` (inclusive)
/// and still count as equal. With `include_alpha == false` the alpha channel
/// is ignored, so pixels that differ only in transparency are equal.
pub fn compare_pixels(
    pixel1: PackedPixel,
    pixel2: PackedPixel,
    include_alpha: bool,
    pixel_threshold: u8,
) -> bool {
    if pixel1 == pixel2 {
        return false;
    }

    let exceeds = |a: u8, b: u8| a.abs_diff(b) > pixel_threshold;

    exceeds(red(pixel1), red(pixel2))
        || exceeds(green(pixel1), green(pixel2))
        || exceeds(blue(pixel1), blue(pixel2))
        || (include_alpha && exceeds(alpha(pixel1), alpha(pixel2)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_layout() {
        let p = pack_rgba(0x11, 0x22, 0x33, 0x44);
        assert_eq!(p, 0x4433_2211);
        assert_eq!(red(p), 0x11);
        assert_eq!(green(p), 0x22);
        assert_eq!(blue(p), 0x33);
        assert_eq!(alpha(p), 0x44);
        assert_eq!(unpack_rgba(p), [0x11, 0x22, 0x33, 0x44]);
    }

    #[test]
    fn test_identical_pixels_never_differ() {
        let p = pack_rgba(10, 20, 30, 40);
        assert!(!compare_pixels(p, p, true, 0));
        assert!(!compare_pixels(p, p, false, 0));
    }

    #[test]
    fn test_alpha_only_difference_ignored_without_alpha() {
        let a = pack_rgba(200, 100, 50, 255);
        let b = pack_rgba(200, 100, 50, 0);
        assert!(!compare_pixels(a, b, false, 0));
        assert!(compare_pixels(a, b, true, 0));
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let a = pack_rgba(100, 100, 100, 255);
        let at = pack_rgba(105, 100, 100, 255);
        let over = pack_rgba(106, 100, 100, 255);
        assert!(!compare_pixels(a, at, true, 5));
        assert!(compare_pixels(a, over, true, 5));
    }

    #[test]
    fn test_difference_in_either_direction() {
        let dark = pack_rgba(0, 0, 0, 255);
        let light = pack_rgba(0, 0, 9, 255);
        assert!(compare_pixels(dark, light, false, 8));
        assert!(compare_pixels(light, dark, false, 8));
    }

    #[test]
    fn test_alpha_threshold_applies() {
        let a = pack_rgba(1, 2, 3, 100);
        let b = pack_rgba(1, 2, 3, 103);
        assert!(!compare_pixels(a, b, true, 3));
        assert!(compare_pixels(a, b, true, 2));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_reflexive(p in any::<u32>(), include_alpha in any::<bool>(), t in any::<u8>()) {
                prop_assert!(!compare_pixels(p, p, include_alpha, t));
            }

            #[test]
            fn prop_symmetric(p1 in any::<u32>(), p2 in any::<u32>(), include_alpha in any::<bool>(), t in any::<u8>()) {
                prop_assert_eq!(
                    compare_pixels(p1, p2, include_alpha, t),
                    compare_pixels(p2, p1, include_alpha, t)
                );
            }

            #[test]
            fn prop_alpha_ignored(rgb in 0u32..0x0100_0000, a1 in any::<u8>(), a2 in any::<u8>()) {
                let p1 = rgb | (u32::from(a1) << 24);
                let p2 = rgb | (u32::from(a2) << 24);
                prop_assert!(!compare_pixels(p1, p2, false, 0));
            }

            #[test]
            fn prop_threshold_boundary(base in 0u8..=127, t in 0u8..=127) {
                let a = pack_rgba(base, 0, 0, 255);
                let at = pack_rgba(base + t, 0, 0, 255);
                let over = pack_rgba(base + t + 1, 0, 0, 255);
                prop_assert!(!compare_pixels(a, at, true, t));
                prop_assert!(compare_pixels(a, over, true, t));
            }

            #[test]
            fn prop_max_threshold_never_differs(p1 in any::<u32>(), p2 in any::<u32>()) {
                prop_assert!(!compare_pixels(p1, p2, true, u8::MAX));
            }
        }
    }
}
