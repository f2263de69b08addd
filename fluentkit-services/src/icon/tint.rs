// SPDX-License-Identifier: LGPL-3.0-only
//! Source-in recoloring of rendered icons.

use crate::icon::image::{Color, IconImage};

/// Fill every pixel of `image` with `color`, keeping the image's alpha as the mask.
///
/// This is source-in compositing of a solid color onto the icon: the resulting
/// alpha is `pixel_alpha * color.a / 255`. Every output pixel carries the
/// tint's RGB, including fully transparent ones, so two distinct tints never
/// produce identical images.
pub fn apply_tint(image: &IconImage, color: Color) -> IconImage {
    if image.is_empty() {
        return image.clone();
    }

    let mut data = Vec::with_capacity(image.data().len());
    for px in image.data().chunks_exact(4) {
        let alpha = mul_div_255(px[3], color.a);
        data.extend_from_slice(&[color.r, color.g, color.b, alpha]);
    }

    // Same dimensions as the input, so the length always matches.
    IconImage::from_rgba(image.width(), image.height(), data).unwrap_or_default()
}

fn mul_div_255(a: u8, b: u8) -> u8 {
    let prod = a as u32 * b as u32 + 128;
    ((prod + (prod >> 8)) >> 8) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> IconImage {
        IconImage::from_rgba(
            2,
            1,
            vec![
                10, 20, 30, 255, // opaque
                40, 50, 60, 0, // transparent
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_tint_replaces_color_and_keeps_alpha() {
        let tinted = apply_tint(&sample(), Color::rgb(255, 0, 0));
        assert_eq!(tinted.pixel(0, 0), Some([255, 0, 0, 255]));
        assert_eq!(tinted.pixel(1, 0), Some([255, 0, 0, 0]));
    }

    #[test]
    fn test_transparent_tints_stay_distinct() {
        let red = apply_tint(&sample(), Color::rgba(255, 0, 0, 0));
        let blue = apply_tint(&sample(), Color::rgba(0, 0, 255, 0));
        assert!(!red.has_visible_pixels());
        assert!(!blue.has_visible_pixels());
        assert_ne!(red, blue);
    }

    #[test]
    fn test_tint_alpha_scales_mask() {
        let half = IconImage::from_rgba(1, 1, vec![0, 0, 0, 128]).unwrap();
        let tinted = apply_tint(&half, Color::rgba(0, 0, 255, 255));
        assert_eq!(tinted.pixel(0, 0), Some([0, 0, 255, 128]));

        let tinted = apply_tint(&half, Color::rgba(0, 0, 255, 128));
        assert_eq!(tinted.pixel(0, 0), Some([0, 0, 255, 64]));
    }

    #[test]
    fn test_tint_empty_image() {
        assert!(apply_tint(&IconImage::empty(), Color::WHITE).is_empty());
    }

    #[test]
    fn test_mul_div_255_bounds() {
        assert_eq!(mul_div_255(255, 255), 255);
        assert_eq!(mul_div_255(0, 255), 0);
        assert_eq!(mul_div_255(255, 0), 0);
    }
}
