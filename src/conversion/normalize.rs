use image::{DynamicImage, Rgb, RgbImage, RgbaImage};

use super::formats::OutputFormat;

/// Normalize an image's pixel representation to one the destination format
/// can encode.
///
/// Policy:
/// - alpha source + alpha-capable destination: keep the alpha channel (RGBA8)
/// - alpha source + non-alpha destination: composite onto opaque white,
///   discard alpha
/// - everything else: plain RGB8
///
/// Palette sources arrive from the decoder already expanded to RGB/RGBA, so
/// the indexed rows of the policy table collapse into the cases above. The
/// output is always `ImageRgb8` or `ImageRgba8`, which makes the function
/// idempotent and keeps every encoder happy with the result.
pub fn normalize(image: DynamicImage, target: OutputFormat) -> DynamicImage {
    let has_alpha = image.color().has_alpha();

    if has_alpha && target.supports_alpha() {
        match image {
            DynamicImage::ImageRgba8(_) => image,
            other => DynamicImage::ImageRgba8(other.to_rgba8()),
        }
    } else if has_alpha {
        DynamicImage::ImageRgb8(flatten_onto_white(&image.to_rgba8()))
    } else {
        match image {
            DynamicImage::ImageRgb8(_) => image,
            other => DynamicImage::ImageRgb8(other.to_rgb8()),
        }
    }
}

/// Composite an RGBA image onto an opaque white background.
///
/// White is the documented deterministic choice for destinations that cannot
/// represent transparency; fully opaque pixels keep their RGB values exactly.
fn flatten_onto_white(rgba: &RgbaImage) -> RgbImage {
    let (width, height) = rgba.dimensions();
    let mut out = RgbImage::new(width, height);

    for (x, y, pixel) in rgba.enumerate_pixels() {
        let alpha = pixel[3] as u32;
        let blend = |channel: u8| -> u8 {
            ((channel as u32 * alpha + 255 * (255 - alpha)) / 255) as u8
        };
        out.put_pixel(x, y, Rgb([blend(pixel[0]), blend(pixel[1]), blend(pixel[2])]));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{LumaA, Rgba};

    fn rgba_test_image() -> RgbaImage {
        let mut img = RgbaImage::new(2, 2);
        img.put_pixel(0, 0, Rgba([200, 100, 50, 255])); // opaque
        img.put_pixel(1, 0, Rgba([200, 100, 50, 0])); // fully transparent
        img.put_pixel(0, 1, Rgba([0, 0, 0, 128])); // half transparent black
        img.put_pixel(1, 1, Rgba([255, 255, 255, 255]));
        img
    }

    #[test]
    fn test_rgba_passes_through_for_alpha_destination() {
        let img = DynamicImage::ImageRgba8(rgba_test_image());
        let normalized = normalize(img.clone(), OutputFormat::Webp);
        assert!(matches!(normalized, DynamicImage::ImageRgba8(_)));
        assert_eq!(normalized.to_rgba8(), img.to_rgba8());
    }

    #[test]
    fn test_rgba_flattened_for_non_alpha_destination() {
        let img = DynamicImage::ImageRgba8(rgba_test_image());
        let normalized = normalize(img, OutputFormat::Jpeg);

        let rgb = match normalized {
            DynamicImage::ImageRgb8(rgb) => rgb,
            other => panic!("expected RGB8, got {:?}", other.color()),
        };

        // Opaque pixels keep their RGB values.
        assert_eq!(rgb.get_pixel(0, 0), &Rgb([200, 100, 50]));
        assert_eq!(rgb.get_pixel(1, 1), &Rgb([255, 255, 255]));
        // Fully transparent pixels become white.
        assert_eq!(rgb.get_pixel(1, 0), &Rgb([255, 255, 255]));
        // Half-transparent black blends towards white.
        let blended = rgb.get_pixel(0, 1);
        assert!(blended[0] > 120 && blended[0] < 135);
    }

    #[test]
    fn test_rgb_passes_through_unchanged() {
        let mut rgb = RgbImage::new(1, 1);
        rgb.put_pixel(0, 0, Rgb([10, 20, 30]));
        let img = DynamicImage::ImageRgb8(rgb);
        let normalized = normalize(img.clone(), OutputFormat::Webp);
        assert_eq!(normalized.to_rgb8(), img.to_rgb8());
    }

    #[test]
    fn test_grayscale_converted_to_rgb() {
        let luma = DynamicImage::new_luma8(2, 2);
        let normalized = normalize(luma, OutputFormat::Webp);
        assert!(matches!(normalized, DynamicImage::ImageRgb8(_)));
    }

    #[test]
    fn test_luma_alpha_widened_to_rgba() {
        let mut la = image::GrayAlphaImage::new(1, 1);
        la.put_pixel(0, 0, LumaA([100, 200]));
        let normalized = normalize(DynamicImage::ImageLumaA8(la), OutputFormat::Png);
        assert!(matches!(normalized, DynamicImage::ImageRgba8(_)));
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for target in [OutputFormat::Webp, OutputFormat::Jpeg, OutputFormat::Bmp] {
            let img = DynamicImage::ImageRgba8(rgba_test_image());
            let once = normalize(img, target);
            let twice = normalize(once.clone(), target);
            assert_eq!(once.color(), twice.color());
            assert_eq!(once.to_rgba8(), twice.to_rgba8());
        }
    }
}
