use crate::config::OcrConfig;
use crate::error::{OcrToolError, Result};
use image::{DynamicImage, GenericImageView, GrayImage, ImageFormat, ImageReader, Luma};

/// Image bytes ready for the engine, plus the factor that maps engine
/// coordinates back to source pixels.
#[derive(Debug, Clone)]
pub struct PreparedImage {
    pub png: Vec<u8>,
    pub scale: f64,
}

/// Decode image bytes of any supported container into a raster.
pub fn decode_image(bytes: &[u8]) -> Result<DynamicImage> {
    ImageReader::new(std::io::Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| OcrToolError::Processing(format!("Failed to read image: {e}")))?
        .decode()
        .map_err(|e| OcrToolError::Processing(format!("Failed to decode image: {e}")))
}

/// Prepare a decoded image for recognition.
///
/// Always validates the minimum size and re-encodes as PNG. With `enhanced`
/// set, it also:
/// 1. Downscales images larger than `max_image_dimension` (Lanczos3)
/// 2. Converts to grayscale, dropping any alpha channel
/// 3. Stretches the histogram to the full 0..=255 range
pub fn prepare_image(img: DynamicImage, config: &OcrConfig, enhanced: bool) -> Result<PreparedImage> {
    let (width, height) = img.dimensions();
    if width < config.min_image_dimension || height < config.min_image_dimension {
        return Err(OcrToolError::Processing(format!(
            "Image too small: {}x{}, minimum {}x{}",
            width, height, config.min_image_dimension, config.min_image_dimension
        )));
    }

    let (img, scale) = if enhanced {
        let resized = resize_if_needed(img, config.max_image_dimension);
        let scale = width as f64 / resized.width() as f64;
        let gray = enhance_grayscale_contrast(resized.to_luma8());
        (DynamicImage::ImageLuma8(gray), scale)
    } else {
        (img, 1.0)
    };

    let mut png = Vec::new();
    img.write_to(&mut std::io::Cursor::new(&mut png), ImageFormat::Png)
        .map_err(|e| OcrToolError::Processing(format!("Failed to encode image: {e}")))?;

    Ok(PreparedImage { png, scale })
}

/// Resize image if it exceeds maximum dimension while maintaining aspect ratio
///
/// `DynamicImage::resize` fits the image inside the bounds, so the longer side
/// lands exactly on `max_dim`
fn resize_if_needed(img: DynamicImage, max_dim: u32) -> DynamicImage {
    let (width, height) = img.dimensions();

    if width <= max_dim && height <= max_dim {
        return img;
    }

    img.resize(max_dim, max_dim, image::imageops::FilterType::Lanczos3)
}

/// Maps the darkest pixel to 0 and the lightest to 255, scaling all
/// intermediate values linearly
fn enhance_grayscale_contrast(gray: GrayImage) -> GrayImage {
    let (min_val, max_val) = gray
        .pixels()
        .fold((u8::MAX, u8::MIN), |(lo, hi), p| (lo.min(p[0]), hi.max(p[0])));

    // Flat image, nothing to stretch
    if max_val <= min_val {
        return gray;
    }

    let range = (max_val - min_val) as f32;
    GrayImage::from_fn(gray.width(), gray.height(), |x, y| {
        let normalized = (gray.get_pixel(x, y)[0] - min_val) as f32 / range;
        Luma([(normalized * 255.0) as u8])
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_config() -> OcrConfig {
        OcrConfig {
            max_image_dimension: 4096,
            min_image_dimension: 50,
            ..OcrConfig::default()
        }
    }

    fn create_test_png(width: u32, height: u32) -> Vec<u8> {
        let img = DynamicImage::new_rgb8(width, height);
        let mut output = Vec::new();
        img.write_to(&mut std::io::Cursor::new(&mut output), ImageFormat::Png)
            .unwrap();
        output
    }

    #[test]
    fn test_decode_valid_png() {
        let img = decode_image(&create_test_png(100, 60)).unwrap();
        assert_eq!(img.dimensions(), (100, 60));
    }

    #[test]
    fn test_decode_invalid_image_data() {
        let result = decode_image(&[0u8, 1, 2, 3, 4, 5]);
        assert!(matches!(result, Err(OcrToolError::Processing(_))));
    }

    #[test]
    fn test_prepare_rejects_tiny_image() {
        let img = DynamicImage::new_rgb8(10, 100);
        let err = prepare_image(img, &create_test_config(), true).unwrap_err();
        assert!(err.to_string().contains("too small"));
    }

    #[test]
    fn test_prepare_without_enhancement_keeps_scale() {
        let img = DynamicImage::new_rgba8(6000, 60);
        let prepared = prepare_image(img, &create_test_config(), false).unwrap();
        assert_eq!(prepared.scale, 1.0);
        let decoded = decode_image(&prepared.png).unwrap();
        assert_eq!(decoded.dimensions(), (6000, 60));
    }

    #[test]
    fn test_prepare_enhanced_downscales_and_reports_scale() {
        let config = OcrConfig {
            max_image_dimension: 500,
            ..create_test_config()
        };
        let img = DynamicImage::new_rgb8(1000, 120);
        let prepared = prepare_image(img, &config, true).unwrap();
        let decoded = decode_image(&prepared.png).unwrap();
        assert_eq!(decoded.width(), 500);
        assert!((prepared.scale - 2.0).abs() < 1e-6);
        assert!(matches!(decoded, DynamicImage::ImageLuma8(_)));
    }

    #[test]
    fn test_resize_if_needed_no_change() {
        let img = DynamicImage::new_rgb8(1000, 800);
        assert_eq!(resize_if_needed(img, 4096).dimensions(), (1000, 800));
    }

    #[test]
    fn test_resize_if_needed_height_exceeded() {
        let img = DynamicImage::new_rgb8(100, 500);
        let (w, h) = resize_if_needed(img, 400).dimensions();
        assert_eq!(h, 400);
        assert_eq!(w, 80);
    }

    #[test]
    fn test_enhance_grayscale_contrast_normal() {
        let gray = GrayImage::from_fn(10, 10, |x, _| Luma([100 + x as u8 * 5]));
        let enhanced = enhance_grayscale_contrast(gray);
        let values: Vec<u8> = enhanced.pixels().map(|p| p[0]).collect();
        assert_eq!(values.iter().min(), Some(&0));
        assert_eq!(values.iter().max(), Some(&255));
    }

    #[test]
    fn test_enhance_grayscale_contrast_flat() {
        let gray = GrayImage::from_pixel(10, 10, Luma([128]));
        let enhanced = enhance_grayscale_contrast(gray);
        assert!(enhanced.pixels().all(|p| p[0] == 128));
    }
}
