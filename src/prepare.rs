//! Request-side preparation: payload checks, decoding, and the pre-processing
//! the engine expects to have happened before it runs.

use std::path::Path;

use image::imageops::FilterType;
use image::{DynamicImage, GrayImage, ImageFormat, Rgba, RgbaImage};
use imageproc::contrast::{ThresholdType, threshold};
use imageproc::filter::gaussian_blur_f32;
use serde::Serialize;

use crate::config::{BLACK_WHITE_THRESHOLD, ColorMode, Settings};
use crate::{PixtraceError, PixtraceResult};

/// Largest accepted upload.
pub const MAX_PAYLOAD_BYTES: usize = 10 * 1024 * 1024;
/// Longest side handed to the engine.
pub const MAX_DIMENSION: u32 = 1024;
/// Gaussian sigma of the optional noise-reduction pass.
pub const NOISE_REDUCTION_SIGMA: f32 = 0.3;

/// Successful conversion as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversion {
    pub svg: String,
    pub width: u32,
    pub height: u32,
    pub original_width: u32,
    pub original_height: u32,
}

/// Reject empty, oversized, or non-image payloads before any decoding.
pub fn validate_payload(len: usize, mime: &str) -> PixtraceResult<()> {
    if len == 0 {
        return Err(PixtraceError::EmptyPayload);
    }
    if len > MAX_PAYLOAD_BYTES {
        return Err(PixtraceError::PayloadTooLarge {
            size: len,
            limit: MAX_PAYLOAD_BYTES,
        });
    }
    if !mime.starts_with("image/") {
        return Err(PixtraceError::UnsupportedMediaType {
            mime: mime.to_string(),
        });
    }
    Ok(())
}

/// Guess the media type from the file extension, then from the leading bytes.
pub fn detect_mime(path: Option<&Path>, bytes: &[u8]) -> &'static str {
    path.and_then(|p| ImageFormat::from_path(p).ok())
        .or_else(|| image::guess_format(bytes).ok())
        .map(|format| format.to_mime_type())
        .unwrap_or("application/octet-stream")
}

/// Scale `(width, height)` so the longest side is at most `max`, keeping the aspect ratio.
pub fn fit_within(width: u32, height: u32, max: u32) -> (u32, u32) {
    let longest = width.max(height);
    if longest <= max {
        return (width, height);
    }
    let ratio = f64::from(max) / f64::from(longest);
    let scale = |side: u32| ((f64::from(side) * ratio).round() as u32).max(1);
    (scale(width), scale(height))
}

/// Validate and decode an uploaded payload, returning the prepared RGBA buffer
/// and the original dimensions.
pub fn decode_payload(
    bytes: &[u8],
    mime: &str,
    settings: &Settings,
) -> PixtraceResult<(RgbaImage, (u32, u32))> {
    validate_payload(bytes.len(), mime)?;
    let decoded = image::load_from_memory(bytes)?;
    let original = (decoded.width(), decoded.height());
    Ok((prepare_decoded(decoded, settings), original))
}

/// Resize, denoise, and reduce colors of a decoded image as configured.
pub fn prepare_decoded(decoded: DynamicImage, settings: &Settings) -> RgbaImage {
    let (w, h) = (decoded.width(), decoded.height());
    let mut rgba = decoded.to_rgba8();

    let (target_w, target_h) = fit_within(w, h, MAX_DIMENSION);
    if (target_w, target_h) != (w, h) {
        log::debug!("Resizing {w}x{h} to {target_w}x{target_h}");
        rgba = image::imageops::resize(&rgba, target_w, target_h, FilterType::Triangle);
    }

    if settings.noise_reduction_enabled && target_w > 0 && target_h > 0 {
        rgba = gaussian_blur_f32(&rgba, NOISE_REDUCTION_SIGMA);
    }

    match settings.color_mode {
        ColorMode::FullColor => rgba,
        ColorMode::Grayscale => {
            let gray = image::imageops::grayscale(&rgba);
            with_luma(&rgba, &gray)
        }
        ColorMode::BlackWhite => {
            let gray = image::imageops::grayscale(&rgba);
            // `threshold` whitens values strictly above its argument; brightness 128 is white.
            let binary = threshold(&gray, BLACK_WHITE_THRESHOLD - 1, ThresholdType::Binary);
            with_luma(&rgba, &binary)
        }
    }
}

/// Replace the color channels with `luma`, keeping the source alpha.
fn with_luma(rgba: &RgbaImage, luma: &GrayImage) -> RgbaImage {
    let mut out = rgba.clone();
    for (px, l) in out.pixels_mut().zip(luma.pixels()) {
        let v = l[0];
        *px = Rgba([v, v, v, px[3]]);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn png_bytes(image: &RgbaImage) -> Vec<u8> {
        let mut out = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(image.clone())
            .write_to(&mut out, ImageFormat::Png)
            .expect("encode png");
        out.into_inner()
    }

    mod validate {
        use super::*;

        #[test]
        fn rejects_empty_payload() {
            assert!(matches!(
                validate_payload(0, "image/png"),
                Err(PixtraceError::EmptyPayload)
            ));
        }

        #[test]
        fn rejects_oversized_payload() {
            let err = validate_payload(MAX_PAYLOAD_BYTES + 1, "image/png").unwrap_err();
            assert!(matches!(err, PixtraceError::PayloadTooLarge { .. }));
            assert!(validate_payload(MAX_PAYLOAD_BYTES, "image/png").is_ok());
        }

        #[test]
        fn rejects_non_image_mime() {
            let err = validate_payload(10, "text/plain").unwrap_err();
            assert!(err.to_string().contains("text/plain"));
        }

        #[test]
        fn detects_mime_from_extension_then_content() {
            assert_eq!(detect_mime(Some(Path::new("a.JPG")), &[]), "image/jpeg");
            let png = png_bytes(&RgbaImage::new(1, 1));
            assert_eq!(detect_mime(None, &png), "image/png");
            assert_eq!(detect_mime(None, b"hello"), "application/octet-stream");
        }
    }

    mod resize {
        use super::*;

        #[test]
        fn small_images_keep_their_size() {
            assert_eq!(fit_within(800, 600, 1024), (800, 600));
            assert_eq!(fit_within(1024, 1024, 1024), (1024, 1024));
        }

        #[test]
        fn longest_side_is_capped() {
            assert_eq!(fit_within(2048, 512, 1024), (1024, 256));
            assert_eq!(fit_within(500, 4000, 1024), (128, 1024));
            assert_eq!(fit_within(5000, 1, 1024), (1024, 1));
        }
    }

    mod decode {
        use super::*;

        #[test]
        fn decodes_and_reports_original_size() {
            let image = RgbaImage::from_pixel(3, 2, Rgba([10, 20, 30, 255]));
            let settings = Settings::default().with_noise_reduction(false);
            let (prepared, original) =
                decode_payload(&png_bytes(&image), "image/png", &settings).unwrap();
            assert_eq!(original, (3, 2));
            assert_eq!(prepared, image);
        }

        #[test]
        fn garbage_bytes_fail_to_decode() {
            let err = decode_payload(b"not an image", "image/png", &Settings::default());
            assert!(matches!(err, Err(PixtraceError::Image(_))));
        }

        #[test]
        fn black_white_mode_binarizes_and_keeps_alpha() {
            let mut image = RgbaImage::from_pixel(2, 1, Rgba([20, 20, 20, 255]));
            image.put_pixel(1, 0, Rgba([240, 240, 240, 40]));
            let settings = Settings::default()
                .with_noise_reduction(false)
                .with_color_mode(ColorMode::BlackWhite);
            let prepared = prepare_decoded(DynamicImage::ImageRgba8(image), &settings);
            assert_eq!(*prepared.get_pixel(0, 0), Rgba([0, 0, 0, 255]));
            assert_eq!(*prepared.get_pixel(1, 0), Rgba([255, 255, 255, 40]));
        }

        #[test]
        fn black_white_boundary_matches_classifier() {
            let mut image = RgbaImage::from_pixel(2, 1, Rgba([128, 128, 128, 255]));
            image.put_pixel(1, 0, Rgba([127, 127, 127, 255]));
            let settings = Settings::default()
                .with_noise_reduction(false)
                .with_color_mode(ColorMode::BlackWhite);
            let prepared = prepare_decoded(DynamicImage::ImageRgba8(image), &settings);
            assert_eq!(*prepared.get_pixel(0, 0), Rgba([255, 255, 255, 255]));
            assert_eq!(*prepared.get_pixel(1, 0), Rgba([0, 0, 0, 255]));

            let doc = crate::pipeline::vectorize(&prepared, &settings);
            let fills: Vec<_> = doc.shapes.iter().map(|s| s.fill).collect();
            assert!(fills.contains(&image::Rgb([255, 255, 255])));
            assert!(fills.contains(&image::Rgb([0, 0, 0])));
        }

        #[test]
        fn grayscale_mode_equalizes_channels() {
            let image = RgbaImage::from_pixel(1, 1, Rgba([200, 10, 10, 255]));
            let settings = Settings::default()
                .with_noise_reduction(false)
                .with_color_mode(ColorMode::Grayscale);
            let prepared = prepare_decoded(DynamicImage::ImageRgba8(image), &settings);
            let px = prepared.get_pixel(0, 0);
            assert_eq!(px[0], px[1]);
            assert_eq!(px[1], px[2]);
            assert_eq!(px[3], 255);
        }
    }
}
