use image::RgbaImage;

use crate::config::Settings;
use crate::pipeline::vectorize;
use crate::svg::VectorDocument;
use crate::PixtraceResult;

use super::RasterVectorizer;

/// Palette segmentation plus Moore-neighbor contour tracing.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegionVectorizer;

impl RasterVectorizer for RegionVectorizer {
    type Options = Settings;
    type Output = VectorDocument;

    fn vectorize(&self, image: &RgbaImage, options: &Self::Options) -> PixtraceResult<Self::Output> {
        Ok(vectorize(image, options))
    }
}

/// Same as [`RegionVectorizer`] but renders straight to optimized SVG text.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegionSvgVectorizer;

impl RasterVectorizer for RegionSvgVectorizer {
    type Options = Settings;
    type Output = String;

    fn vectorize(&self, image: &RgbaImage, options: &Self::Options) -> PixtraceResult<Self::Output> {
        Ok(trace_to_svg_string(image, options))
    }
}

/// The helper function that vectorizes an image and renders it at the configured optimization level.
pub fn trace_to_svg_string(image: &RgbaImage, settings: &Settings) -> String {
    vectorize(image, settings).render(settings.optimization_level)
}
