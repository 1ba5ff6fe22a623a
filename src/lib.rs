pub mod classify;
pub mod config;
pub mod contour;
pub mod error;
pub mod geom;
pub mod grid;
pub mod palette;
pub mod pipeline;
pub mod prepare;
pub mod segment;
pub mod simplify;
pub mod svg;
pub mod vectorizer;

pub use config::{ColorMode, ColorSimplification, OptimizationLevel, QualityTier, Settings};
pub use error::{PixtraceError, PixtraceResult};
pub use prepare::Conversion;
pub use svg::{VectorDocument, VectorShape};
pub use vectorizer::RasterVectorizer;
pub use vectorizer::region::{RegionSvgVectorizer, RegionVectorizer, trace_to_svg_string};

use std::path::Path;
use std::sync::Arc;

use image::RgbaImage;

use crate::prepare::{decode_payload, detect_mime};

/// Entry point for configuring and running conversions.
#[derive(Debug, Clone, Default)]
pub struct Pixtrace {
    settings: Settings,
}

impl Pixtrace {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    /// Replace the settings with ones parsed leniently from JSON text.
    ///
    /// Fields that fail to parse keep their defaults, with a warning.
    pub fn with_settings_json(mut self, text: &str) -> Self {
        self.settings = Settings::from_json_lenient(text);
        self
    }

    /// Replace the settings.
    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    /// Get a reference to the current settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Validate, decode, and pre-process an uploaded payload.
    pub fn for_bytes(&self, bytes: &[u8], mime: &str) -> PixtraceResult<PreparedImage> {
        let (image, original) = decode_payload(bytes, mime, &self.settings)?;
        Ok(PreparedImage::new(image, original, self.settings.clone()))
    }

    /// Read an image file and prepare it like an upload of the same bytes.
    pub fn for_image(&self, image_path: impl AsRef<Path>) -> PixtraceResult<PreparedImage> {
        let path = image_path.as_ref();
        let bytes = std::fs::read(path)?;
        let mime = detect_mime(Some(path), &bytes);
        log::debug!("Loaded {} ({} bytes, {mime})", path.display(), bytes.len());
        self.for_bytes(&bytes, mime)
    }

    /// Run the engine on an already prepared image, skipping decoding and pre-processing.
    pub fn vectorize_image(&self, image: &RgbaImage) -> VectorDocument {
        pipeline::vectorize(image, &self.settings)
    }

    /// Run the engine on a raw row-major RGBA buffer.
    pub fn vectorize_raw(
        &self,
        width: u32,
        height: u32,
        pixels: Vec<u8>,
    ) -> PixtraceResult<VectorDocument> {
        let expected = width as usize * height as usize * 4;
        let found = pixels.len();
        let size_error = PixtraceError::BufferSize {
            width,
            height,
            expected,
            found,
        };
        if found != expected {
            return Err(size_error);
        }
        let image = RgbaImage::from_raw(width, height, pixels).ok_or(size_error)?;
        Ok(self.vectorize_image(&image))
    }
}

/// A decoded and pre-processed image ready for tracing, plus its original size.
#[derive(Debug, Clone)]
pub struct PreparedImage {
    image: Arc<RgbaImage>,
    original: (u32, u32),
    settings: Settings,
}

impl PreparedImage {
    fn new(image: RgbaImage, original: (u32, u32), settings: Settings) -> Self {
        Self {
            image: Arc::new(image),
            original,
            settings,
        }
    }

    /// Get a reference to the processed RGBA image.
    pub fn image(&self) -> &RgbaImage {
        self.image.as_ref()
    }

    /// Size of the processed image, which is also the SVG canvas size.
    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// Size of the image as decoded, before any resizing.
    pub fn original_dimensions(&self) -> (u32, u32) {
        self.original
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Save the processed image to the specified path.
    pub fn save(&self, path: impl AsRef<Path>) -> PixtraceResult<()> {
        self.image.as_ref().save(path)?;
        Ok(())
    }

    /// Trace the processed image using the specified vectorizer and options.
    pub fn trace<V>(&self, vectorizer: &V, options: &V::Options) -> PixtraceResult<V::Output>
    where
        V: RasterVectorizer,
    {
        vectorizer.vectorize(self.image.as_ref(), options)
    }

    /// Trace with the stored settings and package the result for clients.
    pub fn convert(&self) -> PixtraceResult<Conversion> {
        let svg = self.trace(&RegionSvgVectorizer, &self.settings)?;
        let (width, height) = self.dimensions();
        let (original_width, original_height) = self.original;
        Ok(Conversion {
            svg,
            width,
            height,
            original_width,
            original_height,
        })
    }
}
