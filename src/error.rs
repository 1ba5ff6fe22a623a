use thiserror::Error;

/// Result type alias for operations that may fail with [`PixtraceError`].
pub type PixtraceResult<T> = std::result::Result<T, PixtraceError>;

/// Error types that can occur while preparing or vectorizing an image.
///
/// The engine stages never fail on degenerate geometry; these variants cover
/// input validation, decoding, and I/O around the engine.
#[derive(Debug, Error)]
pub enum PixtraceError {
    /// Image loading, decoding, or encoding error.
    #[error("Image processing failed: {0}")]
    Image(#[from] image::ImageError),
    /// File system I/O error.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// Settings text could not be parsed (strict parser only).
    #[error("Invalid settings: {0}")]
    Settings(#[from] serde_json::Error),
    /// Raw pixel buffer length does not match the declared dimensions.
    #[error("Pixel buffer holds {found} bytes but {width}x{height} RGBA needs {expected}")]
    BufferSize {
        width: u32,
        height: u32,
        expected: usize,
        found: usize,
    },
    /// No image payload was provided.
    #[error("No image file provided")]
    EmptyPayload,
    /// Image payload exceeds the accepted size.
    #[error("File size {size} bytes exceeds the {limit} byte limit")]
    PayloadTooLarge { size: usize, limit: usize },
    /// Payload does not declare an image media type.
    #[error("Invalid file type `{mime}`. Please upload an image.")]
    UnsupportedMediaType { mime: String },
}
