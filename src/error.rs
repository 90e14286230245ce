//! Error types shared by the imaging engines and the JNI bridge

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImagingError {
    #[error("no frames to process")]
    NoFrames,

    #[error("invalid dimensions {width}x{height}")]
    InvalidDimensions { width: i64, height: i64 },

    #[error("pixel buffer holds {actual} values, expected {expected}")]
    BufferSize { expected: usize, actual: usize },

    #[error("invalid exposure range [{lower}, {upper}]")]
    InvalidRange { lower: i32, upper: i32 },

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("JNI error: {0}")]
    Jni(#[from] jni::errors::Error),
}

pub type Result<T> = std::result::Result<T, ImagingError>;
