use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum CoreError {
    #[error("invalid resolution {width}x{height}: both dimensions must be finite and positive")]
    InvalidResolution { width: f32, height: f32 },

    #[error("image must not be empty, got {width}x{height}")]
    EmptyImage { width: u32, height: u32 },

    #[error("pixel data has {actual} bytes, expected {expected}")]
    DataLength { expected: usize, actual: usize },
}
