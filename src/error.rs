//! Crate error type.

pub type CardResult<T> = Result<T, CardError>;

#[derive(thiserror::Error, Debug)]
pub enum CardError {
    #[error("failed to decode image: {0}")]
    ImageDecode(String),

    #[error("no colors could be sampled from the image")]
    ExtractionEmpty,

    #[error("invalid hex color: {0:?}")]
    InvalidHexColor(String),

    #[error("failed to parse SVG markup: {0}")]
    Svg(String),

    #[error("failed to encode image: {0}")]
    Encode(String),

    #[error("clipboard does not support image writes")]
    ClipboardUnsupported,

    #[error("clipboard rejected the image: {0}")]
    ClipboardWrite(String),

    #[error("failed to hand off file: {0}")]
    FileWrite(String),
}

impl CardError {
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::ImageDecode(msg.into())
    }

    pub fn svg(msg: impl Into<String>) -> Self {
        Self::Svg(msg.into())
    }

    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }
}
