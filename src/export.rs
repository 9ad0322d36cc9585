//! Encoding and delivery of the finished card.
//!
//! The crate owns the policy — which format goes where, what gets
//! retried — while the host owns the platform calls through
//! [`DeliverySink`]. Clipboard delivery prefers PNG and falls back to
//! JPEG once before giving up; file delivery is always JPEG under a
//! timestamped name.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat, RgbaImage};
use tracing::warn;

use crate::config::ExportConfig;
use crate::error::{CardError, CardResult};

/// Product name used in export filenames.
const PRODUCT_NAME: &str = "lyrics-card";

/// Encoded image formats the exporter produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Png,
    Jpeg,
}

impl ExportFormat {
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
        }
    }
}

/// Why a sink refused a write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkError {
    /// The platform has no image clipboard at all.
    Unsupported,
    /// The write was attempted and rejected.
    Rejected(String),
}

/// Host-side delivery of encoded bytes: the clipboard and the download
/// target live outside this crate.
pub trait DeliverySink {
    fn write_clipboard(&mut self, format: ExportFormat, bytes: &[u8]) -> Result<(), SinkError>;

    fn save_file(&mut self, filename: &str, bytes: &[u8]) -> Result<(), SinkError>;
}

/// Encodes a surface as PNG (lossless) or JPEG at the configured quality.
pub fn encode(image: &RgbaImage, format: ExportFormat, export: &ExportConfig) -> CardResult<Vec<u8>> {
    let mut bytes = Vec::new();
    match format {
        ExportFormat::Png => {
            DynamicImage::ImageRgba8(image.clone())
                .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
                .map_err(|e| CardError::encode(e.to_string()))?;
        }
        ExportFormat::Jpeg => {
            // JPEG has no alpha channel; the surface is opaque by now.
            let rgb = DynamicImage::ImageRgba8(image.clone()).to_rgb8();
            let quality = (export.jpeg_quality.clamp(0.0, 1.0) * 100.0).round() as u8;
            let encoder = JpegEncoder::new_with_quality(&mut bytes, quality);
            rgb.write_with_encoder(encoder)
                .map_err(|e| CardError::encode(e.to_string()))?;
        }
    }

    if bytes.is_empty() {
        return Err(CardError::encode("encoder produced no data"));
    }
    Ok(bytes)
}

/// Writes the card image to the clipboard.
///
/// PNG first; if the sink rejects it, one JPEG retry under the same
/// operation. Returns the format that landed. A sink without image
/// support fails immediately with no retry.
pub fn copy_to_clipboard(
    sink: &mut dyn DeliverySink,
    image: &RgbaImage,
    export: &ExportConfig,
) -> CardResult<ExportFormat> {
    let png = encode(image, ExportFormat::Png, export)?;
    match sink.write_clipboard(ExportFormat::Png, &png) {
        Ok(()) => return Ok(ExportFormat::Png),
        Err(SinkError::Unsupported) => return Err(CardError::ClipboardUnsupported),
        Err(SinkError::Rejected(reason)) => {
            warn!(%reason, "PNG clipboard write failed, trying JPEG fallback");
        }
    }

    let jpeg = encode(image, ExportFormat::Jpeg, export)?;
    match sink.write_clipboard(ExportFormat::Jpeg, &jpeg) {
        Ok(()) => Ok(ExportFormat::Jpeg),
        Err(SinkError::Unsupported) => Err(CardError::ClipboardUnsupported),
        Err(SinkError::Rejected(reason)) => Err(CardError::ClipboardWrite(reason)),
    }
}

/// Hands the card to the sink as a JPEG download named
/// `lyrics-card-<unix-epoch-ms>.jpg`. Returns the filename used.
pub fn save_as_file(
    sink: &mut dyn DeliverySink,
    image: &RgbaImage,
    export: &ExportConfig,
    timestamp_ms: u64,
) -> CardResult<String> {
    let bytes = encode(image, ExportFormat::Jpeg, export)?;
    let filename = format!("{PRODUCT_NAME}-{timestamp_ms}.jpg");

    match sink.save_file(&filename, &bytes) {
        Ok(()) => Ok(filename),
        Err(SinkError::Unsupported) => {
            Err(CardError::FileWrite("no file target available".into()))
        }
        Err(SinkError::Rejected(reason)) => Err(CardError::FileWrite(reason)),
    }
}
