//! Format normalization: make every input embeddable in the PDF container.
//!
//! PDF can embed JPEG streams directly (`DCTDecode`) and raw pixel data
//! deflated with `FlateDecode`, which is how PNGs are embedded. WEBP has no
//! native filter, so WEBP inputs are transcoded to PNG here, losslessly, and
//! flow through the rest of the pipeline as PNG. JPEG and PNG inputs pass
//! through byte-for-byte — this stage never re-encodes what the container
//! already understands.
//!
//! The declared format is an attribute carried from the caller (the CLI maps
//! it from the file extension). It is deliberately *not* re-derived by
//! sniffing content: bytes that contradict their declaration surface as
//! [`Img2PdfError::DecodeFailed`] in this stage (WEBP) or in the composer's
//! header inspection (JPEG/PNG).

use crate::error::Img2PdfError;
use serde::{Deserialize, Serialize};
use std::io::Cursor;
use tracing::debug;

/// Pixel encoding declared for an input image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    Jpeg,
    Png,
    Webp,
}

impl SourceFormat {
    /// Map a file extension (without the dot, case-insensitive) to a declared
    /// format. `None` means the extension is not a supported image encoding.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Some(SourceFormat::Jpeg),
            "png" => Some(SourceFormat::Png),
            "webp" => Some(SourceFormat::Webp),
            _ => None,
        }
    }
}

/// One input unit: raw encoded bytes plus the encoding the caller declared.
#[derive(Debug, Clone)]
pub struct SourceImage {
    /// Raw encoded pixel data as supplied.
    pub bytes: Vec<u8>,
    /// Encoding declared by the caller, not sniffed from `bytes`.
    pub format: SourceFormat,
}

impl SourceImage {
    pub fn new(bytes: Vec<u8>, format: SourceFormat) -> Self {
        Self { bytes, format }
    }
}

/// Pixel encoding family the container embeds natively.
///
/// Never WEBP: WEBP inputs are always converted to PNG before this stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbedKind {
    Jpeg,
    Png,
}

/// An image in a container-embeddable encoding.
#[derive(Debug, Clone)]
pub struct NormalizedImage {
    /// Encoded pixel data, PNG or JPEG only.
    pub bytes: Vec<u8>,
    /// Selects the embedding procedure the builder uses.
    pub kind: EmbedKind,
}

/// Normalize one input image to a container-embeddable encoding.
///
/// JPEG and PNG pass through unchanged; WEBP is decoded and re-encoded as
/// PNG. `index` is the 1-based position of the image in the batch, used only
/// for error reporting.
///
/// # Errors
/// [`Img2PdfError::DecodeFailed`] if bytes declared as WEBP cannot be decoded
/// (corrupt upload).
pub fn normalize(index: usize, image: SourceImage) -> Result<NormalizedImage, Img2PdfError> {
    match image.format {
        SourceFormat::Jpeg => Ok(NormalizedImage {
            bytes: image.bytes,
            kind: EmbedKind::Jpeg,
        }),
        SourceFormat::Png => Ok(NormalizedImage {
            bytes: image.bytes,
            kind: EmbedKind::Png,
        }),
        SourceFormat::Webp => {
            let decoded =
                image::load_from_memory_with_format(&image.bytes, image::ImageFormat::WebP)
                    .map_err(|e| Img2PdfError::DecodeFailed {
                        image: index,
                        detail: format!("declared WEBP: {e}"),
                    })?;

            let mut png = Vec::new();
            decoded
                .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
                .map_err(|e| Img2PdfError::DecodeFailed {
                    image: index,
                    detail: format!("PNG re-encode: {e}"),
                })?;

            debug!(
                "Transcoded image {} WEBP → PNG ({} → {} bytes)",
                index,
                image.bytes.len(),
                png.len()
            );

            Ok(NormalizedImage {
                bytes: png,
                kind: EmbedKind::Png,
            })
        }
    }
}
