//! Error types for the img2pdf library.
//!
//! A single [`Img2PdfError`] covers every failure mode. One bad image fails
//! the whole batch: the engine never emits a partial document, so there is no
//! separate per-page error type. Callers that want skip-and-continue
//! semantics filter their inputs before invoking the engine.
//!
//! Variants that concern a specific input carry its 1-indexed image number so
//! the caller can tell the user *which* file broke the batch.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the img2pdf library.
#[derive(Debug, Error)]
pub enum Img2PdfError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("Image file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The input string is not a valid file path or URL.
    #[error("Invalid input '{input}': not a file path or a valid HTTP/HTTPS URL")]
    InvalidInput { input: String },

    /// HTTP URL was syntactically valid but download failed.
    #[error("Failed to download '{url}': {reason}\nCheck your internet connection.")]
    DownloadFailed { url: String, reason: String },

    /// Download exceeded the configured timeout.
    #[error("Download timed out after {secs}s for '{url}'\nIncrease --download-timeout.")]
    DownloadTimeout { url: String, secs: u64 },

    /// The file extension does not map to a supported image encoding.
    #[error("Unsupported image format '{format}'\nSupported formats: .jpg, .jpeg, .png, .webp")]
    UnsupportedFormat { format: String },

    // ── Pipeline errors ───────────────────────────────────────────────────
    /// The bytes of an image do not match its declared encoding, or a header
    /// could not be parsed (corrupt upload, truncated file).
    #[error("Image {image} could not be decoded: {detail}")]
    DecodeFailed { image: usize, detail: String },

    /// An image reports a zero width or height; the page scale factor would
    /// be undefined.
    #[error("Image {image} has invalid dimensions {width}x{height}: both axes must be non-zero")]
    InvalidDimensions {
        image: usize,
        width: u32,
        height: u32,
    },

    /// Serialization was requested for a document with zero pages.
    #[error("No images to convert: the document would have zero pages")]
    EmptyDocument,

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the output PDF file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_format_display() {
        let e = Img2PdfError::UnsupportedFormat {
            format: ".gif".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains(".gif"), "got: {msg}");
        assert!(msg.contains(".webp"));
    }

    #[test]
    fn decode_failed_display() {
        let e = Img2PdfError::DecodeFailed {
            image: 3,
            detail: "not a valid WEBP bitstream".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("Image 3"));
        assert!(msg.contains("WEBP"));
    }

    #[test]
    fn invalid_dimensions_display() {
        let e = Img2PdfError::InvalidDimensions {
            image: 1,
            width: 0,
            height: 600,
        };
        assert!(e.to_string().contains("0x600"));
    }

    #[test]
    fn empty_document_display() {
        let e = Img2PdfError::EmptyDocument;
        assert!(e.to_string().contains("zero pages"));
    }

    #[test]
    fn output_write_failed_has_source() {
        use std::error::Error as _;
        let e = Img2PdfError::OutputWriteFailed {
            path: PathBuf::from("/tmp/out.pdf"),
            source: std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
        };
        assert!(e.source().is_some());
        assert!(e.to_string().contains("/tmp/out.pdf"));
    }
}
