//! Output types: the finished document plus a per-page geometry report.
//!
//! The PDF itself is an opaque byte vector — callers persist or stream it as
//! they see fit. [`PageInfo`] and [`ConversionStats`] exist for everything
//! around that: logging, the CLI's `--json` mode, and tests that want to
//! assert on geometry without parsing the PDF back.

use crate::pipeline::normalize::{EmbedKind, SourceFormat};
use serde::{Deserialize, Serialize};

/// Result of a successful conversion.
#[derive(Debug, Clone, Serialize)]
pub struct ConversionOutput {
    /// The complete, self-contained PDF document.
    ///
    /// Skipped in JSON serialisation; use [`ConversionOutput::pdf`] length
    /// from the stats instead.
    #[serde(skip_serializing)]
    pub pdf: Vec<u8>,

    /// Per-page geometry, in page order (= input order).
    pub pages: Vec<PageInfo>,

    /// Timing and size statistics.
    pub stats: ConversionStats,
}

/// Geometry report for one page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageInfo {
    /// 1-indexed page number; equals the input position of the source image.
    pub page_num: usize,
    /// Encoding the caller declared for the source image.
    pub source_format: SourceFormat,
    /// Encoding actually embedded in the container (WEBP becomes PNG).
    pub embed_kind: EmbedKind,
    /// Intrinsic pixel width of the (normalized) image.
    pub pixel_width: u32,
    /// Intrinsic pixel height of the (normalized) image.
    pub pixel_height: u32,
    /// Page width in points.
    pub page_width: f64,
    /// Page height in points.
    pub page_height: f64,
    /// Placement rectangle, in points, lower-left origin.
    pub image_x: f64,
    pub image_y: f64,
    pub image_width: f64,
    pub image_height: f64,
    /// Whether the image was scaled down to fit the envelope.
    pub scaled: bool,
}

/// Statistics for a whole conversion run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversionStats {
    /// Number of images in the batch (= number of pages).
    pub total_images: usize,
    /// Wall-clock time spent normalizing (decode/transcode), in ms.
    pub normalize_duration_ms: u64,
    /// Wall-clock time spent composing pages and serializing the PDF, in ms.
    pub build_duration_ms: u64,
    /// Total wall-clock time, in ms.
    pub total_duration_ms: u64,
    /// Size of the finished document in bytes.
    pub pdf_bytes: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_json_omits_pdf_bytes() {
        let output = ConversionOutput {
            pdf: vec![1, 2, 3],
            pages: vec![],
            stats: ConversionStats {
                total_images: 0,
                pdf_bytes: 3,
                ..Default::default()
            },
        };
        let json = serde_json::to_string(&output).unwrap();
        assert!(!json.contains("\"pdf\""));
        assert!(json.contains("\"pdf_bytes\":3"));
    }

    #[test]
    fn page_info_serializes_formats_lowercase() {
        let info = PageInfo {
            page_num: 1,
            source_format: SourceFormat::Webp,
            embed_kind: EmbedKind::Png,
            pixel_width: 10,
            pixel_height: 20,
            page_width: 10.0,
            page_height: 20.0,
            image_x: 0.0,
            image_y: 0.0,
            image_width: 10.0,
            image_height: 20.0,
            scaled: false,
        };
        let json = serde_json::to_string(&info).unwrap();
        assert!(json.contains("\"source_format\":\"webp\""));
        assert!(json.contains("\"embed_kind\":\"png\""));
    }
}
