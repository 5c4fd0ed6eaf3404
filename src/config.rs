//! Configuration types for image-to-PDF conversion.
//!
//! All conversion behaviour is controlled through [`ConversionConfig`], built
//! via its [`ConversionConfigBuilder`]. Keeping every knob in one struct makes
//! it trivial to share configs across threads and to diff two runs to
//! understand why their outputs differ.
//!
//! # Design choice: builder over constructor
//! A many-field constructor is unreadable and breaks on every new field.
//! The builder pattern lets callers set only what they care about and rely on
//! well-documented defaults for the rest.

use crate::error::Img2PdfError;
use crate::progress::ProgressCallback;
use std::fmt;

/// A4 page width in points at 72 dpi.
pub const A4_WIDTH_PT: f64 = 595.0;

/// A4 page height in points at 72 dpi.
pub const A4_HEIGHT_PT: f64 = 842.0;

/// Configuration for an image-to-PDF conversion.
///
/// Built via [`ConversionConfig::builder()`] or using
/// [`ConversionConfig::default()`].
///
/// # Example
/// ```rust
/// use img2pdf::ConversionConfig;
///
/// let config = ConversionConfig::builder()
///     .concurrency(8)
///     .title("Holiday scans")
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ConversionConfig {
    /// Maximum page width in points. Default: 595 (A4 at 72 dpi).
    ///
    /// Images wider or taller than the envelope are scaled down uniformly to
    /// fit and drawn on a full-envelope page; smaller images get a page sized
    /// exactly to the image. Pixel dimensions map 1:1 to points — no DPI
    /// conversion is applied.
    pub max_page_width: f64,

    /// Maximum page height in points. Default: 842 (A4 at 72 dpi).
    pub max_page_height: f64,

    /// Number of images decoded in parallel. Default: 4.
    ///
    /// Normalization (WEBP → PNG transcoding) is CPU-bound, so more workers
    /// than cores buys nothing. Results re-join in input order regardless of
    /// this setting — page order is always input order.
    pub concurrency: usize,

    /// Document title written to the PDF Info dictionary. Default: none.
    pub title: Option<String>,

    /// Download timeout for URL inputs in seconds. Default: 120.
    pub download_timeout_secs: u64,

    /// Per-image progress callback. Default: none.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            max_page_width: A4_WIDTH_PT,
            max_page_height: A4_HEIGHT_PT,
            concurrency: 4,
            title: None,
            download_timeout_secs: 120,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ConversionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfig")
            .field("max_page_width", &self.max_page_width)
            .field("max_page_height", &self.max_page_height)
            .field("concurrency", &self.concurrency)
            .field("title", &self.title)
            .field("download_timeout_secs", &self.download_timeout_secs)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn callback>"),
            )
            .finish()
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ConversionConfig`].
#[derive(Debug)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    /// Override the page envelope. Both values are in points.
    pub fn page_envelope(mut self, width: f64, height: f64) -> Self {
        self.config.max_page_width = width;
        self.config.max_page_height = height;
        self
    }

    pub fn concurrency(mut self, n: usize) -> Self {
        self.config.concurrency = n.max(1);
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.config.title = Some(title.into());
        self
    }

    pub fn download_timeout_secs(mut self, secs: u64) -> Self {
        self.config.download_timeout_secs = secs;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, Img2PdfError> {
        let c = &self.config;
        if !(c.max_page_width > 0.0 && c.max_page_height > 0.0) {
            return Err(Img2PdfError::InvalidConfig(format!(
                "Page envelope must be positive, got {}x{}",
                c.max_page_width, c.max_page_height
            )));
        }
        if c.concurrency == 0 {
            return Err(Img2PdfError::InvalidConfig("Concurrency must be ≥ 1".into()));
        }
        Ok(self.config)
    }
}
