//! # img2pdf
//!
//! Batch-convert raster images (JPEG, PNG, WEBP) into a single multi-page
//! PDF, one image per page.
//!
//! ## Why this crate?
//!
//! Bundling scans, photos, or screenshots into a single shareable document
//! is a chore: generic PDF tools either stretch every image onto a uniform
//! page or rasterise everything through a print dialog. This crate keeps the
//! pixels exactly as they are — JPEG streams are embedded untouched, PNGs
//! losslessly — and only computes page geometry around them: small images get
//! a page of their own size, oversized ones are scaled down uniformly and
//! centered on an A4 page.
//!
//! ## Pipeline Overview
//!
//! ```text
//! images
//!  │
//!  ├─ 1. Input      read local files or download from URLs
//!  ├─ 2. Normalize  WEBP → PNG (CPU-bound, parallel, ordered re-join)
//!  ├─ 3. Compose    page size + centered placement under the A4 envelope
//!  ├─ 4. Embed      JPEG → DCTDecode passthrough, PNG → raw + FlateDecode
//!  └─ 5. Serialize  one self-contained PDF byte vector
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use img2pdf::{convert_inputs, ConversionConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConversionConfig::default();
//!     let inputs = vec!["scan1.jpg".to_string(), "scan2.webp".to_string()];
//!     let output = convert_inputs(&inputs, &config).await?;
//!     std::fs::write("scans.pdf", &output.pdf)?;
//!     eprintln!("{} pages, {} bytes", output.pages.len(), output.stats.pdf_bytes);
//!     Ok(())
//! }
//! ```
//!
//! Already have the bytes in memory? Skip the input stage:
//!
//! ```rust,no_run
//! use img2pdf::{convert, ConversionConfig, SourceFormat, SourceImage};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let bytes = std::fs::read("photo.png")?;
//! let images = vec![SourceImage::new(bytes, SourceFormat::Png)];
//! let output = convert(images, &ConversionConfig::default()).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `img2pdf` binary (clap + anyhow + tracing-subscriber) |
//!
//! Disable `cli` when using only the library to avoid pulling in CLI-only deps:
//! ```toml
//! img2pdf = { version = "0.3", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ConversionConfig, ConversionConfigBuilder, A4_HEIGHT_PT, A4_WIDTH_PT};
pub use convert::{convert, convert_inputs, convert_sync, convert_to_file};
pub use error::Img2PdfError;
pub use output::{ConversionOutput, ConversionStats, PageInfo};
pub use pipeline::builder::PdfBuilder;
pub use pipeline::compose::{compose, fit_to_envelope, PageSize, PlacedPage, Rect};
pub use pipeline::normalize::{normalize, EmbedKind, NormalizedImage, SourceFormat, SourceImage};
pub use progress::{ConversionProgressCallback, NoopProgressCallback, ProgressCallback};
