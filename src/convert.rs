//! Conversion entry points.
//!
//! The pipeline per conversion is linear and single-pass — normalize →
//! compose → append — one image at a time, preserving input order as page
//! order. Normalization has no data dependency between images, so it fans
//! out over blocking worker threads and re-joins *in order* before
//! composition (`buffered`, not `buffer_unordered`: page order is positional
//! and carries no explicit index, so an out-of-order join would corrupt the
//! document).
//!
//! Nothing is emitted until `serialize` completes; a caller that wants to
//! abort mid-build simply drops the future.

use crate::config::ConversionConfig;
use crate::error::Img2PdfError;
use crate::output::{ConversionOutput, ConversionStats, PageInfo};
use crate::pipeline::builder::builder_for;
use crate::pipeline::compose::compose;
use crate::pipeline::input::resolve_inputs;
use crate::pipeline::normalize::{normalize, NormalizedImage, SourceFormat, SourceImage};
use futures::stream::{self, StreamExt};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Convert an ordered batch of in-memory images to a single PDF.
///
/// This is the primary entry point for the library: one page per image, in
/// input order. The whole document is built in memory.
///
/// # Errors
/// The call either yields a complete document or an error — there is no
/// partial output. One bad image fails the whole batch; callers wanting
/// skip-and-continue semantics filter inputs beforehand.
pub async fn convert(
    images: Vec<SourceImage>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, Img2PdfError> {
    let total_start = Instant::now();
    let total = images.len();
    if total == 0 {
        return Err(Img2PdfError::EmptyDocument);
    }
    info!("Starting conversion of {} images", total);

    if let Some(ref cb) = config.progress_callback {
        cb.on_conversion_start(total);
    }

    // ── Step 1: Normalize (parallel, ordered re-join) ────────────────────
    let formats: Vec<SourceFormat> = images.iter().map(|img| img.format).collect();
    let normalize_start = Instant::now();
    let cb = config.progress_callback.clone();

    let results: Vec<Result<NormalizedImage, Img2PdfError>> =
        stream::iter(images.into_iter().enumerate().map(|(i, image)| {
            let cb = cb.clone();
            async move {
                let num = i + 1;
                if let Some(ref cb) = cb {
                    cb.on_image_start(num, total);
                }
                let result = tokio::task::spawn_blocking(move || normalize(num, image))
                    .await
                    .map_err(|e| {
                        Img2PdfError::Internal(format!("Normalize task panicked: {e}"))
                    })?;
                if let (Some(cb), Ok(normalized)) = (&cb, &result) {
                    cb.on_image_done(num, total, normalized.bytes.len());
                }
                result
            }
        }))
        .buffered(config.concurrency)
        .collect()
        .await;

    let normalized: Vec<NormalizedImage> =
        results.into_iter().collect::<Result<Vec<_>, _>>()?;
    let normalize_duration_ms = normalize_start.elapsed().as_millis() as u64;
    debug!("Normalized {} images in {}ms", total, normalize_duration_ms);

    // ── Step 2: Compose pages and build the document ─────────────────────
    let build_start = Instant::now();
    let mut builder = builder_for(config);
    let mut pages = Vec::with_capacity(total);

    for (i, image) in normalized.into_iter().enumerate() {
        let num = i + 1;
        let placed = compose(num, image, config.max_page_width, config.max_page_height)?;
        pages.push(PageInfo {
            page_num: num,
            source_format: formats[i],
            embed_kind: placed.image.kind,
            pixel_width: placed.pixel_width,
            pixel_height: placed.pixel_height,
            page_width: placed.page.width,
            page_height: placed.page.height,
            image_x: placed.placement.x,
            image_y: placed.placement.y,
            image_width: placed.placement.width,
            image_height: placed.placement.height,
            scaled: placed.placement.width != placed.pixel_width as f64
                || placed.placement.height != placed.pixel_height as f64,
        });
        builder.append_page(num, placed)?;
    }

    // ── Step 3: Serialize ────────────────────────────────────────────────
    let pdf = builder.serialize()?;
    let build_duration_ms = build_start.elapsed().as_millis() as u64;

    let stats = ConversionStats {
        total_images: total,
        normalize_duration_ms,
        build_duration_ms,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
        pdf_bytes: pdf.len(),
    };

    info!(
        "Conversion complete: {} pages, {} bytes, {}ms total",
        total, stats.pdf_bytes, stats.total_duration_ms
    );

    if let Some(ref cb) = config.progress_callback {
        cb.on_conversion_complete(total, pdf.len());
    }

    Ok(ConversionOutput { pdf, pages, stats })
}

/// Convert a batch of input strings (local paths or HTTP/HTTPS URLs).
///
/// Declared formats are derived from file extensions; the order of `inputs`
/// is the page order.
pub async fn convert_inputs(
    inputs: &[String],
    config: &ConversionConfig,
) -> Result<ConversionOutput, Img2PdfError> {
    let images = resolve_inputs(inputs, config.download_timeout_secs).await?;
    convert(images, config).await
}

/// Convert inputs and write the PDF directly to a file.
///
/// Uses atomic write (temp file + rename) to prevent partial files.
pub async fn convert_to_file(
    inputs: &[String],
    output_path: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionStats, Img2PdfError> {
    let output = convert_inputs(inputs, config).await?;
    let path = output_path.as_ref();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                Img2PdfError::OutputWriteFailed {
                    path: path.to_path_buf(),
                    source: e,
                }
            })?;
        }
    }

    let tmp_path = path.with_extension("pdf.tmp");
    tokio::fs::write(&tmp_path, &output.pdf)
        .await
        .map_err(|e| Img2PdfError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    tokio::fs::rename(&tmp_path, path)
        .await
        .map_err(|e| Img2PdfError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    Ok(output.stats)
}

/// Synchronous wrapper around [`convert`].
///
/// Creates a temporary tokio runtime internally.
pub fn convert_sync(
    images: Vec<SourceImage>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, Img2PdfError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| Img2PdfError::Internal(format!("Failed to create tokio runtime: {e}")))?
        .block_on(convert(images, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::normalize::EmbedKind;
    use image::{DynamicImage, Rgb, RgbImage};
    use std::io::Cursor;

    fn encoded(w: u32, h: u32, format: image::ImageFormat) -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(w, h, Rgb([120, 80, 40])));
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), format).unwrap();
        buf
    }

    #[tokio::test]
    async fn empty_batch_fails_up_front() {
        let err = convert(Vec::new(), &ConversionConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Img2PdfError::EmptyDocument));
    }

    #[tokio::test]
    async fn three_images_become_three_pages_in_order() {
        let images = vec![
            SourceImage::new(encoded(40, 30, image::ImageFormat::Png), SourceFormat::Png),
            SourceImage::new(encoded(64, 48, image::ImageFormat::Jpeg), SourceFormat::Jpeg),
            SourceImage::new(encoded(10, 10, image::ImageFormat::Png), SourceFormat::Png),
        ];
        let output = convert(images, &ConversionConfig::default()).await.unwrap();

        assert_eq!(output.pages.len(), 3);
        assert_eq!(output.stats.total_images, 3);
        assert!(output.pdf.starts_with(b"%PDF-"));

        let widths: Vec<u32> = output.pages.iter().map(|p| p.pixel_width).collect();
        assert_eq!(widths, vec![40, 64, 10]);
        assert_eq!(output.pages[1].embed_kind, EmbedKind::Jpeg);
        assert!(!output.pages[0].scaled);
    }

    #[tokio::test]
    async fn oversized_image_is_scaled_onto_envelope_page() {
        let images = vec![SourceImage::new(
            encoded(1000, 1000, image::ImageFormat::Png),
            SourceFormat::Png,
        )];
        let output = convert(images, &ConversionConfig::default()).await.unwrap();

        let page = &output.pages[0];
        assert!(page.scaled);
        assert_eq!((page.page_width, page.page_height), (595.0, 842.0));
        assert!((page.image_width - 595.0).abs() < 1e-9);
        assert!((page.image_y - 123.5).abs() < 1e-9);
    }

    #[tokio::test]
    async fn webp_input_is_embedded_as_png() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(33, 21, Rgb([0, 128, 255])));
        let mut webp = Vec::new();
        img.write_to(&mut Cursor::new(&mut webp), image::ImageFormat::WebP)
            .unwrap();

        let output = convert(
            vec![SourceImage::new(webp, SourceFormat::Webp)],
            &ConversionConfig::default(),
        )
        .await
        .unwrap();

        let page = &output.pages[0];
        assert_eq!(page.source_format, SourceFormat::Webp);
        assert_eq!(page.embed_kind, EmbedKind::Png);
        assert_eq!((page.pixel_width, page.pixel_height), (33, 21));
    }

    #[tokio::test]
    async fn one_corrupt_image_fails_the_whole_batch() {
        let images = vec![
            SourceImage::new(encoded(10, 10, image::ImageFormat::Png), SourceFormat::Png),
            SourceImage::new(b"not a webp".to_vec(), SourceFormat::Webp),
        ];
        let err = convert(images, &ConversionConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Img2PdfError::DecodeFailed { image: 2, .. }));
    }

    #[test]
    fn convert_sync_matches_async_result() {
        let images = vec![SourceImage::new(
            encoded(20, 20, image::ImageFormat::Png),
            SourceFormat::Png,
        )];
        let output = convert_sync(images, &ConversionConfig::default()).unwrap();
        assert_eq!(output.pages.len(), 1);
        assert!(output.pdf.starts_with(b"%PDF-"));
    }
}
