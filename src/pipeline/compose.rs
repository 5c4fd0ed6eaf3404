//! Page composition: derive page size and placement for one image.
//!
//! Pixel dimensions are treated as point dimensions directly (1 px = 1 pt,
//! no DPI conversion — a stated policy, not an accident). Images that fit the
//! envelope get a page sized exactly to the image: small images are not
//! padded out to a full A4 page. Oversized images are scaled down uniformly
//! and centered on a full-envelope page, so nothing is ever cropped or split
//! across pages.
//!
//! Dimensions are read straight from the encoded header (PNG IHDR, JPEG SOF)
//! rather than decoding pixels — this is a second, independent inspection of
//! the bytes, separate from the normalizer's WEBP decode.

use crate::error::Img2PdfError;
use crate::pipeline::embed;
use crate::pipeline::normalize::{EmbedKind, NormalizedImage};
use tracing::debug;

/// Page dimensions in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    pub width: f64,
    pub height: f64,
}

/// The sub-region of a page where the image is drawn, in points.
///
/// `(x, y)` is the lower-left corner in PDF page coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// One page's geometry and content, ready for the container builder.
#[derive(Debug, Clone)]
pub struct PlacedPage {
    /// The normalized image backing this page.
    pub image: NormalizedImage,
    /// Intrinsic pixel dimensions of the image.
    pub pixel_width: u32,
    /// Intrinsic pixel dimensions of the image.
    pub pixel_height: u32,
    /// Page size; never exceeds the envelope on either axis.
    pub page: PageSize,
    /// Placement rectangle, fully contained within `page`, centered.
    pub placement: Rect,
}

/// Compute page size and placement for the given image dimensions.
///
/// Pure function of its inputs: calling it twice yields identical geometry.
///
/// * Both axes fit the envelope → page equals the image, placement at the
///   origin, no scaling.
/// * Either axis exceeds it → uniform scale by the smaller axis ratio
///   (preserves aspect ratio, guarantees both axes fit), full-envelope page,
///   scaled image centered.
pub fn fit_to_envelope(width: f64, height: f64, max_w: f64, max_h: f64) -> (PageSize, Rect) {
    if width <= max_w && height <= max_h {
        let page = PageSize { width, height };
        let placement = Rect {
            x: 0.0,
            y: 0.0,
            width,
            height,
        };
        return (page, placement);
    }

    let scale = (max_w / width).min(max_h / height);
    let scaled_w = width * scale;
    let scaled_h = height * scale;
    let page = PageSize {
        width: max_w,
        height: max_h,
    };
    let placement = Rect {
        x: (max_w - scaled_w) / 2.0,
        y: (max_h - scaled_h) / 2.0,
        width: scaled_w,
        height: scaled_h,
    };
    (page, placement)
}

/// Compose one page: read intrinsic dimensions and fit them to the envelope.
///
/// `index` is the 1-based position of the image in the batch, used only for
/// error reporting.
///
/// # Errors
/// * [`Img2PdfError::DecodeFailed`] if the header cannot be parsed.
/// * [`Img2PdfError::InvalidDimensions`] if either axis is zero — the scale
///   factor would be undefined.
pub fn compose(
    index: usize,
    image: NormalizedImage,
    max_width: f64,
    max_height: f64,
) -> Result<PlacedPage, Img2PdfError> {
    let (w, h) = match image.kind {
        EmbedKind::Png => embed::png_dimensions(&image.bytes),
        EmbedKind::Jpeg => embed::jpeg_info(&image.bytes).map(|info| (info.width, info.height)),
    }
    .map_err(|detail| Img2PdfError::DecodeFailed {
        image: index,
        detail,
    })?;

    if w == 0 || h == 0 {
        return Err(Img2PdfError::InvalidDimensions {
            image: index,
            width: w,
            height: h,
        });
    }

    let (page, placement) = fit_to_envelope(w as f64, h as f64, max_width, max_height);

    debug!(
        "Composed image {}: {}x{} px → page {}x{} pt, image at ({}, {}) {}x{} pt",
        index, w, h, page.width, page.height, placement.x, placement.y, placement.width,
        placement.height
    );

    Ok(PlacedPage {
        image,
        pixel_width: w,
        pixel_height: h,
        page,
        placement,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, Rgb, RgbImage};
    use std::io::Cursor;

    const MAX_W: f64 = 595.0;
    const MAX_H: f64 = 842.0;

    fn png_image(w: u32, h: u32) -> NormalizedImage {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(w, h, Rgb([1, 2, 3])));
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .unwrap();
        NormalizedImage {
            bytes: buf,
            kind: EmbedKind::Png,
        }
    }

    #[test]
    fn small_image_gets_exact_page_no_offset() {
        let (page, placement) = fit_to_envelope(400.0, 300.0, MAX_W, MAX_H);
        assert_eq!(
            page,
            PageSize {
                width: 400.0,
                height: 300.0
            }
        );
        assert_eq!(
            placement,
            Rect {
                x: 0.0,
                y: 0.0,
                width: 400.0,
                height: 300.0
            }
        );
    }

    #[test]
    fn oversized_square_is_scaled_and_centered_vertically() {
        let (page, placement) = fit_to_envelope(1000.0, 1000.0, MAX_W, MAX_H);
        // scale = min(595/1000, 842/1000) = 0.595
        assert_eq!(
            page,
            PageSize {
                width: 595.0,
                height: 842.0
            }
        );
        assert!((placement.width - 595.0).abs() < 1e-9);
        assert!((placement.height - 595.0).abs() < 1e-9);
        assert!((placement.x - 0.0).abs() < 1e-9);
        assert!((placement.y - 123.5).abs() < 1e-9);
    }

    #[test]
    fn one_oversized_axis_still_yields_full_envelope_page() {
        // A wide, short banner: only the width exceeds the envelope, yet the
        // page becomes the full envelope with the image centered vertically.
        let (page, placement) = fit_to_envelope(1190.0, 100.0, MAX_W, MAX_H);
        assert_eq!(page.width, MAX_W);
        assert_eq!(page.height, MAX_H);
        assert!((placement.width - 595.0).abs() < 1e-9);
        assert!((placement.height - 50.0).abs() < 1e-9);
        assert!((placement.y - 396.0).abs() < 1e-9);
    }

    #[test]
    fn placement_is_contained_in_page() {
        for (w, h) in [(1.0, 1.0), (595.0, 842.0), (596.0, 842.0), (4000.0, 10.0)] {
            let (page, r) = fit_to_envelope(w, h, MAX_W, MAX_H);
            assert!(r.x >= 0.0 && r.y >= 0.0);
            assert!(r.x + r.width <= page.width + 1e-9);
            assert!(r.y + r.height <= page.height + 1e-9);
        }
    }

    #[test]
    fn geometry_is_deterministic() {
        let a = fit_to_envelope(1234.0, 987.0, MAX_W, MAX_H);
        let b = fit_to_envelope(1234.0, 987.0, MAX_W, MAX_H);
        assert_eq!(a, b);
    }

    #[test]
    fn compose_reads_png_dimensions() {
        let placed = compose(1, png_image(400, 300), MAX_W, MAX_H).unwrap();
        assert_eq!((placed.pixel_width, placed.pixel_height), (400, 300));
        assert_eq!(placed.page.width, 400.0);
        assert_eq!(placed.placement.x, 0.0);
    }

    #[test]
    fn compose_twice_yields_identical_geometry() {
        let image = png_image(1000, 1000);
        let a = compose(1, image.clone(), MAX_W, MAX_H).unwrap();
        let b = compose(1, image, MAX_W, MAX_H).unwrap();
        assert_eq!(a.page, b.page);
        assert_eq!(a.placement, b.placement);
    }

    #[test]
    fn garbage_bytes_fail_with_decode_error() {
        let image = NormalizedImage {
            bytes: vec![0u8; 16],
            kind: EmbedKind::Png,
        };
        let err = compose(2, image, MAX_W, MAX_H).unwrap_err();
        assert!(matches!(err, Img2PdfError::DecodeFailed { image: 2, .. }));
    }

    #[test]
    fn zero_dimension_header_is_rejected() {
        // Hand-built PNG header claiming 0 x 50 px.
        let mut png = b"\x89PNG\r\n\x1a\n".to_vec();
        png.extend_from_slice(&13u32.to_be_bytes());
        png.extend_from_slice(b"IHDR");
        png.extend_from_slice(&0u32.to_be_bytes());
        png.extend_from_slice(&50u32.to_be_bytes());
        let image = NormalizedImage {
            bytes: png,
            kind: EmbedKind::Png,
        };
        let err = compose(1, image, MAX_W, MAX_H).unwrap_err();
        assert!(matches!(
            err,
            Img2PdfError::InvalidDimensions {
                image: 1,
                width: 0,
                height: 50
            }
        ));
    }
}
