//! Document container assembly: pages and image resources into one PDF.
//!
//! The document is assembled object-by-object with `lopdf` — catalog, page
//! tree, and per page one page dictionary, one content stream, and one image
//! XObject. Appending is strictly ordered and append-only: page order is
//! input order, carried positionally, so nothing here ever compares or
//! reindexes pages.
//!
//! `serialize` consumes the builder, which is what makes a document
//! single-use: once the bytes exist there is no instance left to mutate or
//! serialize again.

use crate::config::ConversionConfig;
use crate::error::Img2PdfError;
use crate::pipeline::compose::PlacedPage;
use crate::pipeline::embed::ImageXObject;
use crate::pipeline::normalize::EmbedKind;
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};
use tracing::debug;

/// The single XObject name used in each page's resource dictionary.
///
/// Every page carries exactly one image, so a fixed name never collides.
const IMAGE_NAME: &str = "Im0";

/// Accumulates pages in input order and serializes the finished document.
pub struct PdfBuilder {
    doc: Document,
    pages_id: ObjectId,
    page_ids: Vec<ObjectId>,
    title: Option<String>,
}

impl PdfBuilder {
    /// Create an empty document.
    pub fn new() -> Self {
        let mut doc = Document::with_version("1.7");
        // Reserved up front; the page tree node is written during serialize,
        // once the Kids array is complete.
        let pages_id = doc.new_object_id();
        Self {
            doc,
            pages_id,
            page_ids: Vec::new(),
            title: None,
        }
    }

    /// Set the Title entry of the Info dictionary.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    /// Number of pages appended so far.
    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    /// Append one composed page. Pages cannot be removed or reordered later.
    ///
    /// `index` is the 1-based position of the source image, used only for
    /// error reporting.
    ///
    /// # Errors
    /// [`Img2PdfError::DecodeFailed`] if the image bytes cannot be turned
    /// into an XObject (corrupt JPEG/PNG that survived the earlier header
    /// inspection).
    pub fn append_page(&mut self, index: usize, page: PlacedPage) -> Result<(), Img2PdfError> {
        let xobject = match page.image.kind {
            EmbedKind::Jpeg => ImageXObject::from_jpeg(index, &page.image.bytes)?,
            EmbedKind::Png => ImageXObject::from_png(index, &page.image.bytes)?,
        };
        let image_id = self.doc.add_object(xobject.into_stream());

        let content_id = self
            .doc
            .add_object(Stream::new(Dictionary::new(), draw_image_ops(&page)));

        let page_dict = dictionary! {
            "Type" => "Page",
            "Parent" => Object::Reference(self.pages_id),
            "MediaBox" => vec![
                Object::Real(0.0),
                Object::Real(0.0),
                Object::Real(page.page.width as f32),
                Object::Real(page.page.height as f32),
            ],
            "Contents" => Object::Reference(content_id),
            "Resources" => dictionary! {
                "XObject" => dictionary! {
                    IMAGE_NAME => Object::Reference(image_id),
                },
            },
        };
        let page_id = self.doc.add_object(page_dict);
        self.page_ids.push(page_id);

        debug!(
            "Appended page {} ({}x{} pt)",
            self.page_ids.len(),
            page.page.width,
            page.page.height
        );
        Ok(())
    }

    /// Serialize the finished document into one self-contained byte vector.
    ///
    /// # Errors
    /// [`Img2PdfError::EmptyDocument`] if no pages were appended.
    pub fn serialize(mut self) -> Result<Vec<u8>, Img2PdfError> {
        if self.page_ids.is_empty() {
            return Err(Img2PdfError::EmptyDocument);
        }

        let kids: Vec<Object> = self
            .page_ids
            .iter()
            .map(|&id| Object::Reference(id))
            .collect();
        let count = kids.len() as i64;
        self.doc.objects.insert(
            self.pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );

        let catalog_id = self.doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => Object::Reference(self.pages_id),
        });
        self.doc.trailer.set("Root", catalog_id);

        let mut info = dictionary! {
            "Producer" => Object::string_literal(concat!("img2pdf ", env!("CARGO_PKG_VERSION"))),
        };
        if let Some(title) = self.title.take() {
            info.set("Title", Object::string_literal(title));
        }
        let info_id = self.doc.add_object(info);
        self.doc.trailer.set("Info", info_id);

        let mut bytes = Vec::new();
        self.doc
            .save_to(&mut bytes)
            .map_err(|e| Img2PdfError::Internal(format!("PDF serialization: {e}")))?;

        debug!("Serialized {} pages, {} bytes", count, bytes.len());
        Ok(bytes)
    }
}

impl Default for PdfBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Build a conversion configured with the envelope from `config`.
///
/// Thin constructor used by the convert loop; kept here so the builder owns
/// everything PDF-specific.
pub fn builder_for(config: &ConversionConfig) -> PdfBuilder {
    let mut builder = PdfBuilder::new();
    if let Some(ref title) = config.title {
        builder.set_title(title.clone());
    }
    builder
}

/// Content stream drawing the page's single image at its placement.
///
/// `cm` maps the unit square to the placement rectangle; `Do` paints the
/// XObject into it. The surrounding `q`/`Q` keeps the page's graphics state
/// clean.
fn draw_image_ops(page: &PlacedPage) -> Vec<u8> {
    let r = &page.placement;
    format!(
        "q\n{} 0 0 {} {} {} cm\n/{} Do\nQ\n",
        fmt_pt(r.width),
        fmt_pt(r.height),
        fmt_pt(r.x),
        fmt_pt(r.y),
        IMAGE_NAME
    )
    .into_bytes()
}

/// Format a point value with two decimals of precision, without float noise.
fn fmt_pt(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::compose::{compose, PageSize, PlacedPage, Rect};
    use crate::pipeline::normalize::NormalizedImage;
    use image::{DynamicImage, Rgb, RgbImage};
    use std::io::Cursor;

    fn png_page(w: u32, h: u32) -> PlacedPage {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(w, h, Rgb([9, 9, 9])));
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .unwrap();
        compose(
            1,
            NormalizedImage {
                bytes: buf,
                kind: EmbedKind::Png,
            },
            595.0,
            842.0,
        )
        .unwrap()
    }

    fn numeric(o: &Object) -> f64 {
        match o {
            Object::Integer(i) => *i as f64,
            Object::Real(r) => *r as f64,
            other => panic!("expected numeric object, got {other:?}"),
        }
    }

    #[test]
    fn empty_document_refuses_to_serialize() {
        let err = PdfBuilder::new().serialize().unwrap_err();
        assert!(matches!(err, Img2PdfError::EmptyDocument));
    }

    #[test]
    fn three_pages_survive_a_round_trip_in_order() {
        let mut builder = PdfBuilder::new();
        for (i, (w, h)) in [(40, 30), (200, 100), (10, 10)].iter().enumerate() {
            builder.append_page(i + 1, png_page(*w, *h)).unwrap();
        }
        assert_eq!(builder.page_count(), 3);
        let bytes = builder.serialize().unwrap();

        let doc = Document::load_mem(&bytes).expect("output must parse as PDF");
        let pages = doc.get_pages();
        assert_eq!(pages.len(), 3);

        // Page order is positional: first page keeps the first image's size.
        let expected = [(40.0, 30.0), (200.0, 100.0), (10.0, 10.0)];
        for (page_no, (ew, eh)) in (1u32..=3).zip(expected) {
            let page_dict = doc
                .get_object(pages[&page_no])
                .and_then(|o| o.as_dict())
                .unwrap();
            let media_box = page_dict.get(b"MediaBox").unwrap().as_array().unwrap();
            assert_eq!(numeric(&media_box[2]), ew);
            assert_eq!(numeric(&media_box[3]), eh);
        }
    }

    #[test]
    fn each_page_references_one_image_resource() {
        let mut builder = PdfBuilder::new();
        builder.append_page(1, png_page(50, 50)).unwrap();
        let bytes = builder.serialize().unwrap();

        let doc = Document::load_mem(&bytes).unwrap();
        let pages = doc.get_pages();
        let page_dict = doc
            .get_object(pages[&1])
            .and_then(|o| o.as_dict())
            .unwrap();
        let resources = page_dict.get(b"Resources").unwrap().as_dict().unwrap();
        let xobjects = resources.get(b"XObject").unwrap().as_dict().unwrap();
        assert!(xobjects.get(b"Im0").is_ok());
        assert_eq!(xobjects.len(), 1);
    }

    #[test]
    fn title_lands_in_info_dictionary() {
        let mut builder = PdfBuilder::new();
        builder.set_title("Scans");
        builder.append_page(1, png_page(5, 5)).unwrap();
        let bytes = builder.serialize().unwrap();

        // The literal string must appear in the serialized output.
        let haystack = bytes.windows(5).any(|w| w == b"Scans");
        assert!(haystack, "Title string not found in output");
    }

    #[test]
    fn draw_ops_center_the_scaled_image() {
        let page = PlacedPage {
            image: NormalizedImage {
                bytes: Vec::new(),
                kind: EmbedKind::Png,
            },
            pixel_width: 1000,
            pixel_height: 1000,
            page: PageSize {
                width: 595.0,
                height: 842.0,
            },
            placement: Rect {
                x: 0.0,
                y: 123.5,
                width: 595.0,
                height: 595.0,
            },
        };
        let ops = String::from_utf8(draw_image_ops(&page)).unwrap();
        assert!(ops.contains("595 0 0 595 0 123.5 cm"), "got: {ops}");
        assert!(ops.contains("/Im0 Do"));
    }
}
