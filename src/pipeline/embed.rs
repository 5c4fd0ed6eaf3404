//! Image resources: turn normalized image bytes into PDF image XObjects.
//!
//! The two embed kinds use different procedures, mirroring what PDF supports
//! natively:
//!
//! * **JPEG** — the compressed stream is embedded as-is under the `DCTDecode`
//!   filter. Only the SOF header is parsed, to learn geometry and the
//!   component count that selects the color space.
//! * **PNG** — PDF has no PNG filter, so the file is decoded to raw 8-bit
//!   samples and deflated under `FlateDecode`. Alpha has no direct
//!   counterpart in an opaque image XObject; translucent pixels are blended
//!   onto a white background, which matches how the pages are meant to print.
//!
//! Header-parsing helpers return a plain `String` detail; callers wrap it
//! into [`crate::error::Img2PdfError::DecodeFailed`] with the image number.

use crate::error::Img2PdfError;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use lopdf::{dictionary, Stream};
use std::io::Write;

/// Geometry and component count from a JPEG SOF header.
#[derive(Debug, Clone, Copy)]
pub(crate) struct JpegInfo {
    pub width: u32,
    pub height: u32,
    pub components: u8,
}

/// Scan JPEG markers for the first SOF segment and read its frame header.
///
/// SOF layout after the 2-byte marker: length(2) precision(1) height(2)
/// width(2) components(1). The scan stops at the first frame header, which
/// always precedes entropy-coded data.
pub(crate) fn jpeg_info(data: &[u8]) -> Result<JpegInfo, String> {
    if data.len() < 4 || data[0] != 0xFF || data[1] != 0xD8 {
        return Err("missing JPEG SOI marker".into());
    }

    let mut i = 2;
    while i + 9 < data.len() {
        if data[i] != 0xFF {
            i += 1;
            continue;
        }
        let marker = data[i + 1];

        // SOF0–SOF15 carry frame geometry; C4 (DHT), C8 (JPG) and CC (DAC)
        // share the numeric range but are not frame headers.
        if (0xC0..=0xCF).contains(&marker) && marker != 0xC4 && marker != 0xC8 && marker != 0xCC {
            let height = u16::from_be_bytes([data[i + 5], data[i + 6]]) as u32;
            let width = u16::from_be_bytes([data[i + 7], data[i + 8]]) as u32;
            let components = data[i + 9];
            return Ok(JpegInfo {
                width,
                height,
                components,
            });
        }

        // Skip this segment by its declared length.
        let length = u16::from_be_bytes([data[i + 2], data[i + 3]]) as usize;
        if length < 2 {
            break;
        }
        i += 2 + length;
    }

    Err("no SOF frame header found".into())
}

/// Read width and height from a PNG IHDR chunk.
///
/// IHDR is required to be the first chunk, so the geometry sits at a fixed
/// offset behind the 8-byte signature.
pub(crate) fn png_dimensions(data: &[u8]) -> Result<(u32, u32), String> {
    const SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    if data.len() < 24 {
        return Err("PNG data too short".into());
    }
    if data[..8] != SIGNATURE {
        return Err("missing PNG signature".into());
    }
    if &data[12..16] != b"IHDR" {
        return Err("IHDR chunk not found".into());
    }

    let width = u32::from_be_bytes([data[16], data[17], data[18], data[19]]);
    let height = u32::from_be_bytes([data[20], data[21], data[22], data[23]]);
    Ok((width, height))
}

/// An image XObject ready to be added to the document.
#[derive(Debug, Clone)]
pub(crate) struct ImageXObject {
    pub width: u32,
    pub height: u32,
    color_space: &'static str,
    filter: &'static str,
    data: Vec<u8>,
}

impl ImageXObject {
    /// Build an XObject from a JPEG file, embedding the stream unchanged.
    ///
    /// The component count selects the color space the way the SOF header
    /// declares it: 1 = grayscale, 3 = YCbCr/RGB, 4 = CMYK.
    pub fn from_jpeg(index: usize, data: &[u8]) -> Result<Self, Img2PdfError> {
        let info = jpeg_info(data).map_err(|detail| Img2PdfError::DecodeFailed {
            image: index,
            detail,
        })?;

        let color_space = match info.components {
            1 => "DeviceGray",
            3 => "DeviceRGB",
            4 => "DeviceCMYK",
            n => {
                return Err(Img2PdfError::DecodeFailed {
                    image: index,
                    detail: format!("unsupported JPEG component count {n}"),
                })
            }
        };

        Ok(Self {
            width: info.width,
            height: info.height,
            color_space,
            filter: "DCTDecode",
            data: data.to_vec(),
        })
    }

    /// Build an XObject from a PNG file: decode, drop alpha onto white,
    /// deflate the raw samples.
    pub fn from_png(index: usize, data: &[u8]) -> Result<Self, Img2PdfError> {
        let decode_err = |detail: String| Img2PdfError::DecodeFailed {
            image: index,
            detail,
        };

        let decoded = image::load_from_memory_with_format(data, image::ImageFormat::Png)
            .map_err(|e| decode_err(format!("declared PNG: {e}")))?;
        let (w, h) = (decoded.width(), decoded.height());

        let (raw, color_space) = match decoded.color() {
            image::ColorType::L8 | image::ColorType::L16 => {
                (decoded.to_luma8().into_raw(), "DeviceGray")
            }
            image::ColorType::La8 | image::ColorType::La16 => {
                let la = decoded.to_luma_alpha8();
                let mut gray = Vec::with_capacity((w as usize) * (h as usize));
                for px in la.pixels() {
                    gray.push(blend_white(px[0], px[1]));
                }
                (gray, "DeviceGray")
            }
            image::ColorType::Rgba8 | image::ColorType::Rgba16 | image::ColorType::Rgba32F => {
                let rgba = decoded.to_rgba8();
                let mut rgb = Vec::with_capacity((w as usize) * (h as usize) * 3);
                for px in rgba.pixels() {
                    let a = px[3];
                    rgb.push(blend_white(px[0], a));
                    rgb.push(blend_white(px[1], a));
                    rgb.push(blend_white(px[2], a));
                }
                (rgb, "DeviceRGB")
            }
            _ => (decoded.to_rgb8().into_raw(), "DeviceRGB"),
        };

        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder
            .write_all(&raw)
            .and_then(|_| encoder.finish())
            .map(|compressed| Self {
                width: w,
                height: h,
                color_space,
                filter: "FlateDecode",
                data: compressed,
            })
            .map_err(|e| decode_err(format!("deflate: {e}")))
    }

    /// Convert into a `lopdf` stream object.
    ///
    /// `Stream::new` fills in the `Length` entry from the content.
    pub fn into_stream(self) -> Stream {
        let dict = dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => self.width as i64,
            "Height" => self.height as i64,
            "ColorSpace" => self.color_space,
            "BitsPerComponent" => 8,
            "Filter" => self.filter,
        };
        Stream::new(dict, self.data)
    }
}

/// Composite one 8-bit sample over a white background.
fn blend_white(sample: u8, alpha: u8) -> u8 {
    let a = alpha as f32 / 255.0;
    (sample as f32 * a + 255.0 * (1.0 - a)) as u8
}
