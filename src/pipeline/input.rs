//! Input resolution: normalise user-supplied paths or URLs into [`SourceImage`]s.
//!
//! The engine itself consumes in-memory byte buffers; this stage is the thin
//! upstream collaborator that reads files and downloads URLs on behalf of the
//! CLI. The declared format comes from the file extension — exactly the
//! attribute the engine expects — and is never second-guessed by sniffing the
//! bytes. A wrong extension surfaces later as a decode failure, with the
//! image number attached.

use crate::error::Img2PdfError;
use crate::pipeline::normalize::{SourceFormat, SourceImage};
use std::path::Path;
use tracing::{debug, info};

/// Check if the input string looks like a URL.
pub fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Map an input string to its declared format via the file extension.
///
/// Works for both paths and URLs; the extension is taken from the last path
/// segment in either case.
pub fn declared_format(input: &str) -> Result<SourceFormat, Img2PdfError> {
    let last_segment = input
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(input)
        .split(['?', '#'])
        .next()
        .unwrap_or("");

    let ext = Path::new(last_segment)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("");

    SourceFormat::from_extension(ext).ok_or_else(|| Img2PdfError::UnsupportedFormat {
        format: if ext.is_empty() {
            "(no extension)".to_string()
        } else {
            format!(".{ext}")
        },
    })
}

/// Resolve one input string to an in-memory [`SourceImage`].
///
/// If the input is a URL, download it; if it is a local file, read it.
/// The declared format is derived from the extension before any bytes are
/// fetched, so an unsupported input fails fast without I/O.
pub async fn resolve_input(input: &str, timeout_secs: u64) -> Result<SourceImage, Img2PdfError> {
    let format = declared_format(input)?;
    let bytes = if is_url(input) {
        download_url(input, timeout_secs).await?
    } else {
        read_local(input).await?
    };
    Ok(SourceImage::new(bytes, format))
}

/// Resolve a whole batch, preserving input order.
pub async fn resolve_inputs(
    inputs: &[String],
    timeout_secs: u64,
) -> Result<Vec<SourceImage>, Img2PdfError> {
    let mut images = Vec::with_capacity(inputs.len());
    for input in inputs {
        images.push(resolve_input(input, timeout_secs).await?);
    }
    Ok(images)
}

/// Read a local file, mapping I/O errors to their user-facing variants.
async fn read_local(path_str: &str) -> Result<Vec<u8>, Img2PdfError> {
    let path = Path::new(path_str);
    match tokio::fs::read(path).await {
        Ok(bytes) => {
            debug!("Read local image: {} ({} bytes)", path.display(), bytes.len());
            Ok(bytes)
        }
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            Err(Img2PdfError::PermissionDenied {
                path: path.to_path_buf(),
            })
        }
        Err(_) => Err(Img2PdfError::FileNotFound {
            path: path.to_path_buf(),
        }),
    }
}

/// Download a URL into memory.
async fn download_url(url: &str, timeout_secs: u64) -> Result<Vec<u8>, Img2PdfError> {
    info!("Downloading image from: {}", url);

    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| Img2PdfError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    let response = client.get(url).send().await.map_err(|e| {
        if e.is_timeout() {
            Img2PdfError::DownloadTimeout {
                url: url.to_string(),
                secs: timeout_secs,
            }
        } else {
            Img2PdfError::DownloadFailed {
                url: url.to_string(),
                reason: e.to_string(),
            }
        }
    })?;

    if !response.status().is_success() {
        return Err(Img2PdfError::DownloadFailed {
            url: url.to_string(),
            reason: format!("HTTP {}", response.status()),
        });
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| Img2PdfError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    debug!("Downloaded {} bytes from {}", bytes.len(), url);
    Ok(bytes.to_vec())
}
