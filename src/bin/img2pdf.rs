//! CLI binary for img2pdf.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `ConversionConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use img2pdf::{
    convert_inputs, ConversionConfig, ConversionProgressCallback, ProgressCallback,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: renders a live progress bar and per-image log
/// lines using [indicatif]. Images can complete out-of-order when decoding
/// runs in parallel; the bar only ever counts completions.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0); // length set in on_conversion_start

        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} images  ⏱ {elapsed_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        bar.set_style(style);
        bar.set_prefix("Converting");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self { bar })
    }
}

impl ConversionProgressCallback for CliProgressCallback {
    fn on_conversion_start(&self, total_images: usize) {
        self.bar.set_length(total_images as u64);
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Converting {total_images} images…"))
        ));
    }

    fn on_image_start(&self, image_num: usize, _total: usize) {
        self.bar.set_message(format!("image {image_num}"));
    }

    fn on_image_done(&self, image_num: usize, total: usize, byte_len: usize) {
        self.bar.println(format!(
            "  {} Image {:>3}/{:<3}  {}",
            green("✓"),
            image_num,
            total,
            dim(&format!("{byte_len:>8} bytes")),
        ));
        self.bar.inc(1);
    }

    fn on_conversion_complete(&self, total_images: usize, pdf_bytes: usize) {
        self.bar.finish_and_clear();
        eprintln!(
            "{} {} pages serialized  ({} bytes)",
            green("✔"),
            bold(&total_images.to_string()),
            pdf_bytes
        );
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Bundle two scans into one PDF
  img2pdf scan1.jpg scan2.png -o scans.pdf

  # WEBP is transcoded to PNG automatically
  img2pdf photo.webp -o photo.pdf

  # Mix local files and URLs; input order is page order
  img2pdf cover.png https://example.com/page2.jpg -o booklet.pdf

  # Custom page envelope (US Letter at 72 dpi)
  img2pdf --page-width 612 --page-height 792 *.jpg -o letter.pdf

  # Machine-readable geometry report
  img2pdf --json scan1.jpg -o scan1.pdf > report.json

PAGE GEOMETRY:
  Pixel dimensions map 1:1 to PDF points (no DPI conversion).
  Images that fit 595x842 pt (A4) get a page of exactly their own size.
  Larger images are scaled down uniformly and centered on a full A4 page.

SUPPORTED FORMATS:
  .jpg .jpeg   embedded as-is (DCTDecode)
  .png         embedded losslessly (FlateDecode)
  .webp        transcoded to PNG, then embedded losslessly
"#;

/// Convert JPEG/PNG/WEBP images into a single multi-page PDF.
#[derive(Parser, Debug)]
#[command(
    name = "img2pdf",
    version,
    about = "Convert JPEG/PNG/WEBP images into a single multi-page PDF",
    long_about = "Convert a batch of raster images (local files or URLs) into one PDF, \
one image per page. Each page is sized to its image; oversized images are scaled \
down uniformly and centered on an A4 page.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Image files or HTTP/HTTPS URLs, in page order.
    #[arg(required = true)]
    inputs: Vec<String>,

    /// Write the PDF to this file.
    #[arg(short, long, env = "IMG2PDF_OUTPUT", default_value = "images.pdf")]
    output: PathBuf,

    /// Maximum page width in points.
    #[arg(long, env = "IMG2PDF_PAGE_WIDTH", default_value_t = 595.0)]
    page_width: f64,

    /// Maximum page height in points.
    #[arg(long, env = "IMG2PDF_PAGE_HEIGHT", default_value_t = 842.0)]
    page_height: f64,

    /// Number of images decoded in parallel.
    #[arg(short, long, env = "IMG2PDF_CONCURRENCY", default_value_t = 4)]
    concurrency: usize,

    /// Document title written to the PDF Info dictionary.
    #[arg(long, env = "IMG2PDF_TITLE")]
    title: Option<String>,

    /// Print a JSON geometry report (pages + stats) to stdout.
    #[arg(long, env = "IMG2PDF_JSON")]
    json: bool,

    /// Disable progress bar.
    #[arg(long, env = "IMG2PDF_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "IMG2PDF_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "IMG2PDF_QUIET")]
    quiet: bool,

    /// HTTP download timeout in seconds for URL inputs.
    #[arg(long, env = "IMG2PDF_DOWNLOAD_TIMEOUT", default_value_t = 120)]
    download_timeout: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs when the progress bar is active;
    // the bar provides all the feedback that matters to the user.
    let show_progress = !cli.quiet && !cli.no_progress;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let mut builder = ConversionConfig::builder()
        .page_envelope(cli.page_width, cli.page_height)
        .concurrency(cli.concurrency)
        .download_timeout_secs(cli.download_timeout);

    if let Some(ref title) = cli.title {
        builder = builder.title(title.clone());
    }
    if show_progress {
        let cb = CliProgressCallback::new();
        builder = builder.progress_callback(cb as ProgressCallback);
    }

    let config = builder.build().context("Invalid configuration")?;

    // ── Run conversion ───────────────────────────────────────────────────
    let output = convert_inputs(&cli.inputs, &config)
        .await
        .context("Conversion failed")?;

    // Atomic write: temp file + rename, so a crash never leaves half a PDF.
    let tmp_path = cli.output.with_extension("pdf.tmp");
    tokio::fs::write(&tmp_path, &output.pdf)
        .await
        .with_context(|| format!("Failed to write {}", tmp_path.display()))?;
    tokio::fs::rename(&tmp_path, &cli.output)
        .await
        .with_context(|| format!("Failed to rename into {}", cli.output.display()))?;

    if cli.json {
        let json = serde_json::to_string_pretty(&output).context("Failed to serialise report")?;
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle.write_all(json.as_bytes()).ok();
        handle.write_all(b"\n").ok();
    }

    if !cli.quiet {
        eprintln!(
            "{}  {} pages  {}ms  →  {}",
            green("✔"),
            output.pages.len(),
            output.stats.total_duration_ms,
            bold(&cli.output.display().to_string()),
        );
        eprintln!(
            "   {}",
            dim(&format!(
                "{} bytes  ({}ms decode, {}ms build)",
                output.stats.pdf_bytes,
                output.stats.normalize_duration_ms,
                output.stats.build_duration_ms
            )),
        );
    }

    Ok(())
}
