//! Progress-callback trait for per-image conversion events.
//!
//! Inject an [`Arc<dyn ConversionProgressCallback>`] via
//! [`crate::config::ConversionConfigBuilder::progress_callback`] to receive
//! real-time events as the pipeline processes each image.
//!
//! # Why callbacks instead of channels?
//!
//! The callback approach is the least-invasive integration point: callers can
//! forward events to a Tokio broadcast channel, a WebSocket, a database record,
//! or a terminal progress bar — without the library knowing anything about how
//! the host application communicates. The trait is `Send + Sync` so it works
//! correctly when images are normalized concurrently.

use std::sync::Arc;

/// Called by the conversion pipeline as it processes each image.
///
/// Implementations must be `Send + Sync` (normalization runs on blocking
/// worker threads). All methods have default no-op implementations so callers
/// only override what they care about.
///
/// # Thread safety
///
/// `on_image_start` and `on_image_done` may be called concurrently from
/// different threads when `concurrency > 1`. Implementations must protect
/// shared mutable state with appropriate synchronisation primitives
/// (e.g. `Mutex`, `AtomicUsize`).
pub trait ConversionProgressCallback: Send + Sync {
    /// Called once before any image is processed.
    ///
    /// # Arguments
    /// * `total_images` — number of images in the batch
    fn on_conversion_start(&self, total_images: usize) {
        let _ = total_images;
    }

    /// Called just before an image enters the normalization stage.
    ///
    /// # Arguments
    /// * `image_num`    — 1-indexed image number
    /// * `total_images` — total images in the batch
    fn on_image_start(&self, image_num: usize, total_images: usize) {
        let _ = (image_num, total_images);
    }

    /// Called when an image has been normalized.
    ///
    /// # Arguments
    /// * `image_num`    — 1-indexed image number
    /// * `total_images` — total images
    /// * `byte_len`     — size of the normalized image bytes
    fn on_image_done(&self, image_num: usize, total_images: usize, byte_len: usize) {
        let _ = (image_num, total_images, byte_len);
    }

    /// Called once after the document has been serialized.
    ///
    /// # Arguments
    /// * `total_images` — images in the batch
    /// * `pdf_bytes`    — size of the finished document
    fn on_conversion_complete(&self, total_images: usize, pdf_bytes: usize) {
        let _ = (total_images, pdf_bytes);
    }
}

/// A no-op implementation for callers that don't need progress events.
///
/// This is the default when no callback is configured.
pub struct NoopProgressCallback;

impl ConversionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ConversionConfig`].
pub type ProgressCallback = Arc<dyn ConversionProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct TrackingCallback {
        starts: AtomicUsize,
        dones: AtomicUsize,
        started_total: AtomicUsize,
        final_bytes: AtomicUsize,
    }

    impl ConversionProgressCallback for TrackingCallback {
        fn on_conversion_start(&self, total_images: usize) {
            self.started_total.store(total_images, Ordering::SeqCst);
        }

        fn on_image_start(&self, _image_num: usize, _total_images: usize) {
            self.starts.fetch_add(1, Ordering::SeqCst);
        }

        fn on_image_done(&self, _image_num: usize, _total_images: usize, _byte_len: usize) {
            self.dones.fetch_add(1, Ordering::SeqCst);
        }

        fn on_conversion_complete(&self, _total_images: usize, pdf_bytes: usize) {
            self.final_bytes.store(pdf_bytes, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_conversion_start(5);
        cb.on_image_start(1, 5);
        cb.on_image_done(1, 5, 42);
        cb.on_conversion_complete(5, 1024);
    }

    #[test]
    fn tracking_callback_receives_events() {
        let tracker = TrackingCallback {
            starts: AtomicUsize::new(0),
            dones: AtomicUsize::new(0),
            started_total: AtomicUsize::new(0),
            final_bytes: AtomicUsize::new(0),
        };

        tracker.on_conversion_start(3);
        assert_eq!(tracker.started_total.load(Ordering::SeqCst), 3);

        for i in 1..=3 {
            tracker.on_image_start(i, 3);
            tracker.on_image_done(i, 3, 100 * i);
        }

        assert_eq!(tracker.starts.load(Ordering::SeqCst), 3);
        assert_eq!(tracker.dones.load(Ordering::SeqCst), 3);

        tracker.on_conversion_complete(3, 4096);
        assert_eq!(tracker.final_bytes.load(Ordering::SeqCst), 4096);
    }

    #[test]
    fn arc_dyn_callback_works() {
        let cb: Arc<dyn ConversionProgressCallback> = Arc::new(NoopProgressCallback);
        cb.on_conversion_start(10);
        cb.on_image_start(1, 10);
        cb.on_image_done(1, 10, 512);
    }
}
