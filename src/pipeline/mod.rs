//! Pipeline stages for image-to-PDF conversion.
//!
//! Each submodule implements exactly one transformation step.
//! Keeping stages separate makes each independently testable and lets us
//! swap implementations (e.g. switch the container backend) without touching
//! other stages.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ normalize ──▶ compose ──▶ builder (+ embed)
//! (path/URL)  (WEBP→PNG)   (geometry)  (PDF objects)
//! ```
//!
//! 1. [`input`]     — read local files / download URLs into `SourceImage`s
//! 2. [`normalize`] — transcode WEBP to PNG; pass JPEG/PNG through untouched
//! 3. [`compose`]   — read intrinsic dimensions, fit them to the page
//!    envelope, produce a `PlacedPage`
//! 4. [`embed`]     — turn normalized bytes into image XObjects
//!    (`DCTDecode` passthrough for JPEG, decode + `FlateDecode` for PNG)
//! 5. [`builder`]   — accumulate pages in input order and serialize the
//!    finished document
//!
//! Stages own their input and hand ownership to the next stage; nothing is
//! shared or retained across stage boundaries, which is what makes the
//! normalization stage safe to parallelize.

pub mod builder;
pub mod compose;
pub(crate) mod embed;
pub mod input;
pub mod normalize;
