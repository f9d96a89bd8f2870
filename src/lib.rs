//! # pdfimageextract
//!
//! A Rust library for extracting embedded raster images from PDF documents.
//!
//! ## What this crate does
//!
//! 1. **Enumerate images** — walks a document's pages in order and finds every
//!    image XObject referenced by each page, in the page's declared order.
//! 2. **Deduplicate** — fingerprints each image's raw bytes (SHA-256) and drops
//!    byte-identical repeats within a single document run.
//! 3. **Filter** — decodes just enough of each image to read its pixel
//!    dimensions, rejecting corrupt blobs and blobs below a minimum size.
//! 4. **Persist** — writes each surviving image to disk under a descriptive
//!    name: `page<N>_img<M>_<W>x<H>.<ext>`.
//!
//! ## Quick example
//!
//! ```no_run
//! use pdfimageextract::PdfImageExtractor;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let extractor = PdfImageExtractor::from_path("report.pdf")?;
//!
//! for image in extractor.extract_to_memory()? {
//!     println!("{} — {} bytes", image.filename(), image.data.len());
//! }
//!
//! // Or write everything straight to a directory:
//! let report = extractor.extract_to_dir("./extracted_images/report")?;
//! println!("{} images written", report.images_written);
//! # Ok(())
//! # }
//! ```
//!
//! Batch processing of a whole directory tree lives in the [`batch`] module.

use thiserror::Error;

pub mod batch;
mod discovery;
mod extracted;
mod extractor;
mod image_parsing;
mod pipeline;

pub use extracted::ExtractedImage;
pub use extractor::{DocumentReport, PdfImageExtractor};
pub use pipeline::{validate_dimensions, Deduplicator, Rejection};
// ImageRefDiscovery and ImageStreamParser are intentionally *not* re-exported;
// they are internal details. Callers use PdfImageExtractor for all operations.

// ── Configuration ────────────────────────────────────────────────────────────

/// Minimum pixel dimension (per axis, inclusive) applied when none is given.
pub const DEFAULT_MIN_SIZE: u32 = 100;

/// Runtime configuration for [`PdfImageExtractor`].
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// Images whose width *or* height is below this value are skipped.
    /// The bound is inclusive: a `min_size` × `min_size` image is kept.
    pub min_size: u32,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            min_size: DEFAULT_MIN_SIZE,
        }
    }
}

// ── Error type ───────────────────────────────────────────────────────────────

/// Every error that this crate can produce.
///
/// Per-image filter outcomes (duplicate, undersized, undecodable) are *not*
/// errors; they are reported through [`Rejection`] and [`DocumentReport`]
/// counts so callers cannot confuse a filtered image with a failure.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// A filesystem I/O error occurred (e.g. when loading a document or
    /// writing an image).
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The input bytes do not form a structurally valid PDF document.
    #[error("Invalid PDF: {0}")]
    InvalidPdf(String),

    /// An image XObject was found but its bytes could not be retrieved in a
    /// form this crate can emit.
    #[error("Failed to extract image '{0}': {1}")]
    ExtractionError(String, String),

    /// The underlying lopdf parser returned an error.
    #[error("PDF parse error: {0}")]
    ParseError(#[from] lopdf::Error),
}

/// Convenience alias used throughout this crate.
pub type Result<T> = std::result::Result<T, ExtractError>;
