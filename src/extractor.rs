use crate::discovery::ImageRefDiscovery;
use crate::image_parsing::ImageStreamParser;
use crate::pipeline::{validate_dimensions, Deduplicator, Rejection};
use crate::{ExtractError, ExtractedImage, ExtractorConfig, Result};
use log::{debug, warn};
use lopdf::Document;
use std::path::Path;

// ── DocumentReport ───────────────────────────────────────────────────────────

/// Outcome of running the pipeline over one document.
///
/// `duplicates_skipped` and `too_small_skipped` are filter decisions, not
/// failures; `images_failed` counts images that could not be extracted,
/// decoded, or written.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DocumentReport {
    /// Images that survived the pipeline and reached the caller's sink.
    pub images_written: usize,
    /// Byte-identical repeats dropped by the deduplicator.
    pub duplicates_skipped: usize,
    /// Images below the configured minimum dimension.
    pub too_small_skipped: usize,
    /// Images skipped because of an extraction, decode, or write error.
    pub images_failed: usize,
}

// ── PdfImageExtractor ────────────────────────────────────────────────────────

/// Entry point for extracting the embedded raster images of one PDF document.
///
/// # Creating an extractor
///
/// ```no_run
/// use pdfimageextract::{PdfImageExtractor, ExtractorConfig};
///
/// // From a file path
/// let e = PdfImageExtractor::from_path("report.pdf").unwrap();
///
/// // From an in-memory buffer
/// let bytes = std::fs::read("report.pdf").unwrap();
/// let e = PdfImageExtractor::from_bytes(&bytes).unwrap();
///
/// // With a custom minimum size
/// let cfg = ExtractorConfig { min_size: 64 };
/// let e = PdfImageExtractor::with_config("report.pdf", cfg).unwrap();
/// ```
pub struct PdfImageExtractor {
    document: Document,
    config: ExtractorConfig,
}

impl PdfImageExtractor {
    // ── Constructors ──────────────────────────────────────────────────────────

    /// Load a PDF from the file system.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::with_config(path, ExtractorConfig::default())
    }

    /// Load a PDF from an in-memory byte slice.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_bytes_with_config(data, ExtractorConfig::default())
    }

    /// Load a PDF from the file system with a custom [`ExtractorConfig`].
    pub fn with_config<P: AsRef<Path>>(path: P, config: ExtractorConfig) -> Result<Self> {
        let document = Document::load(path)?;
        Self::validate_structure(&document)?;
        Ok(Self { document, config })
    }

    /// Load a PDF from an in-memory byte slice with a custom
    /// [`ExtractorConfig`].
    pub fn from_bytes_with_config(data: &[u8], config: ExtractorConfig) -> Result<Self> {
        let document = Document::load_mem(data)?;
        Self::validate_structure(&document)?;
        Ok(Self { document, config })
    }

    /// Assert the mandatory structural elements are present: a catalog, at
    /// least one page, and a non-empty trailer. lopdf needs all three to
    /// parse the file, so a failure here means the input never was a usable
    /// document.
    fn validate_structure(document: &Document) -> Result<()> {
        document
            .catalog()
            .map_err(|e| ExtractError::InvalidPdf(format!("missing or invalid catalog: {e}")))?;

        if document.get_pages().is_empty() {
            return Err(ExtractError::InvalidPdf("document has no pages".into()));
        }

        if document.trailer.is_empty() {
            return Err(ExtractError::InvalidPdf("missing trailer dictionary".into()));
        }

        Ok(())
    }

    // ── Accessors ─────────────────────────────────────────────────────────────

    /// Number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }

    /// Returns a reference to the underlying [`lopdf::Document`].
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Returns a reference to the active [`ExtractorConfig`].
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    // ── Extraction ────────────────────────────────────────────────────────────

    /// Run the pipeline and write every surviving image into `output_dir`,
    /// creating it if necessary.
    ///
    /// Per-image failures (unextractable encoding, undecodable bytes, write
    /// error) are logged and counted; they never abort the document.
    pub fn extract_to_dir<P: AsRef<Path>>(&self, output_dir: P) -> Result<DocumentReport> {
        let dir = output_dir.as_ref();
        std::fs::create_dir_all(dir)?;
        Ok(self.run_pipeline(|image| image.save_to_disk(dir).map(|_| ())))
    }

    /// Run the pipeline and return the surviving images without touching the
    /// filesystem.
    pub fn extract_to_memory(&self) -> Result<Vec<ExtractedImage>> {
        let mut images = Vec::new();
        let report = self.run_pipeline(|image| {
            images.push(image);
            Ok(())
        });
        debug!(
            "in-memory extraction kept {} image(s), skipped {} duplicate(s)",
            report.images_written, report.duplicates_skipped
        );
        Ok(images)
    }

    /// Visit every image occurrence in enumerator order and push survivors
    /// into `sink`: pages in document order, images in each page's declared
    /// `/XObject` order, each occurrence checked dedup-first so the first
    /// occurrence of a byte sequence decides its fate for the whole run.
    fn run_pipeline(
        &self,
        mut sink: impl FnMut(ExtractedImage) -> std::io::Result<()>,
    ) -> DocumentReport {
        let discovery = ImageRefDiscovery::new(&self.document);
        let parser = ImageStreamParser::new(&self.document);
        let mut dedup = Deduplicator::new();
        let mut report = DocumentReport::default();

        for (page_number, page_id) in self.document.get_pages() {
            let refs = discovery.images_on_page(page_id);

            for (index_on_page, (name, object_id)) in refs.into_iter().enumerate() {
                let blob = match parser.parse_image(&name, object_id) {
                    Ok(blob) => blob,
                    Err(e) => {
                        warn!("page {page_number}: skipping image '{name}': {e}");
                        report.images_failed += 1;
                        continue;
                    }
                };

                if !dedup.accept(&blob.data) {
                    debug!("page {page_number}: '{name}' is a duplicate, skipping");
                    report.duplicates_skipped += 1;
                    continue;
                }

                let (width, height) = match validate_dimensions(&blob.data, self.config.min_size)
                {
                    Ok(dimensions) => dimensions,
                    Err(Rejection::Undecodable(reason)) => {
                        warn!("page {page_number}: image '{name}' is corrupt: {reason}");
                        report.images_failed += 1;
                        continue;
                    }
                    Err(Rejection::TooSmall { width, height }) => {
                        debug!(
                            "page {page_number}: '{name}' is {width}x{height}, below minimum"
                        );
                        report.too_small_skipped += 1;
                        continue;
                    }
                };

                let image = ExtractedImage {
                    page_number,
                    index_on_page,
                    width,
                    height,
                    format: blob.format.into(),
                    data: blob.data,
                };

                match sink(image) {
                    Ok(()) => report.images_written += 1,
                    Err(e) => {
                        warn!("page {page_number}: failed to write image '{name}': {e}");
                        report.images_failed += 1;
                    }
                }
            }
        }

        report
    }
}
