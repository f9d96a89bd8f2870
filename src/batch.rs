//! Batch processing: discover PDF documents under a directory tree and run
//! the per-document pipeline over each one.
//!
//! A document that fails to open is logged, counted, and skipped; the batch
//! always completes and reports aggregate counts, even when every document
//! fails. Finding zero documents is a distinct, non-error outcome
//! (`Summary::documents_found == 0`).

use crate::extractor::{DocumentReport, PdfImageExtractor};
use crate::{ExtractorConfig, Result};
use log::warn;
use std::collections::HashSet;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

// ── Summary ──────────────────────────────────────────────────────────────────

/// Aggregate counts for one batch run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    /// PDF documents discovered under the input root.
    pub documents_found: usize,
    /// Documents that were opened and processed to completion.
    pub documents_processed: usize,
    /// Documents that could not be opened or processed.
    pub documents_failed: usize,
    /// Total images written across all processed documents.
    pub images_extracted: usize,
}

// ── Progress events ──────────────────────────────────────────────────────────

/// Callback events emitted by [`run_with_progress`], in order. The CLI maps
/// these onto progress bars; library callers may ignore them entirely.
#[derive(Debug)]
pub enum ProgressEvent<'a> {
    /// Discovery finished; `documents` may be zero.
    BatchStarted { documents: usize },
    /// About to process the document at `path` (`index` is 0-based).
    DocumentStarted { path: &'a Path, index: usize },
    /// The document was processed; `report` holds its per-image counts.
    DocumentFinished {
        path: &'a Path,
        report: DocumentReport,
    },
    /// The document could not be opened or processed.
    DocumentFailed { path: &'a Path },
}

// ── Discovery ────────────────────────────────────────────────────────────────

/// Recursively collect every file under `root` whose extension is `.pdf`
/// (case-insensitive), sorted lexicographically by full path.
///
/// The sort is what makes batch runs deterministic: directory-walk order is
/// filesystem-dependent and is never relied upon.
pub fn discover_documents<P: AsRef<Path>>(root: P) -> std::io::Result<Vec<PathBuf>> {
    let mut documents = Vec::new();

    for entry in WalkDir::new(root.as_ref()) {
        let entry = entry.map_err(std::io::Error::from)?;
        if entry.file_type().is_file() && has_pdf_extension(entry.path()) {
            documents.push(entry.into_path());
        }
    }

    documents.sort();
    Ok(documents)
}

fn has_pdf_extension(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

// ── Batch driver ─────────────────────────────────────────────────────────────

/// Process every PDF under `input_root`, writing each document's images into
/// `<output_root>/<document base name>/`.
pub fn run<P, Q>(input_root: P, output_root: Q, config: &ExtractorConfig) -> Result<Summary>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    run_with_progress(input_root, output_root, config, |_| {})
}

/// Like [`run`], but emitting a [`ProgressEvent`] at each step.
pub fn run_with_progress<P, Q, F>(
    input_root: P,
    output_root: Q,
    config: &ExtractorConfig,
    mut on_event: F,
) -> Result<Summary>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
    F: FnMut(ProgressEvent),
{
    let output_root = output_root.as_ref();
    std::fs::create_dir_all(output_root)?;

    let documents = discover_documents(input_root)?;
    let mut summary = Summary {
        documents_found: documents.len(),
        ..Summary::default()
    };
    on_event(ProgressEvent::BatchStarted {
        documents: documents.len(),
    });

    // Two inputs sharing a base name land in the same output subdirectory;
    // surfaced as a warning, not resolved.
    let mut seen_base_names: HashSet<OsString> = HashSet::new();

    for (index, path) in documents.iter().enumerate() {
        on_event(ProgressEvent::DocumentStarted { path, index });

        let base_name = path
            .file_stem()
            .map(OsString::from)
            .unwrap_or_else(|| path.as_os_str().to_os_string());
        if !seen_base_names.insert(base_name.clone()) {
            warn!(
                "multiple input documents share the base name {:?}; their images share one output directory",
                base_name
            );
        }
        let document_dir = output_root.join(&base_name);

        let report = PdfImageExtractor::with_config(path, config.clone())
            .and_then(|extractor| extractor.extract_to_dir(&document_dir));

        match report {
            Ok(report) => {
                summary.documents_processed += 1;
                summary.images_extracted += report.images_written;
                on_event(ProgressEvent::DocumentFinished { path, report });
            }
            Err(e) => {
                warn!("skipping document {}: {e}", path.display());
                summary.documents_failed += 1;
                on_event(ProgressEvent::DocumentFailed { path });
            }
        }
    }

    Ok(summary)
}
