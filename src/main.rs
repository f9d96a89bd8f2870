//! CLI tool for extracting embedded raster images from PDF documents.
//!
//! Walks an input directory recursively, runs the extraction pipeline over
//! every PDF found, and writes each document's surviving images into a
//! per-document subdirectory of the output directory.

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pdfimageextract::batch::{self, ProgressEvent};
use pdfimageextract::{ExtractorConfig, DEFAULT_MIN_SIZE};
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(
    name = "pdfimageextract",
    version,
    about = "Extract embedded raster images from all PDFs in a directory"
)]
struct Cli {
    /// Directory containing PDF files (searched recursively)
    input_dir: PathBuf,

    /// Directory to save extracted images; one subdirectory per document
    #[arg(long, default_value = "./extracted_images")]
    output_dir: PathBuf,

    /// Minimum pixel dimension for images (inclusive, per axis)
    #[arg(long, default_value_t = DEFAULT_MIN_SIZE)]
    min_size: u32,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let config = ExtractorConfig {
        min_size: cli.min_size,
    };

    let mut bar: Option<ProgressBar> = None;
    let result = batch::run_with_progress(&cli.input_dir, &cli.output_dir, &config, |event| {
        match event {
            ProgressEvent::BatchStarted { documents } => {
                if documents > 0 {
                    println!("Found {documents} PDF file(s)");
                    bar = Some(document_bar(documents));
                }
            }
            ProgressEvent::DocumentStarted { path, .. } => {
                if let Some(bar) = &bar {
                    bar.set_message(path.display().to_string());
                }
            }
            ProgressEvent::DocumentFinished { path, report } => {
                if let Some(bar) = &bar {
                    bar.println(format!(
                        "Extracted {} unique image(s) from {}",
                        report.images_written,
                        path.display()
                    ));
                    bar.inc(1);
                }
            }
            ProgressEvent::DocumentFailed { path } => {
                if let Some(bar) = &bar {
                    bar.println(format!("Skipped {} (could not be processed)", path.display()));
                    bar.inc(1);
                }
            }
        }
    });

    if let Some(bar) = &bar {
        bar.finish_and_clear();
    }

    match result {
        Ok(summary) if summary.documents_found == 0 => {
            println!("No PDF files found in {}", cli.input_dir.display());
        }
        Ok(summary) => {
            if summary.documents_failed > 0 {
                println!("{} document(s) could not be processed", summary.documents_failed);
            }
            println!("Total images extracted: {}", summary.images_extracted);
        }
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}

fn document_bar(documents: usize) -> ProgressBar {
    let bar = ProgressBar::new(documents as u64);
    let style = ProgressStyle::with_template("[{bar:40}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    bar.set_style(style);
    bar
}
