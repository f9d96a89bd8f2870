//! Minimal CLI that extracts the embedded raster images of a single PDF.
//!
//! Usage:
//!   cargo run --example extract_images -- report.pdf
//!   cargo run --example extract_images -- report.pdf ./output

use pdfimageextract::{ExtractorConfig, PdfImageExtractor};
use std::{env, process};

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <pdf_file> [output_dir]", args[0]);
        process::exit(1);
    }

    let pdf_path = &args[1];
    let output_dir = args.get(2).map(String::as_str).unwrap_or("./extracted_images");

    println!("Processing: {pdf_path}");

    let extractor = PdfImageExtractor::with_config(pdf_path, ExtractorConfig::default())
        .unwrap_or_else(|e| {
            eprintln!("Error loading PDF: {e}");
            process::exit(1);
        });

    println!("✓ {} page(s)", extractor.page_count());

    let report = extractor.extract_to_dir(output_dir).unwrap_or_else(|e| {
        eprintln!("Extraction error: {e}");
        process::exit(1);
    });

    println!("✓ {} image(s) written to {output_dir}", report.images_written);
    if report.duplicates_skipped > 0 {
        println!("  {} duplicate(s) skipped", report.duplicates_skipped);
    }
    if report.too_small_skipped > 0 {
        println!("  {} undersized image(s) skipped", report.too_small_skipped);
    }
    if report.images_failed > 0 {
        println!("  {} image(s) failed", report.images_failed);
    }
}
