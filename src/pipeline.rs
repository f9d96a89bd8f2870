//! The extraction decision pipeline: deduplication and size filtering.
//!
//! Both pieces are deliberately small and stateless enough to test in
//! isolation; the per-document driver in [`crate::PdfImageExtractor`] wires
//! them together in the fixed order *dedup → validate → persist*.

use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::io::Cursor;
use thiserror::Error;

// ── Deduplicator ─────────────────────────────────────────────────────────────

/// Tracks the content fingerprints seen during one document run.
///
/// Each document gets its own `Deduplicator`; the set is never shared across
/// documents, so the same image appearing in two documents is kept once per
/// document. The fingerprint is SHA-256 over the *full* byte blob — partial
/// hashing would let distinct images collide.
///
/// [`accept`](Deduplicator::accept) must be called before validation so the
/// first occurrence of a byte sequence decides its fate for the whole run,
/// even when that first occurrence is itself rejected later.
#[derive(Debug, Default)]
pub struct Deduplicator {
    seen: HashSet<[u8; 32]>,
}

impl Deduplicator {
    /// Create an empty deduplicator for a fresh document run.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` and records the fingerprint when `data` has not been
    /// seen in this run; returns `false` without mutation otherwise.
    pub fn accept(&mut self, data: &[u8]) -> bool {
        let fingerprint: [u8; 32] = Sha256::digest(data).into();
        self.seen.insert(fingerprint)
    }

    /// Number of distinct blobs seen so far.
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// Returns `true` when no blob has been seen yet.
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

// ── Size filter & validator ──────────────────────────────────────────────────

/// Why an image was rejected by [`validate_dimensions`].
///
/// A rejection is a filter decision, not an error: the caller logs
/// `Undecodable` and stays silent on `TooSmall`, then moves on to the next
/// image either way.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Rejection {
    /// The bytes could not be decoded as an image.
    #[error("not decodable as an image: {0}")]
    Undecodable(String),

    /// The image decoded fine but at least one axis is below the minimum.
    #[error("{width}x{height} is below the minimum dimension")]
    TooSmall { width: u32, height: u32 },
}

/// Decode `data` just far enough to read its pixel dimensions and check them
/// against `min_size`.
///
/// Only the image header is read; pixel data is never materialized. The bound
/// is inclusive and independent per axis: a `min_size` × `min_size` image
/// passes, and a single undersized axis rejects.
pub fn validate_dimensions(data: &[u8], min_size: u32) -> Result<(u32, u32), Rejection> {
    let reader = image::ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| Rejection::Undecodable(e.to_string()))?;

    let (width, height) = reader
        .into_dimensions()
        .map_err(|e| Rejection::Undecodable(e.to_string()))?;

    if width < min_size || height < min_size {
        return Err(Rejection::TooSmall { width, height });
    }

    Ok((width, height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, RgbImage};

    /// Encode a solid-colour RGB image as PNG bytes.
    fn png_bytes(width: u32, height: u32, shade: u8) -> Vec<u8> {
        let img = RgbImage::from_pixel(width, height, image::Rgb([shade, shade, shade]));
        let mut out = Vec::new();
        DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut out), ImageFormat::Png)
            .unwrap();
        out
    }

    // ── Deduplicator ─────────────────────────────────────────────────────────

    #[test]
    fn first_occurrence_is_accepted_repeat_is_not() {
        let mut dedup = Deduplicator::new();
        assert!(dedup.accept(b"blob"));
        assert!(!dedup.accept(b"blob"));
        assert_eq!(dedup.len(), 1);
    }

    #[test]
    fn distinct_blobs_are_both_accepted() {
        let mut dedup = Deduplicator::new();
        assert!(dedup.accept(b"one"));
        assert!(dedup.accept(b"two"));
        assert_eq!(dedup.len(), 2);
    }

    #[test]
    fn fresh_instance_accepts_previously_seen_content() {
        // Dedup state is scoped to one document run; a new run starts clean.
        let mut first_run = Deduplicator::new();
        assert!(first_run.accept(b"shared"));

        let mut second_run = Deduplicator::new();
        assert!(second_run.accept(b"shared"));
    }

    #[test]
    fn rejected_accept_does_not_mutate() {
        let mut dedup = Deduplicator::new();
        dedup.accept(b"blob");
        dedup.accept(b"blob");
        dedup.accept(b"blob");
        assert_eq!(dedup.len(), 1);
    }

    // ── validate_dimensions ──────────────────────────────────────────────────

    #[test]
    fn exact_threshold_passes() {
        let data = png_bytes(100, 100, 0);
        assert_eq!(validate_dimensions(&data, 100), Ok((100, 100)));
    }

    #[test]
    fn one_pixel_under_threshold_rejects() {
        let data = png_bytes(99, 100, 0);
        assert_eq!(
            validate_dimensions(&data, 100),
            Err(Rejection::TooSmall {
                width: 99,
                height: 100
            })
        );
    }

    #[test]
    fn either_axis_alone_can_reject() {
        let data = png_bytes(400, 99, 0);
        assert!(matches!(
            validate_dimensions(&data, 100),
            Err(Rejection::TooSmall { .. })
        ));
    }

    #[test]
    fn garbage_bytes_are_undecodable() {
        assert!(matches!(
            validate_dimensions(b"definitely not an image", 100),
            Err(Rejection::Undecodable(_))
        ));
    }

    #[test]
    fn jpeg_header_is_enough_for_dimensions() {
        let img = RgbImage::from_pixel(320, 240, image::Rgb([10, 20, 30]));
        let mut out = Vec::new();
        DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut out), ImageFormat::Jpeg)
            .unwrap();
        assert_eq!(validate_dimensions(&out, 1), Ok((320, 240)));
    }
}
