use std::path::{Path, PathBuf};

// ── ExtractedImage ───────────────────────────────────────────────────────────

/// A raster image that was embedded inside a PDF document and survived
/// deduplication and size filtering.
///
/// Returned by [`crate::PdfImageExtractor::extract_to_memory`].
#[derive(Debug, Clone)]
pub struct ExtractedImage {
    /// 1-based page number the image was found on.
    pub page_number: u32,

    /// 0-based position among the image XObjects declared on that page.
    ///
    /// Indices are assigned before deduplication and filtering, so gaps in the
    /// persisted files are expected when earlier images were dropped. They are
    /// never compacted.
    pub index_on_page: usize,

    /// Pixel width, as decoded from the image bytes.
    pub width: u32,

    /// Pixel height, as decoded from the image bytes.
    pub height: u32,

    /// File-extension tag for the encoding (`"jpg"`, `"png"`, `"jp2"`),
    /// derived from the XObject's `/Filter` chain.
    pub format: String,

    /// The encoded image bytes, written to disk unmodified.
    pub data: Vec<u8>,
}

impl ExtractedImage {
    /// Build the output filename for this image:
    /// `page<N>_img<M>_<W>x<H>.<ext>`.
    ///
    /// ```
    /// # use pdfimageextract::ExtractedImage;
    /// # let image = ExtractedImage {
    /// #     page_number: 3, index_on_page: 0, width: 640, height: 480,
    /// #     format: "jpg".into(), data: vec![],
    /// # };
    /// assert_eq!(image.filename(), "page3_img0_640x480.jpg");
    /// ```
    pub fn filename(&self) -> String {
        format!(
            "page{}_img{}_{}x{}.{}",
            self.page_number, self.index_on_page, self.width, self.height, self.format
        )
    }

    /// Write this image into `output_dir`, creating the directory if
    /// necessary, and return the final path.
    ///
    /// The bytes are written as-is; an existing file with the same name is
    /// overwritten.
    pub fn save_to_disk<P: AsRef<Path>>(&self, output_dir: P) -> std::io::Result<PathBuf> {
        let dir = output_dir.as_ref();
        std::fs::create_dir_all(dir)?;
        let path = dir.join(self.filename());
        std::fs::write(&path, &self.data)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_image(page: u32, index: usize, w: u32, h: u32, ext: &str) -> ExtractedImage {
        ExtractedImage {
            page_number: page,
            index_on_page: index,
            width: w,
            height: h,
            format: ext.into(),
            data: vec![1, 2, 3],
        }
    }

    #[test]
    fn filename_encodes_page_index_and_dimensions() {
        let image = make_image(12, 4, 1920, 1080, "png");
        assert_eq!(image.filename(), "page12_img4_1920x1080.png");
    }

    #[test]
    fn save_to_disk_returns_final_path() {
        let dir = tempfile::tempdir().unwrap();
        let image = make_image(1, 0, 8, 8, "jpg");

        let path = image.save_to_disk(dir.path()).unwrap();
        assert_eq!(path, dir.path().join("page1_img0_8x8.jpg"));
        assert_eq!(std::fs::read(path).unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn save_to_disk_creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let image = make_image(1, 0, 8, 8, "jpg");

        image.save_to_disk(&nested).unwrap();
        assert!(nested.join("page1_img0_8x8.jpg").exists());
    }
}
