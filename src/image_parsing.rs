use crate::{ExtractError, Result};
use lopdf::{Dictionary, Document, ObjectId};
use std::io::Cursor;

/// Raw encoded bytes for one embedded image, plus the file-extension tag its
/// encoding maps to.
#[derive(Debug)]
pub(crate) struct ImageBlob {
    pub data: Vec<u8>,
    pub format: &'static str,
}

/// Turns an image XObject stream into the byte blob that will flow through
/// the dedup/filter/persist pipeline.
///
/// Encodings are handled per the XObject's `/Filter` chain:
///
/// - `DCTDecode` (JPEG) and `JPXDecode` (JPEG 2000) streams already hold a
///   complete image file, so the stream content passes through unmodified.
/// - `FlateDecode`, `LZWDecode`, `RunLengthDecode` or no filter at all means
///   the stream holds raw pixel samples; 8-bit grayscale and RGB samples are
///   re-wrapped as PNG so they land on disk as a usable file.
/// - Anything else (CCITT fax, JBIG2, exotic color spaces) is an extraction
///   failure — the caller reports it and moves on.
pub(crate) struct ImageStreamParser<'a> {
    document: &'a Document,
}

impl<'a> ImageStreamParser<'a> {
    pub(crate) fn new(document: &'a Document) -> Self {
        Self { document }
    }

    /// Create an extraction error with consistent formatting.
    fn extraction_error(&self, name: &str, message: &str) -> ExtractError {
        ExtractError::ExtractionError(name.into(), message.into())
    }

    /// Retrieve the raw bytes and format tag for the image XObject at `id`.
    pub(crate) fn parse_image(&self, name: &str, id: ObjectId) -> Result<ImageBlob> {
        let object = self.document.get_object(id)?;
        let stream = object
            .as_stream()
            .map_err(|_| self.extraction_error(name, "image object is not a stream"))?;

        let filters = Self::filter_names(&stream.dict);
        let filter_refs: Vec<&str> = filters.iter().map(String::as_str).collect();

        match filter_refs.as_slice() {
            ["DCTDecode"] => Ok(ImageBlob {
                data: stream.content.clone(),
                format: "jpg",
            }),
            ["JPXDecode"] => Ok(ImageBlob {
                data: stream.content.clone(),
                format: "jp2",
            }),
            [] | ["FlateDecode"] | ["LZWDecode"] | ["RunLengthDecode"] => {
                let samples = if filter_refs.is_empty() {
                    stream.content.clone()
                } else {
                    stream.decompressed_content().map_err(|e| {
                        self.extraction_error(name, &format!("cannot decode stream: {e}"))
                    })?
                };
                let data = self.wrap_raw_samples(name, &stream.dict, samples)?;
                Ok(ImageBlob {
                    data,
                    format: "png",
                })
            }
            other => Err(self.extraction_error(
                name,
                &format!("unsupported filter chain {}", other.join("+")),
            )),
        }
    }

    /// Re-encode raw 8-bit grayscale or RGB samples as a PNG file.
    fn wrap_raw_samples(
        &self,
        name: &str,
        dict: &Dictionary,
        samples: Vec<u8>,
    ) -> Result<Vec<u8>> {
        let width = Self::dict_u32(dict, b"Width")
            .ok_or_else(|| self.extraction_error(name, "missing /Width"))?;
        let height = Self::dict_u32(dict, b"Height")
            .ok_or_else(|| self.extraction_error(name, "missing /Height"))?;

        let bits = Self::dict_u32(dict, b"BitsPerComponent").unwrap_or(8);
        if bits != 8 {
            return Err(self.extraction_error(name, &format!("{bits} bits per component")));
        }

        let channels = self.sample_channels(name, dict, width, height, samples.len())?;
        let expected = width as usize * height as usize * channels;
        if samples.len() < expected {
            return Err(self.extraction_error(
                name,
                &format!("{} sample bytes, expected {expected}", samples.len()),
            ));
        }
        let mut samples = samples;
        samples.truncate(expected);

        let dynamic = match channels {
            1 => image::GrayImage::from_raw(width, height, samples)
                .map(image::DynamicImage::ImageLuma8),
            _ => image::RgbImage::from_raw(width, height, samples)
                .map(image::DynamicImage::ImageRgb8),
        }
        .ok_or_else(|| self.extraction_error(name, "sample buffer does not match dimensions"))?;

        let mut png = Vec::new();
        dynamic
            .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
            .map_err(|e| self.extraction_error(name, &format!("PNG encoding failed: {e}")))?;
        Ok(png)
    }

    /// Number of color channels, from `/ColorSpace` when present, otherwise
    /// inferred from the sample count.
    fn sample_channels(
        &self,
        name: &str,
        dict: &Dictionary,
        width: u32,
        height: u32,
        sample_len: usize,
    ) -> Result<usize> {
        if let Ok(value) = dict.get(b"ColorSpace") {
            let resolved = if let Ok(id) = value.as_reference() {
                self.document.get_object(id).ok()
            } else {
                Some(value)
            };
            let cs_name = resolved.and_then(|o| o.as_name().ok());
            return match cs_name {
                Some(b"DeviceGray") | Some(b"CalGray") => Ok(1),
                Some(b"DeviceRGB") | Some(b"CalRGB") => Ok(3),
                Some(other) => Err(self.extraction_error(
                    name,
                    &format!("unsupported color space /{}", String::from_utf8_lossy(other)),
                )),
                None => Err(self.extraction_error(name, "unsupported color space object")),
            };
        }

        // No /ColorSpace entry: infer from the sample count.
        let pixels = width as usize * height as usize;
        if sample_len == pixels {
            Ok(1)
        } else if sample_len == pixels * 3 {
            Ok(3)
        } else {
            Err(self.extraction_error(name, "cannot infer color space"))
        }
    }

    /// Read `/Filter` as a list of filter names; it may be a single name, an
    /// array of names, or absent.
    fn filter_names(dict: &Dictionary) -> Vec<String> {
        let Ok(value) = dict.get(b"Filter") else {
            return Vec::new();
        };

        if let Ok(single) = value.as_name() {
            return vec![String::from_utf8_lossy(single).into_owned()];
        }

        if let Ok(array) = value.as_array() {
            return array
                .iter()
                .filter_map(|v| v.as_name().ok())
                .map(|n| String::from_utf8_lossy(n).into_owned())
                .collect();
        }

        Vec::new()
    }

    fn dict_u32(dict: &Dictionary, key: &[u8]) -> Option<u32> {
        dict.get(key).ok()?.as_i64().ok()?.try_into().ok()
    }
}
