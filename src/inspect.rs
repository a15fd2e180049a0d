//! Asynchronous per-file inspection: page count and first-page preview.
//!
//! Each inspection is independent and shares no mutable state with any
//! other. Decoding runs on the blocking pool under a timeout; a failure
//! here never aborts the batch, the caller just marks the entry failed.

use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use lopdf::{Document, Object};
use tokio::task;
use tokio::time::timeout;

use crate::candidate::CandidateFile;
use crate::config::SessionConfig;
use crate::error::InspectError;

/// Fallback page size (US Letter, in points) when the first page carries no
/// usable MediaBox.
const DEFAULT_PAGE_SIZE: (f32, f32) = (612.0, 792.0);

/// What inspection learned about one file.
#[derive(Debug, Clone)]
pub struct Inspection {
    /// Number of pages in the document.
    pub page_count: usize,

    /// Preview of the first page, when one could be produced.
    pub thumbnail: Option<Thumbnail>,
}

/// A PNG-encoded preview image.
///
/// lopdf does not rasterize page content, so the preview is a blank page
/// card rendered at the first page's aspect ratio rather than a true render.
#[derive(Clone)]
pub struct Thumbnail {
    width: u32,
    height: u32,
    png: Vec<u8>,
}

impl Thumbnail {
    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Encoded PNG bytes.
    pub fn png_bytes(&self) -> &[u8] {
        &self.png
    }

    /// The image as a `data:image/png;base64,...` URI, the form a web host
    /// drops straight into an `<img>` tag.
    pub fn as_data_uri(&self) -> String {
        format!("data:image/png;base64,{}", BASE64.encode(&self.png))
    }
}

impl std::fmt::Debug for Thumbnail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Thumbnail")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("png_len", &self.png.len())
            .finish()
    }
}

/// Inspector for candidate files.
#[derive(Debug, Clone)]
pub struct Inspector {
    max_file_bytes: u64,
    thumbnail_width: u32,
    decode_timeout: Duration,
}

impl Inspector {
    /// Create an inspector using the session's bounds.
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            max_file_bytes: config.max_file_bytes,
            thumbnail_width: config.thumbnail_width,
            decode_timeout: config.decode_timeout,
        }
    }

    /// Inspect one candidate, producing its page count and preview.
    ///
    /// Decoding happens on the blocking pool so many inspections can be in
    /// flight at once without starving the runtime. The input is never
    /// mutated.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is over the per-file size bound, cannot
    /// be parsed as a PDF, or decoding exceeds the configured timeout. A
    /// preview that fails to encode is not an error; the inspection comes
    /// back with `thumbnail: None`.
    pub async fn inspect(&self, candidate: &CandidateFile) -> Result<Inspection, InspectError> {
        let name = candidate.name().to_string();

        if candidate.byte_len() > self.max_file_bytes {
            return Err(InspectError::FileTooLarge {
                name,
                size: candidate.byte_len(),
                limit: self.max_file_bytes,
            });
        }

        let input = candidate.clone();
        let thumb_width = self.thumbnail_width;
        let handle = task::spawn_blocking(move || decode(&input, thumb_width));

        match timeout(self.decode_timeout, handle).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_err)) => Err(InspectError::UnreadableDocument {
                name,
                reason: join_err.to_string(),
            }),
            Err(_) => Err(InspectError::DecodeTimeout {
                name,
                timeout: self.decode_timeout,
            }),
        }
    }
}

fn decode(candidate: &CandidateFile, thumb_width: u32) -> Result<Inspection, InspectError> {
    let doc =
        Document::load_mem(candidate.data()).map_err(|e| InspectError::UnreadableDocument {
            name: candidate.name().to_string(),
            reason: e.to_string(),
        })?;

    let page_count = doc.get_pages().len();
    let thumbnail = first_page_thumbnail(&doc, thumb_width);

    Ok(Inspection {
        page_count,
        thumbnail,
    })
}

fn first_page_thumbnail(doc: &Document, width: u32) -> Option<Thumbnail> {
    if width == 0 || doc.get_pages().is_empty() {
        return None;
    }

    let (page_w, page_h) = first_page_size(doc).unwrap_or(DEFAULT_PAGE_SIZE);
    if page_w <= 0.0 || page_h <= 0.0 {
        return None;
    }

    // Keep pathological aspect ratios from producing towering images.
    let height = (width as f32 * (page_h / page_w))
        .round()
        .clamp(1.0, 4.0 * width as f32) as u32;

    render_page_card(width, height).ok()
}

fn first_page_size(doc: &Document) -> Option<(f32, f32)> {
    let (_, page_id) = doc.get_pages().into_iter().next()?;
    let dict = doc.get_object(page_id).ok()?.as_dict().ok()?;
    let media_box = dict.get(b"MediaBox").ok()?.as_array().ok()?;
    if media_box.len() < 4 {
        return None;
    }

    let coord = |obj: &Object| -> Option<f32> {
        match obj {
            Object::Integer(i) => Some(*i as f32),
            Object::Real(r) => Some(*r),
            _ => None,
        }
    };
    let x0 = coord(&media_box[0])?;
    let y0 = coord(&media_box[1])?;
    let x1 = coord(&media_box[2])?;
    let y1 = coord(&media_box[3])?;
    Some((x1 - x0, y1 - y0))
}

/// Encode a white page card with a gray frame as a grayscale PNG.
fn render_page_card(width: u32, height: u32) -> Result<Thumbnail, png::EncodingError> {
    const PAPER: u8 = 0xff;
    const FRAME: u8 = 0xb0;

    let w = width as usize;
    let h = height as usize;
    let mut pixels = vec![PAPER; w * h];

    for x in 0..w {
        pixels[x] = FRAME;
        pixels[(h - 1) * w + x] = FRAME;
    }
    for y in 0..h {
        pixels[y * w] = FRAME;
        pixels[y * w + w - 1] = FRAME;
    }

    let mut out = Vec::new();
    let mut encoder = png::Encoder::new(&mut out, width, height);
    encoder.set_color(png::ColorType::Grayscale);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(&pixels)?;
    writer.finish()?;

    Ok(Thumbnail {
        width,
        height,
        png: out,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{candidate, pdf_with_page_widths, pdf_with_pages};

    fn inspector() -> Inspector {
        Inspector::new(&SessionConfig::default())
    }

    #[tokio::test]
    async fn reports_page_count() {
        let c = candidate("three.pdf", pdf_with_pages(3));
        let inspection = inspector().inspect(&c).await.unwrap();
        assert_eq!(inspection.page_count, 3);
    }

    #[tokio::test]
    async fn produces_thumbnail_for_valid_document() {
        let c = candidate("doc.pdf", pdf_with_pages(1));
        let inspection = inspector().inspect(&c).await.unwrap();

        let thumb = inspection.thumbnail.expect("thumbnail for valid document");
        assert_eq!(thumb.width(), SessionConfig::default().thumbnail_width);
        assert!(thumb.height() > 0);
        // PNG signature
        assert_eq!(&thumb.png_bytes()[..4], &[0x89, b'P', b'N', b'G']);
        assert!(thumb.as_data_uri().starts_with("data:image/png;base64,"));
    }

    #[tokio::test]
    async fn thumbnail_follows_page_aspect_ratio() {
        // A 200x400 point page should produce a 2:1 tall preview.
        let c = candidate("tall.pdf", pdf_with_page_widths(&[(200, 400)]));
        let inspection = inspector().inspect(&c).await.unwrap();

        let thumb = inspection.thumbnail.unwrap();
        assert_eq!(thumb.height(), thumb.width() * 2);
    }

    #[tokio::test]
    async fn garbage_bytes_fail_inspection() {
        let c = candidate("junk.pdf", b"not a pdf at all".to_vec());
        let err = inspector().inspect(&c).await.unwrap_err();
        assert!(matches!(err, InspectError::UnreadableDocument { .. }));
    }

    #[tokio::test]
    async fn zero_byte_file_fails_inspection() {
        let c = candidate("empty.pdf", Vec::new());
        assert!(inspector().inspect(&c).await.is_err());
    }

    #[tokio::test]
    async fn oversized_file_is_rejected_before_decoding() {
        let config = SessionConfig {
            max_file_bytes: 8,
            ..SessionConfig::default()
        };
        let c = candidate("big.pdf", pdf_with_pages(1));
        let err = Inspector::new(&config).inspect(&c).await.unwrap_err();
        assert!(matches!(err, InspectError::FileTooLarge { limit: 8, .. }));
    }
}
