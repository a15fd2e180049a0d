//! Shared helpers for unit tests: minimal in-memory PDFs built with lopdf,
//! so no binary fixtures are needed.

use lopdf::{Document, Object, dictionary};

use crate::candidate::CandidateFile;

/// Build a serialized PDF with one page per `(width, height)` pair, in
/// order. Distinct sizes let tests trace which source a merged page came
/// from.
pub(crate) fn pdf_with_page_widths(sizes: &[(i64, i64)]) -> Vec<u8> {
    let mut doc = Document::with_version("1.4");

    let pages_id = doc.new_object_id();

    let mut page_ids = Vec::new();
    for &(width, height) in sizes {
        let page_id = doc.new_object_id();
        let page = dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), width.into(), height.into()],
        };
        doc.objects.insert(page_id, page.into());
        page_ids.push(page_id);
    }

    let pages_dict = dictionary! {
        "Type" => "Pages",
        "Kids" => page_ids.iter().map(|&id| id.into()).collect::<Vec<Object>>(),
        "Count" => sizes.len() as i64,
    };
    doc.objects.insert(pages_id, pages_dict.into());

    let catalog_id = doc.new_object_id();
    let catalog = dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    };
    doc.objects.insert(catalog_id, catalog.into());
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).expect("serialize test PDF");
    bytes
}

/// Build a serialized PDF with `n` US Letter pages.
pub(crate) fn pdf_with_pages(n: usize) -> Vec<u8> {
    pdf_with_page_widths(&vec![(612, 792); n])
}

/// MediaBox widths of a document's pages, in page order.
pub(crate) fn page_widths(bytes: &[u8]) -> Vec<i64> {
    let doc = Document::load_mem(bytes).expect("parse PDF under test");
    doc.get_pages()
        .into_values()
        .map(|page_id| {
            let dict = doc
                .get_object(page_id)
                .and_then(|obj| obj.as_dict())
                .expect("page dictionary");
            let media_box = dict
                .get(b"MediaBox")
                .and_then(|mb| mb.as_array())
                .expect("MediaBox array");
            media_box[2].as_i64().expect("integer width")
        })
        .collect()
}

/// Wrap bytes as a candidate file.
pub(crate) fn candidate(name: &str, bytes: Vec<u8>) -> CandidateFile {
    CandidateFile::new(name, bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn built_pdfs_round_trip_through_lopdf() {
        let bytes = pdf_with_pages(3);
        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 3);
    }

    #[test]
    fn page_widths_follow_page_order() {
        let bytes = pdf_with_page_widths(&[(100, 200), (300, 400)]);
        assert_eq!(page_widths(&bytes), [100, 300]);
    }
}
