//! End-to-end session flow through the public API: select files, inspect,
//! reorder, merge, deliver.

use lopdf::{Document, Object, dictionary};
use pdfdeck::output::{DirectoryTarget, SaveTarget, merged_file_name};
use pdfdeck::{CandidateFile, EntryStatus, Session, SessionConfig};
use tempfile::TempDir;

/// Build a serialized PDF with one page per given MediaBox width.
fn pdf_with_widths(widths: &[i64]) -> Vec<u8> {
    let mut doc = Document::with_version("1.4");

    let pages_id = doc.new_object_id();
    let mut page_ids = Vec::new();
    for &width in widths {
        let page_id = doc.new_object_id();
        let page = dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), width.into(), 792.into()],
        };
        doc.objects.insert(page_id, page.into());
        page_ids.push(page_id);
    }

    let pages_dict = dictionary! {
        "Type" => "Pages",
        "Kids" => page_ids.iter().map(|&id| id.into()).collect::<Vec<Object>>(),
        "Count" => widths.len() as i64,
    };
    doc.objects.insert(pages_id, pages_dict.into());

    let catalog_id = doc.new_object_id();
    doc.objects.insert(
        catalog_id,
        dictionary! { "Type" => "Catalog", "Pages" => pages_id }.into(),
    );
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

fn widths_of(bytes: &[u8]) -> Vec<i64> {
    let doc = Document::load_mem(bytes).unwrap();
    doc.get_pages()
        .into_values()
        .map(|page_id| {
            doc.get_object(page_id)
                .and_then(|obj| obj.as_dict())
                .and_then(|dict| dict.get(b"MediaBox"))
                .and_then(|mb| mb.as_array())
                .and_then(|arr| arr[2].as_i64())
                .unwrap()
        })
        .collect()
}

#[tokio::test]
async fn select_reorder_merge_and_save() {
    let mut session = Session::new(SessionConfig::default());

    // x.pdf has 3 pages, y.pdf has 2; widths mark their origin.
    session.add_files(vec![
        CandidateFile::new("x.pdf", pdf_with_widths(&[110, 111, 112])),
        CandidateFile::new("y.pdf", pdf_with_widths(&[220, 221])),
    ]);
    session.settle().await;

    assert_eq!(session.len(), 2);
    assert!(
        session
            .entries()
            .iter()
            .all(|e| e.status() == EntryStatus::Ready)
    );
    assert_eq!(session.total_pages(), 5);
    assert!(session.entries()[0].thumbnail().is_some());

    // User drags y ahead of x.
    assert!(session.reorder(1, 0));

    let merged = session.merge().unwrap();
    assert_eq!(merged.statistics.total_pages, 5);
    assert_eq!(widths_of(&merged.bytes), [220, 221, 110, 111, 112]);

    // Deliver under a generated download name.
    let dir = TempDir::new().unwrap();
    let name = merged_file_name();
    let saved = DirectoryTarget::new(dir.path())
        .save(&name, &merged.bytes)
        .unwrap();
    assert!(saved.exists());

    // The delivered file is itself a loadable 5-page PDF.
    let delivered = std::fs::read(&saved).unwrap();
    assert_eq!(widths_of(&delivered), [220, 221, 110, 111, 112]);
}

#[tokio::test]
async fn remove_and_re_add_the_same_file() {
    let mut session = Session::new(SessionConfig::default());
    let bytes = pdf_with_widths(&[612; 10]);

    session.add_files(vec![CandidateFile::new("a.pdf", bytes.clone())]);
    session.settle().await;
    assert_eq!(session.entries()[0].page_count(), 10);

    let id = session.entries()[0].id();
    assert!(session.remove(id));
    assert!(session.is_empty());

    let report = session.add_files(vec![CandidateFile::new("a.pdf", bytes)]);
    assert_eq!(report.accepted, 1);
    session.settle().await;

    assert_eq!(session.len(), 1);
    assert_eq!(session.entries()[0].name(), "a.pdf");
    assert_eq!(session.entries()[0].page_count(), 10);
}

#[tokio::test]
async fn merge_failure_produces_no_delivery() {
    let session = Session::new(SessionConfig::default());

    let dir = TempDir::new().unwrap();
    if let Ok(merged) = session.merge() {
        // Would be a delivery; the empty session must never get here.
        DirectoryTarget::new(dir.path())
            .save("unexpected.pdf", &merged.bytes)
            .unwrap();
    }

    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}
