//! Import tests for storage markup (markup → Document)
//!
//! Import keeps text only. These tests pin that contract down.

use handoff_text::format::Format;
use handoff_text::formats::{StorageFormat, TextFormat};
use handoff_text::{from_storage, to_storage, Document, FormatTag, Position, Range};

#[test]
fn test_formatting_is_not_reconstructed() {
    let doc = from_storage("<h2>Shift Notes</h2>\n<p><strong>Status:</strong> OK</p>");

    assert_eq!(doc.text(), "Shift Notes\nStatus: OK");
    for line in doc.lines() {
        assert!(line.heading.is_none());
        assert!(line.list.is_none());
        assert!(line.marks.iter().all(|m| m.is_empty()));
    }
    assert!(doc.tags_at(Position::new(2, 0)).unwrap().is_empty());
}

#[test]
fn test_entities() {
    let doc = from_storage("<p>5 &gt; 3 &amp; 2 &lt; 4</p>\n<p>&nbsp;</p>");
    assert_eq!(doc.text(), "5 > 3 & 2 < 4\n ");
}

#[test]
fn test_list_items_become_lines() {
    let doc = StorageFormat
        .parse("<ul><li>A</li><li>B</li></ul>\n<p>after</p>")
        .unwrap();
    assert_eq!(doc.text(), "A\nB\nafter");
}

#[test]
fn test_malformed_markup_degrades_to_text() {
    let doc = from_storage("<p>open <strong>never closed</p> stray >");
    assert_eq!(doc.text(), "open never closed stray >");
}

#[test]
fn test_reopened_page_saves_as_plain_paragraphs() {
    let mut doc = Document::from_text("Status: OK\nitem");
    doc.toggle(FormatTag::Bold, Range::on_line(1, 0, 6)).unwrap();
    doc.set_line_block_tag(2, FormatTag::BulletItem).unwrap();

    let saved = to_storage(&doc).unwrap();
    let reopened = from_storage(&saved);

    assert_eq!(
        to_storage(&reopened).unwrap(),
        "<p>Status: OK</p>\n<p>item</p>"
    );
}

#[test]
fn test_storage_to_text_conversion() {
    let doc = StorageFormat
        .parse("<h1>GNOC Shift Handoff</h1>\n<p>&nbsp;</p>")
        .unwrap();
    assert_eq!(
        TextFormat.serialize(&doc).unwrap(),
        "GNOC Shift Handoff\n \n"
    );
}
