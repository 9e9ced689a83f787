//! Export tests for storage markup (Document → markup)

use handoff_text::format::Format;
use handoff_text::formats::StorageFormat;
use handoff_text::{Document, FormatTag, Range};
use insta::assert_snapshot;

fn to_markup(doc: &Document) -> String {
    StorageFormat.serialize(doc).unwrap()
}

fn tag_lines(doc: &mut Document, tag: FormatTag, lines: &[usize]) {
    for &line in lines {
        doc.set_line_block_tag(line, tag).unwrap();
    }
}

// ============================================================================
// PARAGRAPHS AND RUNS
// ============================================================================

#[test]
fn test_bold_prefix() {
    let mut doc = Document::from_text("Status: OK");
    doc.toggle(FormatTag::Bold, Range::on_line(1, 0, 6)).unwrap();

    assert_snapshot!(to_markup(&doc), @"<p><strong>Status:</strong> OK</p>");
}

#[test]
fn test_runs_split_on_tag_change() {
    let mut doc = Document::from_text("one two three");
    doc.toggle(FormatTag::Bold, Range::on_line(1, 0, 7)).unwrap();
    doc.toggle(FormatTag::Italic, Range::on_line(1, 4, 13)).unwrap();

    assert_snapshot!(
        to_markup(&doc),
        @"<p><strong>one </strong><strong><em>two</em></strong><em> three</em></p>"
    );
}

#[test]
fn test_underline_only() {
    let mut doc = Document::from_text("see ticket");
    doc.toggle(FormatTag::Underline, Range::on_line(1, 4, 10))
        .unwrap();

    assert_snapshot!(to_markup(&doc), @"<p>see <u>ticket</u></p>");
}

#[test]
fn test_escaping() {
    let doc = Document::from_text("5 > 3 & 2 < 4");
    assert_snapshot!(to_markup(&doc), @"<p>5 &gt; 3 &amp; 2 &lt; 4</p>");
}

#[test]
fn test_escaping_inside_heading_and_list() {
    let mut doc = Document::from_text("5 > 3 & 2 < 4\n5 > 3 & 2 < 4");
    doc.set_line_block_tag(1, FormatTag::Heading3).unwrap();
    doc.set_line_block_tag(2, FormatTag::NumberedItem).unwrap();

    let markup = to_markup(&doc);
    assert_eq!(markup.matches("5 &gt; 3 &amp; 2 &lt; 4").count(), 2);
}

// ============================================================================
// BLANK LINES
// ============================================================================

#[test]
fn test_empty_line() {
    let doc = Document::new();
    assert_snapshot!(to_markup(&doc), @"<p>&nbsp;</p>");
}

#[test]
fn test_whitespace_line_is_blank_even_when_tagged() {
    let mut doc = Document::from_text("   ");
    doc.set_line_block_tag(1, FormatTag::Heading1).unwrap();
    doc.toggle(FormatTag::Bold, Range::on_line(1, 0, 3)).unwrap();

    assert_snapshot!(to_markup(&doc), @"<p>&nbsp;</p>");
}

// ============================================================================
// HEADINGS
// ============================================================================

#[test]
fn test_heading_drops_inline_tags() {
    let mut doc = Document::from_text("Shift Notes");
    doc.set_line_block_tag(1, FormatTag::Heading2).unwrap();
    doc.toggle(FormatTag::Bold, Range::on_line(1, 0, 5)).unwrap();

    assert_snapshot!(to_markup(&doc), @"<h2>Shift Notes</h2>");
}

#[test]
fn test_heading_wins_over_list() {
    let mut doc = Document::from_text("Title");
    doc.set_line_block_tag(1, FormatTag::BulletItem).unwrap();
    doc.set_line_block_tag(1, FormatTag::Heading1).unwrap();

    assert_snapshot!(to_markup(&doc), @"<h1>Title</h1>");
}

// ============================================================================
// LISTS
// ============================================================================

#[test]
fn test_bullets_share_one_container() {
    let mut doc = Document::from_text("A\nB");
    tag_lines(&mut doc, FormatTag::BulletItem, &[1, 2]);

    assert_snapshot!(to_markup(&doc), @"<ul><li>A</li><li>B</li></ul>");
}

#[test]
fn test_isolated_item_gets_own_container() {
    let mut doc = Document::from_text("only");
    doc.set_line_block_tag(1, FormatTag::NumberedItem).unwrap();

    assert_snapshot!(to_markup(&doc), @"<ol><li>only</li></ol>");
}

#[test]
fn test_kind_change_starts_new_container() {
    let mut doc = Document::from_text("a\nb\nc");
    tag_lines(&mut doc, FormatTag::BulletItem, &[1, 2]);
    doc.set_line_block_tag(3, FormatTag::NumberedItem).unwrap();

    let markup = to_markup(&doc);
    assert_eq!(markup, "<ul><li>a</li><li>b</li></ul>\n<ol><li>c</li></ol>");
}

#[test]
fn test_blank_line_splits_lists() {
    let mut doc = Document::from_text("a\n\nb");
    tag_lines(&mut doc, FormatTag::BulletItem, &[1, 3]);

    let markup = to_markup(&doc);
    assert_eq!(markup.matches("<ul>").count(), 2);
    assert_eq!(markup.matches("<li>").count(), 2);
}

#[test]
fn test_list_item_drops_inline_tags() {
    let mut doc = Document::from_text("urgent");
    doc.set_line_block_tag(1, FormatTag::BulletItem).unwrap();
    doc.toggle(FormatTag::Bold, Range::on_line(1, 0, 6)).unwrap();

    assert_snapshot!(to_markup(&doc), @"<ul><li>urgent</li></ul>");
}

// ============================================================================
// WHOLE PAGES
// ============================================================================

#[test]
fn test_handoff_page() {
    let mut doc = Document::from_text(
        "Shift Notes\nStatus: OK\n\nlink down\nticket raised\nFollow up with NOC",
    );
    doc.set_line_block_tag(1, FormatTag::Heading2).unwrap();
    doc.toggle(FormatTag::Bold, Range::on_line(2, 0, 7)).unwrap();
    tag_lines(&mut doc, FormatTag::BulletItem, &[4, 5]);
    doc.toggle(FormatTag::Italic, Range::on_line(6, 15, 18))
        .unwrap();

    assert_snapshot!(to_markup(&doc), @r"
    <h2>Shift Notes</h2>
    <p><strong>Status:</strong> OK</p>
    <p>&nbsp;</p>
    <ul><li>link down</li><li>ticket raised</li></ul>
    <p>Follow up with <em>NOC</em></p>
    ");
}
