//! Property tests for the tag model and the storage conversions.

use handoff_text::{from_storage, to_storage, Document, FormatTag, Range};
use proptest::prelude::*;

const LINE_TAGS: [FormatTag; 5] = [
    FormatTag::Heading1,
    FormatTag::Heading2,
    FormatTag::Heading3,
    FormatTag::BulletItem,
    FormatTag::NumberedItem,
];

fn lines_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-zA-Z0-9&<>;:][a-zA-Z0-9&<>;: ]{0,15}", 1..6)
}

/// Map two arbitrary numbers onto a valid single-line range of `doc`.
fn range_in(doc: &Document, line: usize, a: usize, b: usize) -> Range {
    let line = line % doc.line_count() + 1;
    let len = doc.buffer().line_len(line).unwrap_or(0);
    Range::on_line(line, a % (len + 1), b % (len + 1))
}

proptest! {
    #[test]
    fn toggle_is_an_involution_on_the_same_range(
        lines in lines_strategy(),
        (line, a, b) in (0usize..8, 0usize..20, 0usize..20),
        (other_line, c, d) in (0usize..8, 0usize..20, 0usize..20),
    ) {
        let mut doc = Document::from_text(&lines.join("\n"));
        let range = range_in(&doc, line, a, b);
        prop_assume!(!range.is_empty());

        let italic = range_in(&doc, other_line, c, d);
        if !italic.is_empty() {
            doc.toggle(FormatTag::Italic, italic).unwrap();
        }
        let italic_before = doc.tags().ranges(FormatTag::Italic);

        doc.toggle(FormatTag::Bold, range).unwrap();
        prop_assert_eq!(doc.tags().ranges(FormatTag::Bold), vec![range]);
        doc.toggle(FormatTag::Bold, range).unwrap();

        prop_assert!(doc.tags().ranges(FormatTag::Bold).is_empty());
        prop_assert_eq!(doc.tags().ranges(FormatTag::Italic), italic_before);
    }

    #[test]
    fn each_line_keeps_one_heading_and_one_list_slot(
        lines in lines_strategy(),
        ops in prop::collection::vec((0usize..8, 0usize..5), 0..40),
    ) {
        let mut doc = Document::from_text(&lines.join("\n"));
        let count = doc.line_count();
        let mut last_heading = vec![None; count];
        let mut last_list = vec![None; count];

        for (line, tag) in ops {
            let idx = line % count;
            let tag = LINE_TAGS[tag];
            doc.set_line_block_tag(idx + 1, tag).unwrap();
            match tag {
                FormatTag::BulletItem | FormatTag::NumberedItem => last_list[idx] = Some(tag),
                _ => last_heading[idx] = Some(tag),
            }
        }

        for idx in 0..count {
            let tags = doc.tags_at(handoff_text::Position::new(idx + 1, 0)).unwrap();
            let headings: Vec<_> = tags
                .iter()
                .filter(|t| matches!(t, FormatTag::Heading1 | FormatTag::Heading2 | FormatTag::Heading3))
                .copied()
                .collect();
            let lists: Vec<_> = tags
                .iter()
                .filter(|t| matches!(t, FormatTag::BulletItem | FormatTag::NumberedItem))
                .copied()
                .collect();
            prop_assert!(headings.len() <= 1);
            prop_assert!(lists.len() <= 1);
            prop_assert_eq!(headings.first().copied(), last_heading[idx]);
            prop_assert_eq!(lists.first().copied(), last_list[idx]);
        }
    }

    #[test]
    fn round_trip_preserves_visible_text(
        lines in lines_strategy(),
        spans in prop::collection::vec((0usize..8, 0usize..20, 0usize..20, 0usize..3), 0..6),
    ) {
        let mut doc = Document::from_text(&lines.join("\n"));
        for (line, a, b, tag) in spans {
            let range = range_in(&doc, line, a, b);
            if !range.is_empty() {
                let tag = [FormatTag::Bold, FormatTag::Italic, FormatTag::Underline][tag];
                doc.toggle(tag, range).unwrap();
            }
        }

        let markup = to_storage(&doc).unwrap();
        prop_assert_eq!(from_storage(&markup).text(), doc.text());
    }

    #[test]
    fn contiguous_list_lines_share_one_container(lines in lines_strategy()) {
        let mut doc = Document::from_text(&lines.join("\n"));
        for line in 1..=doc.line_count() {
            doc.set_line_block_tag(line, FormatTag::BulletItem).unwrap();
        }

        let markup = to_storage(&doc).unwrap();
        prop_assert_eq!(markup.matches("<ul>").count(), 1);
        prop_assert_eq!(markup.matches("<li>").count(), lines.len());
    }
}
