//! Converts a document's lines into a flat event stream.
//!
//! # The High-Level Concept
//!
//! The buffer is flat: one line after another, each with its own heading and
//! list slots and one tag set per character. The markup we emit is almost flat
//! too; only list items nest inside a container. So the conversion is a single
//! pass that classifies every line into a [`Block`] and then groups list blocks.
//!
//! # The Algorithm
//!
//! 1. **Classification** (per line, first match wins):
//!    - whitespace-only or empty line → `Block::Blank`
//!    - heading slot set → `Block::Heading` with the plain line text
//!    - list slot set → `Block::ListItem` with the plain line text
//!    - otherwise → `Block::Paragraph` with the line split into runs
//!
//! 2. **Run splitting:**
//!    - Walk the characters left to right and cut whenever the character tag
//!      set differs from the previous one. Sets compare by equality.
//!
//! 3. **Grouping:**
//!    - A `StartList` opens before a list item whose predecessor is not an
//!      item of the same kind; `EndList` closes after an item whose successor
//!      is not an item of the same kind (or when the document ends).
//!
//! 4. **Blank lines:**
//!    - Become a paragraph holding a single non-breaking space.

use crate::ir::events::{Event, Run};
use crate::ir::nodes::Block;
use crate::model::{CharTags, Document, LineView};

pub const NBSP: &str = "\u{a0}";

/// Converts a document to a flat vector of `Event`s.
pub fn document_to_events(doc: &Document) -> Vec<Event> {
    let blocks: Vec<Block> = doc.lines().map(|line| classify_line(&line)).collect();
    blocks_to_events(&blocks)
}

pub fn classify_line(line: &LineView<'_>) -> Block {
    if line.text.trim().is_empty() {
        return Block::Blank;
    }
    if let Some(level) = line.heading {
        return Block::Heading {
            level,
            text: line.text.to_string(),
        };
    }
    if let Some(kind) = line.list {
        return Block::ListItem {
            kind,
            text: line.text.to_string(),
        };
    }
    Block::Paragraph(split_runs(line.text, line.marks))
}

/// Split `text` into maximal runs of identical character tags.
pub fn split_runs(text: &str, marks: &[CharTags]) -> Vec<Run> {
    let mut runs: Vec<Run> = Vec::new();
    for (idx, ch) in text.chars().enumerate() {
        let tags = marks.get(idx).copied().unwrap_or_default();
        match runs.last_mut() {
            Some(run) if run.tags == tags => run.text.push(ch),
            _ => runs.push(Run {
                text: ch.to_string(),
                tags,
            }),
        }
    }
    runs
}

pub fn blocks_to_events(blocks: &[Block]) -> Vec<Event> {
    let mut events = vec![Event::StartDocument];

    for (idx, block) in blocks.iter().enumerate() {
        match block {
            Block::Blank => {
                events.push(Event::StartParagraph);
                events.push(Event::Inline(Run::plain(NBSP)));
                events.push(Event::EndParagraph);
            }
            Block::Heading { level, text } => {
                events.push(Event::StartHeading(*level));
                events.push(Event::Inline(Run::plain(text.as_str())));
                events.push(Event::EndHeading(*level));
            }
            Block::ListItem { kind, text } => {
                let previous = idx.checked_sub(1).and_then(|i| blocks[i].list_kind());
                let next = blocks.get(idx + 1).and_then(Block::list_kind);

                if previous != Some(*kind) {
                    events.push(Event::StartList(*kind));
                }
                events.push(Event::StartListItem);
                events.push(Event::Inline(Run::plain(text.as_str())));
                events.push(Event::EndListItem);
                if next != Some(*kind) {
                    events.push(Event::EndList(*kind));
                }
            }
            Block::Paragraph(runs) => {
                events.push(Event::StartParagraph);
                events.extend(runs.iter().cloned().map(Event::Inline));
                events.push(Event::EndParagraph);
            }
        }
    }

    events.push(Event::EndDocument);
    events
}
