//! Plain text format
//!
//! Lines in, lines out. Parsing yields an untagged document and serialization
//! drops every tag, which makes this the format of choice for drafting a
//! handoff body in a text editor before pushing it as storage markup.

use crate::error::FormatError;
use crate::format::Format;
use crate::model::Document;

#[derive(Debug, Default, Clone, Copy)]
pub struct TextFormat;

impl Format for TextFormat {
    fn name(&self) -> &str {
        "text"
    }

    fn description(&self) -> &str {
        "Plain text, one buffer line per line"
    }

    fn file_extensions(&self) -> &[&str] {
        &["txt", "text"]
    }

    fn supports_parsing(&self) -> bool {
        true
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn parse(&self, source: &str) -> Result<Document, FormatError> {
        let source = source.strip_suffix('\n').unwrap_or(source);
        Ok(Document::from_text(source))
    }

    fn serialize(&self, doc: &Document) -> Result<String, FormatError> {
        let mut text = doc.text();
        text.push('\n');
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_newline_round_trips() {
        let doc = TextFormat.parse("a\nb\n").unwrap();
        assert_eq!(doc.line_count(), 2);
        assert_eq!(TextFormat.serialize(&doc).unwrap(), "a\nb\n");
    }
}
