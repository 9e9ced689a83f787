//! Storage markup import (markup → Document)
//!
//! Lossy: tags are stripped and only text survives. Formatting is
//! not reconstructed.

use crate::model::Document;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^<]+?>").expect("tag pattern is valid"));

static ENTITY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&(nbsp|amp|lt|gt);").expect("entity pattern is valid"));

/// Adjacent list items written without a separator.
const ITEM_BOUNDARY: &str = "</li><li>";

/// Reduce storage markup to its plain text content.
///
/// Entities are decoded in one pass, so `&amp;lt;` yields the text `&lt;`.
/// Unknown entities are kept verbatim.
pub fn markup_to_text(markup: &str) -> String {
    let separated = markup.replace(ITEM_BOUNDARY, "</li>\n<li>");
    let stripped = TAG.replace_all(&separated, "");
    ENTITY
        .replace_all(&stripped, |caps: &Captures| match &caps[1] {
            "nbsp" => " ",
            "amp" => "&",
            "lt" => "<",
            _ => ">",
        })
        .into_owned()
}

/// Load storage markup as an untagged document. Never fails.
pub fn parse_storage(markup: &str) -> Document {
    let text = markup_to_text(markup);
    log::debug!(
        "imported {} bytes of markup as {} bytes of text",
        markup.len(),
        text.len()
    );
    Document::from_text(&text)
}
