//! Handoff page naming, the initial page body and title matching.

use crate::store::PageSummary;
use chrono::NaiveDate;
use handoff_config::PageConfig;
use handoff_text::{to_storage, Document, EditError, FormatError, FormatTag, Range};
use regex::Regex;
use std::fmt::Write;

/// Numbered sections of a fresh handoff page, each followed by an empty line.
pub const SECTIONS: [&str; 7] = [
    "1. Active Incidents / Ongoing Issues:",
    "2. Scheduled Maintenance:",
    "3. Alerts & Monitoring Anomalies:",
    "4. Team Resource Status:",
    "5. Pending Actions / Follow-Ups:",
    "6. Escalations (If Any):",
    "7. Other Notes / Announcements:",
];

const DETAIL_LABELS: [&str; 4] = [
    "Outgoing Manager:",
    "Incoming Manager:",
    "Date:",
    "Shift Time:",
];

#[derive(Debug, thiserror::Error)]
pub enum PageError {
    #[error("invalid date format '{0}'")]
    InvalidDateFormat(String),
    #[error(transparent)]
    Edit(#[from] EditError),
    #[error(transparent)]
    Format(#[from] FormatError),
}

/// Format `date` with a strftime pattern, rejecting patterns chrono can't render.
pub fn format_date(date: NaiveDate, pattern: &str) -> Result<String, PageError> {
    let mut out = String::new();
    write!(out, "{}", date.format(pattern))
        .map_err(|_| PageError::InvalidDateFormat(pattern.to_string()))?;
    Ok(out)
}

/// `DD-MM-YYYY_Handoff_<manager>`, or `DD-MM-YYYY_Handoff` without a manager.
pub fn handoff_title(
    config: &PageConfig,
    date: NaiveDate,
    manager: Option<&str>,
) -> Result<String, PageError> {
    let prefix = format_date(date, &config.title_date_format)?;
    Ok(match manager.map(str::trim).filter(|m| !m.is_empty()) {
        Some(manager) => format!("{prefix}_Handoff_{manager}"),
        None => format!("{prefix}_Handoff"),
    })
}

/// The document a new handoff page starts from.
pub fn initial_document(config: &PageConfig, date: NaiveDate) -> Result<Document, PageError> {
    let today = format_date(date, &config.body_date_format)?;

    let mut lines = vec![config.heading.clone(), "Shift Details:".to_string()];
    for label in DETAIL_LABELS {
        lines.push(match label {
            "Date:" => format!("{label} {today}"),
            _ => format!("{label} "),
        });
    }
    for section in SECTIONS {
        lines.push(section.to_string());
        lines.push(String::new());
    }

    let mut doc = Document::from_text(&lines.join("\n"));
    doc.set_line_block_tag(1, FormatTag::Heading1)?;
    doc.set_line_block_tag(2, FormatTag::Heading2)?;
    for (offset, label) in DETAIL_LABELS.iter().enumerate() {
        let range = Range::on_line(3 + offset, 0, label.chars().count());
        doc.toggle(FormatTag::Bold, range)?;
    }
    let first_section = 3 + DETAIL_LABELS.len();
    for idx in 0..SECTIONS.len() {
        doc.set_line_block_tag(first_section + idx * 2, FormatTag::Heading2)?;
    }
    Ok(doc)
}

/// Storage markup of a new handoff page.
pub fn initial_body(config: &PageConfig, date: NaiveDate) -> Result<String, PageError> {
    Ok(to_storage(&initial_document(config, date)?)?)
}

/// Pages whose title contains `term`, ignoring case. An empty term keeps all.
pub fn filter_by_title(pages: Vec<PageSummary>, term: &str) -> Vec<PageSummary> {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return pages;
    }
    pages
        .into_iter()
        .filter(|page| page.title.to_lowercase().contains(&term))
        .collect()
}

/// Handoffs dated `date`: the exact title for `manager`, or any
/// `<date>_Handoff_<word>` title when no manager is given.
pub fn handoffs_for(
    config: &PageConfig,
    pages: Vec<PageSummary>,
    date: NaiveDate,
    manager: Option<&str>,
) -> Result<Vec<PageSummary>, PageError> {
    let manager = manager.map(str::trim).filter(|m| !m.is_empty());
    let prefix = format_date(date, &config.title_date_format)?;
    let matches: Box<dyn Fn(&str) -> bool> = match manager {
        Some(manager) => {
            let expected = format!("{prefix}_Handoff_{manager}");
            Box::new(move |title: &str| title == expected)
        }
        None => {
            let pattern = Regex::new(&format!(r"^{}_Handoff_\w", regex::escape(&prefix)))
                .map_err(|_| PageError::InvalidDateFormat(config.title_date_format.clone()))?;
            Box::new(move |title: &str| pattern.is_match(title))
        }
    };
    Ok(pages
        .into_iter()
        .filter(|page| matches(&page.title))
        .collect())
}

/// Browser link for a page.
pub fn page_url(base_url: &str, id: &str) -> String {
    format!(
        "{}/pages/viewpage.action?pageId={id}",
        base_url.trim_end_matches('/')
    )
}
