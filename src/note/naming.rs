//! Filename schemes for generated notes.
//!
//! Names embed a `YYYYMMDD_HHMMSS` timestamp so that descending lexicographic
//! order lists the newest notes first.

use chrono::NaiveDateTime;

const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
const TIMESTAMP_LEN: usize = 15;

/// Longest file name most filesystems accept, in bytes.
pub const MAX_FILENAME_BYTES: usize = 255;
const MAX_SUBJECT_BYTES: usize = 64;

pub fn timestamp(now: NaiveDateTime) -> String {
    now.format(TIMESTAMP_FORMAT).to_string()
}

/// `{subject}_{topic}_{timestamp}.md`, with spaces in the topic turned into underscores.
pub fn topic_note_filename(subject: &str, topic: &str, now: NaiveDateTime) -> String {
    let subject = flat_component(subject, "Notes");
    let subject = truncate_bytes(&subject, MAX_SUBJECT_BYTES);
    let topic = flat_component(&topic.trim().replace(' ', "_"), "Topic");
    let topic_budget = MAX_FILENAME_BYTES - subject.len() - "__.md".len() - TIMESTAMP_LEN;
    format!(
        "{}_{}_{}.md",
        subject,
        truncate_bytes(&topic, topic_budget),
        timestamp(now)
    )
}

/// `PDF_Notes_{upload name without .pdf}_{timestamp}.md`.
pub fn pdf_note_filename(upload_name: &str, now: NaiveDateTime) -> String {
    let base = upload_name.trim();
    let base = strip_suffix_ignore_case(base, ".pdf").unwrap_or(base);
    let base = flat_component(base, "document");
    let base_budget = MAX_FILENAME_BYTES - "PDF_Notes__.md".len() - TIMESTAMP_LEN;
    format!(
        "PDF_Notes_{}_{}.md",
        truncate_bytes(&base, base_budget),
        timestamp(now)
    )
}

/// `note_{timestamp}.md`, used when a note is saved without a name.
pub fn default_note_filename(now: NaiveDateTime) -> String {
    format!("note_{}.md", timestamp(now))
}

/// `x.md` → `x.pdf`; other names get `.pdf` appended.
pub fn pdf_filename_for(note_filename: &str) -> String {
    match note_filename.strip_suffix(".md") {
        Some(stem) => format!("{}.pdf", stem),
        None => format!("{}.pdf", note_filename),
    }
}

fn flat_component(value: &str, fallback: &str) -> String {
    let cleaned = sanitize_filename::sanitize(value.trim());
    if cleaned.is_empty() {
        fallback.to_string()
    } else {
        cleaned
    }
}

/// Longest prefix of `value` within `max` bytes, cut on a char boundary.
fn truncate_bytes(value: &str, max: usize) -> &str {
    if value.len() <= max {
        return value;
    }
    let mut end = max;
    while !value.is_char_boundary(end) {
        end -= 1;
    }
    &value[..end]
}

fn strip_suffix_ignore_case<'a>(value: &'a str, suffix: &str) -> Option<&'a str> {
    let split = value.len().checked_sub(suffix.len())?;
    if value.is_char_boundary(split) && value[split..].eq_ignore_ascii_case(suffix) {
        Some(&value[..split])
    } else {
        None
    }
}
