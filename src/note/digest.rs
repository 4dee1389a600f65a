//! Quick digests of a note: structural key points and a word-capped summary.

pub const DEFAULT_MAX_POINTS: usize = 10;
pub const DEFAULT_MAX_WORDS: usize = 500;

const KEY_POINT_PREFIXES: [&str; 5] = ["#", "- ", "* ", "1. ", "2. "];

/// Headings, bullets and the first numbered items, in document order.
pub fn extract_key_points(text: &str, max_points: usize) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| KEY_POINT_PREFIXES.iter().any(|p| line.starts_with(p)))
        .take(max_points)
        .collect::<Vec<_>>()
        .join("\n")
}

/// The first `max_words` words followed by `...`, or the text itself when shorter.
pub fn generate_summary(text: &str, max_words: usize) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() > max_words {
        format!("{}...", words[..max_words].join(" "))
    } else {
        text.to_string()
    }
}
