//! Line-oriented markdown dialect understood by the PDF renderer.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").unwrap();
}

/// Emphasis and code markers deleted outright.
const DELETED_MARKUP: [&str; 3] = ["**", "*", "`"];

/// Underline and rule runs that separate words; each becomes a space.
const SEPARATING_MARKUP: [&str; 3] = ["___", "__", "---"];

pub const BULLET_GLYPH: char = '•';

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading { level: u8, text: String },
    Bullet(String),
    Paragraph(String),
    Spacer,
}

impl Block {
    pub fn text(&self) -> Option<&str> {
        match self {
            Block::Heading { text, .. } | Block::Bullet(text) | Block::Paragraph(text) => Some(text),
            Block::Spacer => None,
        }
    }
}

/// Remove emphasis and code markers, turn underline and rule runs into
/// spaces, then collapse whitespace runs.
pub fn clean_markdown_text(text: &str) -> String {
    let mut cleaned = text.to_string();
    for marker in DELETED_MARKUP {
        cleaned = cleaned.replace(marker, "");
    }
    for marker in SEPARATING_MARKUP {
        cleaned = cleaned.replace(marker, " ");
    }
    WHITESPACE_RUN.replace_all(&cleaned, " ").trim().to_string()
}

pub fn parse_blocks(markdown: &str) -> Vec<Block> {
    markdown.lines().map(classify_line).collect()
}

/// Classify on the raw line: indented markers are plain text.
fn classify_line(line: &str) -> Block {
    if line.trim().is_empty() {
        return Block::Spacer;
    }

    let (kind, body) = if let Some(rest) = line.strip_prefix("### ") {
        (LineKind::Heading(3), rest)
    } else if let Some(rest) = line.strip_prefix("## ") {
        (LineKind::Heading(2), rest)
    } else if let Some(rest) = line.strip_prefix("# ") {
        (LineKind::Heading(1), rest)
    } else if let Some(rest) = line.strip_prefix("- ").or_else(|| line.strip_prefix("* ")) {
        (LineKind::Bullet, rest)
    } else {
        (LineKind::Paragraph, line)
    };

    let text = clean_markdown_text(body);
    if text.is_empty() {
        return Block::Spacer;
    }

    match kind {
        LineKind::Heading(level) => Block::Heading { level, text },
        LineKind::Bullet => Block::Bullet(format!("{} {}", BULLET_GLYPH, text)),
        LineKind::Paragraph => Block::Paragraph(text),
    }
}

enum LineKind {
    Heading(u8),
    Bullet,
    Paragraph,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_markdown_text() {
        assert_eq!(clean_markdown_text("plain *text*"), "plain text");
        assert_eq!(clean_markdown_text("**bold**  and   `code`"), "bold and code");
        assert_eq!(clean_markdown_text("__under__ ___triple___"), "under triple");
        assert_eq!(clean_markdown_text("   "), "");
    }

    #[test]
    fn test_separating_markup_becomes_space() {
        assert_eq!(clean_markdown_text("my__var"), "my var");
        assert_eq!(clean_markdown_text("my__var and a---b"), "my var and a b");
        assert_eq!(clean_markdown_text("x___y"), "x y");
    }

    #[test]
    fn test_indented_markers_are_paragraphs() {
        assert_eq!(
            parse_blocks("  - nested\n    # comment\n\t* starred"),
            vec![
                Block::Paragraph("- nested".into()),
                Block::Paragraph("# comment".into()),
                Block::Paragraph("starred".into()),
            ]
        );
        assert_eq!(parse_blocks(" \t "), vec![Block::Spacer]);
    }

    #[test]
    fn test_heading_levels() {
        assert_eq!(
            parse_blocks("# One\n## Title\n### Three"),
            vec![
                Block::Heading { level: 1, text: "One".into() },
                Block::Heading { level: 2, text: "Title".into() },
                Block::Heading { level: 3, text: "Three".into() },
            ]
        );
    }

    #[test]
    fn test_bullets_use_glyph() {
        assert_eq!(parse_blocks("- item"), vec![Block::Bullet("• item".into())]);
        assert_eq!(parse_blocks("* item"), vec![Block::Bullet("• item".into())]);
        assert_eq!(
            parse_blocks("- **key** point"),
            vec![Block::Bullet("• key point".into())]
        );
    }

    #[test]
    fn test_paragraph_and_spacer() {
        assert_eq!(
            parse_blocks("plain *text*\n\nnext"),
            vec![
                Block::Paragraph("plain text".into()),
                Block::Spacer,
                Block::Paragraph("next".into()),
            ]
        );
    }

    #[test]
    fn test_rule_becomes_spacer() {
        assert_eq!(parse_blocks("---"), vec![Block::Spacer]);
        assert_eq!(parse_blocks("#"), vec![Block::Paragraph("#".into())]);
    }

    #[test]
    fn test_order_matches_input() {
        let blocks = parse_blocks("# A\n- b\nc\n\n## D");
        assert_eq!(blocks.len(), 5);
        assert!(matches!(blocks[0], Block::Heading { level: 1, .. }));
        assert!(matches!(blocks[1], Block::Bullet(_)));
        assert!(matches!(blocks[2], Block::Paragraph(_)));
        assert_eq!(blocks[3], Block::Spacer);
        assert!(matches!(blocks[4], Block::Heading { level: 2, .. }));
    }

    #[test]
    fn test_angle_brackets_are_plain_text() {
        assert_eq!(
            parse_blocks("Vec<String> <b>"),
            vec![Block::Paragraph("Vec<String> <b>".into())]
        );
    }
}
