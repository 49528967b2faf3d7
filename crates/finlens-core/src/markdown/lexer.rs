//! Block-level line classifier.
//!
//! Splits a document into paragraphs at blank lines and tags every
//! remaining line with its block kind. Inline markup is left untouched here.

use crate::markdown::inline::{parse_inlines, Inline};

const MAX_HEADING_LEVEL: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Ordered,
    Unordered,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    /// `#`..`#####` heading, level 1-5.
    Heading(u8),
    Quote,
    ListItem(ListKind),
    Text,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub kind: BlockKind,
    pub content: Vec<Inline>,
}

impl Line {
    pub fn is_list_item(&self) -> bool {
        matches!(self.kind, BlockKind::ListItem(_))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Paragraph {
    pub lines: Vec<Line>,
}

impl Paragraph {
    pub fn has_list_items(&self) -> bool {
        self.lines.iter().any(Line::is_list_item)
    }
}

/// Parsed document: paragraphs of classified lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub paragraphs: Vec<Paragraph>,
}

impl Document {
    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty()
    }
}

/// Parse a Markdown string into a [`Document`].
///
/// Whitespace-only lines separate paragraphs; leading, trailing and repeated
/// separators produce no empty paragraphs.
pub fn parse(text: &str) -> Document {
    let mut document = Document::default();
    let mut current = Paragraph::default();

    for raw in text.lines() {
        if raw.trim().is_empty() {
            if !current.lines.is_empty() {
                document.paragraphs.push(std::mem::take(&mut current));
            }
            continue;
        }

        let (kind, content) = classify(raw);
        current.lines.push(Line {
            kind,
            content: parse_inlines(content),
        });
    }

    if !current.lines.is_empty() {
        document.paragraphs.push(current);
    }

    document
}

/// Classify one non-blank line and return its content without the marker.
pub fn classify(line: &str) -> (BlockKind, &str) {
    let line = line.trim_end();

    if let Some((level, content)) = heading(line) {
        return (BlockKind::Heading(level), content);
    }

    if let Some(rest) = line.strip_prefix('>') {
        return (BlockKind::Quote, rest.strip_prefix(' ').unwrap_or(rest));
    }

    if let Some((kind, content)) = list_item(line) {
        return (BlockKind::ListItem(kind), content);
    }

    (BlockKind::Text, line)
}

fn heading(line: &str) -> Option<(u8, &str)> {
    let level = line.chars().take_while(|ch| *ch == '#').count();
    if level == 0 || level > MAX_HEADING_LEVEL {
        return None;
    }

    let rest = &line[level..];
    let content = rest.strip_prefix(' ')?;
    Some((level as u8, content.trim()))
}

fn list_item(line: &str) -> Option<(ListKind, &str)> {
    let trimmed = line.trim_start();

    match trimmed.chars().next()? {
        '-' | '*' => {
            let rest = &trimmed[1..];
            if rest.starts_with(char::is_whitespace) {
                return Some((ListKind::Unordered, rest.trim_start()));
            }
            None
        }
        ch if ch.is_ascii_digit() => {
            let digits = trimmed.chars().take_while(char::is_ascii_digit).count();
            let rest = trimmed[digits..].strip_prefix('.')?;
            if rest.starts_with(char::is_whitespace) {
                return Some((ListKind::Ordered, rest.trim_start()));
            }
            None
        }
        _ => None,
    }
}
