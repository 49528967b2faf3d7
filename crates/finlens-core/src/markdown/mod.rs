//! # Markdown Normalizer
//!
//! Converts the Markdown subset used by generated market reports into HTML
//! for a report panel: headings (`#`..`#####`), strong/emphasis, ordered and
//! unordered list items, links, inline code, blockquotes and paragraphs.
//!
//! Rendering is a two-stage pipeline: [`parse`] classifies lines into a
//! [`Document`] and parses their inline spans, then the emitter walks the
//! tree. No stage re-reads the output of another, so rule order cannot
//! corrupt already-produced markup.
//!
//! The output format is deliberately simple rather than CommonMark:
//!
//! - every paragraph is one `<p>`, lines inside it are joined with `<br>`
//! - block elements (`<h1>`, `<blockquote>`) sit inside that `<p>`
//! - a paragraph containing list items is wrapped in one `<ul>`, ordered
//!   lists included
//!
//! ```rust
//! use finlens_core::markdown::to_html;
//!
//! assert_eq!(to_html(Some("# Title")), "<p><h1>Title</h1></p>");
//! assert_eq!(to_html(None), "");
//! ```

mod html;
mod inline;
mod lexer;

use serde::{Deserialize, Serialize};
use tracing::debug;

pub use html::escape_into;
pub use inline::{parse_inlines, Inline};
pub use lexer::{classify, parse, BlockKind, Document, Line, ListKind, Paragraph};

/// Emitter switches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Escape `& < > "` in text, code and attribute values.
    pub escape_html: bool,
    /// `target` attribute for links; `None` omits it.
    pub link_target: Option<String>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            escape_html: true,
            link_target: Some(String::from("_blank")),
        }
    }
}

/// Render with default options. `None`, empty and whitespace-only input
/// yield an empty string.
pub fn to_html(text: Option<&str>) -> String {
    to_html_with(text, &RenderOptions::default())
}

pub fn to_html_with(text: Option<&str>, options: &RenderOptions) -> String {
    let Some(text) = text else {
        return String::new();
    };
    if text.trim().is_empty() {
        return String::new();
    }

    let document = parse(text);
    debug!(
        paragraphs = document.paragraphs.len(),
        bytes = text.len(),
        "rendering markdown"
    );
    html::render(&document, options)
}

impl Document {
    pub fn to_html(&self, options: &RenderOptions) -> String {
        html::render(self, options)
    }
}
