//! HTML emission for a parsed [`Document`].

use crate::markdown::inline::Inline;
use crate::markdown::lexer::{BlockKind, Document, Line, Paragraph};
use crate::markdown::RenderOptions;

pub fn render(document: &Document, options: &RenderOptions) -> String {
    let mut out = String::new();
    for paragraph in &document.paragraphs {
        render_paragraph(&mut out, paragraph, options);
    }
    out
}

/// Each paragraph is one `<p>`; a paragraph holding list items is wrapped in
/// a single `<ul>` regardless of list kind.
fn render_paragraph(out: &mut String, paragraph: &Paragraph, options: &RenderOptions) {
    let has_list = paragraph.has_list_items();

    out.push_str("<p>");
    if has_list {
        out.push_str("<ul>");
    }

    let mut previous: Option<&Line> = None;
    for line in &paragraph.lines {
        if let Some(previous) = previous {
            if !(previous.is_list_item() && line.is_list_item()) {
                out.push_str("<br>");
            }
        }
        render_line(out, line, options);
        previous = Some(line);
    }

    if has_list {
        out.push_str("</ul>");
    }
    out.push_str("</p>");
}

fn render_line(out: &mut String, line: &Line, options: &RenderOptions) {
    let (open, close) = match line.kind {
        BlockKind::Heading(level) => (format!("<h{level}>"), format!("</h{level}>")),
        BlockKind::Quote => (String::from("<blockquote>"), String::from("</blockquote>")),
        BlockKind::ListItem(_) => (String::from("<li>"), String::from("</li>")),
        BlockKind::Text => (String::new(), String::new()),
    };

    out.push_str(&open);
    render_inlines(out, &line.content, options);
    out.push_str(&close);
}

fn render_inlines(out: &mut String, nodes: &[Inline], options: &RenderOptions) {
    for node in nodes {
        match node {
            Inline::Text(text) => push_text(out, text, options),
            Inline::Code(code) => {
                out.push_str("<code>");
                push_text(out, code, options);
                out.push_str("</code>");
            }
            Inline::Strong(children) => {
                out.push_str("<strong>");
                render_inlines(out, children, options);
                out.push_str("</strong>");
            }
            Inline::Emphasis(children) => {
                out.push_str("<em>");
                render_inlines(out, children, options);
                out.push_str("</em>");
            }
            Inline::Link { text, url } if options.escape_html && is_script_url(url) => {
                render_inlines(out, text, options);
            }
            Inline::Link { text, url } => {
                out.push_str("<a href=\"");
                push_text(out, url, options);
                out.push('"');
                if let Some(target) = &options.link_target {
                    out.push_str(" target=\"");
                    push_text(out, target, options);
                    out.push('"');
                }
                out.push('>');
                render_inlines(out, text, options);
                out.push_str("</a>");
            }
        }
    }
}

const SCRIPT_SCHEMES: [&str; 3] = ["javascript:", "vbscript:", "data:"];

/// Browsers drop ASCII whitespace and control characters inside a scheme,
/// so `java\tscript:` is compared with them removed.
fn is_script_url(url: &str) -> bool {
    let scheme: String = url
        .chars()
        .filter(|ch| !ch.is_ascii_whitespace() && !ch.is_ascii_control())
        .take(16)
        .map(|ch| ch.to_ascii_lowercase())
        .collect();
    SCRIPT_SCHEMES
        .iter()
        .any(|prefix| scheme.starts_with(prefix))
}

fn push_text(out: &mut String, text: &str, options: &RenderOptions) {
    if options.escape_html {
        escape_into(out, text);
    } else {
        out.push_str(text);
    }
}

pub fn escape_into(out: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            other => out.push(other),
        }
    }
}
