//! Inline span parser: code, links, strong and emphasis.
//!
//! Spans are recognised in a single left-to-right pass, so text produced by
//! one rule is never re-matched by another. Code spans are literal; the text
//! of links, strong and emphasis spans is parsed recursively. Closing
//! delimiters are looked up in per-line tables, so parsing stays linear in
//! the line length even when delimiters never close.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    Text(String),
    Code(String),
    Strong(Vec<Inline>),
    Emphasis(Vec<Inline>),
    Link { text: Vec<Inline>, url: String },
}

pub fn parse_inlines(input: &str) -> Vec<Inline> {
    let parser = InlineParser {
        input,
        index: SpanIndex::new(input),
    };
    parser.parse(0, input.len())
}

const NONE: usize = usize::MAX;

/// For every byte offset, the next position where a span may close.
///
/// Built once per line so each opener finds its closer in constant time.
/// Closer validity only looks at the neighbouring characters, never at the
/// opener, which is what makes a shared table possible.
struct SpanIndex {
    backtick: Vec<usize>,
    close_bracket: Vec<usize>,
    close_paren: Vec<usize>,
    star: Closers,
    underscore: Closers,
}

struct Closers {
    single: Vec<usize>,
    double: Vec<usize>,
}

impl SpanIndex {
    fn new(input: &str) -> Self {
        let bytes = input.as_bytes();
        Self {
            backtick: next_positions(&byte_flags(bytes, b'`')),
            close_bracket: next_positions(&byte_flags(bytes, b']')),
            close_paren: next_positions(&byte_flags(bytes, b')')),
            star: Closers::new(input, '*'),
            underscore: Closers::new(input, '_'),
        }
    }
}

impl Closers {
    /// A closer must follow a non-whitespace character. A single closer is a
    /// lone marker; a double closer is any pair. Underscores must not be
    /// followed by a word character (`snake_case`).
    fn new(input: &str, marker: char) -> Self {
        let mut single = vec![false; input.len()];
        let mut double = vec![false; input.len()];
        let is_underscore = marker == '_';
        let ends_word = |next: Option<char>| !(is_underscore && next.is_some_and(char::is_alphanumeric));

        let mut prev: Option<char> = None;
        for (pos, ch) in input.char_indices() {
            if ch == marker && prev.is_some_and(|prev| !prev.is_whitespace()) {
                let after_one = input[pos + 1..].chars().next();
                if after_one == Some(marker) {
                    let after_two = input[pos + 2..].chars().next();
                    double[pos] = ends_word(after_two);
                } else {
                    single[pos] = prev != Some(marker) && ends_word(after_one);
                }
            }
            prev = Some(ch);
        }

        Self {
            single: next_positions(&single),
            double: next_positions(&double),
        }
    }
}

fn byte_flags(bytes: &[u8], target: u8) -> Vec<bool> {
    bytes.iter().map(|byte| *byte == target).collect()
}

fn next_positions(flags: &[bool]) -> Vec<usize> {
    let mut table = vec![NONE; flags.len() + 1];
    for pos in (0..flags.len()).rev() {
        table[pos] = if flags[pos] { pos } else { table[pos + 1] };
    }
    table
}

/// First entry at or after `from` that lies before `end`.
fn lookup(table: &[usize], from: usize, end: usize) -> Option<usize> {
    table.get(from).copied().filter(|pos| *pos < end)
}

struct InlineParser<'a> {
    input: &'a str,
    index: SpanIndex,
}

impl InlineParser<'_> {
    /// Parse `input[start..end]`. Nested spans are parsed over sub-ranges of
    /// the same line, so every byte is visited by exactly one level.
    fn parse(&self, start: usize, end: usize) -> Vec<Inline> {
        let mut nodes = Vec::new();
        let mut text = String::new();
        let mut pos = start;
        let mut prev: Option<char> = None;

        while pos < end {
            if let Some((node, next)) = self.span_at(pos, end, prev) {
                flush_text(&mut text, &mut nodes);
                nodes.push(node);
                prev = self.input[..next].chars().next_back();
                pos = next;
                continue;
            }

            let Some(ch) = self.input[pos..end].chars().next() else {
                break;
            };
            text.push(ch);
            prev = Some(ch);
            pos += ch.len_utf8();
        }

        flush_text(&mut text, &mut nodes);
        nodes
    }

    fn span_at(&self, pos: usize, end: usize, prev: Option<char>) -> Option<(Inline, usize)> {
        match *self.input.as_bytes().get(pos)? {
            b'`' => self.code_span(pos, end),
            b'[' => self.link(pos, end),
            b'*' => self.delimited(pos, end, b'*', &self.index.star),
            b'_' if prev.is_some_and(char::is_alphanumeric) => None,
            b'_' => self.delimited(pos, end, b'_', &self.index.underscore),
            _ => None,
        }
    }

    fn code_span(&self, open: usize, end: usize) -> Option<(Inline, usize)> {
        let close = lookup(&self.index.backtick, open + 1, end)?;
        if close == open + 1 {
            return None;
        }
        Some((Inline::Code(self.input[open + 1..close].to_owned()), close + 1))
    }

    fn link(&self, open: usize, end: usize) -> Option<(Inline, usize)> {
        let close_text = lookup(&self.index.close_bracket, open + 1, end)?;
        let url_open = close_text + 1;
        if url_open >= end || self.input.as_bytes().get(url_open) != Some(&b'(') {
            return None;
        }
        let close_url = lookup(&self.index.close_paren, url_open + 1, end)?;
        let url = self.input[url_open + 1..close_url].trim();

        if close_text == open + 1 || url.is_empty() {
            return None;
        }

        Some((
            Inline::Link {
                text: self.parse(open + 1, close_text),
                url: url.to_owned(),
            },
            close_url + 1,
        ))
    }

    /// Strong (`**x**`, `__x__`) is tried before emphasis (`*x*`, `_x_`) so a
    /// double delimiter is never split by the single-delimiter rule.
    fn delimited(
        &self,
        open: usize,
        end: usize,
        marker: u8,
        closers: &Closers,
    ) -> Option<(Inline, usize)> {
        if open + 1 < end && self.input.as_bytes().get(open + 1) == Some(&marker) {
            let body = open + 2;
            if self.opens_span(body, end) {
                if let Some(close) = lookup(&closers.double, body + 1, end - 1) {
                    return Some((Inline::Strong(self.parse(body, close)), close + 2));
                }
            }
        }

        let body = open + 1;
        if !self.opens_span(body, end) {
            return None;
        }
        let close = lookup(&closers.single, body + 1, end)?;
        Some((Inline::Emphasis(self.parse(body, close)), close + 1))
    }

    fn opens_span(&self, body: usize, end: usize) -> bool {
        body < end
            && self.input[body..end]
                .chars()
                .next()
                .is_some_and(|ch| !ch.is_whitespace())
    }
}

fn flush_text(text: &mut String, nodes: &mut Vec<Inline>) {
    if !text.is_empty() {
        nodes.push(Inline::Text(std::mem::take(text)));
    }
}
