//! Line-oriented parser for wiki dump files.
//!
//! A file holds any number of articles:
//!
//! ```text
//! [[Title]]
//! CATEGORIES: Comma, separated, list
//! Free text...
//! ==Section header==
//! More text...
//! ```
//!
//! The parser is an explicit two-state machine fed one line at a time. A
//! document is emitted when the next title line arrives or input ends.

use crate::types::ParsedDocument;

pub const CATEGORIES_PREFIX: &str = "CATEGORIES:";

/// Section headers whose title line is dropped. Only the header line goes;
/// the text beneath it is still body text.
pub const IGNORED_HEADERS: [&str; 4] =
    ["See also", "References", "Further reading", "External links"];

#[derive(Debug, Clone, PartialEq, Eq)]
enum State {
    BeforeFirstTitle,
    InDocument { title: String, categories: String, body_lines: Vec<String> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum LineKind<'a> {
    Title(&'a str),
    Categories(&'a str),
    Header(String),
    Text(&'a str),
}

fn classify(line: &str) -> LineKind<'_> {
    let len = line.chars().count();
    if line.starts_with("[[") && line.ends_with("]]") && len > 4 {
        return LineKind::Title(&line[2..line.len() - 2]);
    }
    if let Some(rest) = line.strip_prefix(CATEGORIES_PREFIX) {
        // one delimiter character separates the prefix from the list
        let mut chars = rest.chars();
        chars.next();
        return LineKind::Categories(chars.as_str());
    }
    // trailing whitespace after the closing `=` still counts as a header
    let trimmed = line.trim_end();
    if trimmed.starts_with('=') && trimmed.ends_with('=') && trimmed.chars().count() > 2 {
        return LineKind::Header(trimmed.replace('=', ""));
    }
    LineKind::Text(line)
}

fn is_ignored_header(header: &str) -> bool {
    IGNORED_HEADERS.iter().any(|ignored| header.contains(ignored))
}

#[derive(Debug)]
pub struct DocumentParser {
    state: State,
}

impl Default for DocumentParser {
    fn default() -> Self {
        Self { state: State::BeforeFirstTitle }
    }
}

impl DocumentParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume one line. Returns the previous document when `line` starts a
    /// new one.
    pub fn feed_line(&mut self, line: &str) -> Option<ParsedDocument> {
        match classify(line) {
            LineKind::Title(title) => {
                let next = State::InDocument {
                    title: title.to_string(),
                    categories: String::new(),
                    body_lines: Vec::new(),
                };
                Self::flush(std::mem::replace(&mut self.state, next))
            }
            LineKind::Categories(value) => {
                if let State::InDocument { categories, .. } = &mut self.state {
                    *categories = value.to_string();
                }
                None
            }
            LineKind::Header(header) => {
                if !is_ignored_header(&header) {
                    self.push_body(header);
                }
                None
            }
            LineKind::Text(text) => {
                self.push_body(text.to_string());
                None
            }
        }
    }

    /// End of input: emit the document in progress, if any.
    pub fn finish(self) -> Option<ParsedDocument> {
        Self::flush(self.state)
    }

    fn push_body(&mut self, line: String) {
        if let State::InDocument { body_lines, .. } = &mut self.state {
            body_lines.push(line);
        }
    }

    fn flush(state: State) -> Option<ParsedDocument> {
        match state {
            State::BeforeFirstTitle => None,
            State::InDocument { title, categories, body_lines } => Some(ParsedDocument {
                title,
                categories: categories.trim().to_string(),
                body: body_lines.join(" ").trim().to_string(),
            }),
        }
    }
}

/// Parse a whole sequence of lines, in order.
pub fn parse_lines<I, S>(lines: I) -> Vec<ParsedDocument>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut parser = DocumentParser::new();
    let mut documents: Vec<ParsedDocument> = lines
        .into_iter()
        .filter_map(|line| parser.feed_line(line.as_ref()))
        .collect();
    documents.extend(parser.finish());
    documents
}
