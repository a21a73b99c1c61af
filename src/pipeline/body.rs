//! Line classification for flattened body text.
//!
//! Both the subtopic extractor and the CV renderer read the same informal,
//! prefix-based grammar. Classifying a line once into a [`DocumentLine`]
//! keeps the prefix rules in one place.

use once_cell::sync::Lazy;
use regex::Regex;

static RE_BOLD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*(.+?)\*\*").unwrap());
static RE_HEADING: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(#{1,3}) (.*)$").unwrap());
static RE_NUMBERED: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+\. (.*)$").unwrap());

/// Micro-format field markers recognised at the start of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKey {
    Media,
    Image,
    Caption,
    Link,
}

impl FieldKey {
    const ALL: [FieldKey; 4] = [
        FieldKey::Media,
        FieldKey::Image,
        FieldKey::Caption,
        FieldKey::Link,
    ];

    pub fn prefix(self) -> &'static str {
        match self {
            FieldKey::Media => "media:",
            FieldKey::Image => "image:",
            FieldKey::Caption => "caption:",
            FieldKey::Link => "link:",
        }
    }
}

/// A run of inline text, bold or not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span<'a> {
    pub text: &'a str,
    pub bold: bool,
}

/// Semantic kind of one body line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind<'a> {
    Blank,
    Heading { level: u8, text: &'a str },
    Bullet(&'a str),
    Numbered(&'a str),
    Field { key: FieldKey, value: &'a str },
    Paragraph(Vec<Span<'a>>),
}

/// One classified line. `raw` is the whitespace-trimmed source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentLine<'a> {
    pub raw: &'a str,
    pub kind: LineKind<'a>,
}

impl DocumentLine<'_> {
    pub fn is_blank(&self) -> bool {
        matches!(self.kind, LineKind::Blank)
    }

    pub fn is_bullet(&self) -> bool {
        matches!(self.kind, LineKind::Bullet(_))
    }
}

/// Classify one line of body text.
///
/// Precedence: blank, bullet (`- `), field marker, heading (`#`–`###` and a
/// space), numbered (`N. `), paragraph.
pub fn classify_line(line: &str) -> DocumentLine<'_> {
    let raw = line.trim();
    let kind = if raw.is_empty() {
        LineKind::Blank
    } else if let Some(rest) = raw.strip_prefix("- ") {
        LineKind::Bullet(rest)
    } else if let Some((key, value)) = field_marker(raw) {
        LineKind::Field { key, value }
    } else if let Some(caps) = RE_HEADING.captures(raw) {
        let level = caps.get(1).map_or(1, |m| m.len()) as u8;
        let text = caps.get(2).map_or("", |m| m.as_str()).trim();
        LineKind::Heading { level, text }
    } else if let Some(caps) = RE_NUMBERED.captures(raw) {
        LineKind::Numbered(caps.get(1).map_or("", |m| m.as_str()))
    } else {
        LineKind::Paragraph(split_bold(raw))
    };
    DocumentLine { raw, kind }
}

/// Classify every line of `body`.
pub fn classify(body: &str) -> Vec<DocumentLine<'_>> {
    body.lines().map(classify_line).collect()
}

fn field_marker(raw: &str) -> Option<(FieldKey, &str)> {
    FieldKey::ALL
        .iter()
        .find_map(|&key| raw.strip_prefix(key.prefix()).map(|v| (key, v.trim())))
}

/// Split `text` on `**bold**` delimiters. Empty plain fragments are dropped.
pub fn split_bold(text: &str) -> Vec<Span<'_>> {
    let mut spans = Vec::new();
    let mut last = 0;
    for caps in RE_BOLD.captures_iter(text) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if whole.start() > last {
            spans.push(Span {
                text: &text[last..whole.start()],
                bold: false,
            });
        }
        spans.push(Span {
            text: inner.as_str(),
            bold: true,
        });
        last = whole.end();
    }
    if last < text.len() {
        spans.push(Span {
            text: &text[last..],
            bold: false,
        });
    }
    spans
}
