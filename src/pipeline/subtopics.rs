//! Project body micro-format.
//!
//! ```text
//! Intro paragraph(s)
//! media: Featured in Nature News, The Straits Times
//! ### Sweat sensing patch
//! image: patch.png
//! caption: Nature Electronics 2025, 8, 100-112
//! link: https://doi.org/...
//! ### Next subtopic
//! ...
//! ```
//!
//! Single pass over classified lines with one open-subtopic slot. Lines that
//! match no marker are ignored by the state machine and contribute only to
//! the intro.

use crate::output::Subtopic;
use crate::pipeline::body::{classify, DocumentLine, FieldKey, LineKind};

/// Structured view of a project body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectBody {
    /// Non-blank lines before the first `media:` or `### ` line, space-joined.
    pub intro: String,
    /// Value of the last `media:` line.
    pub media_highlights: String,
    pub subtopics: Vec<Subtopic>,
}

enum State {
    Idle,
    Open(Subtopic),
}

impl State {
    /// Close the open subtopic, if any, into `out`.
    fn close(self, out: &mut Vec<Subtopic>) {
        if let State::Open(subtopic) = self {
            out.push(subtopic);
        }
    }
}

fn is_subtopic_title(line: &DocumentLine<'_>) -> bool {
    matches!(line.kind, LineKind::Heading { level: 3, .. })
}

fn is_media(line: &DocumentLine<'_>) -> bool {
    matches!(
        line.kind,
        LineKind::Field {
            key: FieldKey::Media,
            ..
        }
    )
}

/// Parse a project body into intro, media highlights and subtopics.
pub fn extract_subtopics(body: &str) -> ProjectBody {
    let lines = classify(body);

    let intro = lines
        .iter()
        .take_while(|line| !is_media(line) && !is_subtopic_title(line))
        .filter(|line| !line.is_blank())
        .map(|line| line.raw)
        .collect::<Vec<_>>()
        .join(" ");

    let mut media_highlights = String::new();
    let mut subtopics = Vec::new();
    let mut state = State::Idle;

    for line in &lines {
        match line.kind {
            LineKind::Field {
                key: FieldKey::Media,
                value,
            } => media_highlights = value.to_string(),
            LineKind::Heading { level: 3, text } => {
                let previous = std::mem::replace(&mut state, State::Open(Subtopic::titled(text)));
                previous.close(&mut subtopics);
            }
            LineKind::Field { key, value } => {
                // Markers outside a subtopic are dropped.
                let State::Open(current) = &mut state else {
                    continue;
                };
                let slot = match key {
                    FieldKey::Image => &mut current.image,
                    FieldKey::Caption => &mut current.caption,
                    FieldKey::Link => &mut current.link,
                    FieldKey::Media => continue,
                };
                *slot = value.to_string();
            }
            _ => {}
        }
    }
    state.close(&mut subtopics);

    ProjectBody {
        intro,
        media_highlights,
        subtopics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documented_example() {
        let body = "Intro line.\nmedia: press clip\n### Topic A\nimage: a.png\ncaption: c1\nlink: http://x\n### Topic B\nimage: b.png";
        let parsed = extract_subtopics(body);
        assert_eq!(parsed.intro, "Intro line.");
        assert_eq!(parsed.media_highlights, "press clip");
        assert_eq!(parsed.subtopics.len(), 2);
        assert_eq!(
            parsed.subtopics[0],
            Subtopic {
                title: "Topic A".into(),
                image: "a.png".into(),
                caption: "c1".into(),
                link: "http://x".into(),
            }
        );
        assert_eq!(parsed.subtopics[1].title, "Topic B");
        assert_eq!(parsed.subtopics[1].image, "b.png");
        assert_eq!(parsed.subtopics[1].caption, "");
        assert_eq!(parsed.subtopics[1].link, "");
    }

    #[test]
    fn fields_before_any_title_are_ignored() {
        let parsed = extract_subtopics("image: stray.png\ncaption: nobody\n### Only\nlink: l");
        assert_eq!(parsed.subtopics.len(), 1);
        assert_eq!(parsed.subtopics[0].image, "");
        assert_eq!(parsed.subtopics[0].link, "l");
    }

    #[test]
    fn last_media_line_wins() {
        let parsed = extract_subtopics("media: first\nmedia: second");
        assert_eq!(parsed.media_highlights, "second");
        assert!(parsed.subtopics.is_empty());
    }

    #[test]
    fn intro_joins_lines_and_skips_blanks() {
        let parsed = extract_subtopics("  First part.\n\nSecond **bold** part.\n### T\nafter");
        assert_eq!(parsed.intro, "First part. Second **bold** part.");
    }

    #[test]
    fn lower_level_headings_do_not_open_subtopics() {
        let parsed = extract_subtopics("## Overview\n# Top\nimage: x.png");
        assert!(parsed.subtopics.is_empty());
        assert_eq!(parsed.intro, "## Overview # Top image: x.png");
    }

    #[test]
    fn empty_body_yields_defaults() {
        assert_eq!(extract_subtopics(""), ProjectBody::default());
        assert_eq!(extract_subtopics("\n\n"), ProjectBody::default());
    }
}
