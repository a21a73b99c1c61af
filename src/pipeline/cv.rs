//! CV section renderer.
//!
//! Turns the reconstructed body of a CV-only section back into typeset lines.
//! Flattening lost the block structure, so this pass recovers it from the
//! line prefixes:
//!
//! - runs of `- ` lines become one `itemize` environment;
//! - a plain line directly above a list is a header and gets no line break,
//!   so the list hangs tight under it;
//! - any other plain line ends with an explicit `\\`;
//! - `**bold**` spans become `\textbf{…}`.
//!
//! The only state carried between lines is [`ListState`]. Every transition
//! to `Open` emits [`LIST_OPEN`] and every transition back emits
//! [`LIST_CLOSE`], so the environments always balance.

use crate::pipeline::body::{classify, split_bold, DocumentLine, LineKind};
use crate::pipeline::escape::escape_latex;

pub const LIST_OPEN: &str = r"\begin{itemize}[leftmargin=*, itemsep=2pt, parsep=0pt, topsep=2pt]";
pub const LIST_CLOSE: &str = r"\end{itemize}";
/// Spacing inserted when body text directly follows a list.
pub const LIST_GAP: &str = r"\vspace{6pt}";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListState {
    Closed,
    Open,
}

/// Typeset lines of one CV section body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedSection {
    pub lines: Vec<String>,
}

impl RenderedSection {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Render a section body. `emphasis` phrases are bolded inside list items.
pub fn render_section(body: &str, emphasis: &[String]) -> RenderedSection {
    let lines = classify(body);
    let phrases: Vec<String> = emphasis
        .iter()
        .filter(|p| !p.is_empty())
        .map(|p| escape_latex(p))
        .collect();

    let mut out = Vec::new();
    let mut state = ListState::Closed;

    for (i, line) in lines.iter().enumerate() {
        if line.is_blank() {
            if state == ListState::Open {
                out.push(LIST_CLOSE.to_string());
                state = ListState::Closed;
            }
            continue;
        }

        if let Some(item) = bullet_text(line) {
            if state == ListState::Closed {
                out.push(LIST_OPEN.to_string());
                state = ListState::Open;
            }
            out.push(format!("  \\item {}", render_item(item, &phrases)));
            continue;
        }

        if state == ListState::Open {
            out.push(LIST_CLOSE.to_string());
            out.push(LIST_GAP.to_string());
            state = ListState::Closed;
        }

        let text = render_bold(line.raw);
        if next_is_bullet(&lines[i + 1..]) {
            out.push(text);
        } else {
            out.push(format!("{text} \\\\"));
        }
    }

    if state == ListState::Open {
        out.push(LIST_CLOSE.to_string());
    }

    RenderedSection { lines: out }
}

fn bullet_text<'a>(line: &DocumentLine<'a>) -> Option<&'a str> {
    match line.kind {
        LineKind::Bullet(text) => Some(text),
        _ => None,
    }
}

/// Whether the next non-blank line is a list item.
fn next_is_bullet(rest: &[DocumentLine<'_>]) -> bool {
    rest.iter()
        .find(|line| !line.is_blank())
        .is_some_and(DocumentLine::is_bullet)
}

/// Escape a line, turning `**…**` spans into `\textbf{…}`.
pub fn render_bold(text: &str) -> String {
    split_bold(text)
        .into_iter()
        .map(|span| {
            if span.bold {
                format!("\\textbf{{{}}}", escape_latex(span.text))
            } else {
                escape_latex(span.text)
            }
        })
        .collect()
}

fn render_item(text: &str, phrases: &[String]) -> String {
    split_bold(text)
        .into_iter()
        .map(|span| {
            if span.bold {
                format!("\\textbf{{{}}}", escape_latex(span.text))
            } else {
                emphasize(&escape_latex(span.text), phrases)
            }
        })
        .collect()
}

/// Bold every occurrence of an (already escaped) phrase in one left-to-right
/// scan. At any position the longest matching phrase wins.
fn emphasize(escaped: &str, phrases: &[String]) -> String {
    if phrases.is_empty() {
        return escaped.to_string();
    }
    let mut out = String::with_capacity(escaped.len() + 16);
    let mut rest = escaped;
    while let Some(ch) = rest.chars().next() {
        let hit = phrases
            .iter()
            .filter(|p| rest.starts_with(p.as_str()))
            .max_by_key(|p| p.len());
        match hit {
            Some(phrase) => {
                out.push_str("\\textbf{");
                out.push_str(phrase);
                out.push('}');
                rest = &rest[phrase.len()..];
            }
            None => {
                out.push(ch);
                rest = &rest[ch.len_utf8()..];
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_emphasis() -> Vec<String> {
        crate::config::CvProfile::default().emphasis
    }

    fn render(body: &str) -> Vec<String> {
        render_section(body, &default_emphasis()).lines
    }

    #[test]
    fn header_above_list_has_no_terminator() {
        let lines = render("**2021–2024** Postdoc, Caltech\n- Built sensors\n- Ran trials");
        assert_eq!(
            lines,
            vec![
                r"\textbf{2021–2024} Postdoc, Caltech".to_string(),
                LIST_OPEN.to_string(),
                r"  \item Built sensors".to_string(),
                r"  \item Ran trials".to_string(),
                LIST_CLOSE.to_string(),
            ]
        );
    }

    #[test]
    fn lookahead_skips_blank_lines() {
        let lines = render("Header\n\n\n- item");
        assert_eq!(lines[0], "Header");
        assert_eq!(lines[1], LIST_OPEN);
    }

    #[test]
    fn header_followed_by_text_is_terminated() {
        let lines = render("Header\n\nNext paragraph");
        assert_eq!(lines, vec![r"Header \\", r"Next paragraph \\"]);
    }

    #[test]
    fn consecutive_headers_each_terminated_except_last() {
        let lines = render("A\nB\n- x");
        assert_eq!(lines[0], r"A \\");
        assert_eq!(lines[1], "B");
        assert_eq!(lines[2], LIST_OPEN);
    }

    #[test]
    fn text_after_list_closes_with_gap() {
        let lines = render("- a\nText");
        assert_eq!(
            lines,
            vec![
                LIST_OPEN.to_string(),
                r"  \item a".to_string(),
                LIST_CLOSE.to_string(),
                LIST_GAP.to_string(),
                r"Text \\".to_string(),
            ]
        );
    }

    #[test]
    fn blank_line_closes_list_without_gap() {
        let lines = render("- a\n\nText");
        assert_eq!(lines[2], LIST_CLOSE);
        assert_eq!(lines[3], r"Text \\");
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn items_are_escaped_and_emphasised() {
        let lines = render("- Talk at R&D day (Invited)\n- Poster, 50% (Best Poster Award)");
        assert_eq!(lines[1], r"  \item Talk at R\&D day \textbf{(Invited)}");
        assert_eq!(lines[2], r"  \item Poster, 50\% \textbf{(Best Poster Award)}");
    }

    #[test]
    fn bold_phrase_in_item_is_not_wrapped_twice() {
        let lines = render("- Keynote **(Invited)**");
        assert_eq!(lines[1], r"  \item Keynote \textbf{(Invited)}");
    }

    #[test]
    fn custom_emphasis_longest_match_wins() {
        let phrases = vec!["Award".to_string(), "Best Paper Award".to_string()];
        let lines = render_section("- Best Paper Award, Award", &phrases).lines;
        assert_eq!(
            lines[1],
            r"  \item \textbf{Best Paper Award}, \textbf{Award}"
        );
    }

    #[test]
    fn empty_body_renders_nothing() {
        assert!(render_section("", &[]).is_empty());
        assert!(render_section("\n  \n", &[]).is_empty());
    }

    #[test]
    fn lists_always_balance() {
        const ALPHABET: [&str; 4] = ["", "- item", "Header", "**b** text"];

        fn check(lines: &[&str]) {
            let body = lines.join("\n");
            let rendered = render_section(&body, &[]).lines;
            let mut depth = 0i32;
            for line in &rendered {
                if line == LIST_OPEN {
                    depth += 1;
                    assert_eq!(depth, 1, "nested list for {body:?}: {rendered:?}");
                } else if line == LIST_CLOSE {
                    depth -= 1;
                    assert_eq!(depth, 0, "unmatched close for {body:?}: {rendered:?}");
                } else if line.starts_with(r"  \item") {
                    assert_eq!(depth, 1, "item outside list for {body:?}");
                }
            }
            assert_eq!(depth, 0, "unterminated list for {body:?}: {rendered:?}");
        }

        // Every sequence of up to five lines over the alphabet.
        let mut frontier: Vec<Vec<&str>> = vec![vec![]];
        for _ in 0..5 {
            let mut next = Vec::new();
            for seq in &frontier {
                for symbol in ALPHABET {
                    let mut extended = seq.clone();
                    extended.push(symbol);
                    check(&extended);
                    next.push(extended);
                }
            }
            frontier = next;
        }
    }
}
