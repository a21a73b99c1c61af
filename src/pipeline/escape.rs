//! LaTeX escaping for user-supplied text.
//!
//! Applied to every fragment of record text before it is embedded in the
//! document, never to markup the renderer emits itself. The replacement is a
//! single left-to-right pass over characters, so an inserted escape sequence
//! is never scanned again and nothing is double-escaped.

/// Reserved characters and their replacements.
const REPLACEMENTS: &[(char, &str)] = &[
    ('&', r"\&"),
    ('%', r"\%"),
    ('#', r"\#"),
    ('_', r"\_"),
    ('~', r"\textasciitilde{}"),
    ('α', r"$\alpha$"),
    ('β', r"$\beta$"),
    ('γ', r"$\gamma$"),
    ('δ', r"$\delta$"),
    ('μ', r"$\mu$"),
];

fn replacement(ch: char) -> Option<&'static str> {
    REPLACEMENTS
        .iter()
        .find(|(reserved, _)| *reserved == ch)
        .map(|(_, escaped)| *escaped)
}

/// Escape the reserved characters of `text`.
pub fn escape_latex(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 8);
    for ch in text.chars() {
        match replacement(ch) {
            Some(escaped) => out.push_str(escaped),
            None => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserved_characters_are_escaped() {
        assert_eq!(escape_latex("R&D 100% #1 a_b"), r"R\&D 100\% \#1 a\_b");
        assert_eq!(escape_latex("~5 μm"), r"\textasciitilde{}5 $\mu$m");
        assert_eq!(escape_latex("α-β"), r"$\alpha$-$\beta$");
    }

    #[test]
    fn plain_ascii_round_trips() {
        let text = "Wearable sweat sensors (2024), Vol. 3: pp. 10-20!";
        assert_eq!(escape_latex(text), text);
    }

    #[test]
    fn escaped_output_is_stable() {
        for text in [r"\textbf{x}", r"$\alpha$ and \textasciitilde{}", "plain"] {
            assert_eq!(escape_latex(text), text);
            assert_eq!(escape_latex(&escape_latex(text)), escape_latex(text));
        }
    }

    #[test]
    fn replacement_is_single_pass() {
        // The backslash inserted for '&' must not be touched again.
        assert_eq!(escape_latex("&&"), r"\&\&");
        assert_eq!(escape_latex(""), "");
    }
}
