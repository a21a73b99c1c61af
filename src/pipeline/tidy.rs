//! Deterministic text hygiene.
//!
//! Text pasted into the workspace from word processors and web pages carries
//! Windows line endings, zero-width characters and trailing blanks. None of
//! them change meaning, but all of them can defeat prefix matching (`"- "`,
//! `"### "`) or leak into the typeset output. Each rule is a pure
//! `&str → String` pass.

/// Clean flattened body text before it is parsed.
///
/// 1. Normalise line endings (CRLF / CR → LF)
/// 2. Strip invisible Unicode (zero-width spaces, BOM, soft hyphens, …)
/// 3. Replace non-breaking spaces with plain spaces
/// 4. Trim trailing whitespace per line
pub fn tidy_body(input: &str) -> String {
    let s = normalise_line_endings(input);
    let s = remove_invisible_chars(&s);
    let s = s.replace('\u{00A0}', " ");
    trim_trailing_whitespace(&s)
}

/// Ensure the document ends with exactly one newline.
pub fn finish_document(input: &str) -> String {
    let trimmed = input.trim_end();
    if trimmed.is_empty() {
        String::from("\n")
    } else {
        format!("{}\n", trimmed)
    }
}

/// `str::lines` does not split on a lone `\r`, so pasted text using it would
/// collapse several body lines into one and hide their `"### "` markers.
fn normalise_line_endings(input: &str) -> String {
    input.replace("\r\n", "\n").replace('\r', "\n")
}

/// Characters that render as nothing in Notion but would otherwise reach the
/// `.tex` output or sit in front of a `- ` / `media:` marker.
const INVISIBLE: [char; 6] = [
    '\u{200B}', // zero-width space
    '\u{FEFF}', // byte-order mark
    '\u{00AD}', // soft hyphen
    '\u{200C}', // zero-width non-joiner
    '\u{200D}', // zero-width joiner
    '\u{2060}', // word joiner
];

fn remove_invisible_chars(input: &str) -> String {
    input.chars().filter(|c| !INVISIBLE.contains(c)).collect()
}

fn trim_trailing_whitespace(input: &str) -> String {
    input
        .split('\n')
        .map(|line| line.trim_end())
        .collect::<Vec<_>>()
        .join("\n")
}
