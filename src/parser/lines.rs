use crate::error::{ErrorKind, ParseError};
use lazy_static::lazy_static;
use regex::Regex;

pub const TITLE_MARKER: &str = "title:";
pub const IMPORT_MARKER: &str = "addimport:";

lazy_static! {
    static ref TITLE_LINE: Regex = Regex::new(r"^--\s*title:.*").unwrap();
    static ref IMPORT_LINE: Regex = Regex::new(r"^--\s*addimport:.*").unwrap();
}

/// Location of a piece of source text. `line` is zero-based, `start`/`end`
/// are byte columns within that line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub line: usize,
    pub start: usize,
    pub end: usize,
}

impl Span {
    /// Span covering the non-blank part of a raw source line
    pub fn trimmed(line: usize, raw: &str) -> Self {
        let start = raw.len() - raw.trim_start().len();
        let end = raw.trim_end().len().max(start);
        Self { line, start, end }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// Empty/whitespace only
    Blank,
    /// `-- title: Name`, carried whole
    Title(&'a str),
    /// `-- addimport: "pkg"`, carried whole
    Import(&'a str),
    /// Statement text
    Content(&'a str),
}

/// Classify one line. The line is trimmed first; marker tokens are matched
/// case-sensitively and only at the start of the line.
pub fn classify_line(text: &str) -> LineKind<'_> {
    let trimmed = text.trim();

    if trimmed.is_empty() {
        return LineKind::Blank;
    }

    if IMPORT_LINE.is_match(trimmed) {
        return LineKind::Import(trimmed);
    }

    if TITLE_LINE.is_match(trimmed) {
        return LineKind::Title(trimmed);
    }

    LineKind::Content(trimmed)
}

/// Split a marker line around its marker token. Exactly two parts are
/// required; the trimmed right-hand side is the value.
fn split_marker<'a>(line: &'a str, marker: &str) -> Option<&'a str> {
    let parts: Vec<&str> = line.split(marker).collect();
    if parts.len() != 2 {
        return None;
    }
    Some(parts[1].trim())
}

pub fn title_text(line: &str) -> Result<String, ParseError> {
    split_marker(line, TITLE_MARKER).map(str::to_string).ok_or_else(|| {
        ParseError::new(
            ErrorKind::MalformedTitle,
            format!("'{}' must appear exactly once on a title line", TITLE_MARKER),
            line,
        )
        .with_help("write the title as: -- title: GetUsers")
    })
}

pub fn import_text(line: &str) -> Result<String, ParseError> {
    split_marker(line, IMPORT_MARKER).map(str::to_string).ok_or_else(|| {
        ParseError::new(
            ErrorKind::MalformedImport,
            format!("'{}' must appear exactly once on an import line", IMPORT_MARKER),
            line,
        )
        .with_help("write the import as: -- addimport: \"time\"")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank() {
        assert_eq!(classify_line(""), LineKind::Blank);
        assert_eq!(classify_line("   \t "), LineKind::Blank);
    }

    #[test]
    fn test_title() {
        assert_eq!(classify_line("-- title: GetUsers"), LineKind::Title("-- title: GetUsers"));
        assert_eq!(classify_line("  --title:GetUsers  "), LineKind::Title("--title:GetUsers"));
    }

    #[test]
    fn test_import() {
        assert_eq!(
            classify_line("-- addimport: \"time\""),
            LineKind::Import("-- addimport: \"time\"")
        );
    }

    #[test]
    fn test_marker_is_case_sensitive() {
        assert_eq!(classify_line("-- Title: GetUsers"), LineKind::Content("-- Title: GetUsers"));
    }

    #[test]
    fn test_marker_must_start_the_line() {
        assert_eq!(
            classify_line("select 1; -- title: Nope"),
            LineKind::Content("select 1; -- title: Nope")
        );
    }

    #[test]
    fn test_plain_comment_is_content() {
        assert_eq!(classify_line("-- just a note"), LineKind::Content("-- just a note"));
    }

    #[test]
    fn test_title_text() {
        assert_eq!(title_text("-- title:  GetUsers ").unwrap(), "GetUsers");
        assert_eq!(title_text("-- title:").unwrap(), "");
    }

    #[test]
    fn test_title_text_repeated_marker() {
        let err = title_text("-- title: A title: B").unwrap_err();
        assert_eq!(err.kind, ErrorKind::MalformedTitle);
        assert_eq!(err.text, "-- title: A title: B");
    }

    #[test]
    fn test_import_text() {
        assert_eq!(import_text("-- addimport: \"time\"").unwrap(), "\"time\"");
        let err = import_text("-- addimport: a addimport: b").unwrap_err();
        assert_eq!(err.kind, ErrorKind::MalformedImport);
    }

    #[test]
    fn test_span_trimmed() {
        assert_eq!(Span::trimmed(3, "  -- title: X  "), Span { line: 3, start: 2, end: 13 });
    }
}
