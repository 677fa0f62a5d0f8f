use crate::config::{PlaceholderMode, ReturnShape};
use crate::parser::Span;
use std::fmt;
use thiserror::Error;

/// Kind of parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    MalformedTitle,
    MalformedImport,
    MalformedAnnotation,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::MalformedTitle => "Malformed title marker",
            ErrorKind::MalformedImport => "Malformed import marker",
            ErrorKind::MalformedAnnotation => "Malformed argument annotation",
        }
    }
}

/// Error raised while reading a statement file
#[derive(Debug, Clone)]
pub struct ParseError {
    pub kind: ErrorKind,
    pub message: String,
    /// Offending line or token, verbatim
    pub text: String,
    /// Where the offending text sits in the source, when known
    pub span: Option<Span>,
    pub help: Option<String>,
}

impl ParseError {
    pub fn new(kind: ErrorKind, message: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            text: text.into(),
            span: None,
            help: None,
        }
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    /// Add help text
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Render the error with source context
    pub fn render(&self, source: &str, filename: &str) -> String {
        self.render_inner(source, filename, false)
    }

    /// Render the error with ANSI color codes
    pub fn render_color(&self, source: &str, filename: &str) -> String {
        self.render_inner(source, filename, true)
    }

    fn render_inner(&self, source: &str, filename: &str, color: bool) -> String {
        let red = if color { "\x1b[1;31m" } else { "" };
        let dim = if color { "\x1b[2m" } else { "" };
        let cyan = if color { "\x1b[1;38;5;73m" } else { "" };
        let reset = if color { "\x1b[0m" } else { "" };

        let mut output = String::new();
        output.push('\n');

        match self.span {
            Some(span) => output.push_str(&format!(
                " {}file:{} {}:{}:{}\n",
                dim,
                reset,
                filename,
                span.line + 1,
                span.start + 1
            )),
            None => output.push_str(&format!(" {}file:{} {}\n", dim, reset, filename)),
        }

        output.push_str(&format!(
            "{}error:{} {}: {}\n",
            red,
            reset,
            self.kind.as_str(),
            self.message
        ));

        if let Some(span) = self.span {
            if let Some(source_line) = source.lines().nth(span.line) {
                let line_num = span.line + 1;
                let width = format!("{}", line_num).len().max(2);
                output.push_str(&format!("{}{:>width$} |{}\n", dim, "", reset, width = width));
                output.push_str(&format!(
                    "{}{:>width$} |{} {}\n",
                    dim,
                    line_num,
                    reset,
                    source_line,
                    width = width
                ));

                let underline_len = span.end.saturating_sub(span.start).max(1);
                output.push_str(&format!(
                    "{}{:>width$} |{} {}{}{}{}\n",
                    dim,
                    "",
                    reset,
                    " ".repeat(span.start),
                    red,
                    "^".repeat(underline_len),
                    reset,
                    width = width
                ));
            }
        }

        if let Some(ref help) = self.help {
            output.push('\n');
            for (i, help_line) in help.lines().enumerate() {
                if i == 0 {
                    output.push_str(&format!(" {}help:{} {}\n", cyan, reset, help_line));
                } else {
                    output.push_str(&format!("       {}\n", help_line));
                }
            }
        }

        output.push('\n');
        output
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.span {
            Some(span) => write!(f, "line {}: {}", span.line + 1, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for ParseError {}

/// Any fatal condition. One of these aborts the whole run.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Incompatible placeholder '{placeholder}' and return shape '{shape}'")]
    Incompatible {
        placeholder: PlaceholderMode,
        shape: ReturnShape,
    },

    #[error("{0}")]
    Parse(Box<ParseError>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Render the error with source context (no color)
    pub fn render(&self, source: &str, filename: &str) -> String {
        match self {
            Error::Parse(err) => err.render(source, filename),
            other => format!("error: {}\n", other),
        }
    }

    /// Render the error with ANSI color codes
    pub fn render_color(&self, source: &str, filename: &str) -> String {
        match self {
            Error::Parse(err) => err.render_color(source, filename),
            other => format!("\x1b[1;31merror\x1b[0m: \x1b[1m{}\x1b[0m\n", other),
        }
    }
}

impl From<ParseError> for Error {
    fn from(err: ParseError) -> Self {
        Error::Parse(Box::new(err))
    }
}
