use super::lines::{import_text, title_text, LineKind, Span};
use crate::error::ParseError;
use crate::generate::lower_first;
use tracing::warn;

/// One titled statement as it appears in the source, before any rewriting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementBlock {
    pub title: String,
    /// Content lines joined by single spaces
    pub text: String,
    /// Zero-based line of the title marker, `None` for untitled content
    pub title_line: Option<usize>,
    /// Zero-based source lines that contributed to `text`
    pub content_lines: Vec<usize>,
}

#[derive(Debug)]
enum State {
    Idle,
    Accumulating { title: String, line: usize },
}

/// Groups classified lines into statement blocks.
///
/// Blocks are keyed by the constant their title produces, so `GetUsers` and
/// `getUsers` are the same statement. A later block replaces the earlier one
/// in place.
#[derive(Debug)]
pub struct Accumulator {
    state: State,
    content: Vec<String>,
    content_lines: Vec<usize>,
    blocks: Vec<StatementBlock>,
    imports: Vec<String>,
}

impl Accumulator {
    pub fn new() -> Self {
        Self {
            state: State::Idle,
            content: Vec::new(),
            content_lines: Vec::new(),
            blocks: Vec::new(),
            imports: Vec::new(),
        }
    }

    /// Feed one classified line. `raw` is the untrimmed source line, used
    /// only to locate errors.
    pub fn push(&mut self, kind: LineKind<'_>, line_number: usize, raw: &str) -> Result<(), ParseError> {
        match kind {
            LineKind::Blank => {}
            LineKind::Import(line) => {
                let import = import_text(line)
                    .map_err(|e| e.with_span(Span::trimmed(line_number, raw)))?;
                self.imports.push(import);
            }
            LineKind::Title(line) => {
                let title = title_text(line)
                    .map_err(|e| e.with_span(Span::trimmed(line_number, raw)))?;
                // Content seen before the first title stays buffered for it.
                if matches!(self.state, State::Accumulating { .. }) {
                    self.flush();
                }
                self.state = State::Accumulating { title, line: line_number };
            }
            LineKind::Content(text) => {
                self.content.push(text.to_string());
                self.content_lines.push(line_number);
            }
        }
        Ok(())
    }

    /// Close the open block and hand back blocks plus imports.
    pub fn finish(mut self) -> (Vec<StatementBlock>, Vec<String>) {
        if matches!(self.state, State::Accumulating { .. }) || !self.content.is_empty() {
            self.flush();
        }
        (self.blocks, self.imports)
    }

    fn flush(&mut self) {
        let (title, title_line) = match std::mem::replace(&mut self.state, State::Idle) {
            State::Accumulating { title, line } => (title, Some(line)),
            State::Idle => (String::new(), None),
        };

        let block = StatementBlock {
            title,
            text: self.content.join(" "),
            title_line,
            content_lines: std::mem::take(&mut self.content_lines),
        };
        self.content.clear();

        let key = lower_first(&block.title);
        match self.blocks.iter_mut().find(|b| lower_first(&b.title) == key) {
            Some(existing) => {
                warn!(
                    title = %block.title,
                    replaced = %existing.title,
                    "duplicate statement title, keeping the later statement"
                );
                *existing = block;
            }
            None => self.blocks.push(block),
        }
    }
}

impl Default for Accumulator {
    fn default() -> Self {
        Self::new()
    }
}
