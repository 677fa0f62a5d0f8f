mod accumulator;
pub mod lines;

pub use accumulator::{Accumulator, StatementBlock};
pub use lines::{classify_line, LineKind, Span};

use crate::error::ParseError;

/// Everything read from one statement file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementFile {
    /// File name without the `.sql` extension
    pub name: String,
    pub blocks: Vec<StatementBlock>,
    pub imports: Vec<String>,
}

/// Parser trait - converts a statement file to its blocks
pub trait Parser {
    fn parse(&self, name: &str, source: &str) -> Result<StatementFile, ParseError>;
}

/// Line-based parser for annotated `.sql` files
pub struct StatementParser {
    // Configuration only, no state
}

impl StatementParser {
    pub fn new() -> Self {
        Self {}
    }
}

impl Default for StatementParser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser for StatementParser {
    fn parse(&self, name: &str, source: &str) -> Result<StatementFile, ParseError> {
        let mut acc = Accumulator::new();
        for (line_number, raw) in source.lines().enumerate() {
            acc.push(classify_line(raw), line_number, raw)?;
        }
        let (blocks, imports) = acc.finish();

        Ok(StatementFile {
            name: name.to_string(),
            blocks,
            imports,
        })
    }
}
