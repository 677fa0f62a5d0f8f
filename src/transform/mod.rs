mod arguments;
mod placeholders;

pub use arguments::{extract_arguments, Argument, Extraction, Occurrence};
pub use placeholders::rewrite_placeholders;

use crate::config::PlaceholderMode;
use crate::error::{ErrorKind, ParseError};
use crate::parser::{Span, StatementBlock};
use serde::Serialize;

/// A statement ready for emission
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Statement {
    pub title: String,
    /// Statement text with placeholders in place of annotations
    pub text: String,
    pub arguments: Vec<Argument>,
}

/// Runs argument extraction and placeholder rewriting over blocks
pub struct Transformer {
    mode: PlaceholderMode,
}

impl Transformer {
    pub fn new(mode: PlaceholderMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> PlaceholderMode {
        self.mode
    }

    /// `source` is the whole statement file, used to point errors at the
    /// offending line.
    pub fn transform(&self, block: &StatementBlock, source: &str) -> Result<Statement, ParseError> {
        let extraction = extract_arguments(&block.title, &block.text).map_err(|err| locate(err, block, source))?;
        let text = rewrite_placeholders(&block.title, &block.text, &extraction.occurrences, self.mode);

        Ok(Statement {
            title: block.title.clone(),
            text,
            arguments: extraction.arguments,
        })
    }
}

/// Attach the first source line of `block` containing the offending token.
fn locate(err: ParseError, block: &StatementBlock, source: &str) -> ParseError {
    if err.kind != ErrorKind::MalformedAnnotation || err.span.is_some() {
        return err;
    }

    let lines: Vec<&str> = source.lines().collect();
    let found = block.content_lines.iter().find_map(|&line| {
        let raw = lines.get(line)?;
        let start = raw.find(err.text.as_str())?;
        Some(Span { line, start, end: start + err.text.len() })
    });

    match found {
        Some(span) => err.with_span(span),
        None => err,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{Parser, StatementParser};

    #[test]
    fn test_transform_block() {
        let source = "-- title: GetUsers\nselect * from users\n  where id = @userID:string@;\n";
        let file = StatementParser::new().parse("users", source).unwrap();
        let stmt = Transformer::new(PlaceholderMode::Sequential)
            .transform(&file.blocks[0], source)
            .unwrap();
        assert_eq!(stmt.title, "GetUsers");
        assert_eq!(stmt.text, "select * from users where id = $1;");
        assert_eq!(stmt.arguments.len(), 1);
        assert_eq!(stmt.arguments[0].name, "userID");
        assert_eq!(stmt.arguments[0].ty, "string");
    }

    #[test]
    fn test_malformed_annotation_is_located() {
        let source = "-- title: A\nselect 1;\n\n-- title: B\nselect *\n  from t where x = @x:a:b@;\n";
        let file = StatementParser::new().parse("t", source).unwrap();
        let err = Transformer::new(PlaceholderMode::Named)
            .transform(&file.blocks[1], source)
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::MalformedAnnotation);
        assert_eq!(err.span, Some(Span { line: 5, start: 19, end: 26 }));
    }
}
