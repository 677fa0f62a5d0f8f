use crate::error::{ErrorKind, ParseError};
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use tracing::warn;

lazy_static! {
    // `@name:type@` - no whitespace and no '@' between the delimiters
    static ref ANNOTATION: Regex = Regex::new(r"@[^\s@]*:[^\s@]*@").unwrap();
}

/// A typed accessor argument. `ty` is copied verbatim into the signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Argument {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    /// Index of the first occurrence among all annotation matches
    #[serde(skip)]
    pub first_occurrence: usize,
}

/// One annotation match, in statement order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occurrence {
    /// Exact matched text, e.g. `@userID:string@`
    pub token: String,
    pub name: String,
    /// Byte offset of the match in the statement text
    pub offset: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    /// Deduplicated by name, first occurrence order
    pub arguments: Vec<Argument>,
    /// Every match, duplicates included
    pub occurrences: Vec<Occurrence>,
}

/// Split `@name:type@` into its two halves.
fn split_annotation(token: &str) -> Option<(&str, &str)> {
    let inner = token.trim_start_matches('@').trim_end_matches('@');
    let parts: Vec<&str> = inner.split(':').collect();
    match parts.as_slice() {
        [name, ty] if !name.is_empty() && !ty.is_empty() => Some((*name, *ty)),
        _ => None,
    }
}

/// Find every annotation in `text`. `statement` names the owning statement
/// in diagnostics.
pub fn extract_arguments(statement: &str, text: &str) -> Result<Extraction, ParseError> {
    let mut extraction = Extraction::default();

    for (position, m) in ANNOTATION.find_iter(text).enumerate() {
        let token = m.as_str();
        let (name, ty) = split_annotation(token).ok_or_else(|| {
            ParseError::new(
                ErrorKind::MalformedAnnotation,
                format!("'{}' in statement '{}' is not of the form @name:type@", token, statement),
                token,
            )
            .with_help("annotate arguments as @userID:string@")
        })?;

        match extraction.arguments.iter().find(|a| a.name == name) {
            Some(existing) if existing.ty != ty => {
                warn!(
                    statement,
                    argument = name,
                    kept = %existing.ty,
                    ignored = ty,
                    "argument declared with different types, keeping the first"
                );
            }
            Some(_) => {}
            None => extraction.arguments.push(Argument {
                name: name.to_string(),
                ty: ty.to_string(),
                first_occurrence: position,
            }),
        }

        extraction.occurrences.push(Occurrence {
            token: token.to_string(),
            name: name.to_string(),
            offset: m.start(),
        });
    }

    Ok(extraction)
}
