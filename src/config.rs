//! Run configuration: placeholder modes, return shapes and the optional
//! `stmtgen.toml` file.

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Package generated modules land in when nothing else is configured.
pub const DEFAULT_PACKAGE: &str = "actionsgen";

/// How annotation tokens are rewritten inside statement text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PlaceholderMode {
    /// `@name`
    #[serde(alias = "@")]
    #[value(alias = "@")]
    Named,
    /// `?`
    #[serde(alias = "?")]
    #[value(alias = "?")]
    Positional,
    /// `$1`, `$2`, ...
    #[serde(alias = "$")]
    #[value(alias = "$")]
    Sequential,
}

impl PlaceholderMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlaceholderMode::Named => "named",
            PlaceholderMode::Positional => "positional",
            PlaceholderMode::Sequential => "sequential",
        }
    }
}

impl fmt::Display for PlaceholderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shape of the argument payload returned next to the statement text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReturnShape {
    /// `map[string]any` keyed by argument name
    #[serde(alias = "map")]
    #[value(alias = "map")]
    Keyed,
    /// `[]any` in argument order
    #[serde(alias = "slice")]
    #[value(alias = "slice")]
    Ordered,
}

impl ReturnShape {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReturnShape::Keyed => "keyed",
            ReturnShape::Ordered => "ordered",
        }
    }
}

impl fmt::Display for ReturnShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every accepted (shape, placeholder) pairing. Anything else is rejected
/// before a single file is read.
const COMPATIBLE: &[(ReturnShape, PlaceholderMode)] = &[
    (ReturnShape::Keyed, PlaceholderMode::Named),
    (ReturnShape::Ordered, PlaceholderMode::Sequential),
    (ReturnShape::Ordered, PlaceholderMode::Positional),
];

pub fn is_compatible(shape: ReturnShape, placeholder: PlaceholderMode) -> bool {
    COMPATIBLE.contains(&(shape, placeholder))
}

/// Fails with [`Error::Incompatible`] for pairings outside the table.
pub fn check_compatible(shape: ReturnShape, placeholder: PlaceholderMode) -> Result<(), Error> {
    if is_compatible(shape, placeholder) {
        Ok(())
    } else {
        Err(Error::Incompatible { placeholder, shape })
    }
}

/// Contents of a `stmtgen.toml` file. Every field is optional; command-line
/// flags win over whatever is set here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub package: Option<String>,
    pub placeholder: Option<PlaceholderMode>,
    pub return_shape: Option<ReturnShape>,
}

impl ConfigFile {
    pub fn parse(text: &str) -> Result<Self, Error> {
        toml::from_str(text).map_err(|e| Error::Config(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self, Error> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text).map_err(|e| match e {
            Error::Config(msg) => Error::Config(format!("{}: {}", path.display(), msg)),
            other => other,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compatibility_table() {
        assert!(is_compatible(ReturnShape::Keyed, PlaceholderMode::Named));
        assert!(is_compatible(ReturnShape::Ordered, PlaceholderMode::Sequential));
        assert!(is_compatible(ReturnShape::Ordered, PlaceholderMode::Positional));

        assert!(!is_compatible(ReturnShape::Keyed, PlaceholderMode::Positional));
        assert!(!is_compatible(ReturnShape::Keyed, PlaceholderMode::Sequential));
        assert!(!is_compatible(ReturnShape::Ordered, PlaceholderMode::Named));
    }

    #[test]
    fn test_check_compatible_error() {
        let err = check_compatible(ReturnShape::Ordered, PlaceholderMode::Named).unwrap_err();
        assert!(matches!(
            err,
            Error::Incompatible { placeholder: PlaceholderMode::Named, shape: ReturnShape::Ordered }
        ));
        assert!(err.to_string().contains("named"));
    }

    #[test]
    fn test_config_file_names_and_symbols() {
        let cfg = ConfigFile::parse(
            "package = \"queries\"\nplaceholder = \"$\"\nreturn_shape = \"slice\"\n",
        )
        .unwrap();
        assert_eq!(cfg.package.as_deref(), Some("queries"));
        assert_eq!(cfg.placeholder, Some(PlaceholderMode::Sequential));
        assert_eq!(cfg.return_shape, Some(ReturnShape::Ordered));

        let cfg = ConfigFile::parse("placeholder = \"named\"\nreturn_shape = \"keyed\"\n").unwrap();
        assert_eq!(cfg.placeholder, Some(PlaceholderMode::Named));
        assert_eq!(cfg.return_shape, Some(ReturnShape::Keyed));
        assert_eq!(cfg.input, None);
    }

    #[test]
    fn test_config_file_rejects_unknown_mode() {
        let err = ConfigFile::parse("placeholder = \"%\"\n").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_config_file_rejects_unknown_key() {
        assert!(ConfigFile::parse("colour = \"blue\"\n").is_err());
    }
}
