use serde::Serialize;

/// Suffix appended to a statement file's base name to name its module
pub const GENERATED_FILE_SUFFIX: &str = "_actions_gen.go";

/// One accessor in a generated module
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedFunction {
    /// Exported accessor name, the statement title
    pub name: String,
    /// Name of the constant holding the statement text
    pub constant: String,
    /// Rewritten statement text
    pub statement: String,
    /// `name type` pairs as written in the signature
    pub parameters: Vec<String>,
    /// Payload fragments as written in the body
    pub payload: String,
}

/// Full output for one statement file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedModule {
    /// Base name of the statement file
    pub name: String,
    pub package: String,
    pub imports: Vec<String>,
    pub functions: Vec<GeneratedFunction>,
    /// Complete module source
    pub code: String,
}

impl GeneratedModule {
    /// Suggested output file name
    pub fn file_name(&self) -> String {
        format!("{}{}", self.name, GENERATED_FILE_SUFFIX)
    }
}
