mod go;
mod output;
mod shape;

pub use go::{go_quote, lower_first, GoGenerator, HEADER};
pub use output::{GeneratedFunction, GeneratedModule, GENERATED_FILE_SUFFIX};

use crate::config::{ReturnShape, DEFAULT_PACKAGE};
use crate::transform::Statement;

/// Generator options
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub package: String,
    pub return_shape: ReturnShape,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            package: DEFAULT_PACKAGE.to_string(),
            return_shape: ReturnShape::Ordered,
        }
    }
}

/// Generator trait - converts one file's statements to a module
pub trait Generator {
    fn generate(
        &self,
        name: &str,
        imports: &[String],
        statements: &[Statement],
        options: &GenerateOptions,
    ) -> GeneratedModule;
}
