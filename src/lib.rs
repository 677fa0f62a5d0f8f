pub mod config;
pub mod error;
pub mod generate;
pub mod parser;
pub mod transform;

pub use config::{check_compatible, is_compatible, ConfigFile, PlaceholderMode, ReturnShape, DEFAULT_PACKAGE};
pub use error::{Error, ErrorKind, ParseError};
pub use generate::{GenerateOptions, GeneratedFunction, GeneratedModule, Generator, GoGenerator, GENERATED_FILE_SUFFIX};
pub use parser::{Parser, StatementBlock, StatementFile, StatementParser};
pub use transform::{Argument, Statement, Transformer};

use tracing::debug;

/// Extension identifying statement files
pub const SOURCE_SUFFIX: &str = ".sql";

/// Configuration for generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Package declared by every generated module (default: "actionsgen")
    pub package: String,
    pub placeholder: PlaceholderMode,
    pub return_shape: ReturnShape,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            package: DEFAULT_PACKAGE.to_string(),
            placeholder: PlaceholderMode::Sequential,
            return_shape: ReturnShape::Ordered,
        }
    }
}

/// Parse, rewrite and emit statement files with one validated configuration.
///
/// Construction fails for an incompatible placeholder/return-shape pairing,
/// so a misconfiguration surfaces before any file is read.
pub struct Pipeline {
    parser: StatementParser,
    transformer: Transformer,
    generator: GoGenerator,
    options: GenerateOptions,
}

impl Pipeline {
    pub fn new(options: Options) -> Result<Self, Error> {
        check_compatible(options.return_shape, options.placeholder)?;
        if options.package.trim().is_empty() {
            return Err(Error::Config("package name must not be empty".to_string()));
        }

        Ok(Self {
            parser: StatementParser::new(),
            transformer: Transformer::new(options.placeholder),
            generator: GoGenerator::new(),
            options: GenerateOptions {
                package: options.package,
                return_shape: options.return_shape,
            },
        })
    }

    pub fn placeholder(&self) -> PlaceholderMode {
        self.transformer.mode()
    }

    pub fn return_shape(&self) -> ReturnShape {
        self.options.return_shape
    }

    pub fn package(&self) -> &str {
        &self.options.package
    }

    /// Compile one statement file. `name` is its base name.
    pub fn compile(&self, name: &str, source: &str) -> Result<GeneratedModule, Error> {
        let file = self.parser.parse(name, source)?;
        debug!(file = name, statements = file.blocks.len(), imports = file.imports.len(), "parsed");

        let statements = file
            .blocks
            .iter()
            .map(|block| self.transformer.transform(block, source))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(self
            .generator
            .generate(&file.name, &file.imports, &statements, &self.options))
    }
}

/// Base name of a statement file, `None` if it is not one.
pub fn statement_file_stem(file_name: &str) -> Option<&str> {
    file_name.strip_suffix(SOURCE_SUFFIX)
}

/// Compile with default options
pub fn generate(name: &str, source: &str) -> Result<GeneratedModule, Error> {
    generate_with(name, source, Options::default())
}

pub fn generate_with(name: &str, source: &str, options: Options) -> Result<GeneratedModule, Error> {
    Pipeline::new(options)?.compile(name, source)
}
