use super::output::{GeneratedFunction, GeneratedModule};
use super::{GenerateOptions, Generator};
use crate::transform::Statement;
use tracing::warn;

pub const HEADER: &str = "// Code generated by stmtgen. DO NOT EDIT.";

/// Emits Go source: one string constant and one accessor per statement.
pub struct GoGenerator;

impl GoGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl Default for GoGenerator {
    fn default() -> Self {
        Self::new()
    }
}

struct Codegen {
    output: Vec<String>,
}

impl Codegen {
    fn new() -> Self {
        Self { output: Vec::new() }
    }

    fn emit(&mut self, code: impl Into<String>) {
        self.output.push(code.into());
    }

    fn emit_empty(&mut self) {
        self.output.push(String::new());
    }

    fn into_code(self) -> String {
        let mut code = self.output.join("\n");
        if !code.is_empty() && !code.ends_with('\n') {
            code.push('\n');
        }
        code
    }
}

/// `GetUsers` -> `getUsers`
pub fn lower_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Double-quoted Go string literal
pub fn go_quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 || c == '\u{7f}' => out.push_str(&format!("\\x{:02x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

fn build_function(statement: &Statement, options: &GenerateOptions) -> GeneratedFunction {
    let name = statement.title.clone();
    let constant = lower_first(&name);

    if name.is_empty() {
        warn!("statement without a title, its accessor has an empty name");
    } else if constant == name {
        warn!(
            title = %name,
            "title starts with a lower-case letter, constant and accessor share a name"
        );
    }

    GeneratedFunction {
        constant,
        statement: statement.text.clone(),
        parameters: statement
            .arguments
            .iter()
            .map(|a| format!("{} {}", a.name, a.ty))
            .collect(),
        payload: options.return_shape.entries(&statement.arguments),
        name,
    }
}

impl Generator for GoGenerator {
    fn generate(
        &self,
        name: &str,
        imports: &[String],
        statements: &[Statement],
        options: &GenerateOptions,
    ) -> GeneratedModule {
        let functions: Vec<GeneratedFunction> =
            statements.iter().map(|s| build_function(s, options)).collect();
        let signature = options.return_shape.signature();

        let mut out = Codegen::new();
        out.emit(HEADER);
        out.emit(format!("package {}", options.package));

        if !imports.is_empty() {
            out.emit_empty();
            out.emit("import (");
            for import in imports {
                out.emit(format!("\t{}", import));
            }
            out.emit(")");
        }

        if !functions.is_empty() {
            out.emit_empty();
            for f in &functions {
                out.emit(format!("const {} = {}", f.constant, go_quote(&f.statement)));
            }
        }

        for f in &functions {
            out.emit_empty();
            if f.parameters.is_empty() {
                out.emit(format!("func {}() (string, {}) {{", f.name, signature));
                out.emit(format!("\treturn {}, nil", f.constant));
            } else {
                out.emit(format!("func {}(", f.name));
                out.emit(format!("\t{},", f.parameters.join(", ")));
                out.emit(format!(") (string, {}) {{", signature));
                out.emit(format!("\treturn {}, {}{{", f.constant, signature));
                out.emit(format!("\t\t{}", f.payload));
                out.emit("\t}");
            }
            out.emit("}");
        }

        GeneratedModule {
            name: name.to_string(),
            package: options.package.clone(),
            imports: imports.to_vec(),
            functions,
            code: out.into_code(),
        }
    }
}
