use crate::config::ReturnShape;
use crate::transform::Argument;

impl ReturnShape {
    /// Go type of the argument payload
    pub fn signature(&self) -> &'static str {
        match self {
            ReturnShape::Keyed => "map[string]any",
            ReturnShape::Ordered => "[]any",
        }
    }

    /// Payload fragment for one argument
    pub fn entry(&self, argument: &Argument) -> String {
        match self {
            ReturnShape::Keyed => format!("\"{0}\": {0},", argument.name),
            ReturnShape::Ordered => format!("{},", argument.name),
        }
    }

    /// All payload fragments, space-joined in argument order
    pub fn entries(&self, arguments: &[Argument]) -> String {
        arguments
            .iter()
            .map(|a| self.entry(a))
            .collect::<Vec<_>>()
            .join(" ")
    }
}
