use super::arguments::Occurrence;
use crate::config::PlaceholderMode;
use tracing::warn;

/// Placeholder text for one occurrence. `index` is the 1-based count of
/// replacements made so far in the statement.
fn placeholder(mode: PlaceholderMode, name: &str, index: usize) -> String {
    match mode {
        PlaceholderMode::Named => format!("@{}", name),
        PlaceholderMode::Sequential => format!("${}", index),
        PlaceholderMode::Positional => "?".to_string(),
    }
}

/// Replace every annotation occurrence in `text`, in match order.
///
/// Each occurrence replaces the first remaining copy of its exact token, so
/// identical tokens are rewritten one at a time. The sequential counter is
/// per statement and advances on every replacement, repeated names included.
pub fn rewrite_placeholders(
    statement: &str,
    text: &str,
    occurrences: &[Occurrence],
    mode: PlaceholderMode,
) -> String {
    let mut result = text.to_string();
    let mut seen: Vec<&str> = Vec::new();

    for (i, occurrence) in occurrences.iter().enumerate() {
        if seen.contains(&occurrence.name.as_str()) {
            if mode != PlaceholderMode::Named {
                warn!(
                    statement,
                    argument = %occurrence.name,
                    placeholder = %mode,
                    "argument repeated under unnamed placeholders, it is bound only once"
                );
            }
        } else {
            seen.push(&occurrence.name);
        }

        result = result.replacen(&occurrence.token, &placeholder(mode, &occurrence.name, i + 1), 1);
    }

    result
}
