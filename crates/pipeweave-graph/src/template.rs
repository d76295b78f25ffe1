//! Variable extraction for templated text nodes.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

/// Matches `{{ identifier }}` with optional whitespace just inside the braces.
///
/// An identifier starts with a letter, underscore, or dollar sign and
/// continues with letters, digits, underscores, or dollar signs. A brace pair
/// wrapping anything else is plain text, not a variable reference.
static VARIABLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([A-Za-z_$][A-Za-z0-9_$]*)\s*\}\}").expect("variable pattern is valid")
});

/// Extracts the variable names referenced by a text template.
///
/// Returns each distinct name once, in first-occurrence order. The scan is
/// pure and total: malformed or literal brace pairs are skipped rather than
/// reported, and the full text is re-scanned on every call.
pub fn extract_variables(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut variables = Vec::new();

    for capture in VARIABLE_RE.captures_iter(text) {
        if let Some(name) = capture.get(1) {
            let name = name.as_str();
            if seen.insert(name) {
                variables.push(name.to_string());
            }
        }
    }

    variables
}
