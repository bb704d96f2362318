//! Substitution of logged positional parameters back into query text.
//!
//! A parameter-record line shares its prefix with the originating
//! query-record line and lists bindings as `parameters: $1 = '105', $2 = 42`.
//! Values are inserted verbatim; the log already carries whatever quoting
//! the engine applied.

use std::sync::OnceLock;

use regex::Regex;

use crate::query_log::ParseError;

const PARAMETER_MARKER: &str = "parameters: ";

fn binding_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$(\d+)\s*=(.*)").expect("valid binding pattern"))
}

#[derive(Debug)]
struct BoundParameter {
    index: usize,
    value: String,
}

fn parse_bindings(parameter_line: &str) -> Result<Vec<BoundParameter>, ParseError> {
    let tail = parameter_line
        .split_once(PARAMETER_MARKER)
        .ok_or(ParseError::MissingField("parameters"))?
        .1;
    // Bindings occupy the rest of the line the marker appears on.
    let tail = tail.lines().next().unwrap_or_default();

    let mut bindings = Vec::new();
    for token in tail.split(", ") {
        let captured = binding_pattern()
            .captures(token)
            .ok_or(ParseError::MissingField("parameter binding"))?;
        let index = captured[1]
            .parse()
            .map_err(|_| ParseError::InvalidParameterIndex(captured[1].to_string()))?;
        bindings.push(BoundParameter {
            index,
            value: captured[2].trim().to_string(),
        });
    }
    Ok(bindings)
}

/// Replaces the first occurrence of each `$N` placeholder in `query_text`
/// with its logged value.
///
/// Bindings are applied in descending index order so that `$1` can never
/// clip the `$10` placeholder when a statement binds ten or more parameters.
pub fn substitute_parameters(
    parameter_line: &str,
    query_text: &str,
) -> Result<String, ParseError> {
    let mut bindings = parse_bindings(parameter_line)?;
    bindings.sort_by(|a, b| b.index.cmp(&a.index));

    let mut substituted = query_text.to_string();
    for binding in bindings {
        let placeholder = format!("${}", binding.index);
        substituted = substituted.replacen(&placeholder, &binding.value, 1);
    }
    Ok(substituted)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PREFIX: &str =
        "2020-01-01 12:00:00 UTC:100.100.100.100(10000):client_name:[10000]:DETAIL:  ";

    #[test]
    fn substitutes_single_quoted_value_verbatim() {
        let line = format!("{PREFIX}parameters: $1 = '105'");
        let fenced = "```SELECT *\nFROM \"TEST\"\nWHERE (\"id\" IN ($1))```";

        let substituted = substitute_parameters(&line, fenced).expect("substitute");
        assert_eq!(substituted, "```SELECT *\nFROM \"TEST\"\nWHERE (\"id\" IN ('105'))```");
    }

    #[test]
    fn substitutes_each_placeholder_once() {
        let line = format!("{PREFIX}parameters: $1 = 'a', $2 = 'b'");
        let substituted =
            substitute_parameters(&line, "SELECT $1, $2, $1").expect("substitute");
        // Only the first occurrence of each placeholder is replaced.
        assert_eq!(substituted, "SELECT 'a', 'b', $1");
    }

    #[test]
    fn multi_digit_indices_survive_low_index_substitution() {
        let bindings: Vec<String> = (1..=11).map(|n| format!("${n} = 'v{n}'")).collect();
        let line = format!("{PREFIX}parameters: {}", bindings.join(", "));
        let placeholders: Vec<String> = (1..=11).map(|n| format!("${n}")).collect();
        let query = format!("SELECT {}", placeholders.join(", "));

        let substituted = substitute_parameters(&line, &query).expect("substitute");
        let expected: Vec<String> = (1..=11).map(|n| format!("'v{n}'")).collect();
        assert_eq!(substituted, format!("SELECT {}", expected.join(", ")));
    }

    #[test]
    fn rejects_line_without_parameter_marker() {
        let error = substitute_parameters("no bindings here", "SELECT $1");
        assert!(matches!(error, Err(ParseError::MissingField("parameters"))));
    }

    #[test]
    fn rejects_malformed_binding_token() {
        let line = format!("{PREFIX}parameters: $1 = 'a', garbage");
        let error = substitute_parameters(&line, "SELECT $1");
        assert!(matches!(
            error,
            Err(ParseError::MissingField("parameter binding"))
        ));
    }
}
