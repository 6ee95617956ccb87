//! Lenient JSON recovery for upstream response bodies.
//!
//! The upstream service sometimes wraps its JSON in prose, log lines, or
//! markdown. Rather than fail, we try a direct parse first and then fall
//! back to the first balanced `{...}` or `[...]` block found anywhere in
//! the text. If nothing parses, the caller gets an empty object and the
//! normalizer produces an empty result.

use serde_json::{Map, Value};

/// Parse a raw body, salvaging an embedded JSON block if the whole text
/// is not valid JSON. Never fails; the worst case is an empty object.
pub fn parse_lenient(raw: &str) -> Value {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Value::Object(Map::new());
    }

    if let Ok(value) = serde_json::from_str(trimmed) {
        return value;
    }

    if let Some(block) = first_balanced_block(trimmed) {
        if let Ok(value) = serde_json::from_str(block) {
            tracing::debug!("salvaged embedded JSON block from non-JSON body");
            return value;
        }
    }

    tracing::debug!("no parseable JSON in upstream body; using empty object");
    Value::Object(Map::new())
}

/// Find the first `{`- or `[`-opened block and return its balanced span.
fn first_balanced_block(s: &str) -> Option<&str> {
    let start = s.find(['{', '['])?;
    extract_balanced(&s[start..])
}

/// Extract a balanced bracket-delimited span from a string starting with
/// `{` or `[`. Quote and escape aware, so delimiters inside string
/// literals don't affect the depth count.
fn extract_balanced(s: &str) -> Option<&str> {
    let (open, close) = match s.chars().next()? {
        '{' => ('{', '}'),
        '[' => ('[', ']'),
        _ => return None,
    };

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escape_next = false;

    for (i, ch) in s.char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }

        match ch {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            c if c == open && !in_string => depth += 1,
            c if c == close && !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(&s[..=i]);
                }
            }
            _ => {}
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_clean_json_passes_through() {
        let value = parse_lenient(r#"{"answer": "hi"}"#);
        assert_eq!(value, json!({"answer": "hi"}));
    }

    #[test]
    fn test_array_body() {
        let value = parse_lenient(r#"[1, 2, 3]"#);
        assert_eq!(value, json!([1, 2, 3]));
    }

    #[test]
    fn test_json_wrapped_in_prose() {
        let value = parse_lenient(r#"Here is the result: {"answer": "use step 1"} hope it helps"#);
        assert_eq!(value, json!({"answer": "use step 1"}));
    }

    #[test]
    fn test_trailing_garbage_braces() {
        let value = parse_lenient(r#"{"a": {"b": 1}}}}"#);
        assert_eq!(value, json!({"a": {"b": 1}}));
    }

    #[test]
    fn test_braces_inside_strings_ignored() {
        let value = parse_lenient(r#"log: {"text": "closing } inside", "n": 2} done"#);
        assert_eq!(value, json!({"text": "closing } inside", "n": 2}));
    }

    #[test]
    fn test_embedded_array() {
        let value = parse_lenient(r#"questions follow ["a?", "b?"] end"#);
        assert_eq!(value, json!(["a?", "b?"]));
    }

    #[test]
    fn test_not_json_at_all() {
        assert_eq!(parse_lenient("not json at all"), json!({}));
        assert_eq!(parse_lenient(""), json!({}));
        assert_eq!(parse_lenient("{unterminated"), json!({}));
    }
}
