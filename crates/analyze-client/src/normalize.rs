//! Response normalization for the upstream analysis service.
//!
//! The upstream response shape is not contractually fixed: key names,
//! nesting, and value types drift across versions and providers. Instead
//! of failing on schema drift, this module applies a cascade of
//! extraction strategies, each more permissive than the last, and always
//! produces a best-effort result:
//!
//! 1. explicit-key pass - an `answer_draft` (or `proposed_question(s)`)
//!    key anywhere in the tree is trusted verbatim and short-circuits
//!    everything else for that field;
//! 2. candidate-key pass - a fixed ordered list of likely key names,
//!    checked at the top level and inside common containers;
//! 3. string coercion of whatever raw value was found;
//! 4. deep substring-key fallback over the whole tree, depth-bounded.
//!
//! Next-best-actions use only the candidate-key pass; `similar` is read
//! verbatim. Nothing in this module returns an error or panics.

use serde_json::Value;
use std::collections::HashSet;

/// Depth bound for the exact-key search.
const EXACT_SEARCH_DEPTH: usize = 8;
/// Depth bound for the substring-key searches.
const SUBSTRING_SEARCH_DEPTH: usize = 6;

/// Candidate keys for the answer, in priority order.
const ANSWER_CANDIDATES: &[&str] = &[
    "answer_draft",
    "answerDraft",
    "answer",
    "body",
    "response",
    "message",
    "suggested_resolution",
    "suggestion",
    "resolution",
    "recommended",
    "summary",
];

/// Candidate keys for proposed questions, in priority order.
const QUESTION_CANDIDATES: &[&str] = &[
    "proposed_questions",
    "proposedQuestions",
    "proposed_qs",
    "proposed_question",
    "proposed",
    "questions",
    "followup_questions",
    "followups",
    "clarifying_questions",
    "suggested_questions",
    "suggestions",
    "recommendations",
];

/// Candidate keys for next-best-actions.
const NBA_CANDIDATES: &[&str] = &[
    "nba",
    "next_best_actions",
    "nextBestActions",
    "actions",
    "nbas",
];

/// Last-resort candidate keys when the answer cascade came up empty.
const SUGGESTED_CANDIDATES: &[&str] = &[
    "suggested_resolution",
    "resolution",
    "suggestion",
    "recommended",
    "summary",
    "recommendation",
    "advice",
];

/// Key-name substrings that mark answer-like fields in the deep pass.
const ANSWER_SUBSTRINGS: &[&str] = &[
    "answer",
    "draft",
    "response",
    "suggest",
    "resolution",
    "recommend",
];

/// Key-name substrings that mark question-like fields in the deep pass.
const QUESTION_SUBSTRINGS: &[&str] = &["question", "followup", "clarify", "suggest", "recommend"];

/// Key-name substrings for the last-resort suggestion pass.
const SUGGESTED_SUBSTRINGS: &[&str] = &["suggested", "resolution", "recommend", "advice"];

/// Nested fields tried when coercing an object to display text.
const NESTED_TEXT_FIELDS: &[&str] = &[
    "text",
    "content",
    "answer",
    "message",
    "body",
    "summary",
    "suggested",
    "resolution",
];

/// Containers searched by the candidate-key pass besides the top level.
const COMMON_CONTAINERS: &[&str] = &["data", "response", "result"];

/// The stable shape consumed by the presentation layer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Normalized {
    /// Best-effort answer text; empty if nothing answer-like was found.
    pub answer: String,
    /// Next-best-action steps.
    pub nba: Vec<String>,
    /// Proposed clarifying questions, deduplicated, first-seen order.
    pub proposed_questions: Vec<String>,
    /// Similar-ticket entries, passed through verbatim.
    pub similar: Vec<Value>,
}

/// Normalize an upstream response tree into the stable result shape.
pub fn normalize(value: &Value) -> Normalized {
    let normalized = Normalized {
        answer: extract_answer(value),
        nba: extract_nba(value),
        proposed_questions: extract_questions(value),
        similar: extract_similar(value),
    };
    tracing::debug!(
        answer_len = normalized.answer.len(),
        nba = normalized.nba.len(),
        questions = normalized.proposed_questions.len(),
        similar = normalized.similar.len(),
        "normalized upstream response"
    );
    normalized
}

/// Extract the answer text.
fn extract_answer(value: &Value) -> String {
    // Explicit answer_draft anywhere wins and is never re-interpreted.
    if let Some(explicit) = find_exact(value, "answer_draft", 0) {
        tracing::debug!("using explicit answer_draft verbatim");
        return match explicit {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
    }

    let candidate = read_any(value, ANSWER_CANDIDATES)
        .map(coerce_string)
        .unwrap_or_default();
    if !candidate.is_empty() {
        return candidate;
    }

    // A candidate that coerced to nothing (e.g. `"answer": ""`) counts as
    // no candidate at all; the deep pass still runs.
    let deep = find_by_substring(value, ANSWER_SUBSTRINGS, 0)
        .map(coerce_string)
        .unwrap_or_default();
    if !deep.is_empty() {
        return deep;
    }

    // Last resort: suggestion-flavoured keys the candidate list missed.
    let suggested = read_any(value, SUGGESTED_CANDIDATES)
        .map(coerce_string)
        .unwrap_or_default();
    if !suggested.is_empty() {
        return suggested;
    }

    find_by_substring(value, SUGGESTED_SUBSTRINGS, 0)
        .map(coerce_string)
        .unwrap_or_default()
}

/// Extract next-best-action steps. Candidate-key pass only.
fn extract_nba(value: &Value) -> Vec<String> {
    match read_any(value, NBA_CANDIDATES) {
        Some(Value::Array(items)) => items.iter().map(stringify_element).collect(),
        Some(Value::String(s)) if !s.trim().is_empty() => s
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

/// Extract proposed questions.
fn extract_questions(value: &Value) -> Vec<String> {
    // Explicit keys are trusted as already-segmented: strings stay whole,
    // no comma/newline splitting.
    let explicit = find_exact(value, "proposed_question", 0)
        .or_else(|| find_exact(value, "proposed_questions", 0))
        .or_else(|| find_exact(value, "proposed_qs", 0))
        .or_else(|| find_exact(value, "proposedQuestions", 0));

    if let Some(explicit) = explicit {
        tracing::debug!("using explicit proposed questions verbatim");
        let questions: Vec<String> = match explicit {
            Value::Array(items) => items
                .iter()
                .map(stringify_element)
                .filter(|q| !q.is_empty())
                .collect(),
            Value::String(s) => vec![s.clone()],
            other => vec![other.to_string()],
        };
        // Verbatim trust: no trimming or empty-filtering here.
        return dedup_preserving_order(questions);
    }

    let mut found: Vec<String> = match read_any(value, QUESTION_CANDIDATES) {
        Some(Value::Array(items)) => items
            .iter()
            .map(stringify_element)
            .filter(|q| !q.is_empty())
            .collect(),
        Some(Value::String(s)) => split_question_string(s),
        Some(other) => {
            let text = coerce_string(other);
            text.lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect()
        }
        None => Vec::new(),
    };

    if found.is_empty() {
        found = collect_questions_deep(value, 0);
    }

    let trimmed: Vec<String> = found
        .into_iter()
        .map(|q| q.trim().to_string())
        .filter(|q| !q.is_empty())
        .collect();
    dedup_preserving_order(trimmed)
}

/// Read `similar` (else `similarity`) as an array verbatim.
fn extract_similar(value: &Value) -> Vec<Value> {
    value
        .get("similar")
        .and_then(Value::as_array)
        .or_else(|| value.get("similarity").and_then(Value::as_array))
        .cloned()
        .unwrap_or_default()
}

/// Recursive case-insensitive exact-key search, depth-bounded.
///
/// Keys at the current level are checked before recursing, so the
/// shallowest match wins.
fn find_exact<'a>(value: &'a Value, key: &str, depth: usize) -> Option<&'a Value> {
    if depth > EXACT_SEARCH_DEPTH {
        return None;
    }
    match value {
        Value::Object(map) => {
            for (k, v) in map {
                if k.eq_ignore_ascii_case(key) && !v.is_null() {
                    return Some(v);
                }
            }
            map.values()
                .filter(|v| v.is_object() || v.is_array())
                .find_map(|v| find_exact(v, key, depth + 1))
        }
        Value::Array(items) => items
            .iter()
            .filter(|v| v.is_object() || v.is_array())
            .find_map(|v| find_exact(v, key, depth + 1)),
        _ => None,
    }
}

/// Candidate-key lookup: all keys at the top level first, then inside
/// each common container in turn. First non-null match wins.
fn read_any<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    let map = value.as_object()?;

    for key in keys {
        if let Some(v) = map.get(*key) {
            if !v.is_null() {
                return Some(v);
            }
        }
    }

    for container in COMMON_CONTAINERS {
        if let Some(Value::Object(nested)) = map.get(*container) {
            for key in keys {
                if let Some(v) = nested.get(*key) {
                    if !v.is_null() {
                        return Some(v);
                    }
                }
            }
        }
    }

    None
}

/// Recursive search for keys whose lowercased name contains one of the
/// given substrings. First non-empty match at the shallowest depth wins.
fn find_by_substring<'a>(value: &'a Value, needles: &[&str], depth: usize) -> Option<&'a Value> {
    if depth > SUBSTRING_SEARCH_DEPTH {
        return None;
    }
    match value {
        Value::Object(map) => {
            for (k, v) in map {
                let lower = k.to_lowercase();
                if needles.iter().any(|n| lower.contains(n)) && !is_empty_value(v) {
                    return Some(v);
                }
            }
            map.values()
                .filter(|v| v.is_object() || v.is_array())
                .find_map(|v| find_by_substring(v, needles, depth + 1))
        }
        Value::Array(items) => items
            .iter()
            .filter(|v| v.is_object() || v.is_array())
            .find_map(|v| find_by_substring(v, needles, depth + 1)),
        _ => None,
    }
}

/// Collect question strings from every key in the tree whose name looks
/// question-like, across the whole graph (not just the first match).
fn collect_questions_deep(value: &Value, depth: usize) -> Vec<String> {
    if depth > SUBSTRING_SEARCH_DEPTH {
        return Vec::new();
    }

    let mut results = Vec::new();
    match value {
        Value::Object(map) => {
            for (k, v) in map {
                let lower = k.to_lowercase();
                if QUESTION_SUBSTRINGS.iter().any(|n| lower.contains(n)) {
                    collect_question_value(v, &mut results);
                }
                if v.is_object() || v.is_array() {
                    results.extend(collect_questions_deep(v, depth + 1));
                }
            }
        }
        Value::Array(items) => {
            for v in items {
                if v.is_object() || v.is_array() {
                    results.extend(collect_questions_deep(v, depth + 1));
                }
            }
        }
        _ => {}
    }
    results
}

/// Pull question strings out of a single question-keyed value.
fn collect_question_value(value: &Value, results: &mut Vec<String>) {
    match value {
        Value::Array(items) => {
            results.extend(items.iter().map(stringify_element).filter(|q| !q.is_empty()));
        }
        Value::String(s) if !s.trim().is_empty() => {
            // The value may itself be a JSON-encoded array.
            if let Ok(Value::Array(items)) = serde_json::from_str::<Value>(s) {
                results.extend(items.iter().map(stringify_element).filter(|q| !q.is_empty()));
            } else {
                results.push(s.trim().to_string());
            }
        }
        Value::Object(map) => {
            let nested = ["text", "content", "question", "message"]
                .iter()
                .find_map(|field| map.get(*field).filter(|v| !v.is_null()));
            match nested {
                Some(Value::Array(items)) => {
                    results.extend(items.iter().map(stringify_element).filter(|q| !q.is_empty()));
                }
                Some(Value::String(s)) if !s.trim().is_empty() => {
                    results.push(s.trim().to_string());
                }
                _ => {}
            }
        }
        _ => {}
    }
}

/// Split a question string: JSON-array parse first, then on newlines,
/// semicolons, or commas.
fn split_question_string(s: &str) -> Vec<String> {
    if let Ok(Value::Array(items)) = serde_json::from_str::<Value>(s) {
        return items
            .iter()
            .map(stringify_element)
            .filter(|q| !q.is_empty())
            .collect();
    }

    s.split(['\n', ';', ','])
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

/// Coerce a raw candidate value into display text.
///
/// Strings are trimmed as-is; numbers and booleans stringify; arrays
/// prefer their first non-empty string element and otherwise join all
/// elements with blank lines; objects unwrap common nested text fields or
/// fall back to their JSON representation.
fn coerce_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Array(items) => {
            if let Some(first) = items
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .find(|s| !s.is_empty())
            {
                return first.to_string();
            }
            items
                .iter()
                .map(stringify_element)
                .collect::<Vec<_>>()
                .join("\n\n")
                .trim()
                .to_string()
        }
        Value::Object(map) => {
            for field in NESTED_TEXT_FIELDS {
                if let Some(nested) = map.get(*field) {
                    let skip = nested.is_null()
                        || nested.as_str().is_some_and(|s| s.is_empty());
                    if !skip {
                        return coerce_string(nested);
                    }
                }
            }
            value.to_string()
        }
    }
}

/// Render an array element: strings as-is, everything else as JSON.
fn stringify_element(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Whether a value counts as empty for the substring search.
fn is_empty_value(value: &Value) -> bool {
    value.is_null() || value.as_str().is_some_and(str::is_empty)
}

/// Case-sensitive exact-string dedup preserving first-seen order.
fn dedup_preserving_order(items: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    items.into_iter().filter(|item| seen.insert(item.clone())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_explicit_answer_draft_wins_and_is_not_split() {
        let value = json!({ "answer": "ignored", "answer_draft": "A, B, C" });
        assert_eq!(normalize(&value).answer, "A, B, C");
    }

    #[test]
    fn test_explicit_answer_draft_found_deep() {
        let value = json!({
            "data": { "inner": { "ANSWER_DRAFT": "deep draft" } },
            "answer": "shallow"
        });
        assert_eq!(normalize(&value).answer, "deep draft");
    }

    #[test]
    fn test_explicit_answer_draft_non_string_stringified() {
        let value = json!({ "answer_draft": {"text": "kept as json"} });
        assert_eq!(normalize(&value).answer, r#"{"text":"kept as json"}"#);
    }

    #[test]
    fn test_candidate_order_answer_before_body() {
        let value = json!({ "body": "second", "answer": "first" });
        assert_eq!(normalize(&value).answer, "first");
    }

    #[test]
    fn test_candidate_found_in_result_container() {
        let value = json!({ "result": { "suggestion": "use step 1" } });
        assert_eq!(normalize(&value).answer, "use step 1");
    }

    #[test]
    fn test_deep_substring_fallback_for_answer() {
        let value = json!({ "meta": { "ai_suggested_fix": "restart the agent" } });
        assert_eq!(normalize(&value).answer, "restart the agent");
    }

    #[test]
    fn test_empty_answer_candidate_falls_through_to_deep_pass() {
        let value = json!({ "answer": "", "meta": { "draft_reply": "restart the router" } });
        assert_eq!(normalize(&value).answer, "restart the router");
    }

    #[test]
    fn test_whitespace_answer_candidate_falls_through_to_deep_pass() {
        let value = json!({ "response": "   ", "details": { "resolution_notes": "clear the cache" } });
        assert_eq!(normalize(&value).answer, "clear the cache");
    }

    #[test]
    fn test_empty_candidate_still_reaches_last_resort() {
        let value = json!({ "answer": "", "advice": "escalate to tier 2" });
        assert_eq!(normalize(&value).answer, "escalate to tier 2");
    }

    #[test]
    fn test_answer_array_prefers_first_nonempty_string() {
        let value = json!({ "answer": ["", "  ", "first real", "second"] });
        assert_eq!(normalize(&value).answer, "first real");
    }

    #[test]
    fn test_answer_array_of_objects_joined() {
        let value = json!({ "answer": [{"a": 1}, {"b": 2}] });
        assert_eq!(normalize(&value).answer, "{\"a\":1}\n\n{\"b\":2}");
    }

    #[test]
    fn test_answer_object_unwraps_text_field() {
        let value = json!({ "answer": { "text": "  unwrapped  " } });
        assert_eq!(normalize(&value).answer, "unwrapped");
    }

    #[test]
    fn test_answer_number_stringifies() {
        let value = json!({ "answer": 42 });
        assert_eq!(normalize(&value).answer, "42");
    }

    #[test]
    fn test_empty_input_yields_empty_result() {
        let result = normalize(&json!({}));
        assert_eq!(result, Normalized::default());
    }

    #[test]
    fn test_non_object_input_yields_empty_result() {
        assert_eq!(normalize(&json!("just a string")), Normalized::default());
        assert_eq!(normalize(&json!(null)), Normalized::default());
    }

    #[test]
    fn test_nba_array() {
        let value = json!({ "nba": ["step 1", "step 2"] });
        assert_eq!(normalize(&value).nba, vec!["step 1", "step 2"]);
    }

    #[test]
    fn test_nba_string_splits_on_newlines_only() {
        let value = json!({ "next_best_actions": "check logs\nrestart, then verify" });
        assert_eq!(
            normalize(&value).nba,
            vec!["check logs", "restart, then verify"]
        );
    }

    #[test]
    fn test_nba_has_no_deep_fallback() {
        let value = json!({ "meta": { "actions": ["hidden"] } });
        assert!(normalize(&value).nba.is_empty());
    }

    #[test]
    fn test_explicit_proposed_question_string_not_split() {
        let value = json!({ "proposed_question": "Which account, the old one or the new one?" });
        assert_eq!(
            normalize(&value).proposed_questions,
            vec!["Which account, the old one or the new one?"]
        );
    }

    #[test]
    fn test_explicit_question_whitespace_preserved() {
        let value = json!({ "proposed_question": "  Which account is affected?  " });
        assert_eq!(
            normalize(&value).proposed_questions,
            vec!["  Which account is affected?  "]
        );
    }

    #[test]
    fn test_explicit_proposed_questions_array() {
        let value = json!({ "data": { "proposed_questions": ["Q1?", "Q2?"] } });
        assert_eq!(normalize(&value).proposed_questions, vec!["Q1?", "Q2?"]);
    }

    #[test]
    fn test_question_candidate_string_splits() {
        let value = json!({ "questions": "Q1?; Q2?, Q3?" });
        assert_eq!(
            normalize(&value).proposed_questions,
            vec!["Q1?", "Q2?", "Q3?"]
        );
    }

    #[test]
    fn test_question_candidate_json_encoded_array() {
        let value = json!({ "questions": "[\"Q1?\", \"Q2?\"]" });
        assert_eq!(normalize(&value).proposed_questions, vec!["Q1?", "Q2?"]);
    }

    #[test]
    fn test_question_deep_collection_and_dedup() {
        let value = json!({
            "a": { "clarifying": "What is your account email?" },
            "b": { "followup_qs": ["What is your account email?", "When did it start?"] }
        });
        let questions = normalize(&value).proposed_questions;
        assert_eq!(
            questions,
            vec!["What is your account email?", "When did it start?"]
        );
    }

    #[test]
    fn test_question_deep_collection_unwraps_objects() {
        let value = json!({
            "wrapper": { "question_block": { "text": "Did you try resetting?" } }
        });
        assert_eq!(
            normalize(&value).proposed_questions,
            vec!["Did you try resetting?"]
        );
    }

    #[test]
    fn test_similar_passthrough() {
        let value = json!({ "similar": [{"ticket_id": "t1"}, {"ticket_id": "t2"}] });
        let similar = normalize(&value).similar;
        assert_eq!(similar.len(), 2);
        assert_eq!(similar[0], json!({"ticket_id": "t1"}));
    }

    #[test]
    fn test_similarity_alias() {
        let value = json!({ "similarity": [1, 2] });
        assert_eq!(normalize(&value).similar, vec![json!(1), json!(2)]);
    }

    #[test]
    fn test_similar_non_array_ignored() {
        let value = json!({ "similar": "not an array" });
        assert!(normalize(&value).similar.is_empty());
    }

    #[test]
    fn test_suggested_last_resort() {
        let value = json!({ "advice": "escalate to tier 2" });
        assert_eq!(normalize(&value).answer, "escalate to tier 2");
    }

    #[test]
    fn test_exact_depth_bound() {
        // Bury answer_draft below the depth bound; it must not be found.
        let mut value = json!({"answer_draft": "deep"});
        for _ in 0..(EXACT_SEARCH_DEPTH + 1) {
            value = json!({ "wrap": value });
        }
        let result = normalize(&value);
        assert_ne!(result.answer, "deep");
    }

    #[test]
    fn test_full_payload() {
        let value = json!({
            "answer_draft": "Reset the password from the admin panel.",
            "nba": ["Verify identity", "Send reset link"],
            "proposed_questions": ["What is your username?"],
            "similar": [{"ticket_id": "t42", "relevance_score": 0.93}]
        });
        let result = normalize(&value);
        assert_eq!(result.answer, "Reset the password from the admin panel.");
        assert_eq!(result.nba, vec!["Verify identity", "Send reset link"]);
        assert_eq!(result.proposed_questions, vec!["What is your username?"]);
        assert_eq!(result.similar.len(), 1);
    }
}
