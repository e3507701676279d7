//! Decoding of free-form model output into typed results.
//!
//! Every decoder works in two stages: a strict JSON decode first, then a
//! pattern-extraction pass over the raw text. Both stages converge on the
//! same typed result. `None` means neither stage produced anything usable,
//! which callers treat as a failed call rather than a crash.
//!
//! | Function | Output | JSON shape |
//! |----------|--------|------------|
//! | [`parse_domain_list`] | creator names | `{"domains": [...]}` or `[...]` |
//! | [`parse_questions`] | clarifying questions | `{"q1": "...", "q2": "..."}` |
//! | [`parse_status`] | availability verdict | `{"name.com": "OK" \| "NOT"}` |

use crate::availability::OracleVerdict;
use crate::candidate::DomainName;
use crate::core::question::Question;
use crate::core::string::strip_code_fence;
use regex::Regex;
use serde_json::Value;
use std::collections::BTreeSet;
use std::sync::LazyLock;

static DOMAIN_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b((?:[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?\.)+[a-z]{2,63})\b")
        .expect("DOMAIN_TOKEN is a compile-time constant")
});

static STATUS_PAIR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)"([^"]+)":\s*"?(OK|NOT)"?"#).expect("STATUS_PAIR is a compile-time constant")
});

static QUESTION_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:[-*•]|\d+[.)]|q\d+[:.)])?\s*").expect("QUESTION_PREFIX is a compile-time constant")
});

fn json_value(text: &str) -> Option<Value> {
    let body = strip_code_fence(text);
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        return Some(value);
    }
    // Tolerate prose around a single JSON object
    let start = body.find('{')?;
    let end = body.rfind('}')?;
    if end <= start {
        return None;
    }
    serde_json::from_str(&body[start..=end]).ok()
}

fn collect_names<'a, I>(raw: I, limit: usize) -> Vec<DomainName>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = BTreeSet::new();
    raw.into_iter()
        .filter_map(|s| DomainName::parse(s).ok())
        .filter(|n| seen.insert(n.clone()))
        .take(limit)
        .collect()
}

/// Decode a creator response into at most `limit` normalised names.
///
/// Strict stage: a bare JSON array, or the `domains` array of an object
/// (falling back to the first array-valued key). Pattern stage: every
/// domain-looking token in the text. Invalid and duplicate entries are
/// dropped in both stages.
pub fn parse_domain_list(text: &str, limit: usize) -> Option<Vec<DomainName>> {
    if let Some(value) = json_value(text) {
        let array = match &value {
            Value::Array(items) => Some(items),
            Value::Object(map) => map
                .get("domains")
                .and_then(Value::as_array)
                .or_else(|| map.values().find_map(Value::as_array)),
            _ => None,
        };
        if let Some(items) = array {
            return Some(collect_names(items.iter().filter_map(Value::as_str), limit));
        }
    }

    let names = collect_names(
        DOMAIN_TOKEN.captures_iter(text).filter_map(|c| c.get(1)).map(|m| m.as_str()),
        limit,
    );
    if names.is_empty() { None } else { Some(names) }
}

fn question_key_order(key: &str) -> (u32, String) {
    let numeric = key
        .strip_prefix('q')
        .or_else(|| key.strip_prefix('Q'))
        .and_then(|n| n.parse::<u32>().ok())
        .unwrap_or(u32::MAX);
    (numeric, key.to_string())
}

/// Decode a question response, ordered by the numeric suffix of `qN` keys.
///
/// Pattern stage: every line that ends in `?`, with list markers removed.
/// Returned questions are renumbered `q1..qN`.
pub fn parse_questions(text: &str) -> Option<Vec<Question>> {
    if let Some(Value::Object(map)) = json_value(text) {
        let mut entries: Vec<(&String, &str)> = map
            .iter()
            .filter_map(|(k, v)| v.as_str().map(|s| (k, s)))
            .collect();
        entries.sort_by_key(|(k, _)| question_key_order(k));
        let questions = Question::numbered(entries.into_iter().map(|(_, v)| v));
        if !questions.is_empty() {
            return Some(questions);
        }
    }

    let lines: Vec<String> = text
        .lines()
        .map(str::trim)
        .filter(|l| l.ends_with('?'))
        .map(|l| QUESTION_PREFIX.replace(l, "").trim().to_string())
        .collect();
    let questions = Question::numbered(lines);
    if questions.is_empty() { None } else { Some(questions) }
}

/// Decode exactly two refinement questions; fewer than two is a failure
pub fn parse_refinement_questions(text: &str) -> Option<Vec<Question>> {
    let mut questions = parse_questions(text)?;
    if questions.len() < 2 {
        return None;
    }
    questions.truncate(2);
    Some(questions)
}

fn verdict_from_label(label: &str) -> OracleVerdict {
    match label.trim().to_uppercase().as_str() {
        "OK" => OracleVerdict::Taken,
        "NOT" => OracleVerdict::Free,
        _ => OracleVerdict::Unknown,
    }
}

/// Decode a web-search check response for `name`.
///
/// `OK` means registered, `NOT` means available. A missing key or any
/// other label yields [`OracleVerdict::Unknown`].
pub fn parse_status(text: &str, name: &str) -> OracleVerdict {
    if let Some(Value::Object(map)) = json_value(text) {
        let label = map
            .iter()
            .find(|(k, _)| k.trim().eq_ignore_ascii_case(name))
            .and_then(|(_, v)| v.as_str());
        return label.map(verdict_from_label).unwrap_or(OracleVerdict::Unknown);
    }

    STATUS_PAIR
        .captures_iter(text)
        .find(|c| c[1].trim().eq_ignore_ascii_case(name))
        .map(|c| verdict_from_label(&c[2]))
        .unwrap_or(OracleVerdict::Unknown)
}
