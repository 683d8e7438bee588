//! Evaluator for resolved queries against flat records.

use serde_json::Value as JsonValue;
use std::cmp::Ordering;

use super::ast::{ComparisonKind, LookupKey, Value};
use super::partition::ResolvedQuery;

/// A flat record: field name to JSON scalar.
pub type Record = serde_json::Map<String, JsonValue>;

/// Evaluate a resolved query against a record.
///
/// Every include must match. The record is then rejected only if it matches
/// every exclude, i.e. `NOT (e1 AND e2 ...)`.
pub fn evaluate_query(query: &ResolvedQuery, record: &Record) -> bool {
    let included = query
        .includes
        .iter()
        .all(|(key, value)| evaluate_predicate(key, value, record));
    if !included {
        return false;
    }

    query.excludes.is_empty()
        || !query
            .excludes
            .iter()
            .all(|(key, value)| evaluate_predicate(key, value, record))
}

/// Evaluate one predicate. Missing and null fields never match.
pub fn evaluate_predicate(key: &LookupKey, expected: &Value, record: &Record) -> bool {
    let actual = match record.get(&key.field) {
        None | Some(JsonValue::Null) => return false,
        Some(actual) => actual,
    };

    match key.kind {
        ComparisonKind::Contains => contains(actual, expected),
        ComparisonKind::Exact => compare(actual, expected) == Some(Ordering::Equal),
        kind => compare(actual, expected).is_some_and(|ord| accepts(kind, ord)),
    }
}

fn accepts(kind: ComparisonKind, ord: Ordering) -> bool {
    match kind {
        ComparisonKind::GreaterThan => ord == Ordering::Greater,
        ComparisonKind::GreaterOrEqual => ord != Ordering::Less,
        ComparisonKind::LessThan => ord == Ordering::Less,
        ComparisonKind::LessOrEqual => ord != Ordering::Greater,
        ComparisonKind::Contains | ComparisonKind::Exact => ord == Ordering::Equal,
    }
}

/// Case-insensitive substring test on the field's text form.
fn contains(actual: &JsonValue, expected: &Value) -> bool {
    let Some(haystack) = text_form(actual) else {
        return false;
    };
    let needle = expected.to_string().to_lowercase();
    haystack.to_lowercase().contains(&needle)
}

fn text_form(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        JsonValue::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Order the record's field relative to the expected value. `None` when the
/// types are not comparable.
fn compare(actual: &JsonValue, expected: &Value) -> Option<Ordering> {
    match expected {
        Value::Integer(n) => match actual {
            // Boolean columns compare as 0/1
            JsonValue::Bool(b) => Some(i64::from(*b).cmp(n)),
            JsonValue::Number(num) => match num.as_i64() {
                Some(i) => Some(i.cmp(n)),
                None => num.as_f64()?.partial_cmp(&(*n as f64)),
            },
            _ => None,
        },
        Value::Text(s) => actual.as_str().map(|a| a.cmp(s.as_str())),
    }
}
