//! Lenient deserializers for backend payloads.
//!
//! The backend is loose about types: numbers arrive as strings, lists arrive as `null`
//! or objects, and dates come as plain days or full timestamps. These helpers normalize
//! all of that at the edge so the domain types stay strict.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::de::{DeserializeOwned, Deserializer, Error as _};
use serde::Deserialize;
use serde_json::Value;

/// Parse a backend date: RFC 3339 timestamps are converted to their UTC day, naive
/// timestamps and plain `YYYY-MM-DD` days are taken as-is.
#[must_use]
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc).date_naive());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(ts) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(ts.date());
        }
    }
    raw.get(..10)
        .and_then(|day| NaiveDate::parse_from_str(day, "%Y-%m-%d").ok())
}

/// `Option<NaiveDate>` from a string; null, blanks and unparseable values become `None`.
///
/// # Errors
///
/// Only fails when the underlying deserializer fails.
pub fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(raw) => parse_date(&raw),
        _ => None,
    })
}

/// Decode each element on its own; elements that do not match `T` are dropped.
///
/// Returns the decoded elements and how many were dropped.
#[must_use]
pub fn decode_elements<T: DeserializeOwned>(items: Vec<Value>) -> (Vec<T>, usize) {
    let total = items.len();
    let decoded: Vec<T> = items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect();
    let dropped = total - decoded.len();
    (decoded, dropped)
}

/// `Some(list)` only when the value is a JSON array; anything else is `None`.
/// Elements that do not match `T` (a stray `null`, say) are skipped.
///
/// # Errors
///
/// Only fails when the underlying deserializer fails.
pub fn lenient_list<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => Some(decode_elements(items).0),
        _ => None,
    })
}

/// Like [`lenient_list`] but collapses the absent case to an empty list.
///
/// # Errors
///
/// Only fails when the underlying deserializer fails.
pub fn list_or_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    lenient_list(deserializer).map(Option::unwrap_or_default)
}

/// Display text from a string, number or boolean; null and objects become `""`.
///
/// # Errors
///
/// Only fails when the underlying deserializer fails.
pub fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(value_text(Value::deserialize(deserializer)?).unwrap_or_default())
}

/// Like [`text`] but maps empty strings to `None`, matching "value or fallback" reads.
///
/// # Errors
///
/// Only fails when the underlying deserializer fails.
pub fn opt_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(value_text(Value::deserialize(deserializer)?).filter(|s| !s.is_empty()))
}

/// Integer from a number or a numeric string.
///
/// # Errors
///
/// Only fails when the underlying deserializer fails.
pub fn opt_int<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(value_int(&Value::deserialize(deserializer)?))
}

/// Non-negative integer from a number or a numeric string.
///
/// # Errors
///
/// Only fails when the underlying deserializer fails.
pub fn opt_uint<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(value_int(&Value::deserialize(deserializer)?).and_then(|n| u64::try_from(n).ok()))
}

/// Amount from a number or a numeric string; anything else is `0.0`.
///
/// # Errors
///
/// Only fails when the underlying deserializer fails.
pub fn amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(amount_value(&Value::deserialize(deserializer)?))
}

/// Amount from an already-parsed JSON value; numbers and numeric strings count,
/// anything else is `0.0`.
#[must_use]
pub fn amount_value(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or_default(),
        Value::String(s) => s.trim().parse().unwrap_or_default(),
        _ => 0.0,
    }
}

/// Backend id from a number or a numeric string.
///
/// # Errors
///
/// Fails when the value is neither a non-negative integer nor a numeric string.
pub fn id<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    value_int(&value)
        .and_then(|n| u64::try_from(n).ok())
        .ok_or_else(|| D::Error::custom(format!("expected a numeric id, got {value}")))
}

fn value_text(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[allow(clippy::cast_possible_truncation)]
fn value_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "lenient_date")]
        day: Option<NaiveDate>,
        #[serde(default, deserialize_with = "lenient_list")]
        items: Option<Vec<u32>>,
        #[serde(default, deserialize_with = "text")]
        pincode: String,
        #[serde(default, deserialize_with = "opt_int")]
        kind: Option<i64>,
        #[serde(default, deserialize_with = "opt_text")]
        label: Option<String>,
    }

    fn probe(value: serde_json::Value) -> Probe {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn dates_accept_days_and_timestamps() {
        let day = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        assert_eq!(parse_date("2024-01-31"), Some(day));
        assert_eq!(parse_date("2024-01-31T00:00:00.000Z"), Some(day));
        assert_eq!(parse_date("2024-01-31T10:15:00"), Some(day));
        assert_eq!(parse_date("2024-02-01T02:00:00+05:30"), Some(day));
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("soon"), None);
    }

    #[test]
    fn lists_only_accept_arrays() {
        assert_eq!(probe(json!({"items": [1, 2]})).items, Some(vec![1, 2]));
        assert_eq!(probe(json!({"items": null})).items, None);
        assert_eq!(probe(json!({"items": {"a": 1}})).items, None);
        assert_eq!(probe(json!({"items": "1,2"})).items, None);
        assert_eq!(probe(json!({})).items, None);
    }

    #[test]
    fn lists_skip_elements_that_do_not_decode() {
        assert_eq!(
            probe(json!({"items": [1, null, "x", 3]})).items,
            Some(vec![1, 3])
        );
        let (kept, dropped): (Vec<u32>, usize) =
            decode_elements(vec![json!(4), json!({"a": 1}), json!(5)]);
        assert_eq!(kept, vec![4, 5]);
        assert_eq!(dropped, 1);
    }

    #[test]
    fn amounts_accept_numbers_and_text() {
        assert_eq!(amount_value(&json!(0)), 0.0);
        assert_eq!(amount_value(&json!("1250.50")), 1250.5);
        assert_eq!(amount_value(&json!(null)), 0.0);
    }

    #[test]
    fn scalars_are_normalized() {
        let p = probe(json!({"pincode": 600_001, "kind": "3", "label": "", "day": null}));
        assert_eq!(p.pincode, "600001");
        assert_eq!(p.kind, Some(3));
        assert_eq!(p.label, None);
        assert_eq!(p.day, None);
    }
}
