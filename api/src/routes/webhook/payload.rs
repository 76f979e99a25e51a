//! Field access over the untyped GitLab payload.
//!
//! Payloads are kept as `serde_json::Value` because `object_kind` decides
//! which fields are required. Missing fields come back as
//! [`AppError::MissingField`] with the dotted path, never as a panic.

use serde_json::Value;

use crate::error_handler::{AppError, AppResult};

/// Placeholder used when a push payload carries no project name.
pub const UNKNOWN_PROJECT: &str = "Proyecto desconocido";

/// `true` for payloads that carry nothing to act on: `null`, `false`, `0`,
/// `""`, `[]` and `{}`.
pub fn is_empty_payload(payload: &Value) -> bool {
    match payload {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

/// Event kind, when present as a string.
pub fn object_kind(payload: &Value) -> Option<&str> {
    payload.get("object_kind").and_then(Value::as_str)
}

/// `object_kind` as shown to the sender: strings verbatim, other values as
/// compact JSON, `ninguno` when absent or `null`.
pub fn describe_kind(payload: &Value) -> String {
    match payload.get("object_kind") {
        None | Some(Value::Null) => "ninguno".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Walks `path` (dot separated). A missing or `null` segment is reported
/// with the path up to and including that segment.
pub fn field<'a>(payload: &'a Value, path: &str) -> AppResult<&'a Value> {
    let mut cur = payload;
    let mut walked = 0usize;
    for segment in path.split('.') {
        walked += if walked == 0 { segment.len() } else { segment.len() + 1 };
        match cur.get(segment) {
            Some(Value::Null) | None => {
                return Err(AppError::MissingField(path[..walked].to_string()));
            }
            Some(v) => cur = v,
        }
    }
    Ok(cur)
}

/// Optional field: `None` when any segment is missing or `null`.
pub fn optional_str<'a>(payload: &'a Value, path: &str) -> Option<&'a str> {
    field(payload, path).ok().and_then(Value::as_str)
}

/// Required string field.
pub fn required_str<'a>(payload: &'a Value, path: &str) -> AppResult<&'a str> {
    field(payload, path)?
        .as_str()
        .ok_or_else(|| AppError::InvalidField {
            field: path.to_string(),
            reason: "expected a string",
        })
}

/// Required identifier that GitLab may send as a number or a string
/// (project ids, commit shas). Rendered as text for URL building.
pub fn required_scalar(payload: &Value, path: &str) -> AppResult<String> {
    match field(payload, path)? {
        Value::String(s) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        Value::Number(n) => Ok(n.to_string()),
        _ => Err(AppError::InvalidField {
            field: path.to_string(),
            reason: "expected a non-empty string or number",
        }),
    }
}

/// Required unsigned integer; numeric strings are accepted.
pub fn required_u64(payload: &Value, path: &str) -> AppResult<u64> {
    let v = field(payload, path)?;
    v.as_u64()
        .or_else(|| v.as_str().and_then(|s| s.trim().parse().ok()))
        .ok_or_else(|| AppError::InvalidField {
            field: path.to_string(),
            reason: "expected an unsigned integer",
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn falsy_payloads_are_empty() {
        for v in [
            json!(null),
            json!(false),
            json!(0),
            json!(""),
            json!([]),
            json!({}),
        ] {
            assert!(is_empty_payload(&v), "{v} should be empty");
        }
        assert!(!is_empty_payload(&json!({"object_kind": "push"})));
        assert!(!is_empty_payload(&json!(1)));
    }

    #[test]
    fn missing_segment_is_named_by_its_path() {
        let p = json!({ "object_attributes": { "action": "open" } });
        match field(&p, "object_attributes.iid") {
            Err(AppError::MissingField(path)) => assert_eq!(path, "object_attributes.iid"),
            other => panic!("unexpected: {other:?}"),
        }
        match field(&p, "project.id") {
            Err(AppError::MissingField(path)) => assert_eq!(path, "project"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn null_counts_as_missing() {
        let p = json!({ "after": null });
        assert!(matches!(
            required_scalar(&p, "after"),
            Err(AppError::MissingField(ref f)) if f == "after"
        ));
    }

    #[test]
    fn project_id_accepts_number_or_string() {
        assert_eq!(required_scalar(&json!({"id": 7}), "id").unwrap(), "7");
        assert_eq!(
            required_scalar(&json!({"id": "group/proj"}), "id").unwrap(),
            "group/proj"
        );
        assert!(matches!(
            required_scalar(&json!({"id": {}}), "id"),
            Err(AppError::InvalidField { .. })
        ));
    }

    #[test]
    fn iid_accepts_numeric_string() {
        assert_eq!(required_u64(&json!({"iid": "12"}), "iid").unwrap(), 12);
        assert!(required_u64(&json!({"iid": -1}), "iid").is_err());
    }

    #[test]
    fn unsupported_kind_is_described_by_its_value() {
        assert_eq!(describe_kind(&json!({"object_kind": "tag_push"})), "tag_push");
        assert_eq!(describe_kind(&json!({"object_kind": 3})), "3");
        assert_eq!(describe_kind(&json!({"object_kind": [1, 2]})), "[1,2]");
        assert_eq!(describe_kind(&json!({"object_kind": null})), "ninguno");
        assert_eq!(describe_kind(&json!({"x": 1})), "ninguno");
    }

    #[test]
    fn object_kind_reads_only_strings() {
        assert_eq!(object_kind(&json!({"object_kind": "push"})), Some("push"));
        assert_eq!(object_kind(&json!({"object_kind": 3})), None);
        assert_eq!(object_kind(&json!({"x": 1})), None);
    }
}
