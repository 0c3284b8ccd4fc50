use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use sqlx::FromRow;

/// One row of `water_levels`. `timestamp` is always UTC.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Reading {
    pub id: i64,
    pub level: f64,
    pub timestamp: DateTime<Utc>,
}

/// Extract a numeric `level` field from an untrusted JSON object.
///
/// Only JSON numbers qualify; `0` is a valid level, while strings, booleans
/// and `null` are not.
pub fn level_from_json(body: &Value) -> Option<f64> {
    body.get("level").and_then(Value::as_f64)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn numeric_levels_accepted() {
        assert_eq!(level_from_json(&json!({ "level": 12.5 })), Some(12.5));
        assert_eq!(level_from_json(&json!({ "level": 0 })), Some(0.0));
        assert_eq!(level_from_json(&json!({ "level": -3 })), Some(-3.0));
    }

    #[test]
    fn non_numeric_levels_rejected() {
        for body in [
            json!({}),
            json!({ "level": "12.5" }),
            json!({ "level": null }),
            json!({ "level": true }),
            json!({ "level": [1] }),
            json!([{ "level": 1 }]),
            json!(4),
        ] {
            assert_eq!(level_from_json(&body), None, "{body}");
        }
    }
}
