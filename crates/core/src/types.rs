//! Shared primitive types and lenient deserialization helpers.
//!
//! The upstream backend is loosely typed: numeric columns arrive as numbers,
//! numeric strings, empty strings or `null` depending on the endpoint. The
//! helpers here normalise those shapes at the deserialization boundary.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Identifier of an upstream record.
///
/// Upstream ids are integers for most collections and strings for a few
/// (officer codes). The original representation is preserved so it can be
/// sent back verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Number(i64),
    Text(String),
}

impl RecordId {
    /// Parse an id taken from a URL path segment.
    pub fn from_path(segment: &str) -> Self {
        match segment.parse::<i64>() {
            Ok(n) => RecordId::Number(n),
            Err(_) => RecordId::Text(segment.to_string()),
        }
    }

    /// Placeholder id for a record the server created without echoing it back.
    pub fn provisional() -> Self {
        RecordId::Text(format!("local-{}", uuid::Uuid::new_v4()))
    }

    pub fn is_provisional(&self) -> bool {
        matches!(self, RecordId::Text(s) if s.starts_with("local-"))
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Number(n) => write!(f, "{n}"),
            RecordId::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Loose {
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
}

/// Deserialize a value that may be a string, a number or `null` into an
/// optional string. Empty strings become `None`.
pub fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<Loose> = Option::deserialize(deserializer)?;
    Ok(match value {
        None => None,
        Some(Loose::Int(n)) => Some(n.to_string()),
        Some(Loose::Float(n)) => Some(n.to_string()),
        Some(Loose::Bool(b)) => Some(b.to_string()),
        Some(Loose::Text(s)) if s.trim().is_empty() => None,
        Some(Loose::Text(s)) => Some(s),
    })
}

/// Like [`lenient_string`] but for required text: `null` becomes `""`.
pub fn flexible_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    lenient_string(deserializer).map(Option::unwrap_or_default)
}

/// Deserialize a number that may arrive as a numeric string. Missing,
/// blank or unparsable values become `0.0`.
pub fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<Loose> = Option::deserialize(deserializer)?;
    Ok(match value {
        Some(Loose::Int(n)) => n as f64,
        Some(Loose::Float(n)) => n,
        Some(Loose::Text(s)) => s.trim().replace(',', "").parse().unwrap_or(0.0),
        Some(Loose::Bool(_)) | None => 0.0,
    })
}

/// Integer variant of [`lenient_f64`]; fractional values are truncated.
pub fn lenient_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<Loose> = Option::deserialize(deserializer)?;
    Ok(match value {
        Some(Loose::Int(n)) => n,
        Some(Loose::Float(n)) => n as i64,
        Some(Loose::Text(s)) => {
            let s = s.trim();
            s.parse::<i64>()
                .or_else(|_| s.parse::<f64>().map(|f| f as i64))
                .unwrap_or(0)
        }
        Some(Loose::Bool(_)) | None => 0,
    })
}

/// Booleans that may arrive as `0`/`1`, `"true"`/`"false"` or `"active"`.
pub fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<Loose> = Option::deserialize(deserializer)?;
    Ok(match value {
        Some(Loose::Bool(b)) => b,
        Some(Loose::Int(n)) => n != 0,
        Some(Loose::Float(n)) => n != 0.0,
        Some(Loose::Text(s)) => matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "true" | "1" | "active" | "yes"
        ),
        None => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Row {
        #[serde(default, deserialize_with = "lenient_string")]
        text: Option<String>,
        #[serde(default, deserialize_with = "lenient_f64")]
        amount: f64,
        #[serde(default, deserialize_with = "lenient_i64")]
        count: i64,
        #[serde(default, deserialize_with = "lenient_bool")]
        flag: bool,
    }

    #[test]
    fn record_id_parses_numeric_path_segments() {
        assert_eq!(RecordId::from_path("42"), RecordId::Number(42));
        assert_eq!(
            RecordId::from_path("OFF1001"),
            RecordId::Text("OFF1001".into())
        );
    }

    #[test]
    fn record_id_deserializes_numbers_and_strings() {
        let ids: Vec<RecordId> = serde_json::from_str(r#"[7, "OFF7"]"#).unwrap();
        assert_eq!(ids, vec![RecordId::Number(7), RecordId::Text("OFF7".into())]);
        assert_eq!(ids[0].to_string(), "7");
    }

    #[test]
    fn provisional_ids_are_recognised() {
        assert!(RecordId::provisional().is_provisional());
        assert!(!RecordId::Number(3).is_provisional());
    }

    #[test]
    fn lenient_fields_accept_mixed_shapes() {
        let row: Row = serde_json::from_str(
            r#"{"text": 12, "amount": "18,600", "count": "7", "flag": 1}"#,
        )
        .unwrap();
        assert_eq!(row.text.as_deref(), Some("12"));
        assert_eq!(row.amount, 18600.0);
        assert_eq!(row.count, 7);
        assert!(row.flag);
    }

    #[test]
    fn lenient_fields_default_missing_and_blank_values() {
        let row: Row = serde_json::from_str(r#"{"text": "  ", "amount": null}"#).unwrap();
        assert_eq!(row.text, None);
        assert_eq!(row.amount, 0.0);
        assert_eq!(row.count, 0);
        assert!(!row.flag);
    }
}
