//! Tag values and their qualities.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ProviderError, ProviderResult};

/// Scalar value carried by a leaf.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TagValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl TagValue {
    /// Parses `raw` into the same type as `self`.
    pub fn coerce(&self, raw: &str) -> ProviderResult<TagValue> {
        let trimmed = raw.trim();
        match self {
            TagValue::Bool(_) => parse_bool(trimmed)
                .map(TagValue::Bool)
                .ok_or_else(|| invalid(raw, "bool")),
            TagValue::Int(_) => trimmed
                .parse()
                .ok()
                .map(TagValue::Int)
                .ok_or_else(|| invalid(raw, "integer")),
            TagValue::Float(_) => trimmed
                .parse()
                .ok()
                .map(TagValue::Float)
                .ok_or_else(|| invalid(raw, "float")),
            TagValue::Text(_) => Ok(TagValue::Text(raw.to_string())),
        }
    }

    /// Best-effort typing for a tag that has no value yet.
    pub fn infer(raw: &str) -> TagValue {
        let trimmed = raw.trim();
        if trimmed.eq_ignore_ascii_case("true") || trimmed.eq_ignore_ascii_case("false") {
            TagValue::Bool(trimmed.eq_ignore_ascii_case("true"))
        } else if let Ok(i) = trimmed.parse() {
            TagValue::Int(i)
        } else if let Ok(f) = trimmed.parse() {
            TagValue::Float(f)
        } else {
            TagValue::Text(raw.to_string())
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            TagValue::Bool(_) => "bool",
            TagValue::Int(_) => "integer",
            TagValue::Float(_) => "float",
            TagValue::Text(_) => "string",
        }
    }

    pub(crate) fn to_toml(&self) -> toml_edit::Value {
        match self {
            TagValue::Bool(b) => toml_edit::Value::from(*b),
            TagValue::Int(i) => toml_edit::Value::from(*i),
            TagValue::Float(f) => toml_edit::Value::from(*f),
            TagValue::Text(s) => toml_edit::Value::from(s.as_str()),
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    if raw.eq_ignore_ascii_case("true") || raw == "1" {
        Some(true)
    } else if raw.eq_ignore_ascii_case("false") || raw == "0" {
        Some(false)
    } else {
        None
    }
}

fn invalid(raw: &str, expected: &str) -> ProviderError {
    ProviderError::new(format!("cannot convert '{raw}' to {expected}"))
}

impl fmt::Display for TagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagValue::Bool(b) => write!(f, "{b}"),
            TagValue::Int(i) => write!(f, "{i}"),
            TagValue::Float(v) => write!(f, "{v}"),
            TagValue::Text(s) => write!(f, "{s}"),
        }
    }
}

/// Quality of a read value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quality {
    Good,
    /// The tag exists but holds no value
    Uncertain,
    /// The tag is unknown to the server
    Bad,
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quality::Good => write!(f, "good"),
            Quality::Uncertain => write!(f, "uncertain"),
            Quality::Bad => write!(f, "bad"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coerce_keeps_existing_type() {
        assert_eq!(
            TagValue::Int(3).coerce(" 42 ").unwrap(),
            TagValue::Int(42)
        );
        assert_eq!(
            TagValue::Float(0.5).coerce("2").unwrap(),
            TagValue::Float(2.0)
        );
        assert_eq!(
            TagValue::Bool(false).coerce("TRUE").unwrap(),
            TagValue::Bool(true)
        );
        assert_eq!(
            TagValue::Text("a".into()).coerce("12").unwrap(),
            TagValue::Text("12".into())
        );
    }

    #[test]
    fn test_coerce_rejects_mismatched_text() {
        let err = TagValue::Int(1).coerce("abc").unwrap_err();
        assert_eq!(err.message, "cannot convert 'abc' to integer");
    }

    #[test]
    fn test_infer_prefers_narrowest_type() {
        assert_eq!(TagValue::infer("false"), TagValue::Bool(false));
        assert_eq!(TagValue::infer("-7"), TagValue::Int(-7));
        assert_eq!(TagValue::infer("1"), TagValue::Int(1));
        assert_eq!(TagValue::infer("1.25"), TagValue::Float(1.25));
        assert_eq!(TagValue::infer("idle"), TagValue::Text("idle".into()));
    }
}
