//! Lazy, per-field extraction from a flat parameter map.
//!
//! Each read happens at the point of use, so the first missing required
//! parameter stops the action before later ones are looked at.

use serde_json::{Map, Value};

use crate::error::ActionError;

#[derive(Debug, Clone, Copy)]
pub struct Params<'a>(&'a Map<String, Value>);

impl<'a> Params<'a> {
    pub fn new(map: &'a Map<String, Value>) -> Self {
        Self(map)
    }

    /// Trimmed, non-empty string value or `MissingParam`.
    pub fn required_string(&self, key: &str) -> Result<String, ActionError> {
        self.optional_string(key)
            .ok_or_else(|| ActionError::MissingParam {
                name: key.to_string(),
            })
    }

    /// Trimmed string value; absent, non-string and blank all read as `None`.
    pub fn optional_string(&self, key: &str) -> Option<String> {
        let value = self.0.get(key)?.as_str()?.trim();
        (!value.is_empty()).then(|| value.to_string())
    }

    /// Finite number value; anything else reads as `None` rather than failing.
    pub fn finite_number(&self, key: &str) -> Option<f64> {
        self.0
            .get(key)?
            .as_f64()
            .filter(|n| n.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(m) => m,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn strings_are_trimmed() {
        let m = map(json!({ "channelId": "  C1 " }));
        assert_eq!(Params::new(&m).required_string("channelId").unwrap(), "C1");
    }

    #[test]
    fn blank_or_non_string_is_missing() {
        let m = map(json!({ "a": "   ", "b": 5, "c": null }));
        let p = Params::new(&m);
        for key in ["a", "b", "c", "d"] {
            let err = p.required_string(key).unwrap_err();
            assert_eq!(err.to_string(), format!("{key} required"));
            assert_eq!(p.optional_string(key), None);
        }
    }

    #[test]
    fn numbers_only_when_numeric() {
        let m = map(json!({ "n": 20, "f": 2.5, "s": "20", "b": true }));
        let p = Params::new(&m);
        assert_eq!(p.finite_number("n"), Some(20.0));
        assert_eq!(p.finite_number("f"), Some(2.5));
        assert_eq!(p.finite_number("s"), None);
        assert_eq!(p.finite_number("b"), None);
        assert_eq!(p.finite_number("missing"), None);
    }
}
