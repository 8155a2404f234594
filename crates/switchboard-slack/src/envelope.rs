//! The `{ "ok": true, ... }` success shape every action returns.

use serde::Serialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Envelope(Map<String, Value>);

impl Envelope {
    pub fn ok() -> Self {
        let mut map = Map::new();
        map.insert("ok".to_string(), Value::Bool(true));
        Self(map)
    }

    /// Nest `value` under `key`.
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.0.insert(key.to_string(), value.into());
        self
    }

    /// Spread the fields of an object into the envelope; `ok` always stays `true`.
    pub fn merge(mut self, value: Value) -> Self {
        if let Value::Object(fields) = value {
            self.0.extend(fields);
        }
        self.0.insert("ok".to_string(), Value::Bool(true));
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn is_ok(&self) -> bool {
        self.0.get("ok") == Some(&Value::Bool(true))
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn nests_payload() {
        let env = Envelope::ok().with("pins", json!([1, 2]));
        assert_eq!(env.into_value(), json!({ "ok": true, "pins": [1, 2] }));
    }

    #[test]
    fn merge_spreads_and_keeps_ok() {
        let env = Envelope::ok().merge(json!({ "messages": [], "hasMore": false, "ok": false }));
        assert!(env.is_ok());
        assert_eq!(env.get("hasMore"), Some(&json!(false)));
    }
}
