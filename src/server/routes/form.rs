//! Urlencoded form access for the flat master dispatch. Keeps repeated
//! keys (id lists) and builds the request echo for the envelope.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::error::PhotonError;

pub struct FormFields {
    pairs: Vec<(String, String)>,
}

impl FormFields {
    pub fn parse(bytes: &[u8]) -> Self {
        let pairs = url::form_urlencoded::parse(bytes)
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        Self { pairs }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn get_all(&self, key: &str) -> Vec<&str> {
        self.pairs
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    pub fn require(&self, key: &str) -> Result<&str, PhotonError> {
        self.get(key)
            .ok_or_else(|| PhotonError::BadRequest(format!("missing required field: {key}")))
    }

    /// Boolean field. Only explicit truthy spellings count; anything else
    /// (including an absent key) is false.
    pub fn flag(&self, key: &str) -> bool {
        self.opt_flag(key).unwrap_or(false)
    }

    /// Tri-state boolean for patches: absent key means "do not change".
    pub fn opt_flag(&self, key: &str) -> Option<bool> {
        self.get(key)
            .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
    }

    pub fn id(&self, key: &str) -> Result<i64, PhotonError> {
        self.require(key)?
            .parse()
            .map_err(|_| PhotonError::BadRequest(format!("field {key} must be a numeric id")))
    }

    /// All values of a repeated id field. Empty values are skipped so a
    /// bare `key=` does not fail the whole request.
    pub fn id_list(&self, key: &str) -> Result<Vec<i64>, PhotonError> {
        self.get_all(key)
            .into_iter()
            .filter(|v| !v.is_empty())
            .map(|v| {
                v.parse().map_err(|_| {
                    PhotonError::BadRequest(format!("field {key} must contain numeric ids"))
                })
            })
            .collect()
    }

    /// Optional RFC3339 timestamp field.
    pub fn timestamp(&self, key: &str) -> Result<Option<DateTime<Utc>>, PhotonError> {
        match self.get(key) {
            None => Ok(None),
            Some(raw) => DateTime::parse_from_rfc3339(raw)
                .map(|t| Some(t.with_timezone(&Utc)))
                .map_err(|_| {
                    PhotonError::BadRequest(format!("field {key} must be an RFC3339 timestamp"))
                }),
        }
    }

    /// Request echo for the envelope: route params plus every submitted
    /// field; repeated keys collapse into arrays.
    pub fn echo(&self, route: &[(&str, &str)]) -> Value {
        let mut map = Map::new();
        for (k, v) in route {
            map.insert((*k).to_string(), Value::String((*v).to_string()));
        }
        for (k, v) in &self.pairs {
            match map.get_mut(k) {
                None => {
                    map.insert(k.clone(), Value::String(v.clone()));
                }
                Some(Value::Array(items)) => items.push(Value::String(v.clone())),
                Some(existing) => {
                    let first = existing.take();
                    *existing = Value::Array(vec![first, Value::String(v.clone())]);
                }
            }
        }
        Value::Object(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn repeated_keys_are_kept_and_echoed_as_arrays() {
        let form = FormFields::parse(b"name=sunset&categories=1&categories=2");
        assert_eq!(form.get("name"), Some("sunset"));
        assert_eq!(form.get_all("categories"), vec!["1", "2"]);
        assert_eq!(form.id_list("categories").unwrap(), vec![1, 2]);

        let echo = form.echo(&[("task", "create"), ("subject", "photo")]);
        assert_eq!(echo["task"], "create");
        assert_eq!(echo["categories"], json!(["1", "2"]));
        assert_eq!(echo["name"], "sunset");
    }

    #[test]
    fn missing_required_field_is_a_bad_request() {
        let form = FormFields::parse(b"description=dusk");
        assert!(matches!(
            form.require("name"),
            Err(PhotonError::BadRequest(_))
        ));
    }

    #[test]
    fn flags_only_accept_explicit_truthy_values() {
        let form = FormFields::parse(b"a=1&b=true&c=false&d=garbage&e=");
        assert!(form.flag("a"));
        assert!(form.flag("b"));
        assert!(!form.flag("c"));
        assert!(!form.flag("d"));
        assert!(!form.flag("e"));
        assert!(!form.flag("missing"));
        assert_eq!(form.opt_flag("c"), Some(false));
        assert_eq!(form.opt_flag("missing"), None);
    }

    #[test]
    fn timestamps_must_be_rfc3339() {
        let ok = FormFields::parse(b"timestamp=2024-06-01T12:00:00Z");
        assert!(ok.timestamp("timestamp").unwrap().is_some());

        let bad = FormFields::parse(b"timestamp=01.06.24+12%3A00");
        assert!(bad.timestamp("timestamp").is_err());

        let absent = FormFields::parse(b"name=x");
        assert_eq!(absent.timestamp("timestamp").unwrap(), None);
    }
}
