//! Wire envelope: every response body is `{request, response, errors}`.
//!
//! Envelopes are plain values constructed per call; nothing is shared
//! between requests and nothing has to be reset.

use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use serde_json::{Value, json};

pub const ERR_NOT_FOUND: i32 = -1;
pub const ERR_COMMUNICATION: i32 = -2;
pub const ERR_CONNECTION: i32 = -3;
pub const ERR_EMPTY: i32 = -4;
pub const ERR_BAD_REQUEST: i32 = -5;
pub const ERR_UNAUTHORIZED: i32 = -6;

/// One accumulated error inside the envelope.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ErrorEntry {
    pub error_id: i32,
    pub error_description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_error: Option<String>,
}

impl ErrorEntry {
    pub fn new(error_id: i32, description: &str, raw_error: Option<String>) -> Self {
        Self {
            error_id,
            error_description: description.to_string(),
            raw_error,
        }
    }

    pub fn not_found(raw_error: Option<String>) -> Self {
        Self::new(ERR_NOT_FOUND, "id not found", raw_error)
    }

    pub fn communication(raw_error: Option<String>) -> Self {
        Self::new(ERR_COMMUNICATION, "database communication issue", raw_error)
    }

    pub fn connection(raw_error: Option<String>) -> Self {
        Self::new(ERR_CONNECTION, "store connection unavailable", raw_error)
    }

    pub fn empty() -> Self {
        Self::new(ERR_EMPTY, "empty request", None)
    }

    pub fn bad_request(raw_error: Option<String>) -> Self {
        Self::new(ERR_BAD_REQUEST, "bad request", raw_error)
    }

    pub fn unauthorized(raw_error: Option<String>) -> Self {
        Self::new(ERR_UNAUTHORIZED, "unauthorized", raw_error)
    }

    /// HTTP status this error category maps to. Store-side categories stay
    /// 200 with embedded error semantics.
    fn status(&self) -> StatusCode {
        match self.error_id {
            ERR_NOT_FOUND => StatusCode::NOT_FOUND,
            ERR_EMPTY | ERR_BAD_REQUEST => StatusCode::BAD_REQUEST,
            ERR_UNAUTHORIZED => StatusCode::UNAUTHORIZED,
            _ => StatusCode::OK,
        }
    }
}

/// The `{request, response, errors}` response wrapper.
#[derive(Debug, Clone, Serialize)]
pub struct Envelope {
    pub request: Value,
    pub response: Value,
    pub errors: Vec<ErrorEntry>,
}

impl Envelope {
    /// A successful response carrying a typed payload.
    pub fn payload<T: Serialize>(request: Value, payload: &T) -> Self {
        let response = serde_json::to_value(payload)
            .unwrap_or_else(|e| json!({ "serialize_error": e.to_string() }));
        Self {
            request,
            response,
            errors: Vec::new(),
        }
    }

    /// `{"success": true}` with no errors.
    pub fn success(request: Value) -> Self {
        Self::success_with(request, Vec::new())
    }

    /// `{"success": true}` with accumulated non-fatal errors (e.g. per-pair
    /// relation insert conflicts).
    pub fn success_with(request: Value, errors: Vec<ErrorEntry>) -> Self {
        Self {
            request,
            response: json!({ "success": true }),
            errors,
        }
    }

    /// A failed call: empty response object plus one error entry.
    pub fn failure(request: Value, error: ErrorEntry) -> Self {
        Self {
            request,
            response: json!({}),
            errors: vec![error],
        }
    }

    /// Status is taken from the first error; a clean envelope is 200.
    pub fn status(&self) -> StatusCode {
        self.errors
            .first()
            .map_or(StatusCode::OK, ErrorEntry::status)
    }
}

impl IntoResponse for Envelope {
    fn into_response(self) -> axum::response::Response {
        (self.status(), Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_envelope_serializes_with_empty_errors() {
        let env = Envelope::payload(json!({"task": "get"}), &json!({"photo_id": 7}));
        let v = serde_json::to_value(&env).unwrap();
        assert_eq!(v["request"]["task"], "get");
        assert_eq!(v["response"]["photo_id"], 7);
        assert_eq!(v["errors"], json!([]));
        assert_eq!(env.status(), StatusCode::OK);
    }

    #[test]
    fn raw_error_is_omitted_when_absent() {
        let entry = ErrorEntry::not_found(None);
        let v = serde_json::to_value(&entry).unwrap();
        assert!(v.get("raw_error").is_none());
        assert_eq!(v["error_id"], -1);
    }

    #[test]
    fn failure_statuses_follow_error_category() {
        let req = Value::Null;
        assert_eq!(
            Envelope::failure(req.clone(), ErrorEntry::not_found(None)).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            Envelope::failure(req.clone(), ErrorEntry::bad_request(None)).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            Envelope::failure(req.clone(), ErrorEntry::empty()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            Envelope::failure(req.clone(), ErrorEntry::unauthorized(None)).status(),
            StatusCode::UNAUTHORIZED
        );
        // Store-side failures keep embedded-error semantics.
        assert_eq!(
            Envelope::failure(req, ErrorEntry::communication(None)).status(),
            StatusCode::OK
        );
    }

    #[test]
    fn success_with_warnings_stays_200() {
        let env = Envelope::success_with(
            json!({"task": "create"}),
            vec![ErrorEntry::communication(Some("duplicate pair".into()))],
        );
        assert_eq!(env.status(), StatusCode::OK);
        let v = serde_json::to_value(&env).unwrap();
        assert_eq!(v["response"]["success"], true);
        assert_eq!(v["errors"][0]["error_id"], -2);
    }
}
