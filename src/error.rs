use axum::response::IntoResponse;

use crate::envelope::{Envelope, ErrorEntry};
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum PhotonError {
    #[error("id not found")]
    NotFound,

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("empty request")]
    EmptyRequest,

    #[error("unauthorized")]
    Unauthorized,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("store actor error: {0}")]
    Actor(String),

    #[error("HTTP request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("remote storage not configured: {0}")]
    StorageUnconfigured(String),

    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl PhotonError {
    /// Wire representation of this error inside the response envelope.
    pub fn entry(&self) -> ErrorEntry {
        match self {
            PhotonError::NotFound => ErrorEntry::not_found(None),
            PhotonError::BadRequest(detail) => ErrorEntry::bad_request(Some(detail.clone())),
            PhotonError::EmptyRequest => ErrorEntry::empty(),
            PhotonError::Unauthorized => ErrorEntry::unauthorized(None),
            PhotonError::Database(e) => ErrorEntry::communication(Some(e.to_string())),
            PhotonError::Actor(detail) => ErrorEntry::connection(Some(detail.clone())),
            PhotonError::StorageUnconfigured(detail) => {
                ErrorEntry::connection(Some(detail.clone()))
            }
            PhotonError::Request(e) => ErrorEntry::communication(Some(e.to_string())),
            PhotonError::Json(e) => ErrorEntry::communication(Some(e.to_string())),
            PhotonError::Io(e) => ErrorEntry::communication(Some(e.to_string())),
            PhotonError::Unexpected(detail) => ErrorEntry::communication(Some(detail.clone())),
        }
    }
}

impl IntoResponse for PhotonError {
    fn into_response(self) -> axum::response::Response {
        // Used by extractors/guards that fail before a request echo exists;
        // handlers build their envelopes explicitly.
        Envelope::failure(serde_json::Value::Null, self.entry()).into_response()
    }
}
