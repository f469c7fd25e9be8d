use crate::envelope::{Envelope, ErrorEntry};
use crate::server::router::PhotonState;
use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
    response::{IntoResponse, Response},
};
use subtle::ConstantTimeEq;

/// Route-layer guard for the admin surface: the raw `Authorization` header
/// value must equal the configured master key.
#[derive(Debug, Clone, Copy)]
pub struct RequireKeyAuth;

impl FromRequestParts<PhotonState> for RequireKeyAuth {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &PhotonState,
    ) -> Result<Self, Self::Rejection> {
        let supplied = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok());

        match supplied {
            Some(key) => {
                let expected = state.master_key.as_ref();
                if key.as_bytes().ct_eq(expected.as_bytes()).into() {
                    Ok(RequireKeyAuth)
                } else {
                    Err(AuthError::InvalidKey)
                }
            }
            None => Err(AuthError::MissingKey),
        }
    }
}

pub enum AuthError {
    MissingKey,
    InvalidKey,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let reason = match self {
            AuthError::MissingKey => "missing admin key",
            AuthError::InvalidKey => "invalid admin key",
        };
        Envelope::failure(
            serde_json::Value::Null,
            ErrorEntry::unauthorized(Some(reason.to_string())),
        )
        .into_response()
    }
}
