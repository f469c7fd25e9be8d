//! Public read surface: `GET /client/{task}?id=...`.
//!
//! Unauthenticated and visibility-filtered: only non-hidden, complete rows
//! are ever served here.

use axum::{
    Router,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::db::Visibility;
use crate::envelope::Envelope;
use crate::error::PhotonError;
use crate::server::router::PhotonState;

pub fn router() -> Router<PhotonState> {
    Router::new().route("/client/{task}", get(dispatch))
}

#[derive(Debug, Deserialize)]
struct ClientParams {
    id: Option<String>,
}

async fn dispatch(
    State(state): State<PhotonState>,
    Path(task): Path<String>,
    Query(params): Query<ClientParams>,
) -> Response {
    let request = json!({ "task": task, "id": params.id });

    let result = serve(&state, &task, params.id.as_deref()).await;
    match result {
        Ok(payload) => Envelope::payload(request, &payload).into_response(),
        Err(e) => Envelope::failure(request, e.entry()).into_response(),
    }
}

async fn serve(
    state: &PhotonState,
    task: &str,
    id: Option<&str>,
) -> Result<Value, PhotonError> {
    match task {
        "photo" => {
            let id = parse_photo_id(id.ok_or(PhotonError::EmptyRequest)?)?;
            let photo = state.db.get_photo(id, Visibility::default()).await?;
            Ok(serde_json::to_value(photo)?)
        }

        "category" => {
            let label = id.ok_or(PhotonError::EmptyRequest)?;
            let category = state.db.category_by_label(label, false).await?;
            Ok(serde_json::to_value(category)?)
        }

        "photos_of_category" => {
            let label = id.ok_or(PhotonError::EmptyRequest)?;
            let category_id = resolve_category_id(state, label).await?;
            let photos = state
                .db
                .photos_of_category(category_id, Visibility::default())
                .await?;
            Ok(serde_json::to_value(photos)?)
        }

        "categories_of_photo" => {
            let id = parse_photo_id(id.ok_or(PhotonError::EmptyRequest)?)?;
            let categories = state.db.categories_of_photo(id, false).await?;
            Ok(serde_json::to_value(categories)?)
        }

        "index" => {
            let photos = state.db.photo_index(Visibility::default()).await?;
            Ok(serde_json::to_value(photos)?)
        }

        "categories_index" => {
            let categories = state.db.category_index(false).await?;
            Ok(serde_json::to_value(categories)?)
        }

        _ => Err(PhotonError::BadRequest(format!("unknown task: {task}"))),
    }
}

fn parse_photo_id(raw: &str) -> Result<i64, PhotonError> {
    raw.parse()
        .map_err(|_| PhotonError::BadRequest("id must be numeric".to_string()))
}

/// Category references on the public surface may be numeric ids or aliases.
async fn resolve_category_id(state: &PhotonState, label: &str) -> Result<i64, PhotonError> {
    match label.parse::<i64>() {
        Ok(id) => Ok(id),
        Err(_) => Ok(state.db.category_by_label(label, false).await?.category_id),
    }
}
