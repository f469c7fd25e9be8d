//! Admin surface: `POST /master/{task}/{subject}[/{infra_subject}]`.
//!
//! Flat dispatch: one (task, subject) combination maps to one store call.
//! Every route here sits behind the admin-key guard layered in
//! `server::router`.

use axum::{
    Router,
    extract::{Path, RawForm, State},
    response::{IntoResponse, Response},
    routing::post,
};
use serde::Serialize;
use serde_json::{Value, json};

use crate::config::Config;
use crate::db::{
    CategoryCreate, CategoryPatch, GalleryCreate, GalleryPatch, PhotoCreate, PhotoHrefs,
    PhotoPatch, RelationFault, Visibility,
};
use crate::disk::{self, SyncReport};
use crate::envelope::{ERR_COMMUNICATION, Envelope, ErrorEntry};
use crate::error::PhotonError;
use crate::server::router::PhotonState;

use super::form::FormFields;

pub fn router() -> Router<PhotonState> {
    Router::new()
        .route("/master/{task}/{subject}", post(dispatch_subject))
        .route(
            "/master/{task}/{subject}/{infra_subject}",
            post(dispatch_infra),
        )
}

async fn dispatch_subject(
    State(state): State<PhotonState>,
    Path((task, subject)): Path<(String, String)>,
    RawForm(body): RawForm,
) -> Response {
    dispatch(&state, &task, &subject, None, &body).await.into_response()
}

async fn dispatch_infra(
    State(state): State<PhotonState>,
    Path((task, subject, infra_subject)): Path<(String, String, String)>,
    RawForm(body): RawForm,
) -> Response {
    dispatch(&state, &task, &subject, Some(&infra_subject), &body)
        .await
        .into_response()
}

/// Handler outcome before the request echo is attached.
struct Outcome {
    response: Value,
    errors: Vec<ErrorEntry>,
}

impl Outcome {
    fn payload<T: Serialize>(payload: &T) -> Self {
        let response = serde_json::to_value(payload)
            .unwrap_or_else(|e| json!({ "serialize_error": e.to_string() }));
        Self {
            response,
            errors: Vec::new(),
        }
    }

    fn success() -> Self {
        Self::success_with(Vec::new())
    }

    fn success_with(errors: Vec<ErrorEntry>) -> Self {
        Self {
            response: json!({ "success": true }),
            errors,
        }
    }

    fn into_envelope(self, request: Value) -> Envelope {
        Envelope {
            request,
            response: self.response,
            errors: self.errors,
        }
    }
}

async fn dispatch(
    state: &PhotonState,
    task: &str,
    subject: &str,
    infra_subject: Option<&str>,
    body: &[u8],
) -> Envelope {
    let form = FormFields::parse(body);
    let mut route = vec![("task", task), ("subject", subject)];
    if let Some(infra) = infra_subject {
        route.push(("infra_subject", infra));
    }
    let request = form.echo(&route);

    let result = match subject {
        "photo" => photo_task(state, task, &form).await,
        "category" => category_task(state, task, &form).await,
        "relation" => relation_task(state, task, infra_subject, &form).await,
        "storage" => storage_task(state, task, &form).await,
        _ => Err(PhotonError::BadRequest(format!(
            "unknown subject: {subject}"
        ))),
    };

    match result {
        Ok(outcome) => outcome.into_envelope(request),
        Err(e) => Envelope::failure(request, e.entry()),
    }
}

fn relation_entries(faults: &[RelationFault]) -> Vec<ErrorEntry> {
    faults
        .iter()
        .map(|f| ErrorEntry::communication(Some(f.describe())))
        .collect()
}

async fn photo_task(
    state: &PhotonState,
    task: &str,
    form: &FormFields,
) -> Result<Outcome, PhotonError> {
    match task {
        "create" => {
            let name = form.require("name")?.to_string();
            let description = form.get("description").map(str::to_string);
            let date_taken = form.timestamp("timestamp")?;
            let hidden = form.flag("hidden");
            // Either all three hrefs come with the request (the row is
            // complete immediately) or none do (the sync loop fills them).
            let hrefs = match (
                form.get("href_preview"),
                form.get("href_medium"),
                form.get("href_large"),
            ) {
                (Some(p), Some(m), Some(l)) => Some(PhotoHrefs {
                    preview: p.to_string(),
                    medium: m.to_string(),
                    large: l.to_string(),
                }),
                (None, None, None) => None,
                _ => {
                    return Err(PhotonError::BadRequest(
                        "href_preview, href_medium and href_large must be supplied together"
                            .to_string(),
                    ));
                }
            };
            let categories = form.id_list("categories")?;

            let photo_id = state
                .db
                .create(GalleryCreate::Photo(PhotoCreate {
                    name,
                    description,
                    date_taken,
                    hidden,
                    hrefs,
                }))
                .await?;

            let faults = state.db.assign_photo_categories(photo_id, categories).await?;
            Ok(Outcome {
                response: json!({ "photo_id": photo_id }),
                errors: relation_entries(&faults),
            })
        }

        "modify" => {
            let id = form.id("id")?;
            let patch = PhotoPatch {
                name: form.get("name").map(str::to_string),
                description: form.get("description").map(str::to_string),
                date_taken: form.timestamp("timestamp")?,
                hidden: form.opt_flag("hidden"),
                href_preview: form.get("href_preview").map(str::to_string),
                href_medium: form.get("href_medium").map(str::to_string),
                href_large: form.get("href_large").map(str::to_string),
            };
            state.db.patch(GalleryPatch::Photo { id, patch }).await?;
            Ok(Outcome::success())
        }

        "get" => {
            let id = form.id("id")?;
            let vis = Visibility {
                include_hidden: form.flag("include_hidden"),
                include_incomplete: form.flag("include_incomplete"),
            };
            let photo = state.db.get_photo(id, vis).await?;
            Ok(Outcome::payload(&photo))
        }

        "index" => {
            let vis = Visibility {
                include_hidden: form.flag("include_hidden"),
                include_incomplete: form.flag("include_incomplete"),
            };
            let photos = state.db.photo_index(vis).await?;
            Ok(Outcome::payload(&photos))
        }

        _ => Err(PhotonError::BadRequest(format!("unknown task: {task}"))),
    }
}

async fn category_task(
    state: &PhotonState,
    task: &str,
    form: &FormFields,
) -> Result<Outcome, PhotonError> {
    match task {
        "create" => {
            let create = CategoryCreate {
                name: form.require("name")?.to_string(),
                alias: form.require("alias")?.to_string(),
                description: form.get("description").map(str::to_string),
                hidden: form.flag("hidden"),
            };
            let category_id = state.db.create(GalleryCreate::Category(create)).await?;
            Ok(Outcome {
                response: json!({ "category_id": category_id }),
                errors: Vec::new(),
            })
        }

        "modify" => {
            let id = form.id("id")?;
            let patch = CategoryPatch {
                name: form.get("name").map(str::to_string),
                alias: form.get("alias").map(str::to_string),
                description: form.get("description").map(str::to_string),
                hidden: form.opt_flag("hidden"),
            };
            state.db.patch(GalleryPatch::Category { id, patch }).await?;
            Ok(Outcome::success())
        }

        "get" => {
            // `label` is a numeric id or an alias; `id` is accepted as an
            // alias spelling of the same thing.
            let label = form
                .get("label")
                .or_else(|| form.get("id"))
                .ok_or_else(|| {
                    PhotonError::BadRequest("missing required field: label".to_string())
                })?;
            let category = state
                .db
                .category_by_label(label, form.flag("include_hidden"))
                .await?;
            Ok(Outcome::payload(&category))
        }

        "index" => {
            let categories = state.db.category_index(form.flag("include_hidden")).await?;
            Ok(Outcome::payload(&categories))
        }

        _ => Err(PhotonError::BadRequest(format!("unknown task: {task}"))),
    }
}

async fn relation_task(
    state: &PhotonState,
    task: &str,
    infra_subject: Option<&str>,
    form: &FormFields,
) -> Result<Outcome, PhotonError> {
    match infra_subject {
        Some("photo") => {
            let photo_id = form.id("photo_id")?;
            match task {
                "create" => {
                    let ids = form.id_list("category_ids_list")?;
                    let faults = state.db.assign_photo_categories(photo_id, ids).await?;
                    Ok(Outcome::success_with(relation_entries(&faults)))
                }
                "modify" => {
                    let ids = form.id_list("category_ids_list")?;
                    let faults = state.db.replace_photo_categories(photo_id, ids).await?;
                    Ok(Outcome::success_with(relation_entries(&faults)))
                }
                "delete" => {
                    state.db.clear_photo_categories(photo_id).await?;
                    Ok(Outcome::success())
                }
                "get" => {
                    let categories = state
                        .db
                        .categories_of_photo(photo_id, form.flag("include_hidden"))
                        .await?;
                    Ok(Outcome::payload(&categories))
                }
                _ => Err(PhotonError::BadRequest(format!("unknown task: {task}"))),
            }
        }

        Some("category") => {
            let category_id = form.id("category_id")?;
            match task {
                "create" => {
                    let ids = form.id_list("photo_ids_list")?;
                    let faults = state.db.assign_category_photos(category_id, ids).await?;
                    Ok(Outcome::success_with(relation_entries(&faults)))
                }
                "modify" => {
                    let ids = form.id_list("photo_ids_list")?;
                    let faults = state.db.replace_category_photos(category_id, ids).await?;
                    Ok(Outcome::success_with(relation_entries(&faults)))
                }
                "delete" => {
                    state.db.clear_category_photos(category_id).await?;
                    Ok(Outcome::success())
                }
                "get" => {
                    let vis = Visibility {
                        include_hidden: form.flag("include_hidden"),
                        include_incomplete: form.flag("include_incomplete"),
                    };
                    let photos = state.db.photos_of_category(category_id, vis).await?;
                    Ok(Outcome::payload(&photos))
                }
                _ => Err(PhotonError::BadRequest(format!("unknown task: {task}"))),
            }
        }

        _ => Err(PhotonError::BadRequest(
            "relation routes need a photo or category infra subject".to_string(),
        )),
    }
}

async fn storage_task(
    state: &PhotonState,
    task: &str,
    form: &FormFields,
) -> Result<Outcome, PhotonError> {
    match task {
        "modify" => {
            let token = form.get("token");
            let remote_folder = form.get("remote_folder");
            if token.is_none() && remote_folder.is_none() {
                return Err(PhotonError::BadRequest("nothing changed".to_string()));
            }

            let updated = {
                let mut settings = state.storage.write().await;
                if let Some(token) = token {
                    settings.token = token.to_string();
                }
                if let Some(folder) = remote_folder {
                    settings.remote_folder = folder.to_string();
                }
                settings.clone()
            };
            Config::persist_storage(&updated)?;
            Ok(Outcome::success())
        }

        "sync" => {
            let report = disk::sync_missing_hrefs(&state.db, &state.disk).await?;
            Ok(sync_outcome(&report))
        }

        "refresh" => {
            let report = disk::refresh_all_hrefs(&state.db, &state.disk).await?;
            Ok(sync_outcome(&report))
        }

        _ => Err(PhotonError::BadRequest(format!("unknown task: {task}"))),
    }
}

fn sync_outcome(report: &SyncReport) -> Outcome {
    let errors = report
        .faults
        .iter()
        .map(|f| {
            ErrorEntry::new(
                ERR_COMMUNICATION,
                "remote storage resolution failed",
                Some(format!("photo {}: {}", f.photo_id, f.detail)),
            )
        })
        .collect();
    Outcome {
        response: json!({ "synced": report.synced }),
        errors,
    }
}
