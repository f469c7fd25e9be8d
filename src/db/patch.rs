//! Create payloads and partial-update (`Option`-field) patch types.
//!
//! `None` in a patch means "do not change"; `Some(v)` overwrites. Optional
//! columns cannot be nulled back out through a patch, matching the
//! partial-update contract of the modify operations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::db::models::PhotoHrefs;

/// Abstraction for applying a patch payload to the database.
#[async_trait]
pub trait DbPatchable {
    async fn apply_patch(&self, pool: &SqlitePool) -> Result<(), crate::error::PhotonError>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhotoCreate {
    pub name: String,
    pub description: Option<String>,
    pub date_taken: Option<DateTime<Utc>>,
    pub hidden: bool,
    /// Supplied when the caller already knows the remote URLs; the row is
    /// then complete from the start instead of waiting for a sync pass.
    pub hrefs: Option<PhotoHrefs>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryCreate {
    pub name: String,
    pub alias: String,
    pub description: Option<String>,
    pub hidden: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
#[serde(rename_all = "snake_case")]
pub enum GalleryCreate {
    Photo(PhotoCreate),
    Category(CategoryCreate),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PhotoPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub date_taken: Option<DateTime<Utc>>,
    pub hidden: Option<bool>,
    pub href_preview: Option<String>,
    pub href_medium: Option<String>,
    pub href_large: Option<String>,
}

impl PhotoPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.date_taken.is_none()
            && self.hidden.is_none()
            && self.href_preview.is_none()
            && self.href_medium.is_none()
            && self.href_large.is_none()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub alias: Option<String>,
    pub description: Option<String>,
    pub hidden: Option<bool>,
}

impl CategoryPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.alias.is_none()
            && self.description.is_none()
            && self.hidden.is_none()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
#[serde(rename_all = "snake_case")]
pub enum GalleryPatch {
    Photo { id: i64, patch: PhotoPatch },
    Category { id: i64, patch: CategoryPatch },
}

impl GalleryPatch {
    pub fn id(&self) -> i64 {
        match self {
            GalleryPatch::Photo { id, .. } => *id,
            GalleryPatch::Category { id, .. } => *id,
        }
    }

    /// True when no field was supplied; such a patch must never reach SQL.
    pub fn is_empty(&self) -> bool {
        match self {
            GalleryPatch::Photo { patch, .. } => patch.is_empty(),
            GalleryPatch::Category { patch, .. } => patch.is_empty(),
        }
    }
}
