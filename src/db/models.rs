use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct DbPhoto {
    pub photo_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub date_taken: Option<DateTime<Utc>>,
    pub hidden: bool,
    /// True until the remote URL variants have been resolved.
    pub incomplete: bool,
    pub href_preview: Option<String>,
    pub href_medium: Option<String>,
    pub href_large: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct DbCategory {
    pub category_id: i64,
    pub name: String,
    /// Unique secondary key used for label-based lookup.
    pub alias: String,
    pub description: Option<String>,
    pub hidden: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The three resolved remote URL variants of one photo. A variant the
/// remote side could not resolve is carried as an empty string.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PhotoHrefs {
    pub preview: String,
    pub medium: String,
    pub large: String,
}

/// Row-visibility filter for photo queries. Defaults match the public
/// read surface: non-hidden, complete rows only.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Visibility {
    pub include_hidden: bool,
    pub include_incomplete: bool,
}

impl Visibility {
    /// Everything, regardless of flags. Used by the href refresh loop.
    pub fn all() -> Self {
        Self {
            include_hidden: true,
            include_incomplete: true,
        }
    }
}
