//! GalleryPatch -> DbPatchable implementation.
//!
//! This sits in the `db` module because it contains SQL/table knowledge.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::db::patch::{CategoryPatch, DbPatchable, GalleryPatch, PhotoPatch};
use crate::error::PhotonError;

#[async_trait]
impl DbPatchable for GalleryPatch {
    async fn apply_patch(&self, pool: &SqlitePool) -> Result<(), PhotonError> {
        if self.is_empty() {
            return Err(PhotonError::BadRequest("nothing changed".to_string()));
        }

        match self {
            GalleryPatch::Photo { id, patch } => {
                let PhotoPatch {
                    name,
                    description,
                    date_taken,
                    hidden,
                    href_preview,
                    href_medium,
                    href_large,
                } = patch.clone();

                let updated_at = Utc::now();

                // Non-macro query API keeps us off SQLx's offline cache.
                let res = sqlx::query(
                    r#"
                    UPDATE photos
                    SET
                        name = COALESCE(?, name),
                        description = COALESCE(?, description),
                        date_taken = COALESCE(?, date_taken),
                        hidden = COALESCE(?, hidden),
                        href_preview = COALESCE(?, href_preview),
                        href_medium = COALESCE(?, href_medium),
                        href_large = COALESCE(?, href_large),
                        updated_at = ?
                    WHERE photo_id = ?
                    "#,
                )
                .bind(name)
                .bind(description)
                .bind(date_taken)
                .bind(hidden)
                .bind(href_preview)
                .bind(href_medium)
                .bind(href_large)
                .bind(updated_at)
                .bind(id)
                .execute(pool)
                .await?;

                let affected = res.rows_affected();
                debug!(table = "photos", id, affected, "db patch applied");

                if affected == 0 {
                    return Err(PhotonError::NotFound);
                }

                Ok(())
            }

            GalleryPatch::Category { id, patch } => {
                let CategoryPatch {
                    name,
                    alias,
                    description,
                    hidden,
                } = patch.clone();

                let updated_at = Utc::now();

                let res = sqlx::query(
                    r#"
                    UPDATE categories
                    SET
                        name = COALESCE(?, name),
                        alias = COALESCE(?, alias),
                        description = COALESCE(?, description),
                        hidden = COALESCE(?, hidden),
                        updated_at = ?
                    WHERE category_id = ?
                    "#,
                )
                .bind(name)
                .bind(alias)
                .bind(description)
                .bind(hidden)
                .bind(updated_at)
                .bind(id)
                .execute(pool)
                .await?;

                let affected = res.rows_affected();
                debug!(table = "categories", id, affected, "db patch applied");

                if affected == 0 {
                    return Err(PhotonError::NotFound);
                }

                Ok(())
            }
        }
    }
}
