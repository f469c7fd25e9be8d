//! Batch href resolution. Both loops are sequential and failure-tolerant:
//! a photo that cannot be resolved is recorded as a fault and the loop
//! moves on. Nothing is rolled back and nothing is retried.

use serde::Serialize;
use tracing::{info, warn};

use crate::db::{DbActorHandle, DbPhoto, Visibility};
use crate::disk::client::DiskClient;
use crate::error::PhotonError;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SyncFault {
    pub photo_id: i64,
    pub detail: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SyncReport {
    pub synced: usize,
    pub faults: Vec<SyncFault>,
}

/// Resolve hrefs for every photo still flagged incomplete.
pub async fn sync_missing_hrefs(
    db: &DbActorHandle,
    disk: &DiskClient,
) -> Result<SyncReport, PhotonError> {
    disk.assert_configured().await?;
    let pending = db.incomplete_photos().await?;
    Ok(resolve_batch(db, disk, pending).await)
}

/// Re-resolve hrefs for every photo, refreshing rows that already have
/// URLs (remote download links expire).
pub async fn refresh_all_hrefs(
    db: &DbActorHandle,
    disk: &DiskClient,
) -> Result<SyncReport, PhotonError> {
    disk.assert_configured().await?;
    let all = db.photo_index(Visibility::all()).await?;
    Ok(resolve_batch(db, disk, all).await)
}

async fn resolve_batch(db: &DbActorHandle, disk: &DiskClient, photos: Vec<DbPhoto>) -> SyncReport {
    let mut report = SyncReport::default();
    for photo in photos {
        let outcome = async {
            let hrefs = disk.hrefs_for_photo(photo.photo_id).await?;
            db.set_photo_hrefs(photo.photo_id, hrefs).await
        }
        .await;

        match outcome {
            Ok(()) => report.synced += 1,
            Err(e) => {
                warn!(photo_id = photo.photo_id, error = %e, "href resolution failed");
                report.faults.push(SyncFault {
                    photo_id: photo.photo_id,
                    detail: e.to_string(),
                });
            }
        }
    }
    info!(
        synced = report.synced,
        faults = report.faults.len(),
        "href batch finished"
    );
    report
}
