use std::sync::Arc;
use std::time::Duration;

use reqwest::header::AUTHORIZATION;
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::debug;

use crate::config::StorageConfig;
use crate::db::PhotoHrefs;
use crate::error::PhotonError;

const DISK_RESOURCES_URL: &str = "https://cloud-api.yandex.net/v1/disk/resources";

/// Variant order matches the `PhotoHrefs` fields.
const VARIANTS: [&str; 3] = ["preview", "medium", "large"];

pub const DISK_USER_AGENT: &str = concat!("photon/", env!("CARGO_PKG_VERSION"));

/// Client for the cloud-disk resource-metadata endpoint. Cheap to clone;
/// reads the token/folder from the live (rewritable) storage settings on
/// every call so a settings update applies without a restart.
#[derive(Clone)]
pub struct DiskClient {
    http: reqwest::Client,
    settings: Arc<RwLock<StorageConfig>>,
}

/// Subset of the resource-metadata payload we care about.
#[derive(Debug, Deserialize)]
struct ResourceInfo {
    #[serde(default)]
    file: Option<String>,
}

impl DiskClient {
    pub fn new(settings: Arc<RwLock<StorageConfig>>) -> Self {
        let http = reqwest::Client::builder()
            .user_agent(DISK_USER_AGENT)
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(60))
            .build()
            .expect("failed to build reqwest client");
        Self { http, settings }
    }

    /// Errors unless a token is configured. Sync entry points call this
    /// once up front instead of failing per photo.
    pub async fn assert_configured(&self) -> Result<(), PhotonError> {
        if self.settings.read().await.token.is_empty() {
            return Err(PhotonError::StorageUnconfigured(
                "no token specified in the config".to_string(),
            ));
        }
        Ok(())
    }

    /// Resolve the download href of one remote file. A non-200 status is
    /// not an error: the variant simply resolves to an empty string.
    async fn file_href(&self, token: &str, path: &str) -> Result<String, PhotonError> {
        let resp = self
            .http
            .get(DISK_RESOURCES_URL)
            .query(&[("path", path)])
            .header(AUTHORIZATION, format!("OAuth {token}"))
            .send()
            .await?;

        if resp.status() != reqwest::StatusCode::OK {
            debug!(path, status = %resp.status(), "remote resource lookup failed");
            return Ok(String::new());
        }

        let info: ResourceInfo = resp.json().await?;
        Ok(info.file.unwrap_or_default())
    }

    /// Resolve all three URL variants for a photo by convention-based
    /// remote paths.
    pub async fn hrefs_for_photo(&self, photo_id: i64) -> Result<PhotoHrefs, PhotonError> {
        let (token, folder) = {
            let s = self.settings.read().await;
            (s.token.clone(), s.remote_folder.clone())
        };
        if token.is_empty() {
            return Err(PhotonError::StorageUnconfigured(
                "no token specified in the config".to_string(),
            ));
        }

        let mut hrefs = PhotoHrefs::default();
        let slots = [
            (VARIANTS[0], &mut hrefs.preview),
            (VARIANTS[1], &mut hrefs.medium),
            (VARIANTS[2], &mut hrefs.large),
        ];
        for (variant, slot) in slots {
            let path = remote_path(&folder, variant, photo_id);
            *slot = self.file_href(&token, &path).await?;
        }
        Ok(hrefs)
    }
}

/// `{folder}{variant}{photo_id}_{variant}.jpg`, e.g.
/// `disk:/gallery/preview42_preview.jpg`.
fn remote_path(folder: &str, variant: &str, photo_id: i64) -> String {
    format!("{folder}{variant}{photo_id}_{variant}.jpg")
}
