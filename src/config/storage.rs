use serde::{Deserialize, Serialize};

/// Remote-storage (cloud disk) settings.
///
/// Unlike `[basic]`, this table is rewritable at runtime through the
/// `/master/modify/storage` route; the live copy is shared behind an
/// `Arc<RwLock<_>>` in the router state.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// OAuth token for the cloud-disk API. Empty means the integration is
    /// unconfigured; sync requests will fail with a connection error until
    /// a token is supplied.
    /// TOML: `storage.token`.
    #[serde(default)]
    pub token: String,

    /// Remote folder prefix the per-variant photo files live under.
    /// TOML: `storage.remote_folder`. Default: `disk:/gallery/`.
    #[serde(default = "default_remote_folder")]
    pub remote_folder: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            remote_folder: default_remote_folder(),
        }
    }
}

fn default_remote_folder() -> String {
    "disk:/gallery/".to_string()
}
