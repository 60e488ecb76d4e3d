//! Client configuration loaded from environment variables.

use std::path::PathBuf;

use civicsecure_store::Database;

use crate::error::Result;
use crate::local_store::SqliteStore;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the complaint API, including the `/api` prefix.
    /// Env: `CIVICSECURE_API_URL`
    /// Default: `http://localhost:5000/api`
    pub api_base_url: String,

    /// Directory holding the local store. `None` uses the platform data dir.
    /// Env: `CIVICSECURE_DATA_DIR`
    pub data_dir: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:5000/api".to_string(),
            data_dir: None,
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(url) = lookup("CIVICSECURE_API_URL").filter(|u| !u.is_empty()) {
            config.api_base_url = url;
        }
        if let Some(dir) = lookup("CIVICSECURE_DATA_DIR").filter(|d| !d.is_empty()) {
            config.data_dir = Some(PathBuf::from(dir));
        }

        config
    }

    /// Open the persistent local store backing drafts, profile and
    /// verification state.
    pub fn open_local_store(&self) -> Result<SqliteStore> {
        let db = match &self.data_dir {
            Some(dir) => Database::open_at(&dir.join("civicsecure.db"))?,
            None => Database::new()?,
        };
        Ok(SqliteStore::new(db))
    }
}
