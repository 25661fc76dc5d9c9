//! Durable session storage.
//!
//! The session file holds the opaque bearer token plus the account it was
//! issued to, so the client can come back signed in across restarts. It is
//! re-validated against the server on startup; a missing or unreadable file
//! just means starting anonymous.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::models::User;

/// Session file name in the cache directory
const SESSION_FILE: &str = "session.json";

/// What survives a restart: the token and the account for display while the
/// startup re-validation is in flight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistedSession {
    pub token: String,
    pub user: User,
    pub saved_at: DateTime<Utc>,
}

impl PersistedSession {
    pub fn new(user: &User, token: &str) -> Self {
        Self {
            token: token.to_string(),
            user: user.clone(),
            saved_at: Utc::now(),
        }
    }
}

/// Load/save/clear for the session file.
pub struct SessionStore {
    cache_dir: PathBuf,
}

impl SessionStore {
    pub fn new(cache_dir: PathBuf) -> Self {
        Self { cache_dir }
    }

    /// Load the persisted session, if any.
    ///
    /// A malformed file is treated the same as an absent one - the client
    /// starts anonymous rather than failing startup.
    pub fn load(&self) -> Result<Option<PersistedSession>> {
        let path = self.session_path();
        if !path.exists() {
            return Ok(None);
        }
        let contents =
            std::fs::read_to_string(&path).context("Failed to read session file")?;
        match serde_json::from_str(&contents) {
            Ok(persisted) => Ok(Some(persisted)),
            Err(e) => {
                warn!(error = %e, "Ignoring malformed session file");
                Ok(None)
            }
        }
    }

    /// Save the session to disk.
    pub fn save(&self, session: &PersistedSession) -> Result<()> {
        let path = self.session_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(session)?;
        std::fs::write(path, contents).context("Failed to write session file")?;
        Ok(())
    }

    /// Remove the session file.
    pub fn clear(&self) -> Result<()> {
        let path = self.session_path();
        if path.exists() {
            std::fs::remove_file(path).context("Failed to remove session file")?;
        }
        Ok(())
    }

    pub fn session_path(&self) -> PathBuf {
        self.cache_dir.join(SESSION_FILE)
    }
}
