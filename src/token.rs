//! Persisted credential — the one stored identity token.
//!
//! DESIGN
//! ======
//! One JSON artifact `{token, expiresAt}` on disk, overwritten on each
//! successful login or registration and read once at bootstrap. Loading is
//! fail-open: a missing, unreadable, malformed, or expired artifact reads
//! as "no token", which sends the session back to the login prompt rather
//! than failing the bootstrap.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::event::now_ms;

/// Tokens persist for one day from issuance.
pub const TOKEN_TTL_MS: i64 = 24 * 60 * 60 * 1000;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredCredential {
    token: String,
    /// Milliseconds since Unix epoch.
    expires_at: i64,
}

/// File-backed store for the persisted identity token.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored token. `None` when the artifact is absent, cannot be
    /// parsed, or has expired.
    #[must_use]
    pub fn load(&self) -> Option<String> {
        let raw = fs::read_to_string(&self.path).ok()?;
        let stored: StoredCredential = match serde_json::from_str(&raw) {
            Ok(stored) => stored,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "ignoring malformed credential file");
                return None;
            }
        };
        if stored.expires_at <= now_ms() {
            return None;
        }
        Some(stored.token)
    }

    /// Persist a freshly issued token with a one-day expiry, overwriting any
    /// previous artifact.
    pub fn save(&self, token: &str) -> io::Result<()> {
        let stored = StoredCredential {
            token: token.to_owned(),
            expires_at: now_ms() + TOKEN_TTL_MS,
        };
        let json = serde_json::to_string_pretty(&stored).map_err(io::Error::other)?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, json)
    }

    /// Remove the artifact. Absence is not an error.
    pub fn clear(&self) {
        if let Err(e) = fs::remove_file(&self.path) {
            if e.kind() != io::ErrorKind::NotFound {
                warn!(path = %self.path.display(), error = %e, "failed to clear credential file");
            }
        }
    }
}

#[cfg(test)]
#[path = "token_test.rs"]
mod tests;
