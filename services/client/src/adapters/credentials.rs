//! services/client/src/adapters/credentials.rs
//!
//! Durable storage for the remembered login. The token and username live
//! together in a single JSON file under the platform data directory, so
//! they are always present or absent as a pair and clearing one clears both.

use serde::{Deserialize, Serialize};
use std::io;
use std::path::PathBuf;
use tracing::warn;

/// The remembered credentials of the last logged-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredCredentials {
    pub token: String,
    pub username: String,
}

/// Reads and writes the credential file.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    /// Creates a store backed by the given file path.
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Loads remembered credentials, if any.
    ///
    /// A missing file simply means no remembered session. An unreadable or
    /// corrupt file is reported and treated the same way, since a fresh
    /// logged-out start is always a valid state.
    pub fn load(&self) -> Option<StoredCredentials> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return None,
            Err(e) => {
                warn!("could not read credential file {:?}: {e}", self.path);
                return None;
            }
        };
        match serde_json::from_slice(&bytes) {
            Ok(credentials) => Some(credentials),
            Err(e) => {
                warn!("credential file {:?} is corrupt: {e}", self.path);
                None
            }
        }
    }

    /// Remembers the credentials for the next visit.
    pub fn save(&self, credentials: &StoredCredentials) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let body = serde_json::to_vec_pretty(credentials)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        std::fs::write(&self.path, body)
    }

    /// Forgets any remembered credentials. Idempotent: clearing an empty
    /// store succeeds.
    pub fn clear(&self) -> io::Result<()> {
        match std::fs::remove_file(&self.path) {
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }
}
