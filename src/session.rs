//! Bearer token persistence.
//!
//! The token lives in memory behind a shared lock and is mirrored to a small
//! JSON file so that a restart keeps the instructor signed in. Every clone of
//! the store sees the same token.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

#[derive(Debug, Serialize, Deserialize)]
struct StoredSession {
    token: String,
}

#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
    token: Arc<RwLock<Option<String>>>,
}

impl SessionStore {
    /// Opens the store, picking up a token left by a previous run.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let token = read_token(&path);
        Self {
            path,
            token: Arc::new(RwLock::new(token)),
        }
    }

    pub fn token(&self) -> Option<String> {
        self.token.read().ok().and_then(|guard| guard.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    pub fn save(&self, token: &str) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string(&StoredSession {
            token: token.to_string(),
        })?;
        fs::write(&self.path, json)?;
        if let Ok(mut guard) = self.token.write() {
            *guard = Some(token.to_string());
        }
        debug!("session token stored");
        Ok(())
    }

    /// Forgets the token in memory and on disk. Never fails: a file that
    /// cannot be removed is logged and the in-memory token is still dropped.
    pub fn clear(&self) {
        if let Ok(mut guard) = self.token.write() {
            *guard = None;
        }
        if self.path.exists() {
            if let Err(e) = fs::remove_file(&self.path) {
                warn!(path = %self.path.display(), error = %e, "could not remove session file");
            }
        }
        debug!("session token cleared");
    }
}

fn read_token(path: &Path) -> Option<String> {
    let contents = fs::read_to_string(path).ok()?;
    let stored: StoredSession = serde_json::from_str(&contents).ok()?;
    (!stored.token.is_empty()).then_some(stored.token)
}
