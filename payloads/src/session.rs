//! Client-side auth session.
//!
//! The session is owned by a [`SessionContext`] handed to the
//! [`crate::APIClient`] at construction. Only the auth flows (login,
//! register, logout) and the client's 401 handler write to it.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::{UserId, responses};

/// Key under which the bearer token is persisted.
pub const TOKEN_KEY: &str = "auth_token";
/// Key under which the signed-in user record is persisted.
pub const USER_KEY: &str = "user_data";

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: responses::User,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &"[redacted]")
            .field("user", &self.user)
            .finish()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Failed to access session storage")]
    Io(#[from] std::io::Error),
    #[error("Stored session is corrupt")]
    Corrupt(#[from] serde_json::Error),
}

/// Persistence backend for the session.
pub trait SessionStore: Send + Sync {
    fn load(&self) -> Result<Option<Session>, SessionError>;
    fn save(&self, session: &Session) -> Result<(), SessionError>;
    fn clear(&self) -> Result<(), SessionError>;
}

/// Keeps the session for the lifetime of the process only.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    session: Mutex<Option<Session>>,
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<Session>, SessionError> {
        Ok(self.session.lock().unwrap().clone())
    }

    fn save(&self, session: &Session) -> Result<(), SessionError> {
        *self.session.lock().unwrap() = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        *self.session.lock().unwrap() = None;
        Ok(())
    }
}

/// Persists the session as a small JSON key/value file, mirroring the fixed
/// keys a browser client would use in local storage.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(
        &self,
    ) -> Result<serde_json::Map<String, serde_json::Value>, SessionError> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) if contents.trim().is_empty() => {
                Ok(serde_json::Map::new())
            }
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Ok(serde_json::Map::new())
            }
            Err(e) => Err(e.into()),
        }
    }

    fn write_map(
        &self,
        map: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_vec_pretty(map)?)?;
        Ok(())
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<Session>, SessionError> {
        let mut map = self.read_map()?;
        let (Some(token), Some(user)) = (map.remove(TOKEN_KEY), map.remove(USER_KEY))
        else {
            return Ok(None);
        };
        Ok(Some(Session {
            token: serde_json::from_value(token)?,
            user: serde_json::from_value(user)?,
        }))
    }

    fn save(&self, session: &Session) -> Result<(), SessionError> {
        let mut map = self.read_map()?;
        map.insert(TOKEN_KEY.into(), serde_json::to_value(&session.token)?);
        map.insert(USER_KEY.into(), serde_json::to_value(&session.user)?);
        self.write_map(&map)
    }

    fn clear(&self) -> Result<(), SessionError> {
        let mut map = self.read_map()?;
        map.remove(TOKEN_KEY);
        map.remove(USER_KEY);
        self.write_map(&map)
    }
}

/// Shared handle to the active session and its persistence backend.
#[derive(Clone)]
pub struct SessionContext {
    store: Arc<dyn SessionStore>,
}

impl fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionContext")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl SessionContext {
    pub fn new(store: impl SessionStore + 'static) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(MemorySessionStore::default())
    }

    /// The persisted session. Storage failures are logged and read as
    /// "signed out".
    pub fn current(&self) -> Option<Session> {
        match self.store.load() {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!("Failed to read stored session: {e}");
                None
            }
        }
    }

    pub fn token(&self) -> Option<String> {
        self.current().map(|session| session.token)
    }

    pub fn user(&self) -> Option<responses::User> {
        self.current().map(|session| session.user)
    }

    pub fn user_id(&self) -> Option<UserId> {
        self.current().map(|session| session.user.id)
    }

    pub fn is_authenticated(&self) -> bool {
        self.current().is_some()
    }

    pub fn set(&self, session: &Session) -> Result<(), SessionError> {
        self.store.save(session)
    }

    pub fn clear(&self) -> Result<(), SessionError> {
        self.store.clear()
    }
}
