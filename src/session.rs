//! Process-wide persisted state: the bearer session and UI preferences.
//!
//! Both stores follow the same lifecycle: read the persisted file once at
//! startup, then write through on every change. They are injected into the
//! client rather than reached through ambient globals.

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tracing::{debug, warn};

use crate::models::User;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub token_type: String,
    #[serde(default)]
    pub user: Option<User>,
}

/// Holds the bearer session. Cleared on logout and on any 401 response.
#[derive(Debug)]
pub struct SessionStore {
    path: Option<PathBuf>,
    inner: RwLock<Option<Session>>,
}

impl SessionStore {
    pub fn in_memory() -> Self {
        Self {
            path: None,
            inner: RwLock::new(None),
        }
    }

    /// Initializes from the persisted file. A missing or unreadable file
    /// starts an unauthenticated store.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let session = read_json::<Session>(&path);
        if session.is_some() {
            debug!(path = %path.display(), "restored persisted session");
        }
        Self {
            path: Some(path),
            inner: RwLock::new(session),
        }
    }

    pub fn set(&self, session: Session) {
        if let Some(path) = &self.path {
            write_json(path, &session);
        }
        *self.inner.write().expect("session lock poisoned") = Some(session);
    }

    pub fn clear(&self) {
        if let Some(path) = &self.path {
            if path.exists() {
                if let Err(e) = std::fs::remove_file(path) {
                    warn!(path = %path.display(), error = %e, "failed to remove persisted session");
                }
            }
        }
        *self.inner.write().expect("session lock poisoned") = None;
    }

    pub fn current(&self) -> Option<Session> {
        self.inner.read().expect("session lock poisoned").clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.read().expect("session lock poisoned").is_some()
    }

    /// `Authorization` header value for the current session, if any.
    pub fn bearer(&self) -> Option<String> {
        self.inner
            .read()
            .expect("session lock poisoned")
            .as_ref()
            .map(|s| format!("Bearer {}", s.access_token))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct PreferencesData {
    #[serde(default)]
    theme: Theme,
}

/// UI preferences with the same init/write-through lifecycle as the
/// session store.
#[derive(Debug)]
pub struct Preferences {
    path: Option<PathBuf>,
    inner: RwLock<PreferencesData>,
}

impl Preferences {
    pub fn in_memory() -> Self {
        Self {
            path: None,
            inner: RwLock::new(PreferencesData::default()),
        }
    }

    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let data = read_json::<PreferencesData>(&path).unwrap_or_default();
        Self {
            path: Some(path),
            inner: RwLock::new(data),
        }
    }

    pub fn theme(&self) -> Theme {
        self.inner.read().expect("preferences lock poisoned").theme
    }

    pub fn set_theme(&self, theme: Theme) {
        let mut data = self.inner.write().expect("preferences lock poisoned");
        data.theme = theme;
        if let Some(path) = &self.path {
            write_json(path, &*data);
        }
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Option<T> {
    let raw = std::fs::read_to_string(path).ok()?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "ignoring corrupt persisted state");
            None
        }
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) {
    let serialized = match serde_json::to_string_pretty(value) {
        Ok(s) => s,
        Err(e) => {
            warn!(error = %e, "failed to serialize persisted state");
            return;
        }
    };
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            let _ = std::fs::create_dir_all(parent);
        }
    }
    if let Err(e) = std::fs::write(path, serialized) {
        warn!(path = %path.display(), error = %e, "failed to persist state");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(token: &str) -> Session {
        Session {
            access_token: token.to_string(),
            token_type: "bearer".to_string(),
            user: None,
        }
    }

    #[test]
    fn bearer_formats_authorization_value() {
        let store = SessionStore::in_memory();
        assert_eq!(store.bearer(), None);
        store.set(session("abc123"));
        assert_eq!(store.bearer().as_deref(), Some("Bearer abc123"));
    }

    #[test]
    fn set_and_clear_write_through() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let store = SessionStore::load(&path);
        assert!(!store.is_authenticated());

        store.set(session("persisted-token"));
        assert!(path.exists());

        // A fresh store initialized from the same path sees the session.
        let reloaded = SessionStore::load(&path);
        assert_eq!(reloaded.bearer().as_deref(), Some("Bearer persisted-token"));

        store.clear();
        assert!(!path.exists());
        assert!(!SessionStore::load(&path).is_authenticated());
    }

    #[test]
    fn corrupt_session_file_starts_unauthenticated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(!SessionStore::load(&path).is_authenticated());
    }

    #[test]
    fn theme_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");

        let prefs = Preferences::load(&path);
        assert_eq!(prefs.theme(), Theme::Light);
        prefs.set_theme(Theme::Dark);

        assert_eq!(Preferences::load(&path).theme(), Theme::Dark);
    }
}
