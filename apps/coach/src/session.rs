//! Session store: the persisted bearer token plus the in-memory user it belongs to.
//!
//! Stored as a small JSON file, `~/.career-coach/session.json` unless
//! `COACH_SESSION_FILE` points elsewhere.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::user::{AuthResponse, User};

const SESSION_DIR: &str = ".career-coach";
const SESSION_FILE_NAME: &str = "session.json";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    token: Option<String>,
    user: Option<User>,
}

impl Session {
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

impl From<AuthResponse> for Session {
    fn from(auth: AuthResponse) -> Self {
        Session {
            token: Some(auth.token),
            user: Some(auth.user),
        }
    }
}

pub struct SessionStore {
    path: PathBuf,
    current: Session,
}

impl SessionStore {
    /// Opens the store at `path` (or the default location), reading any saved session.
    pub fn open(path: Option<PathBuf>) -> Result<Self, AppError> {
        let path = match path {
            Some(path) => path,
            None => default_path()?,
        };
        let current = read_session(&path)?;
        Ok(Self { path, current })
    }

    pub fn current(&self) -> &Session {
        &self.current
    }

    /// Replaces the current session and persists it.
    ///
    /// The file is written 0600. Its directory is restricted to 0700 only when
    /// this call creates it; an existing directory keeps its mode.
    pub fn save(&mut self, session: Session) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| {
                    AppError::Session(format!("mkdir {}: {e}", parent.display()))
                })?;
                #[cfg(unix)]
                {
                    use std::os::unix::fs::PermissionsExt;
                    if let Err(e) = fs::set_permissions(parent, fs::Permissions::from_mode(0o700)) {
                        tracing::warn!("failed to chmod 0700 {}: {e}", parent.display());
                    }
                }
            }
        }

        let body = serde_json::to_string_pretty(&session)
            .map_err(|e| AppError::Session(format!("serialize session: {e}")))?;
        fs::write(&self.path, body)
            .map_err(|e| AppError::Session(format!("write {}: {e}", self.path.display())))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600)).map_err(|e| {
                AppError::Session(format!("chmod {}: {e}", self.path.display()))
            })?;
        }

        self.current = session;
        Ok(())
    }

    /// Forgets the session in memory and on disk.
    pub fn clear(&mut self) -> Result<(), AppError> {
        if self.path.exists() {
            fs::remove_file(&self.path).map_err(|e| {
                AppError::Session(format!("delete {}: {e}", self.path.display()))
            })?;
        }
        self.current = Session::default();
        Ok(())
    }
}

fn default_path() -> Result<PathBuf, AppError> {
    dirs::home_dir()
        .map(|h| h.join(SESSION_DIR).join(SESSION_FILE_NAME))
        .ok_or_else(|| AppError::Session("home directory not found".to_string()))
}

fn read_session(path: &Path) -> Result<Session, AppError> {
    if !path.exists() {
        return Ok(Session::default());
    }
    let raw = fs::read_to_string(path)
        .map_err(|e| AppError::Session(format!("read {}: {e}", path.display())))?;
    match serde_json::from_str(&raw) {
        Ok(session) => Ok(session),
        Err(e) => {
            // A corrupt file is treated as logged out rather than a hard failure.
            tracing::warn!("ignoring unreadable session file {}: {e}", path.display());
            Ok(Session::default())
        }
    }
}
