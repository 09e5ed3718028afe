//! session token storage
//!
//! the gateways never read a process-wide token; they are handed a
//! [`TokenStore`] and ask it before every authorized request.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::errors::{DebtError, Result};

/// opaque bearer credential
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    /// wrap a raw token, treating blank text as no token at all
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(SessionToken(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(**redacted**)")
    }
}

/// get/set/clear access to the current session token
pub trait TokenStore: Send + Sync {
    fn get_token(&self) -> Option<SessionToken>;

    fn set_token(&self, token: SessionToken) -> Result<()>;

    fn clear_token(&self) -> Result<()>;
}

/// token held for the lifetime of the process
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<SessionToken>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: SessionToken) -> Self {
        Self {
            token: RwLock::new(Some(token)),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn get_token(&self) -> Option<SessionToken> {
        // a poisoned lock still holds a usable value
        match self.token.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn set_token(&self, token: SessionToken) -> Result<()> {
        match self.token.write() {
            Ok(mut guard) => *guard = Some(token),
            Err(poisoned) => *poisoned.into_inner() = Some(token),
        }
        Ok(())
    }

    fn clear_token(&self) -> Result<()> {
        match self.token.write() {
            Ok(mut guard) => *guard = None,
            Err(poisoned) => *poisoned.into_inner() = None,
        }
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct TokenFile {
    token: Option<SessionToken>,
}

/// token persisted as a small json file so it survives between cli runs
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_file(&self) -> Result<Option<SessionToken>> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(storage_error(&self.path, err)),
        };
        let file: TokenFile = serde_json::from_str(&text).map_err(|e| storage_error(&self.path, e))?;
        Ok(file.token.and_then(|t| SessionToken::new(t.0)))
    }
}

impl TokenStore for FileTokenStore {
    fn get_token(&self) -> Option<SessionToken> {
        match self.read_file() {
            Ok(token) => token,
            Err(err) => {
                log::warn!("ignoring unreadable token file: {err}");
                None
            }
        }
    }

    fn set_token(&self, token: SessionToken) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| storage_error(parent, e))?;
        }
        let body = serde_json::to_string_pretty(&TokenFile { token: Some(token) })
            .map_err(|e| storage_error(&self.path, e))?;
        fs::write(&self.path, body).map_err(|e| storage_error(&self.path, e))?;
        log::debug!("session token written to {}", self.path.display());
        Ok(())
    }

    fn clear_token(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(storage_error(&self.path, err)),
        }
    }
}

fn storage_error(path: &Path, err: impl fmt::Display) -> DebtError {
    DebtError::Storage {
        message: format!("{}: {err}", path.display()),
    }
}
