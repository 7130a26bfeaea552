use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::config::BackendKind;

/// Who is signed in. Passed explicitly to every ledger call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub backend: BackendKind,
    pub user_id: String,
    pub email: String,
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

impl Session {
    pub fn local(user_id: &str, email: &str) -> Self {
        Self {
            backend: BackendKind::Local,
            user_id: user_id.to_string(),
            email: email.to_string(),
            access_token: None,
            refresh_token: None,
        }
    }
}

/// The current session persisted as JSON between invocations.
pub struct SessionFile {
    path: PathBuf,
}

impl SessionFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The stored session if it belongs to `backend`; anything else reads as signed out.
    pub fn load(&self, backend: BackendKind) -> Result<Option<Session>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Reading {:?}", self.path))?;
        let session: Session =
            serde_json::from_str(&content).context("Parsing session file")?;
        Ok(Some(session).filter(|s| s.backend == backend))
    }

    pub fn save(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(session).context("Serializing session")?;
        std::fs::write(&self.path, content)
            .with_context(|| format!("Writing {:?}", self.path))?;
        Ok(())
    }

    /// Returns whether a session was removed.
    pub fn clear(&self) -> Result<bool> {
        if !self.path.exists() {
            return Ok(false);
        }
        std::fs::remove_file(&self.path)
            .with_context(|| format!("Removing {:?}", self.path))?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_file_lifecycle() {
        let dir = tempfile::tempdir().unwrap();
        let file = SessionFile::new(dir.path().join("session.json"));
        assert!(file.load(BackendKind::Local).unwrap().is_none());

        let session = Session::local("local-1", "a@b.c");
        file.save(&session).unwrap();
        assert_eq!(file.load(BackendKind::Local).unwrap(), Some(session));
        // A session from the other backend is not reused.
        assert!(file.load(BackendKind::Remote).unwrap().is_none());

        assert!(file.clear().unwrap());
        assert!(!file.clear().unwrap());
        assert!(file.load(BackendKind::Local).unwrap().is_none());
    }
}
