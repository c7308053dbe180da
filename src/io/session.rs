use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The signed-in identity (written to .session.json by `rcl login`).
///
/// This is the whole session contract: some external flow decides who the
/// user is; the core only ever asks "whose request is this" and refuses
/// to touch the store without an answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub user_id: String,
    pub signed_in_at: DateTime<Utc>,
}

/// Error type for session lookups
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("unauthorized: no active session (run `rcl login <user>`)")]
    Unauthorized,
    #[error("could not write session file at {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
}

fn session_path(recall_dir: &Path) -> PathBuf {
    recall_dir.join(".session.json")
}

/// Read the current session. Missing or malformed files read as "signed out".
pub fn read_session(recall_dir: &Path) -> Option<Session> {
    let content = fs::read_to_string(session_path(recall_dir)).ok()?;
    serde_json::from_str(&content).ok()
}

/// The session, or Unauthorized. Called before any store access.
pub fn require_session(recall_dir: &Path) -> Result<Session, SessionError> {
    read_session(recall_dir).ok_or(SessionError::Unauthorized)
}

/// Sign in as `user_id`.
pub fn write_session(recall_dir: &Path, user_id: &str) -> Result<Session, SessionError> {
    let session = Session {
        user_id: user_id.to_string(),
        signed_in_at: Utc::now(),
    };
    let path = session_path(recall_dir);
    let content = serde_json::to_string_pretty(&session).map_err(|e| SessionError::WriteError {
        path: path.clone(),
        source: e.into(),
    })?;
    fs::write(&path, content).map_err(|e| SessionError::WriteError { path, source: e })?;
    Ok(session)
}

/// Sign out. Signing out twice is fine.
pub fn clear_session(recall_dir: &Path) {
    let _ = fs::remove_file(session_path(recall_dir));
}
