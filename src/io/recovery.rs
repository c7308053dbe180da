use std::fmt;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tempfile::NamedTempFile;

/// What kind of failure produced a recovery entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryCategory {
    /// A store write failed
    Write,
    /// The store file could not be parsed
    Parser,
}

impl fmt::Display for RecoveryCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecoveryCategory::Write => write!(f, "write"),
            RecoveryCategory::Parser => write!(f, "parser"),
        }
    }
}

/// A single entry in the recovery log.
#[derive(Debug, Clone)]
pub struct RecoveryEntry {
    pub timestamp: DateTime<Utc>,
    pub category: RecoveryCategory,
    pub description: String,
    pub fields: Vec<(String, String)>,
    /// Content that would otherwise be lost (e.g. the unwritten store)
    pub body: String,
}

/// Return the path to the recovery log file.
pub fn recovery_log_path(recall_dir: &Path) -> PathBuf {
    recall_dir.join(".recovery.log")
}

// ---------------------------------------------------------------------------
// Atomic file write
// ---------------------------------------------------------------------------

/// Write `content` to `path` atomically using a temp file + rename.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

impl RecoveryEntry {
    /// Format this entry as a markdown block for the recovery log.
    fn to_markdown(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "## {} — {}: {}\n",
            self.timestamp
                .to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            self.category,
            self.description,
        ));
        out.push('\n');
        for (key, value) in &self.fields {
            out.push_str(&format!("{}: {}\n", key, value));
        }
        if !self.body.is_empty() {
            out.push('\n');
            out.push_str("```text\n");
            out.push_str(&self.body);
            if !self.body.ends_with('\n') {
                out.push('\n');
            }
            out.push_str("```\n");
        }
        out.push('\n');
        out.push_str("---\n");
        out
    }
}

/// Append a recovery entry to the log. Errors are swallowed and printed
/// to stderr — recovery logging must never mask the original failure.
pub fn log_recovery(recall_dir: &Path, entry: RecoveryEntry) {
    if let Err(e) = log_recovery_inner(recall_dir, entry) {
        eprintln!("warning: could not write to recovery log: {}", e);
    }
}

fn log_recovery_inner(recall_dir: &Path, entry: RecoveryEntry) -> io::Result<()> {
    let path = recovery_log_path(recall_dir);
    let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
    file.write_all(entry.to_markdown().as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn make_entry(desc: &str, body: &str) -> RecoveryEntry {
        RecoveryEntry {
            timestamp: "2026-08-24T10:00:00Z".parse().unwrap(),
            category: RecoveryCategory::Write,
            description: desc.to_string(),
            fields: vec![("Target".to_string(), "library.json".to_string())],
            body: body.to_string(),
        }
    }

    #[test]
    fn test_atomic_write() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("out.json");
        atomic_write(&path, b"{}").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "{}");

        // Overwrite replaces content whole
        atomic_write(&path, b"{\"items\":[]}").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "{\"items\":[]}");
    }

    #[test]
    fn test_log_recovery_appends() {
        let tmp = TempDir::new().unwrap();
        log_recovery(tmp.path(), make_entry("store write failed", "{...}"));
        log_recovery(tmp.path(), make_entry("second failure", ""));

        let log = fs::read_to_string(recovery_log_path(tmp.path())).unwrap();
        assert!(log.contains("write: store write failed"));
        assert!(log.contains("Target: library.json"));
        assert!(log.contains("```text"));
        assert!(log.contains("second failure"));
        assert_eq!(log.matches("---").count(), 2);
    }
}
