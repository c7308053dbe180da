use std::fs;
use std::path::{Path, PathBuf};

use crate::io::recovery::{self, RecoveryCategory, RecoveryEntry};
use crate::model::config::LibraryConfig;
use crate::model::library::Library;
use crate::model::workspace::Workspace;

/// Error type for store I/O operations
#[derive(Debug, thiserror::Error)]
pub enum LibraryError {
    #[error("not a recall workspace: no recall/ directory found")]
    NotAWorkspace,
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse library.toml: {0}")]
    ConfigParseError(#[from] toml::de::Error),
    #[error("could not parse library.json: {0}")]
    StoreParseError(#[from] serde_json::Error),
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Discover the recall workspace by walking up from the given directory,
/// looking for a `recall/` subdirectory.
pub fn discover_workspace(start: &Path) -> Result<PathBuf, LibraryError> {
    let mut current = start.to_path_buf();
    loop {
        let recall_dir = current.join("recall");
        if recall_dir.is_dir() && recall_dir.join("library.toml").exists() {
            return Ok(current);
        }
        if !current.pop() {
            return Err(LibraryError::NotAWorkspace);
        }
    }
}

/// Load a complete recall workspace from the given root directory.
pub fn load_workspace(root: &Path) -> Result<Workspace, LibraryError> {
    let recall_dir = root.join("recall");
    if !recall_dir.is_dir() {
        return Err(LibraryError::NotAWorkspace);
    }

    // Read and parse library.toml
    let config_path = recall_dir.join("library.toml");
    let config_text = fs::read_to_string(&config_path).map_err(|e| LibraryError::ReadError {
        path: config_path.clone(),
        source: e,
    })?;
    let config: LibraryConfig = toml::from_str(&config_text)?;

    // Load the content store. A missing store file is an empty library.
    let store_path = recall_dir.join("library.json");
    let library = if store_path.exists() {
        let store_text = fs::read_to_string(&store_path).map_err(|e| LibraryError::ReadError {
            path: store_path.clone(),
            source: e,
        })?;
        match serde_json::from_str(&store_text) {
            Ok(library) => library,
            Err(e) => {
                // Keep the unparseable store text around for hand repair
                recovery::log_recovery(
                    &recall_dir,
                    RecoveryEntry {
                        timestamp: chrono::Utc::now(),
                        category: RecoveryCategory::Parser,
                        description: "store parse failed".to_string(),
                        fields: vec![
                            ("Source".to_string(), "library.json".to_string()),
                            ("Error".to_string(), e.to_string()),
                        ],
                        body: store_text,
                    },
                );
                return Err(LibraryError::StoreParseError(e));
            }
        }
    } else {
        Library::default()
    };

    Ok(Workspace {
        root: root.to_path_buf(),
        recall_dir,
        config,
        library,
    })
}

/// Save the content store back to disk. A failed write is recovery-logged
/// with the unwritten store body before the error is returned.
pub fn save_library(recall_dir: &Path, library: &Library) -> Result<(), LibraryError> {
    let store_path = recall_dir.join("library.json");
    let content = serde_json::to_string_pretty(library)?;
    if let Err(e) = recovery::atomic_write(&store_path, content.as_bytes()) {
        recovery::log_recovery(
            recall_dir,
            RecoveryEntry {
                timestamp: chrono::Utc::now(),
                category: RecoveryCategory::Write,
                description: "store write failed".to_string(),
                fields: vec![
                    ("Target".to_string(), "library.json".to_string()),
                    ("Error".to_string(), e.to_string()),
                ],
                body: content,
            },
        );
        return Err(LibraryError::WriteError {
            path: store_path,
            source: e,
        });
    }
    Ok(())
}
