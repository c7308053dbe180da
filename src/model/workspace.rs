use std::path::PathBuf;

use super::config::LibraryConfig;
use super::library::Library;

/// A fully loaded recall workspace
#[derive(Debug)]
pub struct Workspace {
    /// Root directory of the workspace (parent of `recall/`)
    pub root: PathBuf,
    /// Path to the `recall/` directory
    pub recall_dir: PathBuf,
    /// Parsed library.toml
    pub config: LibraryConfig,
    /// Loaded content store
    pub library: Library,
}
