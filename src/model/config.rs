use serde::{Deserialize, Serialize};

/// Configuration from library.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryConfig {
    pub library: LibraryInfo,
    #[serde(default)]
    pub view: ViewConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryInfo {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewConfig {
    /// Page size used by `list` when --limit is not given.
    #[serde(default = "default_limit")]
    pub default_limit: usize,
    /// Subject color token assigned when --color is not given.
    #[serde(default = "default_color")]
    pub default_color: String,
}

impl Default for ViewConfig {
    fn default() -> Self {
        ViewConfig {
            default_limit: 20,
            default_color: "gray".to_string(),
        }
    }
}

fn default_limit() -> usize {
    20
}

fn default_color() -> String {
    "gray".to_string()
}
