use std::fs;
use std::path::Path;

use crate::cli::commands::InitArgs;
use crate::io::recovery;
use crate::model::library::Library;

const LIBRARY_TOML_TEMPLATE: &str = r##"[library]
name = "{name}"

# --- View defaults ---
# Uncomment and edit to override.
#
# [view]
# default_limit = 20
# default_color = "gray"
"##;

/// Infer a library name from a directory name: replace hyphens with spaces, title-case.
fn infer_name(dir_name: &str) -> String {
    dir_name
        .split('-')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                None => String::new(),
                Some(c) => {
                    let upper: String = c.to_uppercase().collect();
                    upper + &chars.collect::<String>()
                }
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Create a new recall workspace in `dir`.
pub fn cmd_init(args: InitArgs, dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let recall_dir = dir.join("recall");
    if recall_dir.join("library.toml").exists() && !args.force {
        return Err(format!(
            "recall workspace already exists at {} (use --force to reinitialize)",
            recall_dir.display()
        )
        .into());
    }

    let name = match args.name {
        Some(name) => name,
        None => dir
            .file_name()
            .and_then(|s| s.to_str())
            .map(infer_name)
            .unwrap_or_else(|| "Library".to_string()),
    };

    fs::create_dir_all(&recall_dir)?;
    fs::write(
        recall_dir.join("library.toml"),
        LIBRARY_TOML_TEMPLATE.replace("{name}", &name),
    )?;

    // Never clobber an existing store unless forced
    let store_path = recall_dir.join("library.json");
    if !store_path.exists() || args.force {
        let empty = serde_json::to_string_pretty(&Library::default())?;
        recovery::atomic_write(&store_path, empty.as_bytes())?;
    }

    println!("initialized library \"{}\" in {}", name, recall_dir.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_infer_name() {
        assert_eq!(infer_name("my-study-notes"), "My Study Notes");
        assert_eq!(infer_name("physics"), "Physics");
    }

    #[test]
    fn test_init_creates_workspace() {
        let tmp = TempDir::new().unwrap();
        cmd_init(
            InitArgs {
                name: Some("Exam Prep".into()),
                force: false,
            },
            tmp.path(),
        )
        .unwrap();

        let config = fs::read_to_string(tmp.path().join("recall/library.toml")).unwrap();
        assert!(config.contains("name = \"Exam Prep\""));
        assert!(tmp.path().join("recall/library.json").exists());
    }

    #[test]
    fn test_init_refuses_to_overwrite_without_force() {
        let tmp = TempDir::new().unwrap();
        let args = || InitArgs {
            name: None,
            force: false,
        };
        cmd_init(args(), tmp.path()).unwrap();
        assert!(cmd_init(args(), tmp.path()).is_err());
        assert!(
            cmd_init(
                InitArgs {
                    name: None,
                    force: true
                },
                tmp.path()
            )
            .is_ok()
        );
    }
}
