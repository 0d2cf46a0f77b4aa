// qprofile-core/src/infrastructure/config/mod.rs

pub mod definitions;
pub mod project;
pub mod rules;

pub use definitions::load_contributions;
pub use project::{ProjectConfig, PublisherConfig, load_project_config};
pub use rules::{RuleCatalogFile, RuleSet, load_rule_catalogs};

use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::infrastructure::error::InfrastructureError;

const YAML_EXTENSIONS: [&str; 2] = ["yml", "yaml"];

/// Charge un fragment de configuration typé depuis un fichier.
pub(crate) fn load_fragment<T: DeserializeOwned>(path: &Path) -> Result<T, InfrastructureError> {
    let content = fs::read_to_string(path)?;
    serde_yaml::from_str(&content).map_err(|source| InfrastructureError::InvalidFile {
        path: path.display().to_string(),
        source,
    })
}

/// YAML files under each directory, sorted by path so loading order is stable.
/// Missing directories are skipped.
pub(crate) fn discover_yaml_files(
    project_dir: &Path,
    directories: &[String],
) -> Result<Vec<PathBuf>, InfrastructureError> {
    let mut files = Vec::new();
    for directory in directories {
        let root = project_dir.join(directory);
        if !root.exists() {
            continue;
        }
        for entry in WalkDir::new(&root).follow_links(true).sort_by_file_name() {
            let entry = entry?;
            let path = entry.path();
            if entry.file_type().is_file()
                && path
                    .extension()
                    .is_some_and(|ext| YAML_EXTENSIONS.iter().any(|e| ext == *e))
            {
                files.push(path.to_path_buf());
            }
        }
    }
    Ok(files)
}
