// qprofile-core/src/infrastructure/config/project.rs

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};
use validator::Validate;

use super::load_fragment;
use crate::infrastructure::error::InfrastructureError;

const CONFIG_CANDIDATES: [&str; 2] = ["qprofile.yaml", "qprofile.yml"];

fn default_rule_paths() -> Vec<String> {
    vec!["rules".to_string()]
}

fn default_profile_paths() -> Vec<String> {
    vec!["profiles".to_string()]
}

fn default_batch_size() -> usize {
    1000
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "kebab-case")]
pub struct ProjectConfig {
    #[validate(length(min = 1, message = "Project name cannot be empty"))]
    pub name: String,

    /// Languages of the installed analyzers.
    #[serde(default)]
    pub languages: Vec<String>,

    #[serde(default = "default_rule_paths")]
    pub rule_paths: Vec<String>,

    #[serde(default = "default_profile_paths")]
    pub profile_paths: Vec<String>,

    #[validate(nested)]
    #[serde(default)]
    pub publisher: PublisherConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "kebab-case")]
pub struct PublisherConfig {
    /// Maximum number of ids per storage round-trip.
    #[validate(range(min = 1, message = "Batch size must be at least 1"))]
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

impl Default for PublisherConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
        }
    }
}

// --- LOADER ---

#[instrument(skip(project_dir))]
pub fn load_project_config(project_dir: &Path) -> Result<ProjectConfig, InfrastructureError> {
    // 1. Découverte du fichier principal
    let config_path = find_main_config(project_dir)?;
    info!(path = ?config_path, "Loading project configuration");

    // 2. Chargement YAML
    let mut config: ProjectConfig = load_fragment(&config_path)?;

    // 3. Override via Variables d'Environnement (Pattern 'Layering')
    // Permet de faire: QPROFILE_LANGUAGES=java,js qprofile check
    apply_env_overrides(&mut config);

    config
        .validate()
        .map_err(|source| InfrastructureError::Validation {
            path: config_path.display().to_string(),
            source,
        })?;

    Ok(config)
}

fn find_main_config(root: &Path) -> Result<PathBuf, InfrastructureError> {
    for filename in CONFIG_CANDIDATES {
        let p = root.join(filename);
        if p.exists() {
            return Ok(p);
        }
    }
    Err(InfrastructureError::ConfigNotFound(format!(
        "No configuration file found in {:?}. Checked: {:?}",
        root, CONFIG_CANDIDATES
    )))
}

fn apply_env_overrides(config: &mut ProjectConfig) {
    apply_overrides(config, |key| std::env::var(key).ok());
}

fn apply_overrides(config: &mut ProjectConfig, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(val) = lookup("QPROFILE_LANGUAGES") {
        let languages: Vec<String> = val
            .split(',')
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect();
        info!(old = ?config.languages, new = ?languages, "Overriding languages via ENV");
        config.languages = languages;
    }
    if let Some(val) = lookup("QPROFILE_BATCH_SIZE") {
        match val.trim().parse::<usize>() {
            Ok(size) => {
                info!(old = config.publisher.batch_size, new = size, "Overriding batch size via ENV");
                config.publisher.batch_size = size;
            }
            Err(_) => warn!(value = %val, "Ignoring invalid QPROFILE_BATCH_SIZE"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::collections::HashMap;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_load_with_defaults() -> Result<()> {
        let dir = tempdir()?;
        fs::write(
            dir.path().join("qprofile.yaml"),
            "name: acme\nlanguages: [java, js]\n",
        )?;

        let config = load_project_config(dir.path())?;
        assert_eq!(config.name, "acme");
        assert_eq!(config.rule_paths, vec!["rules"]);
        assert_eq!(config.profile_paths, vec!["profiles"]);
        assert_eq!(config.publisher.batch_size, 1000);
        Ok(())
    }

    #[test]
    fn test_yml_extension_and_custom_paths() -> Result<()> {
        let dir = tempdir()?;
        fs::write(
            dir.path().join("qprofile.yml"),
            "name: acme\nrule-paths: [catalog]\nprofile-paths: [builtin, extra]\npublisher:\n  batch-size: 50\n",
        )?;

        let config = load_project_config(dir.path())?;
        assert_eq!(config.rule_paths, vec!["catalog"]);
        assert_eq!(config.profile_paths, vec!["builtin", "extra"]);
        assert_eq!(config.publisher.batch_size, 50);
        Ok(())
    }

    #[test]
    fn test_missing_config_is_reported() -> Result<()> {
        let dir = tempdir()?;
        let err = load_project_config(dir.path()).unwrap_err();
        assert!(matches!(err, InfrastructureError::ConfigNotFound(_)));
        Ok(())
    }

    #[test]
    fn test_zero_batch_size_is_rejected() -> Result<()> {
        let dir = tempdir()?;
        fs::write(
            dir.path().join("qprofile.yaml"),
            "name: acme\npublisher:\n  batch-size: 0\n",
        )?;
        let err = load_project_config(dir.path()).unwrap_err();
        assert!(matches!(err, InfrastructureError::Validation { .. }));
        Ok(())
    }

    #[test]
    fn test_overrides() {
        let mut config: ProjectConfig = serde_yaml::from_str("name: acme\nlanguages: [java]").unwrap();
        let env: HashMap<&str, &str> =
            HashMap::from([("QPROFILE_LANGUAGES", " js, py ,"), ("QPROFILE_BATCH_SIZE", "250")]);

        apply_overrides(&mut config, |k| env.get(k).map(|v| v.to_string()));

        assert_eq!(config.languages, vec!["js", "py"]);
        assert_eq!(config.publisher.batch_size, 250);
    }

    #[test]
    fn test_invalid_batch_size_override_is_ignored() {
        let mut config: ProjectConfig = serde_yaml::from_str("name: acme").unwrap();
        apply_overrides(&mut config, |k| (k == "QPROFILE_BATCH_SIZE").then(|| "lots".to_string()));
        assert_eq!(config.publisher.batch_size, 1000);
    }
}
