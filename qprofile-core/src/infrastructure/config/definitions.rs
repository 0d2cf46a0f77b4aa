// qprofile-core/src/infrastructure/config/definitions.rs

use std::path::Path;
use tracing::{debug, info, instrument};
use validator::Validate;

use super::{discover_yaml_files, load_fragment};
use crate::domain::builtin::ProfileContribution;
use crate::infrastructure::error::InfrastructureError;

/// Reads every built-in profile contribution under the profile paths.
/// Each file holds the contribution of one plugin.
#[instrument(skip(project_dir))]
pub fn load_contributions(
    project_dir: &Path,
    profile_paths: &[String],
) -> Result<Vec<ProfileContribution>, InfrastructureError> {
    let mut contributions = Vec::new();

    for path in discover_yaml_files(project_dir, profile_paths)? {
        let contribution: ProfileContribution = load_fragment(&path)?;
        contribution
            .validate()
            .map_err(|source| InfrastructureError::Validation {
                path: path.display().to_string(),
                source,
            })?;
        debug!(
            path = ?path,
            plugin = %contribution.plugin,
            profiles = contribution.profiles.len(),
            "Built-in profile contribution loaded"
        );
        contributions.push(contribution);
    }

    info!(count = contributions.len(), "Built-in profile contributions loaded");
    Ok(contributions)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::rule::RuleKey;
    use anyhow::Result;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_contributions_are_loaded_in_path_order() -> Result<()> {
        let dir = tempdir()?;
        fs::create_dir_all(dir.path().join("profiles"))?;
        fs::write(
            dir.path().join("profiles/b.yaml"),
            "plugin: second\nprofiles:\n  - name: Sonar way\n    language: js\n",
        )?;
        fs::write(
            dir.path().join("profiles/a.yaml"),
            "plugin: first\nprofiles:\n  - name: Sonar way\n    language: js\n    rules:\n      - key: js:S1\n",
        )?;

        let contributions = load_contributions(dir.path(), &["profiles".to_string()])?;
        assert_eq!(contributions.len(), 2);
        assert_eq!(contributions[0].plugin, "first");
        assert_eq!(contributions[0].profiles[0].rules[0].key, RuleKey::of("js", "S1"));
        Ok(())
    }

    #[test]
    fn test_empty_profile_name_is_rejected() -> Result<()> {
        let dir = tempdir()?;
        fs::create_dir_all(dir.path().join("profiles"))?;
        fs::write(
            dir.path().join("profiles/bad.yaml"),
            "plugin: p\nprofiles:\n  - name: \"\"\n    language: js\n",
        )?;

        let err = load_contributions(dir.path(), &["profiles".to_string()]).unwrap_err();
        assert!(matches!(err, InfrastructureError::Validation { .. }));
        Ok(())
    }

    #[test]
    fn test_malformed_rule_key_is_rejected() -> Result<()> {
        let dir = tempdir()?;
        fs::create_dir_all(dir.path().join("profiles"))?;
        fs::write(
            dir.path().join("profiles/bad.yaml"),
            "plugin: p\nprofiles:\n  - name: Sonar way\n    language: js\n    rules:\n      - key: nocolon\n",
        )?;

        let err = load_contributions(dir.path(), &["profiles".to_string()]).unwrap_err();
        assert!(matches!(err, InfrastructureError::InvalidFile { .. }));
        Ok(())
    }
}
