// qprofile-core/src/infrastructure/config/rules.rs

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::{debug, info, instrument};

use super::{discover_yaml_files, load_fragment};
use crate::domain::rule::{RuleDefinition, RuleId, RuleKey, RuleParam, Severity};
use crate::infrastructure::error::InfrastructureError;

// --- 1. DÉFINITIONS DES STRUCTS (DTOs) ---

/// Rules shipped by one analyzer repository.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleCatalogFile {
    pub repository: String,
    pub language: String,
    #[serde(default)]
    pub rules: Vec<RuleEntryFile>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RuleEntryFile {
    pub id: u64,
    /// Rule identifier inside the repository.
    pub key: String,
    #[serde(default)]
    pub severity: Severity,
    #[serde(default)]
    pub params: Vec<RuleParamFile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_id: Option<u64>,
    #[serde(default)]
    pub template: bool,
    #[serde(default)]
    pub external: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleParamFile {
    pub name: String,
    #[serde(default)]
    pub default: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Every rule of the installed analyzers, with their parameters.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    pub rules: Vec<RuleDefinition>,
    pub params: Vec<RuleParam>,
}

impl RuleSet {
    fn add(&mut self, file: RuleCatalogFile) {
        for entry in file.rules {
            let id = RuleId(entry.id);
            self.params.extend(entry.params.into_iter().map(|p| RuleParam {
                rule_id: id,
                name: p.name,
                default_value: p.default,
                description: p.description,
            }));
            self.rules.push(RuleDefinition {
                id,
                key: RuleKey::of(file.repository.as_str(), entry.key),
                language: file.language.clone(),
                severity: entry.severity,
                template_id: entry.template_id.map(RuleId),
                is_template: entry.template,
                is_external: entry.external,
            });
        }
    }

    /// Ids and keys are unique; template pointers resolve inside the set.
    fn check_consistency(&self) -> Result<(), InfrastructureError> {
        let mut ids = HashSet::new();
        let mut keys = HashSet::new();
        for rule in &self.rules {
            if !ids.insert(rule.id) {
                return Err(InfrastructureError::ConfigError(format!(
                    "Rule id {} is declared twice",
                    rule.id
                )));
            }
            if !keys.insert(&rule.key) {
                return Err(InfrastructureError::ConfigError(format!(
                    "Rule '{}' is declared twice",
                    rule.key
                )));
            }
        }

        let by_id: HashMap<RuleId, &RuleDefinition> = self.rules.iter().map(|r| (r.id, r)).collect();
        for rule in &self.rules {
            if let Some(template_id) = rule.template_id
                && !by_id.contains_key(&template_id)
            {
                return Err(InfrastructureError::ConfigError(format!(
                    "Template {} of rule '{}' is not declared",
                    template_id, rule.key
                )));
            }
        }
        Ok(())
    }
}

// --- 2. FONCTIONS DE CHARGEMENT ---

#[instrument(skip(project_dir))]
pub fn load_rule_catalogs(
    project_dir: &Path,
    rule_paths: &[String],
) -> Result<RuleSet, InfrastructureError> {
    let mut rule_set = RuleSet::default();

    for path in discover_yaml_files(project_dir, rule_paths)? {
        let file: RuleCatalogFile = load_fragment(&path)?;
        debug!(path = ?path, repository = %file.repository, rules = file.rules.len(), "Rule catalog loaded");
        rule_set.add(file);
    }

    rule_set.check_consistency()?;
    info!(rules = rule_set.rules.len(), "Rule catalogs loaded");
    Ok(rule_set)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::fs;
    use tempfile::tempdir;

    const JAVA: &str = r#"
repository: java
language: java
rules:
  - id: 1
    key: S100
    severity: minor
    params:
      - name: format
        default: "^[a-z]+$"
        description: Naming pattern
  - id: 2
    key: XPath
    template: true
  - id: 3
    key: NoFoo
    template-id: 2
"#;

    #[test]
    fn test_load_catalogs() -> Result<()> {
        let dir = tempdir()?;
        fs::create_dir_all(dir.path().join("rules/java"))?;
        fs::write(dir.path().join("rules/java/java.yaml"), JAVA)?;
        fs::write(dir.path().join("rules/README.md"), "not a catalog")?;

        let rule_set = load_rule_catalogs(dir.path(), &["rules".to_string()])?;
        assert_eq!(rule_set.rules.len(), 3);

        let s100 = &rule_set.rules[0];
        assert_eq!(s100.key, RuleKey::of("java", "S100"));
        assert_eq!(s100.severity, Severity::Minor);
        assert_eq!(rule_set.params[0].default_value.as_deref(), Some("^[a-z]+$"));

        assert_eq!(rule_set.rules[1].severity, Severity::Major);
        assert!(rule_set.rules[1].is_template);
        assert_eq!(rule_set.rules[2].template_id, Some(RuleId(2)));
        assert!(rule_set.rules[2].is_custom());
        Ok(())
    }

    #[test]
    fn test_missing_directory_yields_empty_set() -> Result<()> {
        let dir = tempdir()?;
        let rule_set = load_rule_catalogs(dir.path(), &["rules".to_string()])?;
        assert!(rule_set.rules.is_empty());
        Ok(())
    }

    #[test]
    fn test_duplicate_ids_are_rejected() -> Result<()> {
        let dir = tempdir()?;
        fs::create_dir_all(dir.path().join("rules"))?;
        fs::write(dir.path().join("rules/a.yml"), "repository: a\nlanguage: js\nrules:\n  - id: 1\n    key: S1\n")?;
        fs::write(dir.path().join("rules/b.yml"), "repository: b\nlanguage: js\nrules:\n  - id: 1\n    key: S1\n")?;

        let err = load_rule_catalogs(dir.path(), &["rules".to_string()]).unwrap_err();
        assert!(err.to_string().contains("Rule id 1 is declared twice"));
        Ok(())
    }

    #[test]
    fn test_dangling_template_is_rejected() -> Result<()> {
        let dir = tempdir()?;
        fs::create_dir_all(dir.path().join("rules"))?;
        fs::write(
            dir.path().join("rules/a.yml"),
            "repository: a\nlanguage: js\nrules:\n  - id: 1\n    key: S1\n    template-id: 9\n",
        )?;

        let err = load_rule_catalogs(dir.path(), &["rules".to_string()]).unwrap_err();
        assert!(matches!(err, InfrastructureError::ConfigError(_)));
        Ok(())
    }

    #[test]
    fn test_invalid_yaml_names_the_file() -> Result<()> {
        let dir = tempdir()?;
        fs::create_dir_all(dir.path().join("rules"))?;
        fs::write(dir.path().join("rules/broken.yml"), "repository: [unclosed")?;

        let err = load_rule_catalogs(dir.path(), &["rules".to_string()]).unwrap_err();
        assert!(err.to_string().contains("broken.yml"));
        Ok(())
    }
}
