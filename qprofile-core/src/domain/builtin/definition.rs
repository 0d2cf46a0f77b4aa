// qprofile-core/src/domain/builtin/definition.rs

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use validator::Validate;

use crate::domain::rule::{RuleKey, Severity};

/// Built-in profiles shipped by one plugin. A contribution may define
/// profiles for several languages, and several contributions may define a
/// profile with the same (language, name): they are merged at startup.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ProfileContribution {
    #[validate(length(min = 1, message = "Plugin name cannot be empty"))]
    pub plugin: String,

    #[validate(nested)]
    #[serde(default)]
    pub profiles: Vec<BuiltInProfileDefinition>,
}

impl ProfileContribution {
    pub fn new(plugin: impl Into<String>, profiles: Vec<BuiltInProfileDefinition>) -> Self {
        Self {
            plugin: plugin.into(),
            profiles,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BuiltInProfileDefinition {
    #[validate(length(min = 1, message = "Profile name cannot be empty"))]
    pub name: String,

    #[validate(length(min = 1, message = "Profile language cannot be empty"))]
    pub language: String,

    #[serde(rename = "default", default)]
    pub is_default: bool,

    #[serde(default)]
    pub rules: Vec<BuiltInActiveRuleDefinition>,
}

impl BuiltInProfileDefinition {
    pub fn new(name: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            language: language.into(),
            is_default: false,
            rules: Vec::new(),
        }
    }

    pub fn declared_default(mut self, is_default: bool) -> Self {
        self.is_default = is_default;
        self
    }

    pub fn activate_rule(self, key: RuleKey) -> Self {
        self.activate_rule_with(key, None, BTreeMap::new())
    }

    pub fn activate_rule_with(
        mut self,
        key: RuleKey,
        severity: Option<Severity>,
        params: BTreeMap<String, String>,
    ) -> Self {
        self.rules.push(BuiltInActiveRuleDefinition {
            key,
            severity,
            params,
        });
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuiltInActiveRuleDefinition {
    pub key: RuleKey,
    /// Overrides the default severity of the rule.
    #[serde(default)]
    pub severity: Option<Severity>,
    #[serde(default)]
    pub params: BTreeMap<String, String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_contribution_deserialization() {
        let yaml = r#"
plugin: javascript-analyzer
profiles:
  - name: Sonar way
    language: js
    default: true
    rules:
      - key: javascript:S100
        severity: critical
        params:
          format: "^[a-z]+$"
      - key: javascript:S101
"#;
        let contribution: ProfileContribution = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(contribution.plugin, "javascript-analyzer");
        let profile = &contribution.profiles[0];
        assert!(profile.is_default);
        assert_eq!(profile.rules.len(), 2);
        assert_eq!(profile.rules[0].severity, Some(Severity::Critical));
        assert_eq!(profile.rules[0].params["format"], "^[a-z]+$");
        assert_eq!(profile.rules[1].severity, None);
        assert!(contribution.validate().is_ok());
    }

    #[test]
    fn test_empty_profile_name_is_invalid() {
        let contribution = ProfileContribution::new(
            "plugin",
            vec![BuiltInProfileDefinition::new("", "js")],
        );
        assert!(contribution.validate().is_err());
    }
}
