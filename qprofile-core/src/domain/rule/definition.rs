// qprofile-core/src/domain/rule/definition.rs

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{RuleKey, Severity};

/// Numeric storage identifier of a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleId(pub u64);

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A rule as declared by an installed analyzer. Never mutated by this crate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleDefinition {
    pub id: RuleId,
    pub key: RuleKey,
    pub language: String,
    pub severity: Severity,
    /// Set only on custom rules instantiated from a template.
    #[serde(default)]
    pub template_id: Option<RuleId>,
    #[serde(default)]
    pub is_template: bool,
    #[serde(default)]
    pub is_external: bool,
}

impl RuleDefinition {
    pub fn new(id: RuleId, key: RuleKey, language: impl Into<String>, severity: Severity) -> Self {
        Self {
            id,
            key,
            language: language.into(),
            severity,
            template_id: None,
            is_template: false,
            is_external: false,
        }
    }

    /// A custom rule has its parameters fixed when it is created from its template.
    pub fn is_custom(&self) -> bool {
        self.template_id.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleParam {
    pub rule_id: RuleId,
    pub name: String,
    #[serde(default)]
    pub default_value: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl RuleParam {
    pub fn new(rule_id: RuleId, name: impl Into<String>, default_value: Option<&str>) -> Self {
        Self {
            rule_id,
            name: name.into(),
            default_value: default_value.map(str::to_string),
            description: None,
        }
    }
}
