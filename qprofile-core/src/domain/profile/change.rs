// qprofile-core/src/domain/profile/change.rs

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::active_rule::{ActiveRuleInheritance, ActiveRuleKey};
use crate::domain::rule::{RuleId, Severity};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChangeType {
    Activated,
    Updated,
    Deactivated,
}

/// One delta produced while activating or deactivating a rule on a rules profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveRuleChange {
    pub change_type: ChangeType,
    pub key: ActiveRuleKey,
    pub rule_id: RuleId,
    #[serde(default)]
    pub severity: Option<Severity>,
    #[serde(default)]
    pub inheritance: Option<ActiveRuleInheritance>,
    /// `None` values mean the parameter is reset to the rule default.
    #[serde(default)]
    pub parameters: BTreeMap<String, Option<String>>,
}

impl ActiveRuleChange {
    pub fn new(change_type: ChangeType, key: ActiveRuleKey, rule_id: RuleId) -> Self {
        Self {
            change_type,
            key,
            rule_id,
            severity: None,
            inheritance: None,
            parameters: BTreeMap::new(),
        }
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = Some(severity);
        self
    }

    pub fn with_parameter(mut self, name: impl Into<String>, value: Option<&str>) -> Self {
        self.parameters.insert(name.into(), value.map(str::to_string));
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ParamChange {
    pub key: String,
    pub value: Option<String>,
}

/// Effective configuration of one rule, as broadcast to clients.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RuleChange {
    pub key: String,
    pub language: String,
    pub severity: Option<Severity>,
    pub params: Vec<ParamChange>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RuleSetChangedEvent {
    pub project_keys: Vec<String>,
    pub activated_rules: BTreeSet<RuleChange>,
    pub deactivated_rules: BTreeSet<RuleChange>,
}

impl RuleSetChangedEvent {
    pub fn is_empty(&self) -> bool {
        self.activated_rules.is_empty() && self.deactivated_rules.is_empty()
    }
}
