// qprofile-core/src/domain/profile/active_rule.rs

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::rule::{RuleId, RuleKey, Severity};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActiveRuleKey {
    pub rules_profile_key: String,
    pub rule_key: RuleKey,
}

impl ActiveRuleKey {
    pub fn of(rules_profile_key: impl Into<String>, rule_key: RuleKey) -> Self {
        Self {
            rules_profile_key: rules_profile_key.into(),
            rule_key,
        }
    }
}

impl fmt::Display for ActiveRuleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.rules_profile_key, self.rule_key)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActiveRuleInheritance {
    Inherited,
    Overrides,
}

/// Records that a rule is enabled on a rules profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveRule {
    pub uuid: String,
    pub key: ActiveRuleKey,
    pub rule_id: RuleId,
    pub severity: Severity,
    #[serde(default)]
    pub inheritance: Option<ActiveRuleInheritance>,
}

impl ActiveRule {
    pub fn new(uuid: impl Into<String>, key: ActiveRuleKey, rule_id: RuleId, severity: Severity) -> Self {
        Self {
            uuid: uuid.into(),
            key,
            rule_id,
            severity,
            inheritance: None,
        }
    }

    pub fn with_inheritance(mut self, inheritance: ActiveRuleInheritance) -> Self {
        self.inheritance = Some(inheritance);
        self
    }

    pub fn does_override(&self) -> bool {
        self.inheritance == Some(ActiveRuleInheritance::Overrides)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveRuleParam {
    pub active_rule_uuid: String,
    pub name: String,
    pub value: String,
}

impl ActiveRuleParam {
    pub fn new(active_rule_uuid: impl Into<String>, name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            active_rule_uuid: active_rule_uuid.into(),
            name: name.into(),
            value: value.into(),
        }
    }
}
