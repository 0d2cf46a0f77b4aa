// qprofile-core/src/domain/activation/request.rs

use std::collections::BTreeMap;

use crate::domain::rule::{RuleId, Severity};

/// Request to activate (or reset) one rule, as handed to the activator.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleActivation {
    pub rule_id: RuleId,
    pub severity: Option<Severity>,
    pub reset: bool,
    parameters: BTreeMap<String, Option<String>>,
}

impl RuleActivation {
    /// Blank requested values are treated as "no value".
    pub fn create(
        rule_id: RuleId,
        severity: Option<Severity>,
        parameters: BTreeMap<String, Option<String>>,
    ) -> Self {
        let parameters = parameters
            .into_iter()
            .map(|(k, v)| (k, v.filter(|value| !value.trim().is_empty())))
            .collect();
        Self {
            rule_id,
            severity,
            reset: false,
            parameters,
        }
    }

    /// Reset the rule to its parent's (or default) configuration.
    pub fn reset(rule_id: RuleId) -> Self {
        Self {
            rule_id,
            severity: None,
            reset: true,
            parameters: BTreeMap::new(),
        }
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.parameters.get(key).and_then(|v| v.as_deref())
    }

    pub fn has_param(&self, key: &str) -> bool {
        self.parameters.contains_key(key)
    }
}
