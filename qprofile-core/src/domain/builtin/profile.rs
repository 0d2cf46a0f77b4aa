// qprofile-core/src/domain/builtin/profile.rs

use indexmap::IndexMap;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::domain::activation::RuleActivation;
use crate::domain::rule::{RuleId, RuleKey, Severity};

/// A rule activation of a built-in profile, resolved against the rule catalog.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuiltInActiveRule {
    pub rule_id: RuleId,
    pub rule_key: RuleKey,
    pub severity: Option<Severity>,
    pub params: BTreeMap<String, String>,
}

/// The canonical built-in profile for one (language, name) pair, after all
/// contributions have been merged.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuiltInProfile {
    pub language: String,
    pub name: String,
    pub is_default: bool,
    pub active_rules: Vec<BuiltInActiveRule>,
}

impl BuiltInProfile {
    /// Activation requests that realize this profile on its built-in rules profile.
    pub fn activations(&self) -> Vec<RuleActivation> {
        self.active_rules
            .iter()
            .map(|r| {
                let params = r
                    .params
                    .iter()
                    .map(|(k, v)| (k.clone(), Some(v.clone())))
                    .collect();
                RuleActivation::create(r.rule_id, r.severity, params)
            })
            .collect()
    }

    pub fn active_rule(&self, key: &RuleKey) -> Option<&BuiltInActiveRule> {
        self.active_rules.iter().find(|r| &r.rule_key == key)
    }
}

#[derive(Debug)]
pub(crate) struct BuiltInProfileBuilder {
    pub(crate) language: String,
    pub(crate) name: String,
    pub(crate) declared_default: bool,
    computed_default: bool,
    rules: IndexMap<RuleKey, BuiltInActiveRule>,
}

impl BuiltInProfileBuilder {
    pub(crate) fn new(language: &str, name: &str) -> Self {
        Self {
            language: language.to_string(),
            name: name.to_string(),
            declared_default: false,
            computed_default: false,
            rules: IndexMap::new(),
        }
    }

    /// A rule activated twice keeps its first position; the later severity
    /// and params win.
    pub(crate) fn add_rule(&mut self, rule: BuiltInActiveRule) {
        self.rules.insert(rule.rule_key.clone(), rule);
    }

    pub(crate) fn set_computed_default(&mut self, value: bool) {
        self.computed_default = value;
    }

    pub(crate) fn build(self) -> BuiltInProfile {
        BuiltInProfile {
            language: self.language,
            name: self.name,
            is_default: self.computed_default,
            active_rules: self.rules.into_values().collect(),
        }
    }
}
