// qprofile-core/src/infrastructure/adapters/rule_finder.rs

use std::collections::HashMap;

use crate::domain::ports::RuleFinder;
use crate::domain::rule::{RuleDefinition, RuleKey};

/// Rule lookups by key, loaded once for the registry initialization.
#[derive(Debug, Clone, Default)]
pub struct CachingRuleFinder {
    by_key: HashMap<RuleKey, RuleDefinition>,
}

impl CachingRuleFinder {
    pub fn new(rules: impl IntoIterator<Item = RuleDefinition>) -> Self {
        Self {
            by_key: rules.into_iter().map(|r| (r.key.clone(), r)).collect(),
        }
    }
}

impl RuleFinder for CachingRuleFinder {
    fn find(&self, key: &RuleKey) -> Option<RuleDefinition> {
        self.by_key.get(key).cloned()
    }
}
