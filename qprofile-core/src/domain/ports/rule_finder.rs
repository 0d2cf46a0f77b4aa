use crate::domain::rule::{RuleDefinition, RuleKey};

/// Resolves rule references of built-in profile definitions at startup.
pub trait RuleFinder: Send + Sync {
    fn find(&self, key: &RuleKey) -> Option<RuleDefinition>;
}
