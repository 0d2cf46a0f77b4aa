// qprofile-core/src/ports/catalog.rs

use crate::domain::rule::{RuleDefinition, RuleId, RuleKey, RuleParam};
use crate::error::QProfileError;
use async_trait::async_trait;

/// Read access to the rules declared by the installed analyzers.
#[async_trait]
pub trait RuleCatalog: Send + Sync {
    async fn lookup(&self, key: &RuleKey) -> Result<Option<RuleDefinition>, QProfileError>;

    /// Unknown ids are silently skipped.
    async fn rules_by_ids(&self, ids: &[RuleId]) -> Result<Vec<RuleDefinition>, QProfileError>;

    /// Parameters of the given rules, in declaration order.
    async fn params_of(&self, ids: &[RuleId]) -> Result<Vec<RuleParam>, QProfileError>;
}
