// qprofile-core/src/ports/store.rs

use crate::domain::profile::{ActiveRule, ActiveRuleParam, Project, QualityProfile};
use crate::domain::rule::RuleId;
use crate::error::QProfileError;
use async_trait::async_trait;

/// Batch loaders over quality profiles and their activations.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Tenant profiles pointing to the given rules profile.
    async fn profiles_by_rules_profile(
        &self,
        rules_profile_key: &str,
    ) -> Result<Vec<QualityProfile>, QProfileError>;

    async fn profile_by_key(&self, key: &str) -> Result<Option<QualityProfile>, QProfileError>;

    /// Activations of `rule_ids` on any of `rules_profile_keys`.
    async fn active_rules(
        &self,
        rule_ids: &[RuleId],
        rules_profile_keys: &[String],
    ) -> Result<Vec<ActiveRule>, QProfileError>;

    async fn active_rule_params(
        &self,
        active_rule_uuids: &[String],
    ) -> Result<Vec<ActiveRuleParam>, QProfileError>;

    /// Projects explicitly associated with the profile.
    async fn selected_projects_of(
        &self,
        profile: &QualityProfile,
    ) -> Result<Vec<Project>, QProfileError>;
}
