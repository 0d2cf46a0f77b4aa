// qprofile-core/src/ports/search.rs

use crate::domain::profile::QualityProfile;
use crate::domain::rule::RuleId;
use crate::error::QProfileError;
use async_trait::async_trait;

#[async_trait]
pub trait RuleSearchIndex: Send + Sync {
    /// Ids of the rules activated on the profile. External rules are only
    /// returned when `include_external` is set.
    async fn search_activated_rule_ids(
        &self,
        profile: &QualityProfile,
        include_external: bool,
    ) -> Result<Vec<RuleId>, QProfileError>;
}
