use crate::domain::error::DomainError;
use crate::domain::profile::{ActiveRule, ActiveRuleParam, QualityProfile};
use crate::domain::rule::RuleId;

/// Everything below a set of base profiles that an activation batch may cascade into.
#[derive(Debug, Clone, Default)]
pub struct DescendantProfiles {
    pub profiles: Vec<QualityProfile>,
    pub active_rules: Vec<ActiveRule>,
    pub active_rule_params: Vec<ActiveRuleParam>,
}

pub trait DescendantProfilesSupplier: Send {
    fn descendants(
        &self,
        base_profiles: &[QualityProfile],
        rule_ids: &[RuleId],
    ) -> Result<DescendantProfiles, DomainError>;
}

impl<F> DescendantProfilesSupplier for F
where
    F: Fn(&[QualityProfile], &[RuleId]) -> Result<DescendantProfiles, DomainError> + Send,
{
    fn descendants(
        &self,
        base_profiles: &[QualityProfile],
        rule_ids: &[RuleId],
    ) -> Result<DescendantProfiles, DomainError> {
        self(base_profiles, rule_ids)
    }
}
