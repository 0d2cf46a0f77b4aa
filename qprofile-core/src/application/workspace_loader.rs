// qprofile-core/src/application/workspace_loader.rs

use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, instrument};

use crate::domain::activation::{ActivationWorkspace, WorkspaceSeed};
use crate::domain::error::DomainError;
use crate::domain::ports::DescendantProfilesSupplier;
use crate::domain::profile::{QualityProfile, RulesProfile};
use crate::domain::rule::RuleId;
use crate::error::QProfileError;
use crate::ports::{ProfileStore, RuleCatalog};

/// Pre-fetches the rows an [`ActivationWorkspace`] needs for one batch.
pub struct WorkspaceLoader {
    catalog: Arc<dyn RuleCatalog>,
    store: Arc<dyn ProfileStore>,
}

impl WorkspaceLoader {
    pub fn new(catalog: Arc<dyn RuleCatalog>, store: Arc<dyn ProfileStore>) -> Self {
        Self { catalog, store }
    }

    /// Workspace anchored on a built-in rules profile. Every tenant profile
    /// pointing to it is loaded, possibly none.
    #[instrument(skip_all, fields(rules_profile = %rules_profile.key, rules = rule_ids.len()))]
    pub async fn for_built_in_profile(
        &self,
        rules_profile: &RulesProfile,
        rule_ids: &[RuleId],
        descendants: impl DescendantProfilesSupplier + 'static,
    ) -> Result<ActivationWorkspace, QProfileError> {
        let profiles = self
            .store
            .profiles_by_rules_profile(&rules_profile.key)
            .await?;

        let seed = self
            .seed(rules_profile.clone(), profiles, rule_ids)
            .await?;
        Ok(ActivationWorkspace::new(seed, descendants))
    }

    /// Workspace anchored on a tenant profile, with its parent when it has one.
    #[instrument(skip_all, fields(profile = %profile.key, rules = rule_ids.len()))]
    pub async fn for_user_profile(
        &self,
        profile: &QualityProfile,
        rule_ids: &[RuleId],
        descendants: impl DescendantProfilesSupplier + 'static,
    ) -> Result<ActivationWorkspace, QProfileError> {
        if profile.is_built_in {
            return Err(DomainError::BuiltInProfileNotEditable(profile.key.clone()).into());
        }

        let mut profiles = vec![profile.clone()];
        if let Some(parent_key) = &profile.parent_key {
            let parent = self
                .store
                .profile_by_key(parent_key)
                .await?
                .ok_or_else(|| DomainError::UnregisteredProfile(parent_key.clone()))?;
            profiles.push(parent);
        }

        let seed = self.seed(profile.rules_profile(), profiles, rule_ids).await?;
        Ok(ActivationWorkspace::new(seed, descendants))
    }

    async fn seed(
        &self,
        base_rules_profile: RulesProfile,
        profiles: Vec<QualityProfile>,
        rule_ids: &[RuleId],
    ) -> Result<WorkspaceSeed, QProfileError> {
        let rules = self.catalog.rules_by_ids(rule_ids).await?;
        let rule_params = self.catalog.params_of(rule_ids).await?;

        let mut rules_profile_keys: Vec<String> = vec![base_rules_profile.key.clone()];
        for profile in &profiles {
            if !rules_profile_keys.contains(&profile.rules_profile_key) {
                rules_profile_keys.push(profile.rules_profile_key.clone());
            }
        }

        let active_rules = self.store.active_rules(rule_ids, &rules_profile_keys).await?;
        let uuids: Vec<String> = active_rules.iter().map(|ar| ar.uuid.clone()).collect();
        let active_rule_params = self.store.active_rule_params(&uuids).await?;

        debug!(
            rules = rules.len(),
            profiles = profiles.len(),
            active_rules = active_rules.len(),
            "Activation workspace seeded"
        );

        Ok(WorkspaceSeed {
            date: Utc::now(),
            base_rules_profile,
            rules,
            rule_params,
            profiles,
            active_rules,
            active_rule_params,
        })
    }
}
