// qprofile-core/src/infrastructure/adapters/memory.rs

use async_trait::async_trait;
use indexmap::{IndexMap, IndexSet};
use std::collections::HashSet;
use std::sync::Arc;

use crate::domain::error::DomainError;
use crate::domain::ports::{DescendantProfiles, DescendantProfilesSupplier};
use crate::domain::profile::{ActiveRule, ActiveRuleParam, Project, QualityProfile};
use crate::domain::rule::{RuleDefinition, RuleId, RuleKey, RuleParam};
use crate::error::QProfileError;
use crate::infrastructure::config::RuleSet;
use crate::ports::{ProfileStore, RuleCatalog, RuleSearchIndex};

/// Storage, catalog and search index held in memory.
///
/// Filled through the `add_*` methods, then shared read-only behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    rules: IndexMap<RuleId, RuleDefinition>,
    rule_params: Vec<RuleParam>,
    profiles: IndexMap<String, QualityProfile>,
    active_rules: IndexMap<String, ActiveRule>,
    active_rule_params: Vec<ActiveRuleParam>,
    projects: IndexMap<String, Project>,
    // (project key, profile key)
    associations: IndexSet<(String, String)>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rule_set(rule_set: RuleSet) -> Self {
        let mut store = Self::new();
        for rule in rule_set.rules {
            store.add_rule(rule);
        }
        for param in rule_set.params {
            store.add_rule_param(param);
        }
        store
    }

    pub fn add_rule(&mut self, rule: RuleDefinition) {
        self.rules.insert(rule.id, rule);
    }

    pub fn add_rule_param(&mut self, param: RuleParam) {
        self.rule_params.push(param);
    }

    pub fn add_profile(&mut self, profile: QualityProfile) {
        self.profiles.insert(profile.key.clone(), profile);
    }

    pub fn add_active_rule(&mut self, active_rule: ActiveRule) {
        self.active_rules.insert(active_rule.uuid.clone(), active_rule);
    }

    pub fn add_active_rule_param(&mut self, param: ActiveRuleParam) {
        self.active_rule_params.push(param);
    }

    /// Registers the project and selects `profile_key` for it.
    pub fn associate_project(&mut self, project: Project, profile_key: &str) {
        self.associations
            .insert((project.key.clone(), profile_key.to_string()));
        self.projects.insert(project.key.clone(), project);
    }

    pub fn rules(&self) -> impl Iterator<Item = &RuleDefinition> {
        self.rules.values()
    }

    fn active_rules_on<'a>(
        &'a self,
        rule_ids: &'a [RuleId],
        rules_profile_keys: &'a [String],
    ) -> impl Iterator<Item = &'a ActiveRule> + 'a {
        self.active_rules.values().filter(move |ar| {
            rule_ids.contains(&ar.rule_id) && rules_profile_keys.contains(&ar.key.rules_profile_key)
        })
    }

    fn params_of_active_rules(&self, uuids: &HashSet<&str>) -> Vec<ActiveRuleParam> {
        self.active_rule_params
            .iter()
            .filter(|p| uuids.contains(p.active_rule_uuid.as_str()))
            .cloned()
            .collect()
    }

    /// Every profile inheriting, directly or not, from one of `bases`.
    fn descendants_of(&self, bases: &[QualityProfile]) -> Vec<QualityProfile> {
        let mut seen: HashSet<&str> = bases.iter().map(|p| p.key.as_str()).collect();
        let mut frontier: Vec<&str> = bases.iter().map(|p| p.key.as_str()).collect();
        let mut descendants = Vec::new();

        while !frontier.is_empty() {
            let mut next = Vec::new();
            for profile in self.profiles.values() {
                if let Some(parent) = profile.parent_key.as_deref()
                    && frontier.contains(&parent)
                    && seen.insert(profile.key.as_str())
                {
                    next.push(profile.key.as_str());
                    descendants.push(profile.clone());
                }
            }
            frontier = next;
        }
        descendants
    }
}

#[async_trait]
impl RuleCatalog for InMemoryStore {
    async fn lookup(&self, key: &RuleKey) -> Result<Option<RuleDefinition>, QProfileError> {
        Ok(self.rules.values().find(|r| &r.key == key).cloned())
    }

    async fn rules_by_ids(&self, ids: &[RuleId]) -> Result<Vec<RuleDefinition>, QProfileError> {
        Ok(ids.iter().filter_map(|id| self.rules.get(id)).cloned().collect())
    }

    async fn params_of(&self, ids: &[RuleId]) -> Result<Vec<RuleParam>, QProfileError> {
        Ok(self
            .rule_params
            .iter()
            .filter(|p| ids.contains(&p.rule_id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ProfileStore for InMemoryStore {
    async fn profiles_by_rules_profile(
        &self,
        rules_profile_key: &str,
    ) -> Result<Vec<QualityProfile>, QProfileError> {
        Ok(self
            .profiles
            .values()
            .filter(|p| p.rules_profile_key == rules_profile_key)
            .cloned()
            .collect())
    }

    async fn profile_by_key(&self, key: &str) -> Result<Option<QualityProfile>, QProfileError> {
        Ok(self.profiles.get(key).cloned())
    }

    async fn active_rules(
        &self,
        rule_ids: &[RuleId],
        rules_profile_keys: &[String],
    ) -> Result<Vec<ActiveRule>, QProfileError> {
        Ok(self
            .active_rules_on(rule_ids, rules_profile_keys)
            .cloned()
            .collect())
    }

    async fn active_rule_params(
        &self,
        active_rule_uuids: &[String],
    ) -> Result<Vec<ActiveRuleParam>, QProfileError> {
        let uuids: HashSet<&str> = active_rule_uuids.iter().map(String::as_str).collect();
        Ok(self.params_of_active_rules(&uuids))
    }

    async fn selected_projects_of(
        &self,
        profile: &QualityProfile,
    ) -> Result<Vec<Project>, QProfileError> {
        Ok(self
            .associations
            .iter()
            .filter(|(_, profile_key)| *profile_key == profile.key)
            .filter_map(|(project_key, _)| self.projects.get(project_key))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl RuleSearchIndex for InMemoryStore {
    async fn search_activated_rule_ids(
        &self,
        profile: &QualityProfile,
        include_external: bool,
    ) -> Result<Vec<RuleId>, QProfileError> {
        Ok(self
            .active_rules
            .values()
            .filter(|ar| ar.key.rules_profile_key == profile.rules_profile_key)
            .filter(|ar| {
                include_external || self.rules.get(&ar.rule_id).is_some_and(|r| !r.is_external)
            })
            .map(|ar| ar.rule_id)
            .collect())
    }
}

/// Lazily loads descendant profiles from a shared [`InMemoryStore`].
#[derive(Debug, Clone)]
pub struct StoreDescendants(pub Arc<InMemoryStore>);

impl DescendantProfilesSupplier for StoreDescendants {
    fn descendants(
        &self,
        base_profiles: &[QualityProfile],
        rule_ids: &[RuleId],
    ) -> Result<DescendantProfiles, DomainError> {
        let store = &self.0;
        let profiles = store.descendants_of(base_profiles);
        let rules_profile_keys: Vec<String> =
            profiles.iter().map(|p| p.rules_profile_key.clone()).collect();

        let active_rules: Vec<ActiveRule> = store
            .active_rules_on(rule_ids, &rules_profile_keys)
            .cloned()
            .collect();
        let uuids: HashSet<&str> = active_rules.iter().map(|ar| ar.uuid.as_str()).collect();
        let active_rule_params = store.params_of_active_rules(&uuids);

        Ok(DescendantProfiles {
            profiles,
            active_rules,
            active_rule_params,
        })
    }
}
