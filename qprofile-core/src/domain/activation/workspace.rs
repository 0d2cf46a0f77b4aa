// qprofile-core/src/domain/activation/workspace.rs

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

use super::request::RuleActivation;
use crate::domain::error::DomainError;
use crate::domain::ports::{DescendantProfiles, DescendantProfilesSupplier};
use crate::domain::profile::{ActiveRule, ActiveRuleKey, ActiveRuleParam, QualityProfile, RulesProfile};
use crate::domain::rule::{RuleDefinition, RuleId, RuleParam};

/// Rows pre-fetched by the caller for one activation batch.
///
/// `profiles` must contain the profiles of the base rules profile and, when
/// known, their parents: parent active rules are looked up through them.
#[derive(Debug, Clone)]
pub struct WorkspaceSeed {
    pub date: DateTime<Utc>,
    pub base_rules_profile: RulesProfile,
    pub rules: Vec<RuleDefinition>,
    pub rule_params: Vec<RuleParam>,
    pub profiles: Vec<QualityProfile>,
    pub active_rules: Vec<ActiveRule>,
    pub active_rule_params: Vec<ActiveRuleParam>,
}

impl WorkspaceSeed {
    pub fn new(date: DateTime<Utc>, base_rules_profile: RulesProfile) -> Self {
        Self {
            date,
            base_rules_profile,
            rules: Vec::new(),
            rule_params: Vec::new(),
            profiles: Vec::new(),
            active_rules: Vec::new(),
            active_rule_params: Vec::new(),
        }
    }
}

/// A rule of the batch with its parameters, in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleEntry {
    pub definition: RuleDefinition,
    pub params: IndexMap<String, RuleParam>,
}

impl RuleEntry {
    pub fn param(&self, name: &str) -> Option<&RuleParam> {
        self.params.get(name)
    }

    pub fn param_default_value(&self, name: &str) -> Option<&str> {
        self.param(name).and_then(|p| p.default_value.as_deref())
    }
}

/// An existing activation with its parameter overrides.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveRuleEntry {
    pub active_rule: ActiveRule,
    pub params: BTreeMap<String, ActiveRuleParam>,
}

impl ActiveRuleEntry {
    pub fn param_value(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(|p| p.value.as_str())
    }
}

#[derive(Debug, Default)]
struct Snapshot {
    profiles: IndexMap<String, QualityProfile>,
    children: HashMap<String, Vec<String>>,
    rules: HashMap<RuleId, RuleEntry>,
    active_rules: HashMap<ActiveRuleKey, ActiveRuleEntry>,
    active_rule_keys: HashMap<String, ActiveRuleKey>,
}

impl Snapshot {
    fn add_rules(&mut self, rules: Vec<RuleDefinition>, params: Vec<RuleParam>) {
        for definition in rules {
            self.rules.insert(
                definition.id,
                RuleEntry {
                    definition,
                    params: IndexMap::new(),
                },
            );
        }
        for param in params {
            if let Some(entry) = self.rules.get_mut(&param.rule_id) {
                entry.params.insert(param.name.clone(), param);
            }
        }
    }

    fn add_profiles(&mut self, profiles: Vec<QualityProfile>) {
        for profile in profiles {
            if self.profiles.contains_key(&profile.key) {
                continue;
            }
            if let Some(parent_key) = &profile.parent_key {
                self.children
                    .entry(parent_key.clone())
                    .or_default()
                    .push(profile.key.clone());
            }
            self.profiles.insert(profile.key.clone(), profile);
        }
    }

    fn add_active_rules(&mut self, active_rules: Vec<ActiveRule>, params: Vec<ActiveRuleParam>) {
        for active_rule in active_rules {
            // First row wins; a shadowed row keeps no params.
            if let Entry::Vacant(slot) = self.active_rules.entry(active_rule.key.clone()) {
                self.active_rule_keys
                    .insert(active_rule.uuid.clone(), active_rule.key.clone());
                slot.insert(ActiveRuleEntry {
                    active_rule,
                    params: BTreeMap::new(),
                });
            }
        }
        for param in params {
            let entry = self
                .active_rule_keys
                .get(&param.active_rule_uuid)
                .and_then(|key| self.active_rules.get_mut(key));
            match entry {
                Some(entry) => {
                    entry.params.insert(param.name.clone(), param);
                }
                None => debug!(uuid = %param.active_rule_uuid, "Ignoring parameter of an unknown active rule"),
            }
        }
    }

    fn profiles_of<'a>(&'a self, rules_profile_key: &'a str) -> impl Iterator<Item = &'a QualityProfile> + 'a {
        self.profiles
            .values()
            .filter(move |p| p.rules_profile_key == rules_profile_key)
    }
}

#[derive(Debug, Clone)]
struct Cursor {
    rule_id: RuleId,
    rules_profile: RulesProfile,
    profile_keys: Vec<String>,
    active_rule: Option<ActiveRuleKey>,
    parent_active_rule: Option<ActiveRuleKey>,
}

/// Cache and navigation cursor for one batch of activations.
///
/// Owned by a single batch. The snapshot only grows (when descendants are
/// loaded); the cursor is replaced as a whole on every successful move.
pub struct ActivationWorkspace {
    date: DateTime<Utc>,
    base_rules_profile: RulesProfile,
    snapshot: Snapshot,
    descendants: Box<dyn DescendantProfilesSupplier>,
    descendants_loaded: bool,
    cursor: Option<Cursor>,
}

impl std::fmt::Debug for ActivationWorkspace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActivationWorkspace")
            .field("base_rules_profile", &self.base_rules_profile.key)
            .field("profiles", &self.snapshot.profiles.len())
            .field("rules", &self.snapshot.rules.len())
            .field("descendants_loaded", &self.descendants_loaded)
            .field("cursor", &self.cursor)
            .finish()
    }
}

impl ActivationWorkspace {
    pub fn new(seed: WorkspaceSeed, descendants: impl DescendantProfilesSupplier + 'static) -> Self {
        let mut snapshot = Snapshot::default();
        snapshot.add_rules(seed.rules, seed.rule_params);
        snapshot.add_profiles(seed.profiles);
        snapshot.add_active_rules(seed.active_rules, seed.active_rule_params);

        Self {
            date: seed.date,
            base_rules_profile: seed.base_rules_profile,
            snapshot,
            descendants: Box::new(descendants),
            descendants_loaded: false,
            cursor: None,
        }
    }

    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    pub fn base_rules_profile(&self) -> &RulesProfile {
        &self.base_rules_profile
    }

    pub fn profile(&self, key: &str) -> Option<&QualityProfile> {
        self.snapshot.profiles.get(key)
    }

    pub fn rule(&self, id: RuleId) -> Option<&RuleEntry> {
        self.snapshot.rules.get(&id)
    }

    /// Starts work on `rule_id`, positioned on the base rules profile.
    pub fn reset(&mut self, rule_id: RuleId) -> Result<(), DomainError> {
        let cursor = self.switch_to(self.base_rules_profile.clone(), rule_id)?;
        self.cursor = Some(cursor);
        Ok(())
    }

    /// Moves to a descendant profile, keeping the current rule.
    pub fn select_child(&mut self, child: &QualityProfile) -> Result<(), DomainError> {
        if child.is_built_in {
            return Err(DomainError::BuiltInChildProfile(child.key.clone()));
        }
        let registered = self
            .snapshot
            .profiles
            .get(&child.key)
            .ok_or_else(|| DomainError::UnregisteredProfile(child.key.clone()))?;
        let rule_id = self.cursor()?.rule_id;

        let cursor = self.switch_to(registered.rules_profile(), rule_id)?;
        self.cursor = Some(cursor);
        Ok(())
    }

    fn switch_to(&self, rules_profile: RulesProfile, rule_id: RuleId) -> Result<Cursor, DomainError> {
        let rule = &self
            .snapshot
            .rules
            .get(&rule_id)
            .ok_or(DomainError::UnknownRule(rule_id))?
            .definition;

        if rule.language != rules_profile.language {
            return Err(DomainError::LanguageMismatch {
                rule_language: rule.language.clone(),
                rule_key: rule.key.clone(),
                profile_language: rules_profile.language.clone(),
                profile_name: rules_profile.name.clone(),
            });
        }

        let profiles: Vec<&QualityProfile> = self.snapshot.profiles_of(&rules_profile.key).collect();
        let profile_keys: Vec<String> = profiles.iter().map(|p| p.key.clone()).collect();

        let active_rule = Some(ActiveRuleKey::of(rules_profile.key.as_str(), rule.key.clone()))
            .filter(|key| self.snapshot.active_rules.contains_key(key));

        // Only the first profile with a parent is consulted.
        let parent_active_rule = profiles
            .iter()
            .find_map(|p| p.parent_key.as_deref())
            .and_then(|parent_key| self.snapshot.profiles.get(parent_key))
            .map(|parent| ActiveRuleKey::of(parent.rules_profile_key.as_str(), rule.key.clone()))
            .filter(|key| self.snapshot.active_rules.contains_key(key));

        debug!(
            rule = %rule.key,
            rules_profile = %rules_profile.key,
            profiles = profile_keys.len(),
            "Activation cursor moved"
        );

        Ok(Cursor {
            rule_id,
            profile_keys,
            rules_profile,
            active_rule,
            parent_active_rule,
        })
    }

    fn cursor(&self) -> Result<&Cursor, DomainError> {
        self.cursor.as_ref().ok_or(DomainError::CursorNotPositioned)
    }

    pub fn current_rule(&self) -> Result<&RuleEntry, DomainError> {
        let rule_id = self.cursor()?.rule_id;
        self.snapshot
            .rules
            .get(&rule_id)
            .ok_or(DomainError::UnknownRule(rule_id))
    }

    pub fn current_rules_profile(&self) -> Result<&RulesProfile, DomainError> {
        Ok(&self.cursor()?.rules_profile)
    }

    /// Tenant profiles backed by the current rules profile. Empty for a
    /// built-in rules profile no tenant references yet.
    pub fn current_profiles(&self) -> Result<Vec<&QualityProfile>, DomainError> {
        Ok(self
            .cursor()?
            .profile_keys
            .iter()
            .filter_map(|key| self.snapshot.profiles.get(key))
            .collect())
    }

    pub fn current_active_rule(&self) -> Result<Option<&ActiveRuleEntry>, DomainError> {
        Ok(self.active_rule_at(self.cursor()?.active_rule.as_ref()))
    }

    /// Activation of the current rule on the parent of the first current
    /// profile that has one. Other current profiles are not inspected.
    pub fn current_parent_active_rule(&self) -> Result<Option<&ActiveRuleEntry>, DomainError> {
        Ok(self.active_rule_at(self.cursor()?.parent_active_rule.as_ref()))
    }

    fn active_rule_at(&self, key: Option<&ActiveRuleKey>) -> Option<&ActiveRuleEntry> {
        key.and_then(|k| self.snapshot.active_rules.get(k))
    }

    pub fn is_cascading(&self) -> bool {
        self.cursor
            .as_ref()
            .is_some_and(|c| c.rules_profile.key != self.base_rules_profile.key)
    }

    /// Direct children of the current profiles. The first call loads the
    /// descendants of the base profiles; later calls reuse them.
    pub fn child_profiles(&mut self) -> Result<Vec<QualityProfile>, DomainError> {
        self.cursor()?;
        self.load_descendants()?;

        let cursor = self.cursor()?;
        Ok(cursor
            .profile_keys
            .iter()
            .filter_map(|key| self.snapshot.children.get(key))
            .flatten()
            .filter_map(|child_key| self.snapshot.profiles.get(child_key))
            .cloned()
            .collect())
    }

    fn load_descendants(&mut self) -> Result<(), DomainError> {
        if self.descendants_loaded {
            return Ok(());
        }

        let base_profiles: Vec<QualityProfile> = self
            .snapshot
            .profiles_of(&self.base_rules_profile.key)
            .cloned()
            .collect();
        let mut rule_ids: Vec<RuleId> = self.snapshot.rules.keys().copied().collect();
        rule_ids.sort();

        let DescendantProfiles {
            profiles,
            active_rules,
            active_rule_params,
        } = self.descendants.descendants(&base_profiles, &rule_ids)?;
        self.descendants_loaded = true;

        debug!(
            base_profiles = base_profiles.len(),
            profiles = profiles.len(),
            active_rules = active_rules.len(),
            "Descendant profiles loaded"
        );

        self.snapshot.add_profiles(profiles);
        self.snapshot.add_active_rules(active_rules, active_rule_params);

        if let Some(cursor) = &self.cursor {
            let refreshed = self.switch_to(cursor.rules_profile.clone(), cursor.rule_id)?;
            self.cursor = Some(refreshed);
        }
        Ok(())
    }

    /// Requested value of a parameter. Custom rules never take parameters
    /// from a request: theirs are fixed when the rule is created.
    pub fn requested_param_value<'r>(
        &self,
        request: &'r RuleActivation,
        key: &str,
    ) -> Result<Option<&'r str>, DomainError> {
        if self.current_rule()?.definition.is_custom() {
            return Ok(None);
        }
        Ok(request.param(key))
    }

    pub fn has_requested_param_value(&self, request: &RuleActivation, key: &str) -> bool {
        request.has_param(key)
    }
}
