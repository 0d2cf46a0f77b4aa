// qprofile-core/src/domain/builtin/registry.rs

use indexmap::IndexMap;
use std::collections::BTreeSet;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, instrument};

use super::definition::{BuiltInProfileDefinition, ProfileContribution};
use super::profile::{BuiltInActiveRule, BuiltInProfile, BuiltInProfileBuilder};
use crate::domain::error::DomainError;
use crate::domain::ports::RuleFinder;

/// Elected as default when no contribution of a language declares one.
pub const FALLBACK_DEFAULT_PROFILE_NAME: &str = "Sonar way";

/// Authoritative list of built-in profiles, one per (language, name).
///
/// The registry starts empty and is filled by a single successful call to
/// [`initialize`](Self::initialize). Afterwards it is read-only and can be
/// shared between threads.
#[derive(Debug, Default)]
pub struct BuiltInProfileRegistry {
    initializing: AtomicBool,
    profiles: OnceLock<Vec<BuiltInProfile>>,
}

// Definitions grouped by language then profile name, in first-seen order.
type GroupedDefinitions<'a> = IndexMap<&'a str, IndexMap<&'a str, Vec<&'a BuiltInProfileDefinition>>>;

impl BuiltInProfileRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges the contributed definitions. Fails if called a second time,
    /// even concurrently. A failed initialization releases the guard.
    #[instrument(skip_all, fields(contributions = contributions.len()))]
    pub fn initialize(
        &self,
        contributions: &[ProfileContribution],
        installed_languages: &[String],
        rule_finder: &dyn RuleFinder,
    ) -> Result<(), DomainError> {
        if self
            .initializing
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(DomainError::RegistryAlreadyInitialized);
        }

        match build_profiles(contributions, installed_languages, rule_finder) {
            Ok(profiles) => {
                info!(count = profiles.len(), "Built-in quality profiles registered");
                self.profiles
                    .set(profiles)
                    .map_err(|_| DomainError::RegistryAlreadyInitialized)
            }
            Err(e) => {
                self.initializing.store(false, Ordering::Release);
                Err(e)
            }
        }
    }

    pub fn get(&self) -> Result<&[BuiltInProfile], DomainError> {
        self.profiles
            .get()
            .map(Vec::as_slice)
            .ok_or(DomainError::RegistryNotInitialized)
    }

    pub fn is_initialized(&self) -> bool {
        self.profiles.get().is_some()
    }

    pub fn find(&self, language: &str, name: &str) -> Result<Option<&BuiltInProfile>, DomainError> {
        Ok(self
            .get()?
            .iter()
            .find(|p| p.language == language && p.name == name))
    }

    pub fn default_for(&self, language: &str) -> Result<Option<&BuiltInProfile>, DomainError> {
        Ok(self
            .get()?
            .iter()
            .find(|p| p.language == language && p.is_default))
    }
}

fn build_profiles(
    contributions: &[ProfileContribution],
    installed_languages: &[String],
    rule_finder: &dyn RuleFinder,
) -> Result<Vec<BuiltInProfile>, DomainError> {
    if contributions.iter().all(|c| c.profiles.is_empty()) {
        info!("No built-in quality profile is contributed");
    }

    // 1. Filtering
    let grouped = group_installed(contributions, installed_languages);

    let mut profiles = Vec::new();
    for (language, by_name) in &grouped {
        // 2. Merge by name
        let mut builders = by_name
            .iter()
            .map(|(name, definitions)| merge(language, name, definitions, rule_finder))
            .collect::<Result<Vec<_>, _>>()?;

        // 3. Default election
        elect_default(language, &mut builders)?;

        profiles.extend(builders.into_iter().map(BuiltInProfileBuilder::build));
    }

    // 4. Completeness
    ensure_all_languages_covered(&grouped, installed_languages)?;

    Ok(profiles)
}

fn group_installed<'a>(
    contributions: &'a [ProfileContribution],
    installed_languages: &[String],
) -> GroupedDefinitions<'a> {
    let mut grouped: GroupedDefinitions<'a> = IndexMap::new();

    for contribution in contributions {
        for definition in &contribution.profiles {
            if !installed_languages.contains(&definition.language) {
                info!(
                    language = %definition.language,
                    profile = %definition.name,
                    plugin = %contribution.plugin,
                    "Language is not installed, built-in profile is ignored"
                );
                continue;
            }
            grouped
                .entry(definition.language.as_str())
                .or_default()
                .entry(definition.name.as_str())
                .or_default()
                .push(definition);
        }
    }
    grouped
}

fn merge(
    language: &str,
    name: &str,
    definitions: &[&BuiltInProfileDefinition],
    rule_finder: &dyn RuleFinder,
) -> Result<BuiltInProfileBuilder, DomainError> {
    let mut builder = BuiltInProfileBuilder::new(language, name);

    for definition in definitions {
        // Last contribution wins, the flags are not OR-ed.
        builder.declared_default = definition.is_default;

        for rule in &definition.rules {
            let resolved =
                rule_finder
                    .find(&rule.key)
                    .ok_or_else(|| DomainError::UnknownBuiltInRule {
                        rule_key: rule.key.clone(),
                        profile: name.to_string(),
                        language: language.to_string(),
                    })?;
            builder.add_rule(BuiltInActiveRule {
                rule_id: resolved.id,
                rule_key: resolved.key,
                severity: rule.severity,
                params: rule.params.clone(),
            });
        }
    }

    if definitions.len() > 1 {
        debug!(language, profile = name, contributions = definitions.len(), "Merged built-in profile");
    }
    Ok(builder)
}

fn elect_default(language: &str, builders: &mut [BuiltInProfileBuilder]) -> Result<(), DomainError> {
    let declared: Vec<usize> = builders
        .iter()
        .enumerate()
        .filter(|(_, b)| b.declared_default)
        .map(|(i, _)| i)
        .collect();

    let elected = match declared.as_slice() {
        [] => builders
            .iter()
            .position(|b| b.name == FALLBACK_DEFAULT_PROFILE_NAME)
            .unwrap_or(0),
        [single] => *single,
        several => {
            let names: Vec<&str> = several.iter().map(|&i| builders[i].name.as_str()).collect();
            return Err(DomainError::MultipleDefaultProfiles {
                language: language.to_string(),
                profiles: names.join(", "),
            });
        }
    };

    if let Some(builder) = builders.get_mut(elected) {
        builder.set_computed_default(true);
    }
    Ok(())
}

fn ensure_all_languages_covered(
    grouped: &GroupedDefinitions<'_>,
    installed_languages: &[String],
) -> Result<(), DomainError> {
    let missing: BTreeSet<&str> = installed_languages
        .iter()
        .map(String::as_str)
        .filter(|language| !grouped.contains_key(language))
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(DomainError::MissingBuiltInProfiles(
            missing.into_iter().collect::<Vec<_>>().join(", "),
        ))
    }
}
