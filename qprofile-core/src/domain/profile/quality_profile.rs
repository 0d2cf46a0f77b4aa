// qprofile-core/src/domain/profile/quality_profile.rs

use serde::{Deserialize, Serialize};

/// The shared, language-scoped set of rule activations ("rules profile").
/// A built-in rules profile can be referenced by many tenant profiles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RulesProfile {
    pub key: String,
    pub name: String,
    pub language: String,
    #[serde(default)]
    pub is_built_in: bool,
}

impl RulesProfile {
    pub fn new(key: impl Into<String>, name: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            language: language.into(),
            is_built_in: false,
        }
    }

    pub fn built_in(mut self) -> Self {
        self.is_built_in = true;
        self
    }
}

/// A tenant-scoped handle onto a [`RulesProfile`]. The parent edge defines
/// the inheritance tree used for cascading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityProfile {
    pub key: String,
    pub rules_profile_key: String,
    pub name: String,
    pub language: String,
    #[serde(default)]
    pub parent_key: Option<String>,
    #[serde(default)]
    pub is_built_in: bool,
}

impl QualityProfile {
    /// Tenant profile backed by `rules_profile`. Name, language and built-in
    /// flag are taken from the rules profile so they can never diverge.
    pub fn on(key: impl Into<String>, rules_profile: &RulesProfile) -> Self {
        Self {
            key: key.into(),
            rules_profile_key: rules_profile.key.clone(),
            name: rules_profile.name.clone(),
            language: rules_profile.language.clone(),
            parent_key: None,
            is_built_in: rules_profile.is_built_in,
        }
    }

    pub fn with_parent(mut self, parent_key: impl Into<String>) -> Self {
        self.parent_key = Some(parent_key.into());
        self
    }

    /// The rules profile this quality profile points to.
    pub fn rules_profile(&self) -> RulesProfile {
        RulesProfile {
            key: self.rules_profile_key.clone(),
            name: self.name.clone(),
            language: self.language.clone(),
            is_built_in: self.is_built_in,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Project {
    pub key: String,
    pub name: String,
}
