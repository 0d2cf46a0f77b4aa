// qprofile-core/src/domain/error.rs

use miette::Diagnostic;
use thiserror::Error;

use crate::domain::rule::{RuleId, RuleKey};

/// Coarse classification of a [`DomainError`], used by callers to decide
/// whether to abort startup, answer a request with an error or escalate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Startup must abort: analysis would run without a usable default.
    ConfigurationFatal,
    /// The batch is malformed. Reported to the immediate caller.
    Request,
    /// Catalog data is corrupted. Fatal to the current publish call.
    InternalConsistency,
    /// API misuse (illegal state).
    Programming,
    /// A storage collaborator failed.
    Storage,
}

#[derive(Error, Debug, Diagnostic)]
pub enum DomainError {
    // --- CONFIGURATION FATAL (built-in profiles) ---
    #[error("Several Quality profiles are flagged as default for the language {language}: {profiles}")]
    #[diagnostic(
        code(qprofile::builtin::multiple_defaults),
        help("Only one contributed built-in profile per language may declare itself as default.")
    )]
    MultipleDefaultProfiles { language: String, profiles: String },

    #[error("Rule with key '{rule_key}' not found (built-in profile '{profile}' for language {language})")]
    #[diagnostic(
        code(qprofile::builtin::unknown_rule),
        help("Built-in profiles may only reference rules declared by the installed analyzers.")
    )]
    UnknownBuiltInRule {
        rule_key: RuleKey,
        profile: String,
        language: String,
    },

    #[error("The following languages have no built-in quality profiles: {0}")]
    #[diagnostic(code(qprofile::builtin::missing_profiles))]
    MissingBuiltInProfiles(String),

    // --- REQUEST ERRORS (activation batch) ---
    #[error("Rule with id {0} not found")]
    #[diagnostic(code(qprofile::activation::unknown_rule))]
    UnknownRule(RuleId),

    #[error("Profile '{0}' is not registered in the activation workspace")]
    #[diagnostic(code(qprofile::activation::unregistered_profile))]
    UnregisteredProfile(String),

    #[error("Profile '{0}' is built-in and cannot be selected as a child profile")]
    #[diagnostic(code(qprofile::activation::built_in_child))]
    BuiltInChildProfile(String),

    #[error("Profile '{0}' is built-in: its rules can only be changed through its rules profile")]
    #[diagnostic(code(qprofile::activation::built_in_profile))]
    BuiltInProfileNotEditable(String),

    #[error("{rule_language} rule {rule_key} cannot be activated on {profile_language} profile {profile_name}")]
    #[diagnostic(
        code(qprofile::activation::language_mismatch),
        help("A rule can only be activated on a profile of the same language.")
    )]
    LanguageMismatch {
        rule_language: String,
        rule_key: RuleKey,
        profile_language: String,
        profile_name: String,
    },

    // --- INTERNAL CONSISTENCY ---
    #[error("Template rule with id {template_id} of rule {rule_key} not found")]
    #[diagnostic(code(qprofile::catalog::unresolved_template))]
    UnresolvedTemplate { rule_key: RuleKey, template_id: RuleId },

    #[error("Rule with id {0} is missing from the rule catalog")]
    #[diagnostic(code(qprofile::catalog::missing_rule))]
    MissingRuleDefinition(RuleId),

    // --- PROGRAMMING ERRORS ---
    #[error("Built-in profile registry must be initialized only once")]
    #[diagnostic(code(qprofile::builtin::already_initialized))]
    RegistryAlreadyInitialized,

    #[error("Built-in profile registry has not been initialized yet")]
    #[diagnostic(code(qprofile::builtin::not_initialized))]
    RegistryNotInitialized,

    #[error("Activation cursor is not positioned: call reset() first")]
    #[diagnostic(code(qprofile::activation::cursor_not_positioned))]
    CursorNotPositioned,

    // --- STORAGE ---
    #[error("Storage Error: {0}")]
    #[diagnostic(code(qprofile::storage))]
    StorageError(String),
}

impl DomainError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MultipleDefaultProfiles { .. }
            | Self::UnknownBuiltInRule { .. }
            | Self::MissingBuiltInProfiles(_) => ErrorKind::ConfigurationFatal,
            Self::UnknownRule(_)
            | Self::UnregisteredProfile(_)
            | Self::BuiltInChildProfile(_)
            | Self::BuiltInProfileNotEditable(_)
            | Self::LanguageMismatch { .. } => ErrorKind::Request,
            Self::UnresolvedTemplate { .. } | Self::MissingRuleDefinition(_) => {
                ErrorKind::InternalConsistency
            }
            Self::RegistryAlreadyInitialized
            | Self::RegistryNotInitialized
            | Self::CursorNotPositioned => ErrorKind::Programming,
            Self::StorageError(_) => ErrorKind::Storage,
        }
    }

    pub fn is_request_error(&self) -> bool {
        self.kind() == ErrorKind::Request
    }
}
