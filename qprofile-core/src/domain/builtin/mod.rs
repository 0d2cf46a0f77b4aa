// qprofile-core/src/domain/builtin/mod.rs

pub mod definition;
pub mod profile;
pub mod registry;

pub use definition::{BuiltInActiveRuleDefinition, BuiltInProfileDefinition, ProfileContribution};
pub use profile::{BuiltInActiveRule, BuiltInProfile};
pub use registry::{BuiltInProfileRegistry, FALLBACK_DEFAULT_PROFILE_NAME};
