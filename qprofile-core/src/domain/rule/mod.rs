// qprofile-core/src/domain/rule/mod.rs

pub mod definition;
pub mod key;
pub mod severity;

pub use definition::{RuleDefinition, RuleId, RuleParam};
pub use key::{InvalidRuleKey, RuleKey};
pub use severity::Severity;
