// qprofile-core/src/domain/profile/mod.rs

pub mod active_rule;
pub mod change;
pub mod quality_profile;

pub use active_rule::{ActiveRule, ActiveRuleInheritance, ActiveRuleKey, ActiveRuleParam};
pub use change::{ActiveRuleChange, ChangeType, ParamChange, RuleChange, RuleSetChangedEvent};
pub use quality_profile::{Project, QualityProfile, RulesProfile};
