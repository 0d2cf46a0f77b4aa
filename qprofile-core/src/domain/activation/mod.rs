// qprofile-core/src/domain/activation/mod.rs

pub mod request;
pub mod workspace;

pub use request::RuleActivation;
pub use workspace::{ActivationWorkspace, ActiveRuleEntry, RuleEntry, WorkspaceSeed};
