// src/domain/ports/mod.rs

pub mod descendants;
pub mod rule_finder;

pub use descendants::{DescendantProfiles, DescendantProfilesSupplier};
pub use rule_finder::RuleFinder;
