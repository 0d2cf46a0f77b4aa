// qprofile-core/src/infrastructure/adapters/mod.rs

pub mod broadcast;
pub mod memory;
pub mod rule_finder;

pub use broadcast::BroadcastChannel;
pub use memory::{InMemoryStore, StoreDescendants};
pub use rule_finder::CachingRuleFinder;
