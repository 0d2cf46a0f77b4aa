// qprofile-core/src/infrastructure/mod.rs

pub mod adapters;
pub mod config;
pub mod error;

// Optional: Re-export specific adapters if you want cleaner imports elsewhere
pub use adapters::{BroadcastChannel, CachingRuleFinder, InMemoryStore};
