// qprofile-core/src/ports/mod.rs

// Ces fichiers définissent ce dont l'application a besoin, sans savoir comment c'est fait.
// Le stockage relationnel, l'index de recherche et le canal de diffusion sont externes.

pub mod catalog;
pub mod channel;
pub mod search;
pub mod store;

pub use catalog::RuleCatalog;
pub use channel::EventChannel;
pub use search::RuleSearchIndex;
pub use store::ProfileStore;
