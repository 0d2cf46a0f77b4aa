// qprofile-core/src/application/mod.rs

pub mod builtin;
pub mod publisher;
pub mod workspace_loader;

// --- RE-EXPORTS (FACADE PATTERN) ---
// Cela permet au CLI de faire :
// `use qprofile_core::application::{load_builtin_profiles, ChangeEventPublisher};`
// sans avoir à connaître la structure interne des fichiers.

pub use builtin::{BuiltInProfiles, load_builtin_profiles};
pub use publisher::ChangeEventPublisher;
pub use workspace_loader::WorkspaceLoader;
