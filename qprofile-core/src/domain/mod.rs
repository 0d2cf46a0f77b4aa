pub mod activation;
pub mod builtin;
pub mod error;
pub mod ports;
pub mod profile;
pub mod rule;

// Re-exports pratiques pour simplifier les imports ailleurs
pub use error::{DomainError, ErrorKind};
