// qprofile-core/src/error.rs

use crate::domain::error::{DomainError, ErrorKind};
use crate::infrastructure::error::InfrastructureError;
use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum QProfileError {
    // --- ERREURS DU DOMAINE (Registre, Activation) ---
    #[error(transparent)]
    #[diagnostic(transparent)]
    Domain(#[from] DomainError),

    // --- ERREURS D'INFRASTRUCTURE (IO, Parsing) ---
    #[error(transparent)]
    #[diagnostic(transparent)]
    Infrastructure(#[from] InfrastructureError),
}

impl QProfileError {
    /// Classification of the underlying failure; infrastructure problems
    /// happen while loading startup configuration and are treated as fatal.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(e) => e.kind(),
            Self::Infrastructure(_) => ErrorKind::ConfigurationFatal,
        }
    }
}
