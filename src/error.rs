//! Failure taxonomy of the form client. None of these end the session.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FormError {
    /// The probe could not reach the store. Shown through the connection modal.
    #[error("store unreachable: {0}")]
    Connectivity(String),
    /// The full record read failed. Shown through the banner.
    #[error("{message}")]
    Load {
        message: &'static str,
        #[source]
        cause: anyhow::Error,
    },
    /// An empty question was submitted. Shown through the banner.
    #[error("{0}")]
    Validation(&'static str),
}

impl FormError {
    pub fn kind(&self) -> &'static str {
        match self {
            FormError::Connectivity(_) => "connectivity",
            FormError::Load { .. } => "load",
            FormError::Validation(_) => "validation",
        }
    }
}
