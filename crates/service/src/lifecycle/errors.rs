use thiserror::Error;

/// Business errors for lifecycle transitions
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("service not found")]
    NotFound,
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("invalid transition: {0}")]
    InvalidTransition(String),
    #[error("repository error: {0}")]
    Repository(String),
}

impl LifecycleError {
    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            LifecycleError::NotFound => 2001,
            LifecycleError::Forbidden(_) => 2002,
            LifecycleError::InvalidTransition(_) => 2003,
            LifecycleError::Repository(_) => 2200,
        }
    }
}
