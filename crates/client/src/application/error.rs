//! Application-layer errors

use thiserror::Error;

use crate::ports::outbound::ApiError;

/// Errors surfaced by application services.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// A boundary failure, already mapped to the HTTP taxonomy.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// A reconciliation cycle is already in flight for this transcript.
    #[error("an action is already being processed")]
    Busy,

    /// No story has been selected yet.
    #[error("no active story")]
    NoActiveStory,

    /// Submitted action text was empty after trimming.
    #[error("action text is empty")]
    EmptyAction,
}

impl ServiceError {
    /// Whether the underlying cause is an expired credential.
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::Api(ApiError::AuthExpired))
    }
}
