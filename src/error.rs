use crate::gateway::GatewayError;

/// Error type for session operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Rejected before any network call was made.
    #[error("validation failed: {0}")]
    Validation(String),
    /// A drag index outside the displayed sequence.
    #[error("invalid position: {0}")]
    InvalidPosition(String),
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

impl ClientError {
    pub fn is_validation(&self) -> bool {
        matches!(self, ClientError::Validation(_))
    }
}
