use std::time::Duration;

use thiserror::Error as ThisError;

/// Error taxonomy for the service. `InvalidInput` and `NotFound` are
/// local validation failures and never reach the session or rate
/// limit mutation paths. Collaborator failures abort the current
/// operation without partially mutating state. No variant triggers an
/// automatic retry inside the core.
#[derive(Debug, ThisError)]
pub enum Error {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("rate limit exceeded, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("collaborator timed out after {0:?}")]
    CollaboratorTimeout(Duration),

    #[error("collaborator failure: {0}")]
    Collaborator(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
