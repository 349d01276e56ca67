use uuid::Uuid;

/// Failure surfaced by a store implementation.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backend is unreachable or failed transiently; callers may retry.
    #[error("store unavailable: {0}")]
    Unavailable(#[source] anyhow::Error),

    /// A persisted row could not be mapped back to the domain model.
    #[error("corrupt row: {0}")]
    Corrupt(String),
}

impl StoreError {
    pub fn unavailable(err: impl Into<anyhow::Error>) -> Self {
        Self::Unavailable(err.into())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("profile {id} not found")]
    ProfileNotFound { id: Uuid },

    #[error("cannot record a decision about yourself")]
    SelfDecision,

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl EngineError {
    /// Storage failures are transient; the same call may be retried as-is.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Store(StoreError::Unavailable(_)))
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
