use thiserror::Error;

/// Domain failures of the draw pipeline. Everything the HTTP layer can
/// surface to a client funnels through this taxonomy; raw storage and
/// transport errors never cross the service boundary.
#[derive(Debug, Error)]
pub enum GachaError {
    /// Recoverable, user-facing. The draw was not performed and the pity
    /// counters are untouched.
    #[error("insufficient balance: need {required} stones, have {available}")]
    InsufficientBalance { required: i64, available: i64 },

    #[error("unknown card pool: {0}")]
    InvalidPool(String),

    #[error("draw count must be 1 or 10, got {0}")]
    InvalidDrawCount(i64),

    /// A rarity tier with zero cards, a featured pool without an UP card,
    /// or similar. Deployment bug, not retryable.
    #[error("card pool misconfigured: {0}")]
    Configuration(String),

    /// Another draw for the same (user, pool) committed underneath us.
    /// Transient; the caller retries the whole batch.
    #[error("a draw for this user and pool is already in flight")]
    ConcurrentDrawConflict,

    #[error("persistence failure")]
    Persistence(#[from] anyhow::Error),
}

impl GachaError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Whether the caller may retry the same request verbatim.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::ConcurrentDrawConflict | Self::Persistence(_))
    }
}
