use thiserror::Error;

/// Shared error vocabulary for handlers, the repository, and the
/// orchestrator client. Handlers never propagate this past the dispatcher —
/// it is caught and reshaped into a `FAILED` `TaskResult` (see `uw-dispatcher`).
#[derive(Debug, Error)]
pub enum WorkerError {
    // ── Input validation ─────────────────────────────────────────────────────
    #[error("application ID is required and must be a non-empty string")]
    MissingApplicationId,

    #[error("user ID is required and must be a non-empty string")]
    MissingUserId,

    #[error("{field} is required and must be a non-empty string")]
    MissingField { field: String },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    // ── Upstream capabilities ────────────────────────────────────────────────
    #[error("credit bureau request failed: {0}")]
    CreditBureauUnavailable(String),

    #[error("income verification provider failed: {0}")]
    IncomeProviderUnavailable(String),

    #[error("repository error: {0}")]
    Repository(String),

    // ── Not found ─────────────────────────────────────────────────────────────
    #[error("application not found: {0}")]
    ApplicationNotFound(String),

    #[error("no handler registered for task type: {0}")]
    NoHandler(String),

    #[error("no active underwriting policy")]
    NoActivePolicy,

    // ── Orchestrator transport ────────────────────────────────────────────────
    #[error("orchestrator request failed: {0}")]
    Transport(String),

    #[error("orchestrator returned an unexpected status: {0}")]
    UnexpectedStatus(u16),

    // ── Serialization ──────────────────────────────────────────────────────────
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("task execution timed out after {elapsed_ms}ms")]
    Timeout { elapsed_ms: u64 },

    #[error("handler panicked: {0}")]
    Panic(String),

    #[error("{0}")]
    Other(String),
}

pub type WorkerResult<T> = Result<T, WorkerError>;
