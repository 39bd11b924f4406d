//! Error types for the slot engine core

use thiserror::Error;

/// The engine's single error type. One variant per kind named in the
/// error-handling design: the Orchestrator decides retry vs surface, the
/// engine itself never swallows an error.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("auth error: {0}")]
    Auth(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("conflict after {attempts} attempt(s): {0}", attempts = .attempts)]
    Conflict { message: String, attempts: u32 },

    #[error("insufficient funds: balance {balance}, requested {requested}")]
    InsufficientFunds { balance: f64, requested: f64 },

    #[error("inconsistent state: {0}")]
    InconsistentState(String),

    #[error("infrastructure error: {0}")]
    Infrastructure(String),

    #[error("integrity error: {0}")]
    Integrity(String),
}

impl EngineError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn inconsistent(msg: impl Into<String>) -> Self {
        Self::InconsistentState(msg.into())
    }

    pub fn integrity(msg: impl Into<String>) -> Self {
        Self::Integrity(msg.into())
    }

    /// Whether the Orchestrator may retry this error (nonce conflicts only).
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}

/// Result type alias used throughout the engine crates.
pub type EngineResult<T> = Result<T, EngineError>;
