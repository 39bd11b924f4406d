use thiserror::Error;

/// Rejections from [`crate::session::FreeSpinsSession::apply`]. Distinct
/// from `sf_core::EngineError`: these are pure state-machine violations,
/// not transport/persistence failures, though the Orchestrator is free to
/// wrap one in an `EngineError::InconsistentState`.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FreeSpinsError {
    #[error("cannot execute a spin: session is not active")]
    NotActive,
    #[error("session already completed, no further events accepted")]
    AlreadyCompleted,
    #[error("no free spins remaining to execute")]
    NoSpinsRemaining,
}
