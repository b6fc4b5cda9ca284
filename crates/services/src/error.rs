//! Shared error types for the services crate.

use thiserror::Error;

use exam_core::model::{AttemptId, BundleError};
use storage::checkpoint::CheckpointError;

/// Errors emitted by `ExamSession`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no active exam attempt")]
    NotStarted,

    /// Distinct from a generic failure: both the manual finish action and
    /// the deadline tick can fire in the same event loop turn, and the loser
    /// must not trigger a second transport call.
    #[error("submission already in progress")]
    AlreadySubmitting,

    #[error("attempt already submitted")]
    AlreadySubmitted,

    #[error("no submission in flight")]
    NotSubmitting,

    #[error("cannot clear session while a submission is in flight")]
    SubmissionInFlight,

    #[error("checkpoint does not belong to attempt {expected}")]
    CheckpointMismatch { expected: AttemptId },
}

/// Errors emitted by transport implementations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TransportError {
    #[error("server rejected request with status {status}: {detail}")]
    Status { status: u16, detail: String },

    #[error("request timed out")]
    Timeout,

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Errors emitted by `ExamFlowService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ExamFlowError {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Bundle(#[from] BundleError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Checkpoint(#[from] CheckpointError),
}
