mod controller;
mod progress;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use controller::{ExamSession, SubmissionState};
pub use progress::SessionProgress;
pub use workflow::{ExamFlowService, TickOutcome};
