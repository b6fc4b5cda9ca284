#![forbid(unsafe_code)]

pub mod error;
pub mod session;
pub mod transport;

pub use exam_core::Clock;

pub use error::{ExamFlowError, SessionError, TransportError};
pub use session::{ExamFlowService, ExamSession, SessionProgress, SubmissionState, TickOutcome};
pub use transport::{ExamTransport, HttpExamTransport, HttpTransportConfig};
