mod http;

use async_trait::async_trait;

use exam_core::model::{ExamId, SessionBundle, SubmissionPayload, SubmissionReceipt};

use crate::error::TransportError;

pub use http::{HttpExamTransport, HttpTransportConfig};

/// Server operations the exam flow depends on.
///
/// HTTP lives behind this trait so the session logic is testable with a
/// fake; auth-token handling and status-to-message mapping belong to the
/// implementation, never to the session controller.
#[async_trait]
pub trait ExamTransport: Send + Sync {
    /// Open (or rejoin) an attempt and fetch its session bundle.
    async fn start_exam(&self, exam_id: ExamId) -> Result<SessionBundle, TransportError>;

    /// Send the final answer set. Must be called at most once per attempt;
    /// the session guard upholds that on the client side.
    async fn submit_exam(
        &self,
        payload: &SubmissionPayload,
    ) -> Result<SubmissionReceipt, TransportError>;
}
