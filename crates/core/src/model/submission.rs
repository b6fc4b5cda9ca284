use serde::{Deserialize, Serialize};

use crate::model::ids::{AttemptId, QuestionId};

/// One recorded answer in a submission or checkpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerEntry {
    pub question_id: QuestionId,
    pub answer: String,
}

/// The final structured answer set that closes an attempt.
///
/// Answer order carries no meaning; the server keys by question id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionPayload {
    #[serde(rename = "record_id")]
    pub attempt_id: AttemptId,
    pub answers: Vec<AnswerEntry>,
}

/// Grading outcome the server returns when an attempt is submitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    #[serde(rename = "id")]
    pub attempt_id: AttemptId,
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub correct_count: u32,
    #[serde(default)]
    pub wrong_count: u32,
}
