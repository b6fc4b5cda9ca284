use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::ids::{AttemptId, ExamId};
use crate::model::submission::AnswerEntry;

/// Durable snapshot of an in-progress attempt.
///
/// Written after every answer or navigation so a reload does not lose
/// recorded answers. A checkpoint is only trusted after its `attempt_id` and
/// `end_time` are matched against a freshly fetched bundle; anything else is
/// stale and discarded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionCheckpoint {
    pub attempt_id: AttemptId,
    pub exam_id: ExamId,
    pub end_time: DateTime<Utc>,
    pub current_index: usize,
    pub answers: Vec<AnswerEntry>,
    pub captured_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ids::QuestionId;
    use crate::time::fixed_now;

    #[test]
    fn checkpoint_round_trips_through_json() {
        let checkpoint = SessionCheckpoint {
            attempt_id: AttemptId::new(42),
            exam_id: ExamId::new(3),
            end_time: fixed_now(),
            current_index: 2,
            answers: vec![AnswerEntry {
                question_id: QuestionId::new(1),
                answer: "A".to_string(),
            }],
            captured_at: fixed_now(),
        };

        let json = serde_json::to_string(&checkpoint).unwrap();
        let parsed: SessionCheckpoint = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, checkpoint);
    }
}
