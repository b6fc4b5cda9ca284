use serde::{Deserialize, Serialize};

use crate::model::ids::ExamId;

/// How an exam is administered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExamKind {
    /// Sequential practice; the server includes reference answers.
    Practice,
    /// Mock exam under real conditions but without a score of record.
    Mock,
    /// Formal graded exam.
    Formal,
}

/// Server-issued exam descriptor.
///
/// Set once when a session initializes and never mutated; the session
/// controller only reads identity and rules from it, rendering reads the
/// rest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exam {
    pub id: ExamId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "exam_type")]
    pub kind: ExamKind,
    pub total_score: u32,
    pub pass_score: u32,
    /// Attempt length in minutes. Informational only: the authoritative
    /// deadline is the bundle's `end_time`, never recomputed client-side.
    pub duration: u32,
    #[serde(default)]
    pub allow_review: bool,
    #[serde(default)]
    pub show_answer: bool,
    /// 0 means unlimited.
    #[serde(default)]
    pub max_attempts: u32,
}

impl Exam {
    /// True when the server will include reference answers in the bundle.
    #[must_use]
    pub fn is_practice(&self) -> bool {
        self.kind == ExamKind::Practice
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exam_deserializes_wire_shape() {
        let exam: Exam = serde_json::from_str(
            r#"{
                "id": 3,
                "title": "Network Fundamentals",
                "exam_type": "mock",
                "total_score": 100,
                "pass_score": 60,
                "duration": 120
            }"#,
        )
        .unwrap();

        assert_eq!(exam.id, ExamId::new(3));
        assert_eq!(exam.kind, ExamKind::Mock);
        assert_eq!(exam.duration, 120);
        assert!(!exam.is_practice());
        assert_eq!(exam.max_attempts, 0);
    }
}
