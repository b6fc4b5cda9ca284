use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::exam::Exam;
use crate::model::ids::{AttemptId, QuestionId};
use crate::model::question::Question;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum BundleError {
    #[error("attempt window ends ({end}) before it starts ({start})")]
    InvalidWindow {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    #[error("bundle contains question {0} more than once")]
    DuplicateQuestion(QuestionId),
}

/// Server payload that initializes one exam attempt client-side.
///
/// `end_time` is the authoritative deadline; clients must never derive their
/// own from `exam.duration` and a local clock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionBundle {
    pub exam: Exam,
    #[serde(rename = "record_id")]
    pub attempt_id: AttemptId,
    pub questions: Vec<Question>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

impl SessionBundle {
    /// Check structural sanity before trusting the bundle.
    ///
    /// An empty question list is deliberately not an error; navigation and
    /// progress simply degrade to no-ops on such a session.
    ///
    /// # Errors
    ///
    /// Returns `BundleError::InvalidWindow` if the window is inverted and
    /// `BundleError::DuplicateQuestion` for repeated question ids.
    pub fn validate(&self) -> Result<(), BundleError> {
        if self.end_time < self.start_time {
            return Err(BundleError::InvalidWindow {
                start: self.start_time,
                end: self.end_time,
            });
        }

        let mut seen = HashSet::with_capacity(self.questions.len());
        for question in &self.questions {
            if !seen.insert(question.id) {
                return Err(BundleError::DuplicateQuestion(question.id));
            }
        }

        Ok(())
    }
}
