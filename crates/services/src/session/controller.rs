use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};

use exam_core::Clock;
use exam_core::model::{
    AnswerEntry, AttemptId, Exam, Question, QuestionId, SessionBundle, SessionCheckpoint,
    SubmissionPayload, SubmissionReceipt,
};

use crate::error::SessionError;
use super::progress::SessionProgress;

//
// ─── SUBMISSION STATE ──────────────────────────────────────────────────────────
//

/// Where an attempt stands in its lifecycle.
///
/// `NotStarted → InProgress → Submitting → Submitted`, with
/// `Submitting → InProgress` as the retry path after a transport failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionState {
    #[default]
    NotStarted,
    InProgress,
    Submitting,
    /// Terminal.
    Submitted,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// Client-side state of one exam attempt.
///
/// Owns the question set, recorded answers, cursor position and the
/// server-issued deadline. Every path that ends the attempt, whether the
/// learner clicks finish or the deadline expires, must pass through
/// [`ExamSession::begin_submission`], which admits exactly one caller.
#[derive(Clone, PartialEq)]
pub struct ExamSession {
    exam: Option<Exam>,
    attempt_id: Option<AttemptId>,
    questions: Vec<Question>,
    answers: HashMap<QuestionId, String>,
    current_index: usize,
    start_time: Option<DateTime<Utc>>,
    end_time: Option<DateTime<Utc>>,
    state: SubmissionState,
    receipt: Option<SubmissionReceipt>,
    clock: Clock,
}

impl ExamSession {
    /// Create an empty session that reads time from the given clock.
    #[must_use]
    pub fn new(clock: Clock) -> Self {
        Self {
            exam: None,
            attempt_id: None,
            questions: Vec::new(),
            answers: HashMap::new(),
            current_index: 0,
            start_time: None,
            end_time: None,
            state: SubmissionState::NotStarted,
            receipt: None,
            clock,
        }
    }

    /// Adopt a session bundle, fully replacing any prior session state.
    ///
    /// Answers are cleared, the cursor moves to the first question and the
    /// state becomes `InProgress`. An empty question list is accepted;
    /// navigation and progress then degrade to no-ops and zeroes.
    pub fn initialize(&mut self, bundle: SessionBundle) {
        self.exam = Some(bundle.exam);
        self.attempt_id = Some(bundle.attempt_id);
        self.questions = bundle.questions;
        self.answers.clear();
        self.current_index = 0;
        self.start_time = Some(bundle.start_time);
        self.end_time = Some(bundle.end_time);
        self.state = SubmissionState::InProgress;
        self.receipt = None;
    }

    #[must_use]
    pub fn exam(&self) -> Option<&Exam> {
        self.exam.as_ref()
    }

    #[must_use]
    pub fn attempt_id(&self) -> Option<AttemptId> {
        self.attempt_id
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn state(&self) -> SubmissionState {
        self.state
    }

    #[must_use]
    pub fn receipt(&self) -> Option<&SubmissionReceipt> {
        self.receipt.as_ref()
    }

    #[must_use]
    pub fn start_time(&self) -> Option<DateTime<Utc>> {
        self.start_time
    }

    #[must_use]
    pub fn end_time(&self) -> Option<DateTime<Utc>> {
        self.end_time
    }

    //
    // ─── ANSWERS ───────────────────────────────────────────────────────────
    //

    /// Record or overwrite the answer for a question.
    ///
    /// The value is opaque to the controller; type-specific validation is a
    /// rendering concern. An empty value removes the entry, so a cleared
    /// answer and a never-given answer are the same observable state.
    /// Question ids outside the session are ignored, keeping the recorded
    /// keys a subset of the question set.
    pub fn set_answer(&mut self, question_id: QuestionId, answer: impl Into<String>) {
        let answer = answer.into();
        if answer.is_empty() {
            self.answers.remove(&question_id);
            return;
        }
        if self.questions.iter().any(|q| q.id == question_id) {
            self.answers.insert(question_id, answer);
        }
    }

    /// The recorded answer for a question, or `""` if there is none.
    #[must_use]
    pub fn answer(&self, question_id: QuestionId) -> &str {
        self.answers
            .get(&question_id)
            .map_or("", String::as_str)
    }

    #[must_use]
    pub fn is_answered(&self, question_id: QuestionId) -> bool {
        self.answers.contains_key(&question_id)
    }

    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    //
    // ─── NAVIGATION ────────────────────────────────────────────────────────
    //

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current_index)
    }

    /// Jump to a question. Out-of-range indices are ignored, not an error.
    pub fn go_to(&mut self, index: usize) {
        if index < self.questions.len() {
            self.current_index = index;
        }
    }

    /// Move back one question; no-op at the first.
    pub fn prev(&mut self) {
        if self.current_index > 0 {
            self.current_index -= 1;
        }
    }

    /// Move forward one question; no-op at the last.
    pub fn next(&mut self) {
        if self.current_index + 1 < self.questions.len() {
            self.current_index += 1;
        }
    }

    //
    // ─── DEADLINE & PROGRESS ───────────────────────────────────────────────
    //

    /// Whole seconds until the deadline, never negative.
    ///
    /// Derived from the clock and the server-issued `end_time` on every
    /// call. Nothing is counted down locally, so the value cannot drift
    /// across missed ticks or tab suspension. 0 when uninitialized.
    #[must_use]
    pub fn remaining_time(&self) -> i64 {
        let Some(end) = self.end_time else { return 0 };
        (end - self.clock.now()).num_seconds().max(0)
    }

    /// Answer-progress counters for the attempt.
    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        let total = self.questions.len();
        let answered = self.answers.len();
        let percent = if total == 0 {
            0
        } else {
            ((answered as f64 / total as f64) * 100.0).round() as u8
        };
        SessionProgress {
            total,
            answered,
            unanswered: total - answered,
            percent,
        }
    }

    //
    // ─── SUBMISSION ────────────────────────────────────────────────────────
    //

    /// Project the current answers into a submission payload.
    ///
    /// Pure: callable any number of times without side effects, so callers
    /// may inspect the payload before committing to submit. Entries are
    /// sorted by question id to keep repeated calls identical.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotStarted` when no attempt is active.
    pub fn build_submission_payload(&self) -> Result<SubmissionPayload, SessionError> {
        let attempt_id = self.attempt_id.ok_or(SessionError::NotStarted)?;
        let mut answers: Vec<AnswerEntry> = self
            .answers
            .iter()
            .map(|(question_id, answer)| AnswerEntry {
                question_id: *question_id,
                answer: answer.clone(),
            })
            .collect();
        answers.sort_by_key(|entry| entry.question_id);
        Ok(SubmissionPayload {
            attempt_id,
            answers,
        })
    }

    /// Claim the right to submit.
    ///
    /// Only an `InProgress` session may transition; the check and the move
    /// to `Submitting` happen synchronously so two triggers racing in the
    /// same event-loop turn cannot both win. The loser gets
    /// `AlreadySubmitting` and must not send a second request.
    ///
    /// # Errors
    ///
    /// `AlreadySubmitting` while a submission is in flight,
    /// `AlreadySubmitted` after completion, `NotStarted` before
    /// initialization.
    pub fn begin_submission(&mut self) -> Result<SubmissionPayload, SessionError> {
        match self.state {
            SubmissionState::InProgress => {
                let payload = self.build_submission_payload()?;
                self.state = SubmissionState::Submitting;
                Ok(payload)
            }
            SubmissionState::Submitting => Err(SessionError::AlreadySubmitting),
            SubmissionState::Submitted => Err(SessionError::AlreadySubmitted),
            SubmissionState::NotStarted => Err(SessionError::NotStarted),
        }
    }

    /// Record the server's acceptance of the submission. Terminal.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotSubmitting` unless a submission is in
    /// flight.
    pub fn complete_submission(
        &mut self,
        receipt: SubmissionReceipt,
    ) -> Result<(), SessionError> {
        if self.state != SubmissionState::Submitting {
            return Err(SessionError::NotSubmitting);
        }
        self.state = SubmissionState::Submitted;
        self.receipt = Some(receipt);
        Ok(())
    }

    /// Roll back to `InProgress` after a failed transport call, keeping all
    /// recorded answers so the learner can retry.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotSubmitting` unless a submission is in
    /// flight.
    pub fn fail_submission(&mut self) -> Result<(), SessionError> {
        if self.state != SubmissionState::Submitting {
            return Err(SessionError::NotSubmitting);
        }
        self.state = SubmissionState::InProgress;
        Ok(())
    }

    /// Reset to the observable state of a freshly constructed session.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::SubmissionInFlight` while `Submitting`:
    /// discarding the bookkeeping of an in-flight request is a programming
    /// error and must fail loudly.
    pub fn clear(&mut self) -> Result<(), SessionError> {
        if self.state == SubmissionState::Submitting {
            return Err(SessionError::SubmissionInFlight);
        }
        *self = Self::new(self.clock);
        Ok(())
    }

    //
    // ─── CHECKPOINTS ───────────────────────────────────────────────────────
    //

    /// Snapshot the attempt for durable storage; `None` when no attempt is
    /// active.
    #[must_use]
    pub fn checkpoint(&self) -> Option<SessionCheckpoint> {
        let attempt_id = self.attempt_id?;
        let exam_id = self.exam.as_ref()?.id;
        let end_time = self.end_time?;
        let mut answers: Vec<AnswerEntry> = self
            .answers
            .iter()
            .map(|(question_id, answer)| AnswerEntry {
                question_id: *question_id,
                answer: answer.clone(),
            })
            .collect();
        answers.sort_by_key(|entry| entry.question_id);
        Some(SessionCheckpoint {
            attempt_id,
            exam_id,
            end_time,
            current_index: self.current_index,
            answers,
            captured_at: self.clock.now(),
        })
    }

    /// Initialize from a freshly fetched bundle and re-apply a checkpoint
    /// taken from the same attempt.
    ///
    /// The checkpoint is trusted only if its attempt id and end time match
    /// the bundle. Answers for question ids the bundle no longer carries are
    /// dropped and the cursor is clamped into range.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::CheckpointMismatch` when the checkpoint does
    /// not match the bundle.
    pub fn restore(
        &mut self,
        bundle: SessionBundle,
        checkpoint: &SessionCheckpoint,
    ) -> Result<(), SessionError> {
        if checkpoint.attempt_id != bundle.attempt_id || checkpoint.end_time != bundle.end_time {
            return Err(SessionError::CheckpointMismatch {
                expected: bundle.attempt_id,
            });
        }

        self.initialize(bundle);

        // set_answer drops entries for questions the fresh bundle no longer
        // carries
        for entry in &checkpoint.answers {
            self.set_answer(entry.question_id, entry.answer.clone());
        }
        if !self.questions.is_empty() {
            self.current_index = checkpoint.current_index.min(self.questions.len() - 1);
        }
        Ok(())
    }
}

impl fmt::Debug for ExamSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExamSession")
            .field("attempt_id", &self.attempt_id)
            .field("questions_len", &self.questions.len())
            .field("answered", &self.answers.len())
            .field("current_index", &self.current_index)
            .field("end_time", &self.end_time)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl Default for ExamSession {
    fn default() -> Self {
        Self::new(Clock::default())
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
