use std::sync::Arc;

use exam_core::Clock;
use exam_core::model::{ExamId, QuestionId, SubmissionReceipt};
use storage::checkpoint::CheckpointStore;

use crate::error::ExamFlowError;
use crate::transport::ExamTransport;
use super::controller::{ExamSession, SubmissionState};

/// Outcome of a deadline poll.
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// Attempt still running; whole seconds until the deadline.
    Running { remaining_secs: i64 },
    /// Deadline reached and the attempt was submitted.
    Submitted(SubmissionReceipt),
    /// No attempt to watch (none started, or already submitted).
    Idle,
}

/// Orchestrates one attempt end to end: start or resume, answer capture with
/// durable checkpoints, manual finish and deadline-driven forced finish.
///
/// Owns the single [`ExamSession`] lifecycle; views receive the session by
/// reference instead of reaching into process-wide state.
pub struct ExamFlowService {
    clock: Clock,
    transport: Arc<dyn ExamTransport>,
    checkpoints: Arc<dyn CheckpointStore>,
}

impl ExamFlowService {
    #[must_use]
    pub fn new(
        clock: Clock,
        transport: Arc<dyn ExamTransport>,
        checkpoints: Arc<dyn CheckpointStore>,
    ) -> Self {
        Self {
            clock,
            transport,
            checkpoints,
        }
    }

    /// Start an attempt, resuming from a checkpoint when one matches.
    ///
    /// The server returns the ongoing attempt when one exists, so after a
    /// reload the freshly fetched bundle carries the same attempt id and
    /// deadline; only then is a stored checkpoint trusted. Anything stale is
    /// ignored and the session starts clean.
    ///
    /// # Errors
    ///
    /// Returns `ExamFlowError` for transport, bundle or checkpoint failures.
    pub async fn start(&self, exam_id: ExamId) -> Result<ExamSession, ExamFlowError> {
        let bundle = self.transport.start_exam(exam_id).await?;
        bundle.validate()?;

        let mut session = ExamSession::new(self.clock);
        match self.checkpoints.load(bundle.attempt_id)? {
            Some(checkpoint) if checkpoint.end_time == bundle.end_time => {
                session.restore(bundle, &checkpoint)?;
            }
            _ => session.initialize(bundle),
        }
        self.save_checkpoint(&session)?;
        Ok(session)
    }

    /// Record an answer and persist a checkpoint.
    ///
    /// # Errors
    ///
    /// Returns `ExamFlowError::Checkpoint` when the snapshot cannot be
    /// written.
    pub fn record_answer(
        &self,
        session: &mut ExamSession,
        question_id: QuestionId,
        answer: impl Into<String>,
    ) -> Result<(), ExamFlowError> {
        session.set_answer(question_id, answer);
        self.save_checkpoint(session)
    }

    /// Jump to a question and persist a checkpoint.
    ///
    /// # Errors
    ///
    /// Returns `ExamFlowError::Checkpoint` when the snapshot cannot be
    /// written.
    pub fn go_to(&self, session: &mut ExamSession, index: usize) -> Result<(), ExamFlowError> {
        session.go_to(index);
        self.save_checkpoint(session)
    }

    /// Move back one question and persist a checkpoint.
    ///
    /// # Errors
    ///
    /// Returns `ExamFlowError::Checkpoint` when the snapshot cannot be
    /// written.
    pub fn prev(&self, session: &mut ExamSession) -> Result<(), ExamFlowError> {
        session.prev();
        self.save_checkpoint(session)
    }

    /// Move forward one question and persist a checkpoint.
    ///
    /// # Errors
    ///
    /// Returns `ExamFlowError::Checkpoint` when the snapshot cannot be
    /// written.
    pub fn next(&self, session: &mut ExamSession) -> Result<(), ExamFlowError> {
        session.next();
        self.save_checkpoint(session)
    }

    /// Submit the attempt now.
    ///
    /// Both the manual finish action and the deadline tick converge here.
    /// The `begin_submission` guard admits exactly one caller; on transport
    /// failure (including timeout) the session rolls back to `InProgress`
    /// with all answers intact so the learner can retry.
    ///
    /// # Errors
    ///
    /// Returns `ExamFlowError::Session` when no submission is permitted and
    /// `ExamFlowError::Transport` when the server call fails.
    pub async fn finish(
        &self,
        session: &mut ExamSession,
    ) -> Result<SubmissionReceipt, ExamFlowError> {
        let payload = session.begin_submission()?;
        match self.transport.submit_exam(&payload).await {
            Ok(receipt) => {
                session.complete_submission(receipt.clone())?;
                self.checkpoints.remove(receipt.attempt_id)?;
                Ok(receipt)
            }
            Err(err) => {
                session.fail_submission()?;
                Err(err.into())
            }
        }
    }

    /// Cooperative deadline poll.
    ///
    /// Call periodically (for example once per second for the countdown
    /// display). When the deadline has passed, the attempt is submitted
    /// through the same guard as a manual finish; a tick that loses that
    /// race surfaces `SessionError::AlreadySubmitting`.
    ///
    /// # Errors
    ///
    /// Same as [`ExamFlowService::finish`] when a forced submission runs.
    pub async fn tick(&self, session: &mut ExamSession) -> Result<TickOutcome, ExamFlowError> {
        match session.state() {
            SubmissionState::NotStarted | SubmissionState::Submitted => Ok(TickOutcome::Idle),
            SubmissionState::InProgress | SubmissionState::Submitting => {
                let remaining = session.remaining_time();
                if remaining > 0 {
                    Ok(TickOutcome::Running {
                        remaining_secs: remaining,
                    })
                } else {
                    let receipt = self.finish(session).await?;
                    Ok(TickOutcome::Submitted(receipt))
                }
            }
        }
    }

    /// Abandon the attempt without submitting, dropping its checkpoint.
    ///
    /// # Errors
    ///
    /// Refused with `SessionError::SubmissionInFlight` while a submission is
    /// outstanding.
    pub fn abandon(&self, session: &mut ExamSession) -> Result<(), ExamFlowError> {
        let attempt_id = session.attempt_id();
        session.clear()?;
        if let Some(attempt_id) = attempt_id {
            self.checkpoints.remove(attempt_id)?;
        }
        Ok(())
    }

    fn save_checkpoint(&self, session: &ExamSession) -> Result<(), ExamFlowError> {
        if let Some(checkpoint) = session.checkpoint() {
            self.checkpoints.save(&checkpoint)?;
        }
        Ok(())
    }
}
