mod bundle;
mod checkpoint;
mod exam;
mod ids;
mod question;
mod submission;

pub use bundle::{BundleError, SessionBundle};
pub use checkpoint::SessionCheckpoint;
pub use exam::{Exam, ExamKind};
pub use ids::{AttemptId, ExamId, ParseIdError, QuestionId};
pub use question::{Question, QuestionKind};
pub use submission::{AnswerEntry, SubmissionPayload, SubmissionReceipt};
