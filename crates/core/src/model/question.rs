use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::ids::QuestionId;

/// Question type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    SingleChoice,
    MultipleChoice,
    TrueFalse,
    FillBlank,
    ShortAnswer,
}

impl QuestionKind {
    /// True for kinds answered by picking from `options`.
    #[must_use]
    pub fn has_options(&self) -> bool {
        matches!(self, Self::SingleChoice | Self::MultipleChoice)
    }
}

/// One question as delivered in a session bundle.
///
/// Opaque to the session controller beyond `id`; everything else exists for
/// the rendering layer. `answer`/`analysis` are present only when the server
/// chooses to reveal them (practice mode).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    #[serde(rename = "question_type")]
    pub kind: QuestionKind,
    /// Prompt content.
    pub title: String,
    /// Choice labels to text, e.g. `{"A": "...", "B": "..."}`.
    #[serde(default)]
    pub options: Option<BTreeMap<String, String>>,
    #[serde(default = "default_score")]
    pub score: u32,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub analysis: Option<String>,
}

fn default_score() -> u32 {
    1
}
