/// Aggregated view of answer progress for an attempt, useful for UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionProgress {
    pub total: usize,
    pub answered: usize,
    pub unanswered: usize,
    /// `round(answered / total * 100)`; 0 when there are no questions.
    pub percent: u8,
}
