use async_trait::async_trait;

use quiz_core::model::{Difficulty, Question, Subject};

use crate::error::QuestionSourceError;

/// Supplies the ordered question list for a quiz.
///
/// Called once per start request; the runtime does not retry on failure.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// Fetch questions for the given subject and difficulty, in presentation order.
    ///
    /// # Errors
    ///
    /// Returns `QuestionSourceError` if no usable questions can be produced.
    async fn fetch_questions(
        &self,
        subject: &Subject,
        difficulty: Difficulty,
    ) -> Result<Vec<Question>, QuestionSourceError>;
}
