use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::QuestionId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question id cannot be empty")]
    EmptyId,

    #[error("question text cannot be empty")]
    EmptyText,

    #[error("question must offer at least one option")]
    NoOptions,

    #[error("correct answer is not one of the options")]
    CorrectAnswerNotAnOption,
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A single multiple-choice question.
///
/// Immutable once constructed; the correct answer is guaranteed to be one of
/// the options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    id: QuestionId,
    text: String,
    options: Vec<String>,
    correct_answer: String,
    explanation: String,
    code: Option<String>,
}

impl Question {
    /// Creates a validated question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the id or text is blank, there are no options,
    /// or the correct answer does not match any option.
    pub fn new(
        id: QuestionId,
        text: impl Into<String>,
        options: Vec<String>,
        correct_answer: impl Into<String>,
        explanation: impl Into<String>,
    ) -> Result<Self, QuestionError> {
        let text = text.into();
        let correct_answer = correct_answer.into();

        if id.is_blank() {
            return Err(QuestionError::EmptyId);
        }
        if text.trim().is_empty() {
            return Err(QuestionError::EmptyText);
        }
        if options.is_empty() {
            return Err(QuestionError::NoOptions);
        }
        if !options.iter().any(|option| *option == correct_answer) {
            return Err(QuestionError::CorrectAnswerNotAnOption);
        }

        Ok(Self {
            id,
            text,
            options,
            correct_answer,
            explanation: explanation.into(),
            code: None,
        })
    }

    /// Attach a code snippet shown alongside the question text.
    #[must_use]
    pub fn with_code(mut self, code: Option<String>) -> Self {
        self.code = code.filter(|snippet| !snippet.trim().is_empty());
        self
    }

    #[must_use]
    pub fn id(&self) -> &QuestionId {
        &self.id
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn correct_answer(&self) -> &str {
        &self.correct_answer
    }

    #[must_use]
    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    #[must_use]
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    /// Returns true if `answer` is one of this question's options.
    #[must_use]
    pub fn has_option(&self, answer: &str) -> bool {
        self.options.iter().any(|option| option == answer)
    }

    /// Returns true if `answer` matches the correct answer exactly.
    #[must_use]
    pub fn is_correct(&self, answer: &str) -> bool {
        self.correct_answer == answer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> Vec<String> {
        vec!["A".into(), "B".into(), "C".into()]
    }

    #[test]
    fn valid_question_builds() {
        let q = Question::new(QuestionId::new("q1"), "Pick B", options(), "B", "Because B")
            .unwrap()
            .with_code(Some("let b = 2;".into()));
        assert_eq!(q.id().as_str(), "q1");
        assert_eq!(q.code(), Some("let b = 2;"));
        assert!(q.is_correct("B"));
        assert!(!q.is_correct("A"));
        assert!(q.has_option("C"));
        assert!(!q.has_option("D"));
    }

    #[test]
    fn correct_answer_must_be_an_option() {
        let err = Question::new(QuestionId::new("q1"), "Pick", options(), "D", "").unwrap_err();
        assert_eq!(err, QuestionError::CorrectAnswerNotAnOption);
    }

    #[test]
    fn rejects_blank_fields() {
        assert_eq!(
            Question::new(QuestionId::new(" "), "Pick", options(), "A", "").unwrap_err(),
            QuestionError::EmptyId
        );
        assert_eq!(
            Question::new(QuestionId::new("q1"), "", options(), "A", "").unwrap_err(),
            QuestionError::EmptyText
        );
        assert_eq!(
            Question::new(QuestionId::new("q1"), "Pick", Vec::new(), "A", "").unwrap_err(),
            QuestionError::NoOptions
        );
    }

    #[test]
    fn blank_code_is_dropped() {
        let q = Question::new(QuestionId::new("q1"), "Pick", options(), "A", "")
            .unwrap()
            .with_code(Some("  ".into()));
        assert_eq!(q.code(), None);
    }
}
