use thiserror::Error;

use crate::model::QuestionId;
use crate::session::QuizSession;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ResultsError {
    #[error("session is not completed")]
    NotCompleted,
}

/// How the user fared on a single question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerOutcome {
    Correct,
    Incorrect,
    /// Skipped or timed out.
    Skipped,
}

/// Per-question line of the final summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRecord {
    pub id: QuestionId,
    pub question: String,
    pub user_answer: Option<String>,
    pub correct_answer: String,
    pub explanation: String,
}

impl ResultRecord {
    #[must_use]
    pub fn outcome(&self) -> AnswerOutcome {
        match self.user_answer.as_deref() {
            None => AnswerOutcome::Skipped,
            Some(answer) if answer == self.correct_answer => AnswerOutcome::Correct,
            Some(_) => AnswerOutcome::Incorrect,
        }
    }
}

/// Coarse grading band shown with the final score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Performance {
    /// 80% or better.
    Outstanding,
    /// 60% up to 80%.
    Good,
    NeedsPractice,
}

/// Score and per-question breakdown of a completed session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizResults {
    pub score: usize,
    pub total: usize,
    pub records: Vec<ResultRecord>,
}

impl QuizResults {
    /// Derive results from a completed session. Pure; the session is not touched.
    ///
    /// # Errors
    ///
    /// Returns `ResultsError::NotCompleted` unless the session has completed.
    pub fn from_session(session: &QuizSession) -> Result<Self, ResultsError> {
        if !session.is_complete() {
            return Err(ResultsError::NotCompleted);
        }

        let records: Vec<ResultRecord> = session
            .questions()
            .iter()
            .map(|question| ResultRecord {
                id: question.id().clone(),
                question: question.text().to_owned(),
                // A missing entry scores the same as a skip.
                user_answer: session.answers().get(question.id()).cloned().flatten(),
                correct_answer: question.correct_answer().to_owned(),
                explanation: question.explanation().to_owned(),
            })
            .collect();

        let score = records
            .iter()
            .filter(|record| record.outcome() == AnswerOutcome::Correct)
            .count();

        Ok(Self {
            score,
            total: records.len(),
            records,
        })
    }

    /// Score as a whole percentage, rounded half up.
    #[must_use]
    pub fn percentage(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        let pct = (self.score * 200 + self.total) / (self.total * 2);
        u32::try_from(pct).unwrap_or(100)
    }

    #[must_use]
    pub fn performance(&self) -> Performance {
        // Compare on exact ratios so 79.5% does not round into the top band.
        let scaled = self.score * 100;
        if scaled >= self.total * 80 {
            Performance::Outstanding
        } else if scaled >= self.total * 60 {
            Performance::Good
        } else {
            Performance::NeedsPractice
        }
    }

    #[must_use]
    pub fn skipped(&self) -> usize {
        self.records
            .iter()
            .filter(|record| record.outcome() == AnswerOutcome::Skipped)
            .count()
    }

    #[must_use]
    pub fn feedback(&self) -> String {
        format!(
            "You correctly answered {} out of {} questions.",
            self.score, self.total
        )
    }
}
