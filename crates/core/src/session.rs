use std::collections::{HashMap, HashSet};

use thiserror::Error;

use crate::model::{Question, QuestionId};

/// Seconds each question is allotted before it expires.
pub const TIMER_MAX: u32 = 30;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionSetError {
    #[error("no questions available for session")]
    Empty,

    #[error("duplicate question id: {0}")]
    DuplicateId(QuestionId),
}

//
// ─── STATUS & TRANSITIONS ──────────────────────────────────────────────────────
//

/// Lifecycle of a quiz session. Only moves forward: idle, in progress, completed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum QuizStatus {
    #[default]
    Idle,
    InProgress,
    Completed,
}

/// Outcome of feeding one event into a [`QuizSession`].
///
/// Operations invoked in a state that does not permit them report `Ignored`
/// instead of failing, so late or duplicated events are harmless.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Ignored,
    Started,
    Recorded,
    Ticked { remaining: u32 },
    Advanced { index: usize },
    Completed,
    Reset,
}

impl Transition {
    #[must_use]
    pub fn is_ignored(self) -> bool {
        matches!(self, Transition::Ignored)
    }

    /// True when the active question was closed out (moved on or finished).
    #[must_use]
    pub fn closes_question(self) -> bool {
        matches!(self, Transition::Advanced { .. } | Transition::Completed)
    }
}

//
// ─── SNAPSHOT ──────────────────────────────────────────────────────────────────
//

/// Read-only copy of the session state for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub status: QuizStatus,
    pub current_index: usize,
    pub total: usize,
    pub time_remaining: u32,
    pub time_limit: u32,
    pub current_question: Option<Question>,
    pub selected_answer: Option<String>,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One attempt at a quiz: question sequencing, countdown and recorded answers.
///
/// `answers` holds exactly one entry per question that has been reached and
/// closed or answered. `None` means the question was skipped or timed out; a
/// missing key means the question has not been reached yet.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizSession {
    questions: Vec<Question>,
    current: usize,
    answers: HashMap<QuestionId, Option<String>>,
    status: QuizStatus,
    time_limit: u32,
    time_remaining: u32,
}

impl Default for QuizSession {
    fn default() -> Self {
        Self::new()
    }
}

impl QuizSession {
    /// Fresh idle session using [`TIMER_MAX`] per question.
    #[must_use]
    pub fn new() -> Self {
        Self {
            questions: Vec::new(),
            current: 0,
            answers: HashMap::new(),
            status: QuizStatus::Idle,
            time_limit: TIMER_MAX,
            time_remaining: TIMER_MAX,
        }
    }

    /// Override the per-question countdown. Values below one second are clamped to one.
    #[must_use]
    pub fn with_time_limit(mut self, secs: u32) -> Self {
        self.time_limit = secs.max(1);
        self.time_remaining = self.time_limit;
        self
    }

    #[must_use]
    pub fn status(&self) -> QuizStatus {
        self.status
    }

    #[must_use]
    pub fn is_in_progress(&self) -> bool {
        self.status == QuizStatus::InProgress
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.status == QuizStatus::Completed
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    #[must_use]
    pub fn time_limit(&self) -> u32 {
        self.time_limit
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn answers(&self) -> &HashMap<QuestionId, Option<String>> {
        &self.answers
    }

    /// The question awaiting an answer, if the session is in progress.
    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        if self.is_in_progress() {
            self.questions.get(self.current)
        } else {
            None
        }
    }

    /// Answer currently recorded for the active question.
    #[must_use]
    pub fn selected_answer(&self) -> Option<&str> {
        let question = self.current_question()?;
        self.answers.get(question.id())?.as_deref()
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            status: self.status,
            current_index: self.current,
            total: self.total(),
            time_remaining: self.time_remaining,
            time_limit: self.time_limit,
            current_question: self.current_question().cloned(),
            selected_answer: self.selected_answer().map(str::to_owned),
        }
    }

    /// Begin the quiz with the fetched questions, in presentation order.
    ///
    /// Only an idle session can start; otherwise the call is ignored.
    ///
    /// # Errors
    ///
    /// Returns `QuestionSetError::Empty` for an empty list and
    /// `QuestionSetError::DuplicateId` when two questions share an id. The
    /// session stays idle in both cases.
    pub fn start(&mut self, questions: Vec<Question>) -> Result<Transition, QuestionSetError> {
        if self.status != QuizStatus::Idle {
            return Ok(Transition::Ignored);
        }
        if questions.is_empty() {
            return Err(QuestionSetError::Empty);
        }
        {
            let mut seen = HashSet::with_capacity(questions.len());
            for question in &questions {
                if !seen.insert(question.id()) {
                    return Err(QuestionSetError::DuplicateId(question.id().clone()));
                }
            }
        }

        self.questions = questions;
        self.current = 0;
        self.answers.clear();
        self.time_remaining = self.time_limit;
        self.status = QuizStatus::InProgress;
        Ok(Transition::Started)
    }

    /// Record `answer` for the active question, replacing any earlier choice.
    ///
    /// Does not advance. Answers that are not one of the question's options are ignored.
    pub fn select_answer(&mut self, answer: impl Into<String>) -> Transition {
        if !self.is_in_progress() {
            return Transition::Ignored;
        }
        let answer = answer.into();
        let Some(question) = self.questions.get(self.current) else {
            return Transition::Ignored;
        };
        if !question.has_option(&answer) {
            return Transition::Ignored;
        }
        self.answers.insert(question.id().clone(), Some(answer));
        Transition::Recorded
    }

    /// Record `answer` only if `question_id` is still the active question.
    ///
    /// A select aimed at a question that has already been closed is rejected.
    pub fn select_answer_for(
        &mut self,
        question_id: &QuestionId,
        answer: impl Into<String>,
    ) -> Transition {
        match self.current_question() {
            Some(question) if question.id() == question_id => self.select_answer(answer),
            _ => Transition::Ignored,
        }
    }

    /// Close the active question and move on.
    ///
    /// An unanswered question is recorded as `None`. On the last question the
    /// session completes instead of moving the index.
    pub fn advance(&mut self) -> Transition {
        if !self.is_in_progress() {
            return Transition::Ignored;
        }
        let Some(question) = self.questions.get(self.current) else {
            return Transition::Ignored;
        };
        self.answers.entry(question.id().clone()).or_insert(None);

        if self.current + 1 >= self.questions.len() {
            self.status = QuizStatus::Completed;
            self.time_remaining = 0;
            return Transition::Completed;
        }

        self.current += 1;
        self.time_remaining = self.time_limit;
        Transition::Advanced {
            index: self.current,
        }
    }

    /// Skipping is the same transition as [`advance`](Self::advance); the
    /// current selection, if any, is kept.
    pub fn skip(&mut self) -> Transition {
        self.advance()
    }

    /// One elapsed second.
    ///
    /// The tick that brings the countdown to zero expires the question in the
    /// same step, so `time_limit` ticks are equivalent to one `advance()`.
    pub fn tick(&mut self) -> Transition {
        if !self.is_in_progress() {
            return Transition::Ignored;
        }
        self.time_remaining = self.time_remaining.saturating_sub(1);
        if self.time_remaining == 0 {
            return self.advance();
        }
        Transition::Ticked {
            remaining: self.time_remaining,
        }
    }

    /// Discard everything and return to a fresh idle session with the same time limit.
    pub fn reset(&mut self) -> Transition {
        *self = Self::new().with_time_limit(self.time_limit);
        Transition::Reset
    }
}
