#![forbid(unsafe_code)]

pub mod model;
pub mod results;
pub mod session;

pub use results::{AnswerOutcome, Performance, QuizResults, ResultRecord, ResultsError};
pub use session::{
    QuestionSetError, QuizSession, QuizStatus, SessionSnapshot, TIMER_MAX, Transition,
};
