mod catalog;
mod ids;
mod question;

pub use catalog::{Catalog, Difficulty, QuizSelection, Subject, UnknownDifficulty};
pub use ids::{QuestionId, SubjectId};
pub use question::{Question, QuestionError};
