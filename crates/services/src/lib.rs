#![forbid(unsafe_code)]

pub mod app_services;
pub mod config;
pub mod error;
pub mod question_source;
pub mod quiz_api;
pub mod sessions;

pub use app_services::AppServices;
pub use config::{QuizApiConfig, QuizSettings};
pub use error::{ConfigError, ExplanationError, QuestionSourceError, RuntimeError};
pub use question_source::QuestionSource;
pub use quiz_api::QuizApiClient;

pub use sessions::{
    ClockTick, LOAD_ERROR_MESSAGE, QuizController, QuizEvent, QuizHandle, QuizRuntime, QuizView,
    SessionClock,
};
