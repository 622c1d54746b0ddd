use std::sync::Arc;

use quiz_core::model::Catalog;

use crate::config::{QuizApiConfig, QuizSettings};
use crate::error::ConfigError;
use crate::question_source::QuestionSource;
use crate::quiz_api::QuizApiClient;
use crate::sessions::QuizRuntime;

/// Assembles app-facing services from configuration.
#[derive(Clone)]
pub struct AppServices {
    catalog: Catalog,
    settings: QuizSettings,
    api: Arc<QuizApiClient>,
}

impl AppServices {
    #[must_use]
    pub fn new(api_config: QuizApiConfig, settings: QuizSettings) -> Self {
        Self {
            catalog: Catalog::default(),
            settings,
            api: Arc::new(QuizApiClient::new(api_config)),
        }
    }

    /// Build services from `QUIZ_API_BASE_URL` and `QUIZ_TIMER_SECS`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if either variable is malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self::new(QuizApiConfig::from_env()?, QuizSettings::from_env()?))
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub fn settings(&self) -> QuizSettings {
        self.settings
    }

    #[must_use]
    pub fn api(&self) -> Arc<QuizApiClient> {
        Arc::clone(&self.api)
    }

    /// Start a quiz runtime backed by the HTTP question source.
    #[must_use]
    pub fn spawn_runtime(&self) -> QuizRuntime {
        let source: Arc<dyn QuestionSource> = self.api.clone();
        QuizRuntime::spawn(source, self.settings)
    }
}
