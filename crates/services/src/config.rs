use std::env;
use std::time::Duration;

use quiz_core::TIMER_MAX;
use url::Url;

use crate::error::ConfigError;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";
const DEFAULT_TICK_PERIOD: Duration = Duration::from_secs(1);

/// Where the quiz backend lives.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuizApiConfig {
    base_url: String,
}

impl QuizApiConfig {
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidBaseUrl` unless the URL is `http(s)://` with a host.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ConfigError> {
        let raw = base_url.into();
        let trimmed = raw.trim().trim_end_matches('/');
        match Url::parse(trimmed) {
            Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => Ok(Self {
                base_url: trimmed.to_string(),
            }),
            _ => Err(ConfigError::InvalidBaseUrl { raw }),
        }
    }

    /// Reads `QUIZ_API_BASE_URL`, falling back to the local backend.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidBaseUrl` if the variable is set but malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        match env::var("QUIZ_API_BASE_URL") {
            Ok(value) if !value.trim().is_empty() => Self::new(value),
            _ => Self::new(DEFAULT_API_BASE_URL),
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

impl Default for QuizApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
        }
    }
}

/// Timing knobs for a quiz runtime.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QuizSettings {
    time_limit_secs: u32,
    tick_period: Duration,
}

impl Default for QuizSettings {
    fn default() -> Self {
        Self {
            time_limit_secs: TIMER_MAX,
            tick_period: DEFAULT_TICK_PERIOD,
        }
    }
}

impl QuizSettings {
    /// Defaults, with `QUIZ_TIMER_SECS` applied when set.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidTimer` if the variable is not a positive integer.
    pub fn from_env() -> Result<Self, ConfigError> {
        let settings = Self::default();
        match env::var("QUIZ_TIMER_SECS") {
            Ok(raw) => Ok(settings.with_time_limit(parse_time_limit(&raw)?)),
            Err(_) => Ok(settings),
        }
    }

    #[must_use]
    pub fn with_time_limit(mut self, secs: u32) -> Self {
        self.time_limit_secs = secs.max(1);
        self
    }

    #[must_use]
    pub fn with_tick_period(mut self, period: Duration) -> Self {
        self.tick_period = period;
        self
    }

    #[must_use]
    pub fn time_limit_secs(&self) -> u32 {
        self.time_limit_secs
    }

    #[must_use]
    pub fn tick_period(&self) -> Duration {
        self.tick_period
    }
}

/// Parse a per-question time limit in whole seconds.
///
/// # Errors
///
/// Returns `ConfigError::InvalidTimer` for non-numeric or zero values.
pub fn parse_time_limit(raw: &str) -> Result<u32, ConfigError> {
    match raw.trim().parse::<u32>() {
        Ok(secs) if secs > 0 => Ok(secs),
        _ => Err(ConfigError::InvalidTimer {
            raw: raw.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_is_normalized() {
        let config = QuizApiConfig::new(" http://localhost:8000/ ").unwrap();
        assert_eq!(config.base_url(), "http://localhost:8000");
        assert_eq!(
            config.endpoint("/generate-quiz"),
            "http://localhost:8000/generate-quiz"
        );
    }

    #[test]
    fn base_url_requires_scheme_and_host() {
        assert!(QuizApiConfig::new("localhost:8000").is_err());
        assert!(QuizApiConfig::new("https://").is_err());
        assert!(QuizApiConfig::new("ftp://quiz.example.com").is_err());
        assert!(QuizApiConfig::new("https://quiz.example.com").is_ok());
    }

    #[test]
    fn time_limit_parsing() {
        assert_eq!(parse_time_limit("45"), Ok(45));
        assert_eq!(parse_time_limit(" 10 "), Ok(10));
        assert!(parse_time_limit("0").is_err());
        assert!(parse_time_limit("soon").is_err());
    }

    #[test]
    fn default_settings_use_thirty_second_timer() {
        let settings = QuizSettings::default();
        assert_eq!(settings.time_limit_secs(), 30);
        assert_eq!(settings.tick_period(), Duration::from_secs(1));
        assert_eq!(settings.with_time_limit(0).time_limit_secs(), 1);
    }
}
