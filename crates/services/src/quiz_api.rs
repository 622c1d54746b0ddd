use std::collections::HashSet;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use quiz_core::model::{Difficulty, Question, QuestionId, Subject};

use crate::config::QuizApiConfig;
use crate::error::{ExplanationError, QuestionSourceError};
use crate::question_source::QuestionSource;

/// HTTP client for the quiz backend (`/generate-quiz`, `/get-explanation`).
#[derive(Clone)]
pub struct QuizApiClient {
    client: Client,
    config: QuizApiConfig,
}

impl QuizApiClient {
    #[must_use]
    pub fn new(config: QuizApiConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &QuizApiConfig {
        &self.config
    }

    /// Ask the backend to explain a question/answer pair in plain terms.
    ///
    /// # Errors
    ///
    /// Returns `ExplanationError` when the request fails or the response is empty.
    pub async fn explain(&self, question: &str, answer: &str) -> Result<String, ExplanationError> {
        let payload = ExplanationRequest { question, answer };
        let response = self
            .client
            .post(self.config.endpoint("get-explanation"))
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ExplanationError::HttpStatus(response.status()));
        }

        let body: ExplanationResponse = response.json().await?;
        let explanation = body.explanation.trim();
        if explanation.is_empty() {
            return Err(ExplanationError::EmptyResponse);
        }
        Ok(explanation.to_string())
    }
}

#[async_trait]
impl QuestionSource for QuizApiClient {
    async fn fetch_questions(
        &self,
        subject: &Subject,
        difficulty: Difficulty,
    ) -> Result<Vec<Question>, QuestionSourceError> {
        let payload = QuizRequest {
            topic: subject.name(),
            difficulty: difficulty.id(),
        };
        let response = self
            .client
            .post(self.config.endpoint("generate-quiz"))
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(QuestionSourceError::HttpStatus(response.status()));
        }

        let body = response.text().await?;
        let questions = parse_questions(&body)?;
        log::info!(
            "fetched {} questions for {} ({})",
            questions.len(),
            subject.id(),
            difficulty.id()
        );
        Ok(questions)
    }
}

/// Parse a `/generate-quiz` body into validated questions.
///
/// Accepts `{"questions": [...]}` or a bare array, optionally wrapped in a
/// Markdown code fence. Blank, missing or repeated ids are replaced with fresh ones.
///
/// # Errors
///
/// Returns `QuestionSourceError::Parse` for malformed JSON,
/// `QuestionSourceError::Empty` for an empty list and
/// `QuestionSourceError::InvalidQuestion` when an item fails validation.
pub fn parse_questions(body: &str) -> Result<Vec<Question>, QuestionSourceError> {
    let payload: QuizPayload = serde_json::from_str(strip_code_fence(body))?;
    let items = match payload {
        QuizPayload::Wrapped { questions } => questions,
        QuizPayload::Bare(questions) => questions,
    };
    if items.is_empty() {
        return Err(QuestionSourceError::Empty);
    }

    let mut seen = HashSet::with_capacity(items.len());
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            let id = match item.id.as_ref().and_then(id_text) {
                Some(id) if seen.insert(id.clone()) => id,
                other => {
                    let fresh = Uuid::new_v4().to_string();
                    log::warn!("question {index} has unusable id {other:?}; assigned {fresh}");
                    seen.insert(fresh.clone());
                    fresh
                }
            };
            Question::new(
                QuestionId::new(id),
                item.question,
                item.options,
                item.correct_answer,
                item.explanation,
            )
            .map(|question| question.with_code(item.code))
            .map_err(|source| QuestionSourceError::InvalidQuestion { index, source })
        })
        .collect()
}

fn strip_code_fence(body: &str) -> &str {
    let trimmed = body.trim();
    if trimmed.starts_with(['{', '[']) {
        return trimmed;
    }
    let Some((_, opened)) = trimmed.split_once("```") else {
        return trimmed;
    };
    // The language tag may be followed by a newline or directly by the payload.
    let inner = opened
        .strip_prefix("json")
        .or_else(|| opened.strip_prefix("JSON"))
        .unwrap_or(opened);
    inner
        .split_once("```")
        .map_or(inner, |(content, _)| content)
        .trim()
}

fn id_text(value: &serde_json::Value) -> Option<String> {
    let text = match value {
        serde_json::Value::String(s) => s.trim().to_string(),
        serde_json::Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

#[derive(Debug, Serialize)]
struct QuizRequest<'a> {
    topic: &'a str,
    difficulty: &'a str,
}

#[derive(Debug, Serialize)]
struct ExplanationRequest<'a> {
    question: &'a str,
    answer: &'a str,
}

#[derive(Debug, Deserialize)]
struct ExplanationResponse {
    #[serde(default)]
    explanation: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum QuizPayload {
    Wrapped { questions: Vec<QuestionDto> },
    Bare(Vec<QuestionDto>),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuestionDto {
    #[serde(default)]
    id: Option<serde_json::Value>,
    question: String,
    options: Vec<String>,
    correct_answer: String,
    #[serde(default)]
    explanation: String,
    #[serde(default)]
    code: Option<String>,
}
