//! Reqwest-backed analyst talking to an OpenAI-compatible endpoint.
//!
//! This adapter owns transport details only: prompt rendering, the chat
//! completion request, timeout and HTTP error mapping, and decoding the JSON
//! object the model is asked to return.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::debug;
use zeroize::Zeroizing;

use super::dto::{
    AdjectivesReply, ChatMessage, ChatRequest, ChatResponse, DailyPromptReply, PastEntryDto,
    ResponseFormat, SimilarEntriesReply,
};
use crate::domain::ports::{PastEntry, ReflectionAnalyst, ReflectionAnalystError};
use crate::domain::{EntryId, MoodScore, WordFrequency};

const DEFAULT_MODEL: &str = "gpt-4o-mini";

const INSPIRATION_SYSTEM: &str = "You find journal entries whose mood score is most similar \
to a current mood score. Reply with a JSON object of the form \
{\"similarEntries\": [{\"id\": \"...\"}]} listing only the most similar entries.";

const ADJECTIVES_SYSTEM: &str = "You are a linguistic analyst. Identify every adjective \
(positive, neutral and negative) in the journal text, count each one, and reply with a JSON \
object of the form {\"adjectives\": [{\"adjective\": \"...\", \"count\": 1}]} holding the 15 \
most frequent adjectives, most frequent first.";

const DAILY_PROMPT_SYSTEM: &str = "You are a gratitude expert. Write one unique, thoughtful \
prompt that inspires a daily gratitude entry and encourages reflection on a different aspect of \
life. Do not start the prompt with \"Think about\". Reply with a JSON object of the form \
{\"prompt\": \"...\"}.";

const DAILY_PROMPT_USER: &str = "Examples:\n\
* What is a skill you are grateful to have learned?\n\
* What is a place that brings you comfort and joy?\n\
* What is a small act of kindness you witnessed or experienced today?\n\
* What is a challenge you overcame recently, and what did you learn from it?\n\
* What is a beautiful thing you saw in nature today?";

/// Connection settings for [`HttpReflectionAnalyst`].
pub struct HttpReflectionAnalystConfig {
    /// Chat completions URL.
    pub endpoint: Url,
    /// Bearer token, if the endpoint requires one.
    pub api_key: Option<Zeroizing<String>>,
    /// Model name sent with every request.
    pub model: String,
    /// Whole-request timeout.
    pub timeout: Duration,
}

impl HttpReflectionAnalystConfig {
    /// Settings with the default model and a 20 second timeout.
    #[must_use]
    pub fn new(endpoint: Url) -> Self {
        Self {
            endpoint,
            api_key: None,
            model: DEFAULT_MODEL.to_owned(),
            timeout: Duration::from_secs(20),
        }
    }
}

/// Analyst adapter performing one chat completion per call.
pub struct HttpReflectionAnalyst {
    client: Client,
    endpoint: Url,
    api_key: Option<Zeroizing<String>>,
    model: String,
}

impl HttpReflectionAnalyst {
    /// Build an adapter using a reqwest client with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(config: HttpReflectionAnalystConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            endpoint: config.endpoint,
            api_key: config.api_key,
            model: config.model,
        })
    }

    async fn complete<T>(&self, system: &str, user: &str) -> Result<T, ReflectionAnalystError>
    where
        T: DeserializeOwned,
    {
        let body = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            response_format: ResponseFormat::JSON_OBJECT,
            temperature: 0.7,
        };
        let mut request = self
            .client
            .post(self.endpoint.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key.as_str());
        }

        let response = request.send().await.map_err(map_transport_error)?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, bytes.as_ref()));
        }
        debug!(bytes = bytes.len(), "analyst reply received");
        decode_reply(bytes.as_ref())
    }
}

#[async_trait]
impl ReflectionAnalyst for HttpReflectionAnalyst {
    async fn similar_entries(
        &self,
        current: MoodScore,
        past: &[PastEntry],
    ) -> Result<Vec<EntryId>, ReflectionAnalystError> {
        let user = render_inspiration_request(current, past)?;
        let reply: SimilarEntriesReply = self.complete(INSPIRATION_SYSTEM, &user).await?;
        // Unparseable ids cannot match a stored entry, so they are dropped.
        Ok(reply
            .similar_entries
            .into_iter()
            .filter_map(|entry| EntryId::new(entry.id).ok())
            .collect())
    }

    async fn adjective_frequencies(
        &self,
        text: &str,
    ) -> Result<Vec<WordFrequency>, ReflectionAnalystError> {
        let user = format!("Analyse the following text:\n---\n{text}\n---");
        let reply: AdjectivesReply = self.complete(ADJECTIVES_SYSTEM, &user).await?;
        Ok(reply.adjectives)
    }

    async fn daily_prompt(&self) -> Result<String, ReflectionAnalystError> {
        let reply: DailyPromptReply = self
            .complete(DAILY_PROMPT_SYSTEM, DAILY_PROMPT_USER)
            .await?;
        Ok(reply.prompt)
    }
}

fn render_inspiration_request(
    current: MoodScore,
    past: &[PastEntry],
) -> Result<String, ReflectionAnalystError> {
    let entries: Vec<PastEntryDto<'_>> = past
        .iter()
        .map(|entry| PastEntryDto {
            id: entry.id.to_string(),
            mood_score: entry.mood_score.value(),
            text: &entry.text,
        })
        .collect();
    let encoded = serde_json::to_string(&entries).map_err(|error| {
        ReflectionAnalystError::transport(format!("failed to encode past entries: {error}"))
    })?;
    Ok(format!(
        "Current mood score: {current}\nPast entries: {encoded}",
        current = current.value()
    ))
}

fn decode_reply<T>(body: &[u8]) -> Result<T, ReflectionAnalystError>
where
    T: DeserializeOwned,
{
    let response: ChatResponse = serde_json::from_slice(body).map_err(|error| {
        ReflectionAnalystError::response(format!("invalid completion payload: {error}"))
    })?;
    let content = response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| ReflectionAnalystError::response("completion carried no content"))?;
    serde_json::from_str(strip_code_fence(&content)).map_err(|error| {
        ReflectionAnalystError::response(format!("completion content is not the expected JSON: {error}"))
    })
}

// Some models wrap JSON in a markdown fence despite the response format.
fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|inner| inner.strip_suffix("```"))
        .map_or(trimmed, str::trim)
}

fn map_transport_error(error: reqwest::Error) -> ReflectionAnalystError {
    if error.is_timeout() {
        ReflectionAnalystError::transport(format!("timed out: {error}"))
    } else {
        ReflectionAnalystError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> ReflectionAnalystError {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview: String = compact.chars().take(PREVIEW_CHAR_LIMIT).collect();
    let message = if preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {preview}", status.as_u16())
    };
    if status.is_client_error() {
        ReflectionAnalystError::response(message)
    } else {
        ReflectionAnalystError::transport(message)
    }
}
