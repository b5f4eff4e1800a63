//! Wire types for OpenAI-compatible chat completion endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::WordFrequency;

#[derive(Debug, Serialize)]
pub(super) struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: [ChatMessage<'a>; 2],
    pub response_format: ResponseFormat,
    pub temperature: f32,
}

#[derive(Debug, Serialize)]
pub(super) struct ChatMessage<'a> {
    pub role: &'static str,
    pub content: &'a str,
}

#[derive(Debug, Serialize)]
pub(super) struct ResponseFormat {
    #[serde(rename = "type")]
    pub kind: &'static str,
}

impl ResponseFormat {
    pub(super) const JSON_OBJECT: Self = Self {
        kind: "json_object",
    };
}

#[derive(Debug, Deserialize)]
pub(super) struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ChatChoice {
    pub message: ChatReply,
}

#[derive(Debug, Deserialize)]
pub(super) struct ChatReply {
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct PastEntryDto<'a> {
    pub id: String,
    pub mood_score: u8,
    pub text: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct SimilarEntriesReply {
    #[serde(default)]
    pub similar_entries: Vec<SimilarEntryDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct SimilarEntryDto {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct AdjectivesReply {
    #[serde(default)]
    pub adjectives: Vec<WordFrequency>,
}

#[derive(Debug, Deserialize)]
pub(super) struct DailyPromptReply {
    #[serde(default)]
    pub prompt: String,
}
