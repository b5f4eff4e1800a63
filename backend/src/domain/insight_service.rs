//! AI-assisted insight service.
//!
//! Wraps a [`ReflectionAnalyst`] so that collaborator failures are logged at
//! `warn` and replaced by empty results. Nothing here returns an error.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::domain::ports::{
    EntryRepository, InsightService, InspirationEntry, PastEntry, ReflectionAnalyst,
    ReflectionAnalystError,
};
use crate::domain::{ENTRY_TEXT_MIN, MoodScore, SizedWord, UserId, WordScale, size_words};

/// Prompt used whenever generation fails or yields nothing.
pub const FALLBACK_DAILY_PROMPT: &str = "What is something that made you smile today?";
/// Upper bound on adjectives shown in the cloud.
pub const MAX_ADJECTIVES: usize = 15;

/// Insight service implementing the driving port.
#[derive(Clone)]
pub struct InsightServiceImpl<E, A> {
    entries: Arc<E>,
    analyst: Arc<A>,
}

impl<E, A> InsightServiceImpl<E, A> {
    /// Create the service.
    pub fn new(entries: Arc<E>, analyst: Arc<A>) -> Self {
        Self { entries, analyst }
    }
}

fn log_degraded(operation: &'static str, error: &ReflectionAnalystError) {
    match error {
        ReflectionAnalystError::Disabled => {
            debug!(operation, "analyst disabled; returning empty insight");
        }
        other => warn!(operation, error = %other, "analyst call failed; returning empty insight"),
    }
}

#[async_trait]
impl<E, A> InsightService for InsightServiceImpl<E, A>
where
    E: EntryRepository,
    A: ReflectionAnalyst,
{
    async fn inspiration(&self, user_id: &UserId, mood: MoodScore) -> Vec<InspirationEntry> {
        let entries = self.entries.list_for_user(user_id).await;
        if entries.is_empty() {
            return Vec::new();
        }

        let past: Vec<PastEntry> = entries
            .iter()
            .map(|entry| PastEntry {
                id: entry.id().clone(),
                mood_score: entry.mood_score(),
                text: entry.text().as_ref().to_owned(),
            })
            .collect();
        let ids = match self.analyst.similar_entries(mood, &past).await {
            Ok(ids) => ids,
            Err(error) => {
                log_degraded("similar_entries", &error);
                return Vec::new();
            }
        };

        // Only ids belonging to this user are returned, once each.
        let mut seen = HashSet::new();
        ids.into_iter()
            .filter(|id| seen.insert(id.clone()))
            .filter_map(|id| entries.iter().find(|entry| entry.id() == &id))
            .map(|entry| InspirationEntry {
                id: entry.id().clone(),
                mood_score: entry.mood_score(),
                text: entry.text().as_ref().to_owned(),
            })
            .collect()
    }

    async fn adjective_cloud(&self, user_id: &UserId, scale: WordScale) -> Vec<SizedWord> {
        let texts: Vec<String> = self
            .entries
            .list_for_user(user_id)
            .await
            .into_iter()
            .map(|entry| String::from(entry.text().clone()))
            .filter(|text| text.trim().chars().count() > ENTRY_TEXT_MIN)
            .collect();
        if texts.is_empty() {
            return Vec::new();
        }

        let mut words = match self.analyst.adjective_frequencies(&texts.join("\n\n")).await {
            Ok(words) => words,
            Err(error) => {
                log_degraded("adjective_frequencies", &error);
                return Vec::new();
            }
        };
        words.retain(|word| !word.adjective.trim().is_empty() && word.count > 0);
        words.sort_by(|left, right| right.count.cmp(&left.count));
        words.truncate(MAX_ADJECTIVES);
        size_words(&words, scale)
    }

    async fn daily_prompt(&self) -> String {
        match self.analyst.daily_prompt().await {
            Ok(prompt) if !prompt.trim().is_empty() => prompt.trim().to_owned(),
            Ok(_) => FALLBACK_DAILY_PROMPT.to_owned(),
            Err(error) => {
                log_degraded("daily_prompt", &error);
                FALLBACK_DAILY_PROMPT.to_owned()
            }
        }
    }
}

#[cfg(test)]
#[path = "insight_service_tests.rs"]
mod tests;
