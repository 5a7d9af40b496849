pub mod gemini;

use async_trait::async_trait;
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;
use tracing::{debug, warn};

use crate::scoring::bortle_class;
use crate::LocationMetric;

pub use gemini::GeminiClient;

pub const GREETING: &str =
    "Hello! I am your Cosmic Assistant. Ask me anything about the stars in {region}!";
pub const FALLBACK_REPLY: &str = "Communications with the satellite failed.";
pub const EMPTY_REPLY: &str = "No response from the stars.";

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("completion service not configured: {0}")]
    NotConfigured(String),
    #[error("completion request failed: {0}")]
    Request(String),
    #[error("completion API error: {status} {detail}")]
    Status { status: u16, detail: String },
    #[error("provider error: {0}")]
    Provider(String),
    #[error("completion response parse failed: {0}")]
    Parse(String),
}

#[async_trait]
pub trait TextCompletionService: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError>;
}

#[async_trait]
impl<T: TextCompletionService + ?Sized> TextCompletionService for Arc<T> {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        (**self).complete(prompt).await
    }
}

// Used when no API key is configured; every call fails.
#[derive(Debug, Clone, Default)]
pub struct Unconfigured;

#[async_trait]
impl TextCompletionService for Unconfigured {
    async fn complete(&self, _prompt: &str) -> Result<String, CompletionError> {
        Err(CompletionError::NotConfigured(
            "set GEMINI_API_KEY".to_string(),
        ))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
}

// The history lock is only held while pushing or copying messages, never
// across a completion call, so chats and itineraries run concurrently.
pub struct Assistant<S> {
    service: S,
    region: String,
    history: Mutex<Vec<ChatMessage>>,
}

impl<S: TextCompletionService> Assistant<S> {
    pub fn new(service: S, region: impl Into<String>) -> Self {
        let region = region.into();
        let greeting = ChatMessage {
            role: ChatRole::Assistant,
            text: GREETING.replace("{region}", &region),
        };
        Self {
            service,
            region,
            history: Mutex::new(vec![greeting]),
        }
    }

    pub fn history(&self) -> Vec<ChatMessage> {
        self.messages().clone()
    }

    pub async fn ask(&self, question: &str, location: &LocationMetric) -> Option<String> {
        let question = question.trim();
        if question.is_empty() {
            return None;
        }

        self.messages().push(ChatMessage {
            role: ChatRole::User,
            text: question.to_string(),
        });

        let prompt = chat_prompt(&self.region, &location.name, question);
        let reply = self.complete_or_fallback(&prompt).await;

        self.messages().push(ChatMessage {
            role: ChatRole::Assistant,
            text: reply.clone(),
        });
        Some(reply)
    }

    pub async fn itinerary(&self, location: &LocationMetric) -> String {
        let prompt = itinerary_prompt(&self.region, location);
        self.complete_or_fallback(&prompt).await
    }

    fn messages(&self) -> MutexGuard<'_, Vec<ChatMessage>> {
        self.history
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    async fn complete_or_fallback(&self, prompt: &str) -> String {
        match self.service.complete(prompt).await {
            Ok(text) => {
                let text = text.trim();
                if text.is_empty() {
                    debug!("completion returned no text");
                    EMPTY_REPLY.to_string()
                } else {
                    text.to_string()
                }
            }
            Err(err) => {
                warn!(error = %err, "assistant completion failed");
                FALLBACK_REPLY.to_string()
            }
        }
    }
}

pub fn chat_prompt(region: &str, location_name: &str, question: &str) -> String {
    format!(
        "You are a helpful astronomy assistant for the {region} SkyWatch app.\n\
         The user is currently viewing data for: {location_name}.\n\
         User Question: \"{question}\"\n\
         Provide a concise, friendly answer (max 2 sentences)."
    )
}

pub fn itinerary_prompt(region: &str, location: &LocationMetric) -> String {
    format!(
        "Act as an expert astronomer guide.\n\
         Create a short, bullet-point stargazing itinerary for tonight at {}, {}.\n\
         Context: Bortle Scale {}, Cloud Cover {}%.\n\
         Suggest 3 specific celestial objects visible tonight (planets, constellations, or deep sky objects) suitable for this light pollution level.\n\
         Keep it under 80 words.",
        location.name,
        region,
        bortle_class(location.light_pollution),
        location.cloud_cover
    )
}
