use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::assistant::{CompletionError, TextCompletionService};
use crate::config::AssistantConfig;

#[derive(Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    api_base: String,
    model: String,
}

impl GeminiClient {
    pub fn from_config(config: &AssistantConfig) -> Result<Option<Self>, String> {
        let api_key = match config.api_key.as_ref() {
            Some(key) if !key.trim().is_empty() => key.clone(),
            _ => return Ok(None),
        };
        let timeout = Duration::from_millis(config.timeout_ms);
        GeminiClient::new(api_key, config.api_base.clone(), config.model.clone(), timeout).map(Some)
    }

    pub fn new(
        api_key: String,
        api_base: String,
        model: String,
        timeout: Duration,
    ) -> Result<Self, String> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| format!("failed to build gemini client: {}", err))?;
        Ok(Self {
            client,
            api_key,
            api_base,
            model,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.api_base.trim_end_matches('/'),
            self.model
        )
    }
}

#[async_trait]
impl TextCompletionService for GeminiClient {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        let request = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart {
                    text: prompt.to_string(),
                }],
            }],
        };

        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await
            .map_err(|err| CompletionError::Request(err.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| CompletionError::Request(err.to_string()))?;

        if !status.is_success() {
            if let Some(message) = provider_error(&body) {
                return Err(CompletionError::Provider(message));
            }
            return Err(CompletionError::Status {
                status: status.as_u16(),
                detail: body.trim().to_string(),
            });
        }

        parse_generate_response(&body)
    }
}

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<RequestContent>,
}

#[derive(Serialize)]
struct RequestContent {
    parts: Vec<RequestPart>,
}

#[derive(Serialize)]
struct RequestPart {
    text: String,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    error: Option<ProviderError>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
struct ProviderError {
    #[serde(default)]
    message: String,
}

// A well-formed body without any text part yields an empty string.
fn parse_generate_response(body: &str) -> Result<String, CompletionError> {
    let parsed: GenerateResponse =
        serde_json::from_str(body).map_err(|err| CompletionError::Parse(err.to_string()))?;

    if let Some(error) = parsed.error {
        return Err(CompletionError::Provider(error.message));
    }

    let text = parsed
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .and_then(|content| content.parts.into_iter().next())
        .and_then(|part| part.text)
        .unwrap_or_default();
    Ok(text)
}

fn provider_error(body: &str) -> Option<String> {
    serde_json::from_str::<GenerateResponse>(body)
        .ok()?
        .error
        .map(|error| error.message)
        .filter(|message| !message.trim().is_empty())
}
