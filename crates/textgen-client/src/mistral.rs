//! Primary provider: an OpenAI-style chat-completions API.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use goalsmith_core::TextGen;

/// Network timeout for the primary provider.
pub const PRIMARY_TIMEOUT: Duration = Duration::from_secs(60);

const TEMPERATURE: f32 = 0.7;
// Balances answer quality against response latency.
const MAX_TOKENS: u32 = 1200;

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: String,
}

// ---------------------------------------------------------------------------
// MistralClient
// ---------------------------------------------------------------------------

/// Chat-completions client. Every failure mode (transport error, non-2xx,
/// unparsable body, empty content) is soft and comes back as `None`.
pub struct MistralClient {
    http: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl MistralClient {
    pub fn new(
        api_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        let http = reqwest::Client::builder()
            .timeout(PRIMARY_TIMEOUT)
            .build()
            .expect("failed to build reqwest client");
        Self {
            http,
            api_url: api_url.into(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    async fn complete(&self, prompt: &str) -> Option<String> {
        let payload = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        let response = match self
            .http
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
        {
            Ok(r) => r,
            Err(err) => {
                tracing::warn!(%err, "primary provider request failed");
                return None;
            }
        };

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%status, "primary provider returned an error status");
            return None;
        }

        let body: ChatResponse = match response.json().await {
            Ok(b) => b,
            Err(err) => {
                tracing::warn!(%err, "primary provider body was not parseable");
                return None;
            }
        };

        let content = body.choices.into_iter().next()?.message.content;
        let trimmed = content.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(trimmed.to_string())
    }
}

#[async_trait]
impl TextGen for MistralClient {
    fn name(&self) -> &'static str {
        "mistral"
    }

    async fn generate(&self, prompt: &str) -> Option<String> {
        self.complete(prompt).await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
