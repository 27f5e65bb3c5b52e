//! Fallback provider: a hosted-inference endpoint.
//!
//! Unlike the primary client this one probes several equivalent URL variants
//! for the same logical request, and when the whole leg is exhausted it
//! answers with a human-readable diagnostic string instead of `None`. The
//! normalizer treats diagnostic text and `None` uniformly, so the diagnostic
//! only ever surfaces to a human reading logs or probe output.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use goalsmith_core::TextGen;

/// Network timeout for the fallback provider.
pub const FALLBACK_TIMEOUT: Duration = Duration::from_secs(20);

const MAX_NEW_TOKENS: u32 = 500;
const TEMPERATURE: f32 = 0.7;

const EXHAUSTED_DIAGNOSTIC: &str = "Could not reach the text-generation API.\n\n\
    Possible fixes:\n\
    1. Check your API key\n\
    2. The model may not be available through the free endpoint\n\
    3. Point HUGGINGFACE_API_URL at another model";

// ---------------------------------------------------------------------------
// HuggingFaceClient
// ---------------------------------------------------------------------------

pub struct HuggingFaceClient {
    http: reqwest::Client,
    api_url: String,
    api_key: String,
}

impl HuggingFaceClient {
    pub fn new(api_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(FALLBACK_TIMEOUT)
            .build()
            .expect("failed to build reqwest client");
        Self {
            http,
            api_url: api_url.into(),
            api_key: api_key.into(),
        }
    }

    /// The configured URL, plus the legacy-host rewrite when it applies.
    fn url_variants(&self) -> Vec<String> {
        let mut variants = vec![self.api_url.clone()];
        let rewritten = self
            .api_url
            .replace("router.huggingface.co", "api-inference.huggingface.co");
        if rewritten != self.api_url {
            variants.push(rewritten);
        }
        variants
    }

    async fn complete(&self, prompt: &str) -> Option<String> {
        let payload = serde_json::json!({
            "inputs": prompt,
            "parameters": {
                "max_new_tokens": MAX_NEW_TOKENS,
                "temperature": TEMPERATURE,
                "return_full_text": false,
            },
        });

        let variants = self.url_variants();
        let last_index = variants.len() - 1;

        for (index, url) in variants.iter().enumerate() {
            let is_last = index == last_index;

            let response = match self
                .http
                .post(url)
                .bearer_auth(&self.api_key)
                .json(&payload)
                .send()
                .await
            {
                Ok(r) => r,
                Err(err) => {
                    tracing::warn!(%err, %url, "fallback provider request failed");
                    if is_last {
                        return Some(if err.is_timeout() {
                            "Timed out waiting for the text-generation API. Please try again."
                                .to_string()
                        } else {
                            format!("Connection error while calling the text-generation API: {err}")
                        });
                    }
                    continue;
                }
            };

            let status = response.status();
            let body = response.text().await.unwrap_or_default();

            match status.as_u16() {
                200 => return Some(interpret_success_body(&body)),
                503 => {
                    return Some(
                        "The model is still loading. Wait a few seconds and try again."
                            .to_string(),
                    )
                }
                // Obsolete URL: try the next variant.
                410 => continue,
                code => {
                    let diagnostic = error_diagnostic(code, &body);
                    tracing::warn!(%status, %url, "fallback provider returned an error status");
                    if is_last {
                        return Some(diagnostic);
                    }
                }
            }
        }

        Some(EXHAUSTED_DIAGNOSTIC.to_string())
    }
}

/// The endpoint answers in several shapes: a list of generations, a single
/// object, or a bare string.
fn interpret_success_body(body: &str) -> String {
    let value: Value = match serde_json::from_str(body) {
        Ok(v) => v,
        Err(_) => return body.trim().to_string(),
    };

    let generated = match &value {
        Value::Array(items) => items
            .first()
            .and_then(|item| item.get("generated_text"))
            .and_then(Value::as_str),
        Value::Object(obj) => obj
            .get("generated_text")
            .or_else(|| obj.get("text"))
            .and_then(Value::as_str),
        Value::String(s) => Some(s.as_str()),
        _ => None,
    };

    if let Some(text) = generated {
        if !text.trim().is_empty() {
            return text.trim().to_string();
        }
    }

    // Last resort: hand the raw payload over, unless it is empty framing.
    let raw = value.to_string();
    if !raw.is_empty() && raw != "{}" && raw != "[]" {
        return raw;
    }
    "The model did not produce an answer. Please try again.".to_string()
}

fn error_diagnostic(status: u16, body: &str) -> String {
    let mut message = format!("API error (status {status})");

    if let Ok(value) = serde_json::from_str::<Value>(body) {
        let detail = value
            .get("error")
            .or_else(|| value.get("message"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .or_else(|| value.as_str().map(str::to_string));
        if let Some(detail) = detail {
            message.push_str(": ");
            message.push_str(&detail);
            return message;
        }
    }

    let snippet: String = body.chars().take(200).collect();
    if !snippet.trim().is_empty() {
        message.push_str(": ");
        message.push_str(snippet.trim());
    }
    message
}

#[async_trait]
impl TextGen for HuggingFaceClient {
    fn name(&self) -> &'static str {
        "huggingface"
    }

    async fn generate(&self, prompt: &str) -> Option<String> {
        self.complete(prompt).await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
