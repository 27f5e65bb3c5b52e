//! The ordered provider chain: a small list of attempts sharing one
//! signature, tried in sequence until one yields text. No branching on
//! provider identity anywhere downstream.

use async_trait::async_trait;

use goalsmith_core::TextGen;

use crate::config::ProviderConfig;
use crate::huggingface::HuggingFaceClient;
use crate::mistral::MistralClient;

pub struct ProviderChain {
    attempts: Vec<Box<dyn TextGen>>,
}

impl ProviderChain {
    /// Build the chain from configuration. Providers without a key are never
    /// constructed: absence of a key means skipped, not an error.
    pub fn from_config(config: &ProviderConfig) -> Self {
        let mut attempts: Vec<Box<dyn TextGen>> = Vec::new();
        if let Some(key) = &config.mistral_api_key {
            attempts.push(Box::new(MistralClient::new(
                &config.mistral_api_url,
                key,
                &config.mistral_model,
            )));
        }
        if let Some(key) = &config.huggingface_api_key {
            attempts.push(Box::new(HuggingFaceClient::new(
                &config.huggingface_api_url,
                key,
            )));
        }
        Self { attempts }
    }

    /// Compose an explicit attempt list (used by tests and the probe command).
    pub fn with_attempts(attempts: Vec<Box<dyn TextGen>>) -> Self {
        Self { attempts }
    }

    pub fn is_empty(&self) -> bool {
        self.attempts.is_empty()
    }

    /// Provider labels in attempt order.
    pub fn names(&self) -> Vec<&'static str> {
        self.attempts.iter().map(|a| a.name()).collect()
    }
}

#[async_trait]
impl TextGen for ProviderChain {
    fn name(&self) -> &'static str {
        "provider-chain"
    }

    async fn generate(&self, prompt: &str) -> Option<String> {
        for provider in &self.attempts {
            match provider.generate(prompt).await {
                Some(text) if !text.trim().is_empty() => {
                    tracing::debug!(provider = provider.name(), "provider answered");
                    return Some(text);
                }
                _ => {
                    tracing::warn!(
                        provider = provider.name(),
                        "provider produced no usable text, trying next"
                    );
                }
            }
        }
        None
    }
}
