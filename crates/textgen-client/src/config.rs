use std::env;

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

pub const DEFAULT_MISTRAL_MODEL: &str = "mistral-small-latest";
pub const DEFAULT_MISTRAL_API_URL: &str = "https://api.mistral.ai/v1/chat/completions";
pub const DEFAULT_HUGGINGFACE_API_URL: &str =
    "https://router.huggingface.co/models/google/flan-t5-base";

// ---------------------------------------------------------------------------
// ProviderConfig
// ---------------------------------------------------------------------------

/// Upstream provider endpoints and credentials.
///
/// Resolved once (normally from the environment via [`ProviderConfig::from_env`])
/// and passed into the clients at construction; nothing reads ambient global
/// state afterwards, so the adapter stack is testable with fake credentials
/// and fake endpoints.
///
/// A missing or empty key means that provider is skipped, not an error.
///
/// Environment variables:
/// - `MISTRAL_API_KEY` — primary provider credential
/// - `MISTRAL_MODEL` — primary model id (default `mistral-small-latest`)
/// - `MISTRAL_API_URL` — primary endpoint (default the public chat-completions URL)
/// - `HUGGINGFACE_API_KEY` — fallback provider credential
/// - `HUGGINGFACE_API_URL` — fallback endpoint (default the flan-t5-base router URL)
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub mistral_api_key: Option<String>,
    pub mistral_model: String,
    pub mistral_api_url: String,
    pub huggingface_api_key: Option<String>,
    pub huggingface_api_url: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            mistral_api_key: None,
            mistral_model: DEFAULT_MISTRAL_MODEL.to_string(),
            mistral_api_url: DEFAULT_MISTRAL_API_URL.to_string(),
            huggingface_api_key: None,
            huggingface_api_url: DEFAULT_HUGGINGFACE_API_URL.to_string(),
        }
    }
}

impl ProviderConfig {
    pub fn from_env() -> Self {
        Self {
            mistral_api_key: non_empty_env("MISTRAL_API_KEY"),
            mistral_model: non_empty_env("MISTRAL_MODEL")
                .unwrap_or_else(|| DEFAULT_MISTRAL_MODEL.to_string()),
            mistral_api_url: non_empty_env("MISTRAL_API_URL")
                .unwrap_or_else(|| DEFAULT_MISTRAL_API_URL.to_string()),
            huggingface_api_key: non_empty_env("HUGGINGFACE_API_KEY"),
            huggingface_api_url: non_empty_env("HUGGINGFACE_API_URL")
                .unwrap_or_else(|| DEFAULT_HUGGINGFACE_API_URL.to_string()),
        }
    }

    pub fn primary_configured(&self) -> bool {
        self.mistral_api_key.is_some()
    }

    pub fn fallback_configured(&self) -> bool {
        self.huggingface_api_key.is_some()
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_no_keys_and_documented_defaults() {
        let config = ProviderConfig::default();
        assert!(!config.primary_configured());
        assert!(!config.fallback_configured());
        assert_eq!(config.mistral_model, DEFAULT_MISTRAL_MODEL);
        assert_eq!(config.mistral_api_url, DEFAULT_MISTRAL_API_URL);
        assert_eq!(config.huggingface_api_url, DEFAULT_HUGGINGFACE_API_URL);
    }

    #[test]
    fn configured_when_keys_present() {
        let config = ProviderConfig {
            mistral_api_key: Some("k1".into()),
            huggingface_api_key: Some("hf_k".into()),
            ..Default::default()
        };
        assert!(config.primary_configured());
        assert!(config.fallback_configured());
    }
}
