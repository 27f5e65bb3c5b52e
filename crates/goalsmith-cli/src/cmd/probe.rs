use anyhow::Result;

use goalsmith_core::TextGen;
use textgen_client::{HuggingFaceClient, MistralClient, ProviderConfig};

const PROBE_PROMPT: &str = "Reply with the single word: ok";
const PREVIEW_LEN: usize = 80;

/// Send a tiny prompt to each configured provider and report what came back.
pub fn run() -> Result<()> {
    let config = ProviderConfig::from_env();

    if !config.primary_configured() && !config.fallback_configured() {
        println!("no providers configured");
        println!("  set MISTRAL_API_KEY and/or HUGGINGFACE_API_KEY to enable one");
        return Ok(());
    }

    let mut providers: Vec<Box<dyn TextGen>> = Vec::new();
    if let Some(key) = &config.mistral_api_key {
        providers.push(Box::new(MistralClient::new(
            &config.mistral_api_url,
            key,
            &config.mistral_model,
        )));
    }
    if let Some(key) = &config.huggingface_api_key {
        providers.push(Box::new(HuggingFaceClient::new(
            &config.huggingface_api_url,
            key,
        )));
    }

    println!("probing {} provider(s)", providers.len());

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        for provider in &providers {
            match provider.generate(PROBE_PROMPT).await {
                Some(text) => {
                    let preview: String = text.trim().chars().take(PREVIEW_LEN).collect();
                    println!("  {:<12} answered: {preview}", provider.name());
                }
                None => {
                    println!("  {:<12} no usable response", provider.name());
                }
            }
        }
    });

    Ok(())
}
