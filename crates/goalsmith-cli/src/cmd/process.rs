use std::sync::Arc;

use anyhow::{bail, Result};

use goalsmith_core::Pipeline;
use textgen_client::{ProviderChain, ProviderConfig};

pub fn run(objectives: Vec<String>) -> Result<()> {
    let valid: Vec<String> = objectives
        .iter()
        .map(|o| o.trim())
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect();
    if valid.is_empty() {
        bail!("no valid objectives provided");
    }

    let config = ProviderConfig::from_env();
    let chain = ProviderChain::from_config(&config);
    if chain.is_empty() {
        tracing::warn!("no provider API keys configured; records will be synthesized");
    }
    let pipeline = Pipeline::new(Arc::new(chain));

    let rt = tokio::runtime::Runtime::new()?;
    let records = rt.block_on(pipeline.process_batch(&valid));

    println!("{}", serde_json::to_string_pretty(&records)?);
    Ok(())
}
