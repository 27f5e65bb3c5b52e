use std::sync::Arc;

use anyhow::Result;

use goalsmith_core::{IkigaiAnswers, Pipeline};
use textgen_client::{ProviderChain, ProviderConfig};

pub fn run(love: String, good_at: String, world_needs: String, paid_for: String) -> Result<()> {
    let answers = IkigaiAnswers {
        what_you_love: love,
        what_you_are_good_at: good_at,
        what_world_needs: world_needs,
        what_you_can_be_paid_for: paid_for,
    };

    let config = ProviderConfig::from_env();
    let pipeline = Pipeline::new(Arc::new(ProviderChain::from_config(&config)));

    let rt = tokio::runtime::Runtime::new()?;
    let narrative = rt.block_on(pipeline.analyze_ikigai(&answers));

    println!("{narrative}");
    Ok(())
}
