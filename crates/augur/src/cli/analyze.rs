use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use augur_core::{AnalysisRequest, CausalityEngine};

use super::{load_config, print_json, OutputMode};

pub fn run(request_path: &Path, config: Option<&Path>, output: OutputMode, pretty: bool) -> Result<()> {
    let config = load_config(config)?;

    let contents = fs::read_to_string(request_path)
        .with_context(|| format!("Failed to read {}", request_path.display()))?;
    let request: AnalysisRequest = serde_json::from_str(&contents)
        .with_context(|| format!("Invalid analysis request in {}", request_path.display()))?;

    tracing::debug!(
        "Analyzing {} sources for {}",
        request.sources.len(),
        request.event.node_id()
    );

    let engine = CausalityEngine::new(config);
    let analysis = engine
        .analyze(&request.sources, &request.event)
        .context("Analysis failed")?;

    match output {
        OutputMode::All => print_json(&analysis, pretty),
        OutputMode::Graph => print_json(&analysis.graph, pretty),
        OutputMode::Predictions => print_json(&analysis.predictions, pretty),
    }
}
