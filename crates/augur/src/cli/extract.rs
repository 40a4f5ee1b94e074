use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use augur_core::CausalityEngine;

use super::{load_config, print_json};

/// Extraction output before any graph quality gate, for auditing patterns.
pub fn run(path: &Path, config: Option<&Path>, pretty: bool) -> Result<()> {
    let config = load_config(config)?;
    let text =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;

    let engine = CausalityEngine::new(config);
    let output = engine.pipeline().extract(&text, 0);

    print_json(&output, pretty)
}
