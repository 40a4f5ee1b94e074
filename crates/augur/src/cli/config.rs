use anyhow::Result;
use augur_core::EngineConfig;

use super::print_json;

pub fn run() -> Result<()> {
    print_json(&EngineConfig::default(), true)
}
