//! CLI command implementations.

pub mod doctor;
pub mod platforms;
pub mod translate;

use std::path::Path;

use anyhow::{Context, Result};
use cmoc_backend::BridgeConfig;

/// Resolve the bridge configuration: the optional TOML file first, then the
/// environment on top.
pub fn load_config(path: Option<&Path>) -> Result<BridgeConfig> {
    let base = match path {
        Some(p) => BridgeConfig::load(p).with_context(|| format!("loading {}", p.display()))?,
        None => BridgeConfig::default(),
    };
    Ok(base.with_env_overrides())
}
