//! Bridge configuration.
//!
//! The bridge reads no environment variables on its own. Everything ambient
//! (library search directory, option overrides, debug mode) is collected
//! into a [`BridgeConfig`] up front and passed in explicitly.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Directory to search for the compiler library.
pub const ENV_OCLOC_DIR: &str = "CMOC_OCLOC_DIR";
/// Extra text appended to the public compile options.
pub const ENV_VC_API_OPTIONS: &str = "CM_VC_API_OPTIONS";
/// Extra text appended to the internal options.
pub const ENV_INTERNAL_OPTIONS: &str = "CM_INTERNAL_OPTIONS";
/// Enables the diagnostic echo and verbose compiler output.
pub const ENV_DEBUG: &str = "CMOC_DEBUG";

/// Ambient configuration of the bridge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct BridgeConfig {
    /// Directory containing the compiler library. `None` uses the
    /// platform loader's default search.
    #[serde(default)]
    pub ocloc_dir: Option<PathBuf>,
    /// Appended verbatim to the public compile options.
    #[serde(default)]
    pub vc_api_options: Option<String>,
    /// Appended verbatim to the internal options.
    #[serde(default)]
    pub internal_options: Option<String>,
    /// Echo the command line to stderr and keep the compiler verbose.
    #[serde(default)]
    pub debug: bool,
}

impl BridgeConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Build a configuration from an arbitrary variable lookup.
    pub fn from_vars<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            ocloc_dir: lookup(ENV_OCLOC_DIR).map(PathBuf::from),
            vc_api_options: lookup(ENV_VC_API_OPTIONS),
            internal_options: lookup(ENV_INTERNAL_OPTIONS),
            debug: lookup(ENV_DEBUG).is_some_and(|v| flag_enabled(&v)),
        }
    }

    /// Load a configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse a configuration from a TOML string.
    pub fn parse(toml_str: &str) -> Result<Self> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Layer the process environment on top of this configuration.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|name| std::env::var(name).ok())
    }

    /// Layer set variables from `lookup` on top of this configuration.
    /// Unset variables keep the current value.
    pub fn with_overrides_from<F>(self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Self::from_vars(&lookup);
        Self {
            ocloc_dir: env.ocloc_dir.or(self.ocloc_dir),
            vc_api_options: env.vc_api_options.or(self.vc_api_options),
            internal_options: env.internal_options.or(self.internal_options),
            debug: match lookup(ENV_DEBUG) {
                Some(_) => env.debug,
                None => self.debug,
            },
        }
    }
}

fn flag_enabled(value: &str) -> bool {
    !matches!(value, "" | "0" | "false")
}
