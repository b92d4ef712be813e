//! Configuration for the linecast CLI.
//!
//! Values resolve in order: built-in defaults, then the TOML file, then
//! command-line flags.

use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use linecast_core::{DEFAULT_OVERHEAD_BPS, DEFAULT_SYMBOL_SIZE};

/// linecast configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Coding parameters
    #[serde(default)]
    pub coding: CodingConfig,
    /// Wire framing options
    #[serde(default)]
    pub framing: FramingConfig,
}

/// Coding parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodingConfig {
    /// Symbol size in bytes
    #[serde(default = "default_symbol_size")]
    pub symbol_size: u16,
    /// Repair overhead in basis points (1000 = 10%)
    #[serde(default = "default_overhead_bps")]
    pub overhead_bps: u16,
}

/// Wire framing options
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FramingConfig {
    /// Strip the per-packet identifier (positional mode)
    #[serde(default)]
    pub untagged: bool,
    /// Use the legacy headerless stream format
    #[serde(default)]
    pub bare: bool,
}

impl Default for CodingConfig {
    fn default() -> Self {
        Self {
            symbol_size: DEFAULT_SYMBOL_SIZE,
            overhead_bps: DEFAULT_OVERHEAD_BPS,
        }
    }
}

fn default_symbol_size() -> u16 {
    DEFAULT_SYMBOL_SIZE
}

fn default_overhead_bps() -> u16 {
    DEFAULT_OVERHEAD_BPS
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("cannot read config file {}", path.display()))?;
        let config: Self = toml::from_str(&raw)
            .with_context(|| format!("cannot parse config file {}", path.display()))?;
        Ok(config)
    }

    /// Sanity-check the configuration.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.coding.symbol_size == 0 {
            anyhow::bail!("coding.symbol_size must be nonzero");
        }
        if self.coding.overhead_bps > 10_000 {
            anyhow::bail!("coding.overhead_bps above 10000 (100%) is not supported");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.coding.symbol_size, 32);
        assert_eq!(config.coding.overhead_bps, 1000);
        assert!(!config.framing.untagged);
        assert!(!config.framing.bare);
        config.validate().unwrap();
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let config: Config = toml::from_str(
            r#"
            [coding]
            overhead_bps = 2000
            "#,
        )
        .unwrap();
        assert_eq!(config.coding.symbol_size, 32);
        assert_eq!(config.coding.overhead_bps, 2000);
    }

    #[test]
    fn full_file_parses() {
        let config: Config = toml::from_str(
            r#"
            [coding]
            symbol_size = 64
            overhead_bps = 500

            [framing]
            untagged = true
            bare = true
            "#,
        )
        .unwrap();
        assert_eq!(config.coding.symbol_size, 64);
        assert!(config.framing.untagged);
        assert!(config.framing.bare);
    }

    #[test]
    fn invalid_values_fail_validation() {
        let mut config = Config::default();
        config.coding.symbol_size = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.coding.overhead_bps = 10_001;
        assert!(config.validate().is_err());
    }

    #[test]
    fn roundtrips_through_toml() {
        let config = Config::default();
        let raw = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&raw).unwrap();
        assert_eq!(parsed.coding.symbol_size, config.coding.symbol_size);
    }
}
