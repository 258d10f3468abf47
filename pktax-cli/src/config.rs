//! `pktax.toml` settings.
//!
//! ```toml
//! tax_year = 2025
//! log_level = "info"
//! log_file = "pktax.log"
//! slab_tables = "tables/ty2026.csv"
//!
//! [pension]
//! threshold = 10000000
//! rate = 0.05
//! basis = "full_amount"   # or "excess_over_threshold"
//! ```
//!
//! Every key is optional. Command-line flags override what is read here.

use std::path::{Path, PathBuf};

use anyhow::Context;
use pktax_core::calculations::PensionSurchargeConfig;
use serde::Deserialize;
use tracing::debug;

/// Config file looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "pktax.toml";

pub const DEFAULT_TAX_YEAR: i32 = 2025;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Tax year used when neither a flag nor a CSV row names one.
    pub tax_year: i32,
    /// Bare level or full `EnvFilter` directive. `RUST_LOG` wins over it.
    pub log_level: String,
    pub log_file: Option<PathBuf>,
    /// Slab table CSV that replaces the bundled schedules.
    pub slab_tables: Option<PathBuf>,
    pub pension: PensionSurchargeConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            tax_year: DEFAULT_TAX_YEAR,
            log_level: "info".to_string(),
            log_file: None,
            slab_tables: None,
            pension: PensionSurchargeConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn from_toml_str(input: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(input).context("invalid pktax config")?;
        config
            .pension
            .validate()
            .context("invalid [pension] section")?;
        Ok(config)
    }

    /// Reads `path` if given, otherwise [`DEFAULT_CONFIG_FILE`] when it
    /// exists, otherwise returns the defaults.
    ///
    /// An explicitly named file that cannot be read is an error.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let path = match path {
            Some(path) => path,
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if !default.exists() {
                    return Ok(Self::default());
                }
                default
            }
        };

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read config file '{}'", path.display()))?;
        let mut config = Self::from_toml_str(&contents)
            .with_context(|| format!("in config file '{}'", path.display()))?;
        if let Some(dir) = path.parent() {
            config.resolve_paths(dir);
        }
        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Relative file paths in the config are relative to the config file.
    fn resolve_paths(
        &mut self,
        dir: &Path,
    ) {
        for path in [&mut self.log_file, &mut self.slab_tables]
            .into_iter()
            .flatten()
        {
            if path.is_relative() {
                *path = dir.join(&*path);
            }
        }
    }
}
