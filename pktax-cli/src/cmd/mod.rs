pub mod batch;
pub mod compute;
pub mod slabs;

use std::borrow::Cow;
use std::io;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use pktax_core::{SlabTableRegistry, TaxEngine, TaxpayerType};
use pktax_data::{bundled_registry, registry_from_path};
use tracing::{debug, info};

use crate::config::AppConfig;

pub use batch::BatchCommand;
pub use compute::ComputeCommand;
pub use slabs::SlabsCommand;

/// Pakistan income tax calculator.
///
/// Computes progressive slab tax, the professional-firm cap and the pension
/// surcharge for one taxpayer or a CSV of clients.
#[derive(Debug, Parser)]
#[command(name = "pktax", version)]
pub struct Cli {
    /// Config file (default: ./pktax.toml when present).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level or filter directive. RUST_LOG takes precedence.
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Append log output to this file.
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Slab table CSV to use instead of the bundled tables.
    #[arg(long, global = true)]
    pub slab_tables: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Flags win over the config file.
    pub fn apply_overrides(
        &self,
        config: &mut AppConfig,
    ) {
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
        if let Some(path) = &self.log_file {
            config.log_file = Some(path.clone());
        }
        if let Some(path) = &self.slab_tables {
            config.slab_tables = Some(path.clone());
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compute tax for one profile given on the command line
    Compute(ComputeCommand),
    /// Show a registered slab table
    Slabs(SlabsCommand),
    /// Compute tax for every client in a CSV file
    Batch(BatchCommand),
}

impl Command {
    pub fn exec(
        &self,
        session: &Session,
        out: &mut impl io::Write,
    ) -> anyhow::Result<()> {
        match self {
            Self::Compute(cmd) => cmd.exec(session, out),
            Self::Slabs(cmd) => cmd.exec(session, out),
            Self::Batch(cmd) => cmd.exec(session, out),
        }
    }
}

/// Category names accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CategoryArg {
    Individual,
    Salaried,
    Aop,
    /// Business owners; taxed as non-salaried individuals.
    Business,
}

impl From<CategoryArg> for TaxpayerType {
    fn from(arg: CategoryArg) -> Self {
        match arg {
            CategoryArg::Individual | CategoryArg::Business => TaxpayerType::Individual,
            CategoryArg::Salaried => TaxpayerType::Salaried,
            CategoryArg::Aop => TaxpayerType::AssociationOfPersons,
        }
    }
}

/// Resolved configuration plus the slab tables every command reads.
#[derive(Debug)]
pub struct Session {
    pub config: AppConfig,
    pub registry: Cow<'static, SlabTableRegistry>,
}

impl Session {
    /// Loads the configured slab tables, or the bundled ones.
    pub fn new(config: AppConfig) -> anyhow::Result<Self> {
        let registry = match &config.slab_tables {
            Some(path) => {
                info!(path = %path.display(), "loading slab tables");
                Cow::Owned(registry_from_path(path).with_context(|| {
                    format!("cannot load slab tables from '{}'", path.display())
                })?)
            }
            None => {
                debug!("using bundled slab tables");
                Cow::Borrowed(bundled_registry().context("bundled slab tables are invalid")?)
            }
        };
        Ok(Self { config, registry })
    }

    pub fn engine(&self) -> TaxEngine<'_> {
        TaxEngine::new(&self.registry).with_pension_config(self.config.pension)
    }
}
