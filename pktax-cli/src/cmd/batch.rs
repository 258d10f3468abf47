//! Batch command - one snapshot per client row

use std::io;
use std::path::PathBuf;

use clap::Args;
use pktax_core::{IncomeProfile, TaxSnapshot};
use tracing::{info, warn};

use crate::cmd::Session;
use crate::profile_loader::{self, ClientProfile};
use crate::report::{BatchEntry, OutputFormat, SnapshotReport, render_batch};

#[derive(Args, Debug)]
pub struct BatchCommand {
    /// Client CSV file
    #[arg(short = 'i', long)]
    file: PathBuf,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
}

/// Computes every row. A row that cannot be parsed or computed keeps its
/// error message in place of a result.
pub fn compute_rows<'a>(
    session: &Session,
    clients: &'a [ClientProfile],
) -> Vec<Result<(&'a IncomeProfile, TaxSnapshot), String>> {
    let engine = session.engine();
    clients
        .iter()
        .map(|client| {
            let profile = client.profile.as_ref().map_err(|e| e.to_string())?;
            let snapshot = engine.snapshot(profile).map_err(|e| e.to_string())?;
            Ok((profile, snapshot))
        })
        .inspect(|outcome| {
            if let Err(error) = outcome {
                warn!(%error, "client row failed");
            }
        })
        .collect()
}

impl BatchCommand {
    pub fn exec(
        &self,
        session: &Session,
        out: &mut impl io::Write,
    ) -> anyhow::Result<()> {
        let clients = profile_loader::load_from_file(&self.file, session.config.tax_year)?;
        let outcomes = compute_rows(session, &clients);

        let entries: Vec<BatchEntry<'_>> = clients
            .iter()
            .zip(&outcomes)
            .map(|(client, outcome)| match outcome {
                Ok((profile, snapshot)) => BatchEntry::Computed {
                    row: client.row,
                    report: SnapshotReport::new(Some(client.client.as_str()), profile, snapshot),
                },
                Err(error) => BatchEntry::Failed {
                    row: client.row,
                    client: &client.client,
                    error: error.clone(),
                },
            })
            .collect();

        let failed = outcomes.iter().filter(|o| o.is_err()).count();
        info!(rows = entries.len(), failed, "batch computed");

        match self.format {
            OutputFormat::Table => {
                writeln!(out, "{}", render_batch(&entries))?;
                writeln!(out)?;
                writeln!(
                    out,
                    "{} computed, {} failed",
                    entries.len() - failed,
                    failed
                )?;
            }
            OutputFormat::Json => {
                serde_json::to_writer_pretty(&mut *out, &entries)?;
                writeln!(out)?;
            }
        }
        Ok(())
    }
}
