//! Compute command - one profile from flags

use std::io;
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use pktax_core::{IncomeProfile, TaxCalcSheet};
use rust_decimal::Decimal;
use tracing::debug;

use crate::cmd::{CategoryArg, Session};
use crate::report::{OutputFormat, SnapshotReport, export_tax_calc, render_snapshot};
use crate::utils::parse_decimal;

#[derive(Args, Debug)]
pub struct ComputeCommand {
    /// Taxpayer category
    #[arg(short, long, value_enum, default_value_t = CategoryArg::Individual)]
    category: CategoryArg,

    /// Tax year (defaults to the configured year)
    #[arg(short, long)]
    year: Option<i32>,

    /// Use the non-resident schedule
    #[arg(long)]
    non_resident: bool,

    /// AOP is a professional firm (caps tax at 40% of taxable income)
    #[arg(long)]
    professional_firm: bool,

    /// Salary income, e.g. 2,400,000
    #[arg(long, value_parser = parse_decimal, default_value = "0", allow_hyphen_values = true)]
    salary: Decimal,

    /// Business income
    #[arg(long, value_parser = parse_decimal, default_value = "0", allow_hyphen_values = true)]
    business: Decimal,

    /// Other taxable income
    #[arg(long, value_parser = parse_decimal, default_value = "0", allow_hyphen_values = true)]
    other: Decimal,

    /// Allowable deductions
    #[arg(long, value_parser = parse_decimal, default_value = "0", allow_hyphen_values = true)]
    deductions: Decimal,

    /// Pension received (taxed only by the pension surcharge)
    #[arg(long, value_parser = parse_decimal, default_value = "0", allow_hyphen_values = true)]
    pension: Decimal,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// Write the Tax_Calc cells to this CSV file
    #[arg(long)]
    export: Option<PathBuf>,
}

impl ComputeCommand {
    pub fn profile(
        &self,
        default_tax_year: i32,
    ) -> IncomeProfile {
        IncomeProfile {
            resident: !self.non_resident,
            professional_firm: self.professional_firm,
            salary_income: self.salary,
            business_income: self.business,
            other_taxable_income: self.other,
            deductions: self.deductions,
            pension_income: self.pension,
            ..IncomeProfile::new(self.year.unwrap_or(default_tax_year), self.category.into())
        }
    }

    pub fn exec(
        &self,
        session: &Session,
        out: &mut impl io::Write,
    ) -> anyhow::Result<()> {
        let profile = self.profile(session.config.tax_year);
        debug!(?profile, "computing");

        let snapshot = session
            .engine()
            .snapshot(&profile)
            .context("cannot compute tax")?;

        if let Some(path) = &self.export {
            export_tax_calc(path, &TaxCalcSheet::new(&profile, &snapshot.tax))?;
        }

        match self.format {
            OutputFormat::Table => write!(out, "{}", render_snapshot(&profile, &snapshot))?,
            OutputFormat::Json => {
                let report = SnapshotReport::new(None, &profile, &snapshot);
                serde_json::to_writer_pretty(&mut *out, &report)?;
                writeln!(out)?;
            }
        }
        Ok(())
    }
}
