//! Text, JSON and CSV renderings of computed results.

use std::io;
use std::path::Path;

use anyhow::Context;
use clap::ValueEnum;
use pktax_core::{
    IncomeProfile, Residency, SlabAllocation, SlabDefinition, SlabTableKey, TaxCalcSheet,
    TaxSnapshot,
};
use rust_decimal::Decimal;
use serde::Serialize;
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Rows},
};

use crate::utils::{format_pkr, format_rate};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// Header row of the `Tax_Calc` export.
pub const EXPORT_HEADER: [&str; 3] = ["Description", "Reference", "Amount (PKR)"];

/// JSON shape of one computed profile.
#[derive(Debug, Serialize)]
pub struct SnapshotReport<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client: Option<&'a str>,
    pub profile: &'a IncomeProfile,
    #[serde(flatten)]
    pub snapshot: &'a TaxSnapshot,
    pub tax_calc: TaxCalcSheet,
}

impl<'a> SnapshotReport<'a> {
    pub fn new(
        client: Option<&'a str>,
        profile: &'a IncomeProfile,
        snapshot: &'a TaxSnapshot,
    ) -> Self {
        Self {
            client,
            profile,
            snapshot,
            tax_calc: TaxCalcSheet::new(profile, &snapshot.tax),
        }
    }
}

/// JSON shape of one batch row: either a report or the reason it failed.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum BatchEntry<'a> {
    Computed {
        row: usize,
        #[serde(flatten)]
        report: SnapshotReport<'a>,
    },
    Failed {
        row: usize,
        client: &'a str,
        error: String,
    },
}

/// "Exempt" for a zero surcharge, otherwise the amount.
pub fn pension_label(snapshot: &TaxSnapshot) -> String {
    if snapshot.pension.is_exempt() {
        "Exempt".to_string()
    } else {
        format_pkr(snapshot.pension.total_tax)
    }
}

fn residency_label(residency: Residency) -> &'static str {
    match residency {
        Residency::Resident => "Resident",
        Residency::NonResident => "Non-Resident",
    }
}

/// Label and value line of a summary table.
#[derive(Debug, Clone, Tabled)]
struct SummaryRow {
    #[tabled(rename = "Item")]
    item: &'static str,
    #[tabled(rename = "Value")]
    value: String,
}

impl SummaryRow {
    fn new(
        item: &'static str,
        value: String,
    ) -> Self {
        Self { item, value }
    }
}

/// One slab's share of a computed result.
#[derive(Debug, Clone, Tabled)]
pub struct BreakdownRow {
    #[tabled(rename = "Slab")]
    pub slab: String,
    #[tabled(rename = "Taxable portion")]
    pub taxable_portion: String,
    #[tabled(rename = "Rate")]
    pub rate: String,
    #[tabled(rename = "Tax")]
    pub tax: String,
}

impl From<&SlabAllocation> for BreakdownRow {
    fn from(allocation: &SlabAllocation) -> Self {
        Self {
            slab: allocation.slab_label.clone(),
            taxable_portion: format_pkr(allocation.taxable_portion),
            rate: format_rate(allocation.rate),
            tax: format_pkr(allocation.computed_tax),
        }
    }
}

/// One band of a registered slab table.
#[derive(Debug, Clone, Tabled)]
pub struct SlabRow {
    #[tabled(rename = "Slab")]
    pub slab: String,
    #[tabled(rename = "From")]
    pub from: String,
    #[tabled(rename = "To")]
    pub to: String,
    #[tabled(rename = "Rate")]
    pub rate: String,
}

impl From<&SlabDefinition> for SlabRow {
    fn from(slab: &SlabDefinition) -> Self {
        Self {
            slab: slab.label.clone(),
            from: format_pkr(slab.lower_bound),
            to: slab.upper_bound.map_or_else(|| "-".to_string(), format_pkr),
            rate: format_rate(slab.marginal_rate),
        }
    }
}

/// Summary of one batch row. Failed rows leave the amounts blank and carry
/// the reason in the note.
#[derive(Debug, Clone, Tabled)]
pub struct BatchRow {
    #[tabled(rename = "Row")]
    pub row: usize,
    #[tabled(rename = "Client")]
    pub client: String,
    #[tabled(rename = "Category")]
    pub category: String,
    #[tabled(rename = "Taxable income")]
    pub taxable_income: String,
    #[tabled(rename = "Tax")]
    pub tax: String,
    #[tabled(rename = "Rate")]
    pub rate: String,
    #[tabled(rename = "Pension tax")]
    pub pension_tax: String,
    #[tabled(rename = "Note")]
    pub note: String,
}

impl From<&BatchEntry<'_>> for BatchRow {
    fn from(entry: &BatchEntry<'_>) -> Self {
        match entry {
            BatchEntry::Computed { row, report } => {
                let tax = &report.snapshot.tax;
                Self {
                    row: *row,
                    client: report.client.unwrap_or_default().to_string(),
                    category: report.profile.taxpayer_type.display_name().to_string(),
                    taxable_income: format_pkr(tax.taxable_income),
                    tax: format_pkr(tax.total_tax),
                    rate: format_rate(tax.average_rate),
                    pension_tax: pension_label(report.snapshot),
                    note: if tax.cap_applied {
                        "cap applied".to_string()
                    } else {
                        String::new()
                    },
                }
            }
            BatchEntry::Failed { row, client, error } => Self {
                row: *row,
                client: client.to_string(),
                category: String::new(),
                taxable_income: String::new(),
                tax: String::new(),
                rate: String::new(),
                pension_tax: String::new(),
                note: format!("error: {error}"),
            },
        }
    }
}

fn render_table<T: Tabled>(rows: impl IntoIterator<Item = T>) -> String {
    Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Rows::new(1..)).with(Alignment::right()))
        .to_string()
}

/// Full breakdown of one profile: income, slab bands and totals.
pub fn render_snapshot(
    profile: &IncomeProfile,
    snapshot: &TaxSnapshot,
) -> String {
    let tax = &snapshot.tax;
    let firm = if profile.professional_firm {
        " | Professional firm"
    } else {
        ""
    };
    let mut sections = vec![format!(
        "TAX YEAR {} | {} | {}{firm}",
        profile.tax_year,
        profile.taxpayer_type.display_name(),
        residency_label(profile.residency()),
    )];

    sections.push(render_table([
        SummaryRow::new("Gross income", format_pkr(tax.gross_income)),
        SummaryRow::new("Deductions", format_pkr(profile.deductions)),
        SummaryRow::new("Taxable income", format_pkr(tax.taxable_income)),
    ]));

    if tax.breakdown.is_empty() {
        sections.push("No taxable income.".to_string());
    } else {
        sections.push(render_table(tax.breakdown.iter().map(BreakdownRow::from)));
    }

    sections.push(render_table([
        SummaryRow::new("Total tax", format_pkr(tax.total_tax)),
        SummaryRow::new("Average rate", format_rate(tax.average_rate)),
        SummaryRow::new("Pension tax", pension_label(snapshot)),
    ]));
    if tax.cap_applied {
        sections.push("Professional-firm cap applied.".to_string());
    }

    sections.join("\n\n") + "\n"
}

/// One registered slab table.
pub fn render_slabs(
    key: &SlabTableKey,
    slabs: &[SlabDefinition],
) -> String {
    format!(
        "SLABS TY{} | {} | {}\n\n{}\n",
        key.tax_year,
        key.taxpayer_type.display_name(),
        residency_label(key.residency),
        render_table(slabs.iter().map(SlabRow::from)),
    )
}

/// Summary table of a batch, failures included.
pub fn render_batch(entries: &[BatchEntry<'_>]) -> String {
    render_table(entries.iter().map(BatchRow::from))
}

/// Writes the `Tax_Calc` rows as CSV.
pub fn write_tax_calc_csv<W: io::Write>(
    writer: W,
    sheet: &TaxCalcSheet,
) -> csv::Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(EXPORT_HEADER)?;
    for row in &sheet.rows {
        csv_writer.write_record([
            row.cell.description().to_string(),
            row.cell.reference(),
            export_amount(row.amount),
        ])?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn export_tax_calc(
    path: &Path,
    sheet: &TaxCalcSheet,
) -> anyhow::Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("cannot create export file '{}'", path.display()))?;
    write_tax_calc_csv(file, sheet)
        .with_context(|| format!("cannot write export file '{}'", path.display()))?;
    tracing::info!(path = %path.display(), rows = sheet.rows.len(), "exported Tax_Calc rows");
    Ok(())
}

fn export_amount(amount: Decimal) -> String {
    format!("{amount:.2}")
}
