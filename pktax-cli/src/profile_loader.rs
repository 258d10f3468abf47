//! CSV loader for client income profiles.
//!
//! ## CSV Format
//!
//! One row per client workspace. Headers are matched by name, so column
//! order does not matter.
//!
//! | Column | Required | Notes |
//! |------------------------|----------|--------------------------------------------------------------|
//! | `client` | yes | Free-text name, echoed in reports |
//! | `category` | yes | `Individual`, `Salaried`, `Association of Persons`, `Business`, or a code (`individual`, `salaried`, `aop`) |
//! | `residency` | no | `Resident` (default) or `Non-Resident` |
//! | `professional_firm` | no | `yes`/`no`; only meaningful for AOPs |
//! | `tax_year` | no | Falls back to the configured year |
//! | `salary_income` | no | Amounts accept comma thousands separators; empty is 0 |
//! | `business_income` | no | |
//! | `other_taxable_income` | no | |
//! | `deductions` | no | |
//! | `pension_income` | no | |
//!
//! ### Example
//!
//! ```csv
//! client,category,residency,professional_firm,tax_year,salary_income,business_income,other_taxable_income,deductions,pension_income
//! Khan Traders,Business,Resident,no,2025,0,"8,500,000","950,000","750,000",0
//! ```
//!
//! A structurally broken file fails as a whole. A row whose values cannot be
//! turned into a profile is kept, with its own error, so one bad client does
//! not hide the others.

use std::path::Path;

use anyhow::Context;
use pktax_core::{IncomeProfile, Residency, TaxpayerType};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::utils::{ParseDecimalError, ParseFlagError, parse_decimal, parse_flag};

#[derive(Debug, Deserialize)]
struct CsvRow {
    client: String,
    category: String,
    #[serde(default)]
    residency: String,
    #[serde(default)]
    professional_firm: String,
    tax_year: Option<i32>,
    #[serde(default)]
    salary_income: String,
    #[serde(default)]
    business_income: String,
    #[serde(default)]
    other_taxable_income: String,
    #[serde(default)]
    deductions: String,
    #[serde(default)]
    pension_income: String,
}

/// The CSV itself could not be read.
#[derive(Debug, thiserror::Error)]
pub enum CsvLoadError {
    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),
}

/// A single row could not be turned into an [`IncomeProfile`].
#[derive(Debug, thiserror::Error)]
pub enum ProfileRowError {
    #[error("unrecognised category '{0}'")]
    UnknownCategory(String),

    #[error("unrecognised residency '{0}'")]
    UnknownResidency(String),

    #[error("professional_firm: {0}")]
    ProfessionalFirm(#[from] ParseFlagError),

    #[error("{field}: {source}")]
    Amount {
        field: &'static str,
        #[source]
        source: ParseDecimalError,
    },
}

/// One client row. `row` is 1-based (header = row 0).
#[derive(Debug)]
pub struct ClientProfile {
    pub row: usize,
    pub client: String,
    pub profile: Result<IncomeProfile, ProfileRowError>,
}

/// Accepts "Resident"/"Non-Resident" as written in client sheets, and the
/// data-file codes.
pub fn parse_residency(s: &str) -> Option<Residency> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Some(Residency::Resident);
    }
    Residency::parse(trimmed)
}

fn amount(
    field: &'static str,
    value: &str,
) -> Result<Decimal, ProfileRowError> {
    parse_decimal(value).map_err(|source| ProfileRowError::Amount { field, source })
}

fn convert_row(
    row: CsvRow,
    default_tax_year: i32,
) -> Result<IncomeProfile, ProfileRowError> {
    let taxpayer_type = TaxpayerType::from_category_label(&row.category)
        .ok_or_else(|| ProfileRowError::UnknownCategory(row.category.clone()))?;
    let residency = parse_residency(&row.residency)
        .ok_or_else(|| ProfileRowError::UnknownResidency(row.residency.clone()))?;

    Ok(IncomeProfile {
        tax_year: row.tax_year.unwrap_or(default_tax_year),
        taxpayer_type,
        resident: residency == Residency::Resident,
        professional_firm: parse_flag(&row.professional_firm)?,
        salary_income: amount("salary_income", &row.salary_income)?,
        business_income: amount("business_income", &row.business_income)?,
        other_taxable_income: amount("other_taxable_income", &row.other_taxable_income)?,
        deductions: amount("deductions", &row.deductions)?,
        pension_income: amount("pension_income", &row.pension_income)?,
    })
}

/// Parse client CSV text. Rows are returned in file order.
///
/// # Errors
///
/// [`CsvLoadError::Parse`] if the CSV is structurally invalid or a required
/// column is missing. Per-row value problems are reported in
/// [`ClientProfile::profile`] instead.
pub fn load_from_str(
    input: &str,
    default_tax_year: i32,
) -> Result<Vec<ClientProfile>, CsvLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(false)
        .from_reader(input.as_bytes());

    reader
        .deserialize::<CsvRow>()
        .enumerate()
        .map(|(idx, result)| {
            let row = result?;
            Ok(ClientProfile {
                row: idx + 1,
                client: row.client.clone(),
                profile: convert_row(row, default_tax_year),
            })
        })
        .collect()
}

/// Read a file from disk and delegate to [`load_from_str`].
pub fn load_from_file(
    path: &Path,
    default_tax_year: i32,
) -> anyhow::Result<Vec<ClientProfile>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read client file '{}'", path.display()))?;
    load_from_str(&contents, default_tax_year)
        .with_context(|| format!("in client file '{}'", path.display()))
}
