//! Fixed cell coordinates of the `Tax_Calc` worksheet.
//!
//! The exported workbook and the on-screen guidance both hard-code these
//! addresses, so they are part of the engine's contract: an exporter assigns
//! [`TaxCalcSheet::rows`] straight into the sheet without recomputing anything.
//!
//! | Cell   | Value                          |
//! |--------|--------------------------------|
//! | D8     | Salary income                  |
//! | D11    | Business income                |
//! | D14    | Other taxable income           |
//! | D16    | Pension income                 |
//! | D18    | Allowable deductions           |
//! | D24    | Gross income                   |
//! | D26    | Net taxable income             |
//! | D32    | Core tax payable               |

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{IncomeProfile, TaxResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaxCalcCell {
    SalaryIncome,
    BusinessIncome,
    OtherTaxableIncome,
    PensionIncome,
    Deductions,
    GrossIncome,
    TaxableIncome,
    TotalTax,
}

impl TaxCalcCell {
    pub const SHEET: &'static str = "Tax_Calc";

    /// Sheet order, top to bottom.
    pub const ALL: [TaxCalcCell; 8] = [
        Self::SalaryIncome,
        Self::BusinessIncome,
        Self::OtherTaxableIncome,
        Self::PensionIncome,
        Self::Deductions,
        Self::GrossIncome,
        Self::TaxableIncome,
        Self::TotalTax,
    ];

    /// A1-style address within the sheet.
    pub fn address(&self) -> &'static str {
        match self {
            Self::SalaryIncome => "D8",
            Self::BusinessIncome => "D11",
            Self::OtherTaxableIncome => "D14",
            Self::PensionIncome => "D16",
            Self::Deductions => "D18",
            Self::GrossIncome => "D24",
            Self::TaxableIncome => "D26",
            Self::TotalTax => "D32",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::SalaryIncome => "Salary Income",
            Self::BusinessIncome => "Business Income",
            Self::OtherTaxableIncome => "Other Taxable Income",
            Self::PensionIncome => "Pension Income",
            Self::Deductions => "Allowable Deductions",
            Self::GrossIncome => "Gross Income",
            Self::TaxableIncome => "Net Taxable Income",
            Self::TotalTax => "Core Tax Payable",
        }
    }

    /// Sheet-qualified reference, e.g. `Tax_Calc!D26`.
    pub fn reference(&self) -> String {
        format!("{}!{}", Self::SHEET, self.address())
    }

    /// Reads the value for this cell. Input cells come from the profile,
    /// computed cells from the result.
    pub fn value(
        &self,
        profile: &IncomeProfile,
        result: &TaxResult,
    ) -> Decimal {
        match self {
            Self::SalaryIncome => profile.salary_income,
            Self::BusinessIncome => profile.business_income,
            Self::OtherTaxableIncome => profile.other_taxable_income,
            Self::PensionIncome => profile.pension_income,
            Self::Deductions => profile.deductions,
            Self::GrossIncome => result.gross_income,
            Self::TaxableIncome => result.taxable_income,
            Self::TotalTax => result.total_tax,
        }
    }
}

impl fmt::Display for TaxCalcCell {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{}!{}", Self::SHEET, self.address())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxCalcRow {
    pub cell: TaxCalcCell,
    pub amount: Decimal,
}

/// Every `Tax_Calc` cell paired with its value for one computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxCalcSheet {
    pub rows: Vec<TaxCalcRow>,
}

impl TaxCalcSheet {
    pub fn new(
        profile: &IncomeProfile,
        result: &TaxResult,
    ) -> Self {
        let rows = TaxCalcCell::ALL
            .iter()
            .map(|&cell| TaxCalcRow {
                cell,
                amount: cell.value(profile, result),
            })
            .collect();
        Self { rows }
    }

    pub fn get(
        &self,
        cell: TaxCalcCell,
    ) -> Option<Decimal> {
        self.rows.iter().find(|r| r.cell == cell).map(|r| r.amount)
    }
}
