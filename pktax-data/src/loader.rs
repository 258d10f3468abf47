use std::collections::BTreeMap;
use std::io::Read;

use pktax_core::{
    ConfigurationError, Residency, SlabDefinition, SlabTableKey, SlabTableRegistry, TaxpayerType,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

/// Errors that can occur when loading slab table data.
#[derive(Debug, Error)]
pub enum SlabTableLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("unknown taxpayer category '{category}' on row {row}")]
    UnknownCategory { category: String, row: usize },

    #[error("unknown residency '{residency}' on row {row}")]
    UnknownResidency { residency: String, row: usize },

    #[error("invalid slab table: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("cannot read slab tables from {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl From<csv::Error> for SlabTableLoaderError {
    fn from(err: csv::Error) -> Self {
        SlabTableLoaderError::CsvParse(err.to_string())
    }
}

/// A single record from a slab table CSV file.
///
/// - `tax_year`: the tax year (e.g., 2025)
/// - `category`: `individual`, `salaried` or `aop`
/// - `residency`: `resident` or `non_resident`
/// - `lower_bound`: inclusive lower bound of the slab
/// - `upper_bound`: exclusive upper bound (empty for the top slab)
/// - `rate`: marginal rate as a decimal (e.g., 0.15 for 15%)
/// - `label`: human-readable slab reference
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SlabTableRecord {
    pub tax_year: i32,
    pub category: String,
    pub residency: String,
    pub lower_bound: Decimal,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub upper_bound: Option<Decimal>,
    pub rate: Decimal,
    pub label: String,
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Loader for slab table data from CSV files.
///
/// Parsing and registration are separate steps so a file can be inspected
/// before it is trusted.
pub struct SlabTableLoader;

impl SlabTableLoader {
    /// Parse slab records from a CSV reader.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<SlabTableRecord>, SlabTableLoaderError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: SlabTableRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Group records into tables and register each one.
    ///
    /// Records are grouped by (category, residency, tax year) and ordered by
    /// lower bound within each group, so row order in the file does not
    /// matter. Every table goes through registry validation.
    ///
    /// Returns the number of tables registered.
    pub fn load(
        registry: &mut SlabTableRegistry,
        records: &[SlabTableRecord],
    ) -> Result<usize, SlabTableLoaderError> {
        let mut groups: BTreeMap<SlabTableKey, Vec<&SlabTableRecord>> = BTreeMap::new();

        for (index, record) in records.iter().enumerate() {
            // 1-based data row; the header is row 0.
            let row = index + 1;
            let taxpayer_type = TaxpayerType::parse(&record.category).ok_or_else(|| {
                SlabTableLoaderError::UnknownCategory {
                    category: record.category.clone(),
                    row,
                }
            })?;
            let residency = Residency::parse(&record.residency).ok_or_else(|| {
                SlabTableLoaderError::UnknownResidency {
                    residency: record.residency.clone(),
                    row,
                }
            })?;

            groups
                .entry(SlabTableKey::new(taxpayer_type, residency, record.tax_year))
                .or_default()
                .push(record);
        }

        let mut registered = 0;
        for (key, mut group) in groups {
            group.sort_by(|a, b| a.lower_bound.cmp(&b.lower_bound));
            let slabs = group
                .into_iter()
                .map(|r| SlabDefinition::new(r.lower_bound, r.upper_bound, r.rate, r.label.clone()))
                .collect();

            registry.register(key, slabs)?;
            registered += 1;
        }

        info!(tables = registered, "loaded slab tables");
        Ok(registered)
    }

    /// Parse `reader` and return a fresh registry holding its tables.
    pub fn registry_from_reader<R: Read>(
        reader: R
    ) -> Result<SlabTableRegistry, SlabTableLoaderError> {
        let records = Self::parse(reader)?;
        let mut registry = SlabTableRegistry::new();
        Self::load(&mut registry, &records)?;
        Ok(registry)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    const TEST_CSV: &str = r#"tax_year,category,residency,lower_bound,upper_bound,rate,label
2025,salaried,resident,0,600000,0,"Up to 600,000"
2025,salaried,resident,600000,1200000,0.05,"600,001 - 1,200,000"
2025,salaried,resident,1200000,2200000,0.15,"1,200,001 - 2,200,000"
2025,salaried,resident,2200000,3200000,0.25,"2,200,001 - 3,200,000"
2025,salaried,resident,3200000,4100000,0.30,"3,200,001 - 4,100,000"
2025,salaried,resident,4100000,,0.35,"Above 4,100,000"
2025,aop,non_resident,0,600000,0,"Up to 600,000"
2025,aop,non_resident,600000,,0.15,"Above 600,000"
"#;

    #[test]
    fn test_parse_csv_single_slab() {
        let csv = "tax_year,category,residency,lower_bound,upper_bound,rate,label\n2025,aop,resident,0,600000,0,\"Up to 600,000\"";

        let records = SlabTableLoader::parse(csv.as_bytes()).expect("Failed to parse CSV");

        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0],
            SlabTableRecord {
                tax_year: 2025,
                category: "aop".to_string(),
                residency: "resident".to_string(),
                lower_bound: dec!(0),
                upper_bound: Some(dec!(600000)),
                rate: dec!(0),
                label: "Up to 600,000".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_csv_unbounded_top_slab() {
        let records = SlabTableLoader::parse(TEST_CSV.as_bytes()).unwrap();

        assert_eq!(records[5].upper_bound, None);
        assert_eq!(records[5].rate, dec!(0.35));
        assert_eq!(records[5].label, "Above 4,100,000");
    }

    #[test]
    fn test_parse_csv_rejects_bad_decimal() {
        let csv = "tax_year,category,residency,lower_bound,upper_bound,rate,label\n2025,aop,resident,0,abc,0,x";

        let result = SlabTableLoader::parse(csv.as_bytes());

        assert!(matches!(result, Err(SlabTableLoaderError::CsvParse(_))));
    }

    #[test]
    fn test_load_groups_by_key() {
        let records = SlabTableLoader::parse(TEST_CSV.as_bytes()).unwrap();
        let mut registry = SlabTableRegistry::new();

        let registered = SlabTableLoader::load(&mut registry, &records).unwrap();

        assert_eq!(registered, 2);
        let salaried = registry
            .slabs_for(TaxpayerType::Salaried, Residency::Resident, 2025)
            .unwrap();
        assert_eq!(salaried.len(), 6);
        let aop = registry
            .slabs_for(TaxpayerType::AssociationOfPersons, Residency::NonResident, 2025)
            .unwrap();
        assert_eq!(aop.len(), 2);
    }

    #[test]
    fn test_load_ignores_row_order() {
        let csv = r#"tax_year,category,residency,lower_bound,upper_bound,rate,label
2025,aop,resident,600000,,0.15,"Above 600,000"
2025,aop,resident,0,600000,0,"Up to 600,000"
"#;

        let registry = SlabTableLoader::registry_from_reader(csv.as_bytes()).unwrap();

        let slabs = registry
            .slabs_for(TaxpayerType::AssociationOfPersons, Residency::Resident, 2025)
            .unwrap();
        assert_eq!(slabs[0].label, "Up to 600,000");
        assert_eq!(slabs[1].label, "Above 600,000");
    }

    #[test]
    fn test_load_unknown_category_reports_row() {
        let csv = "tax_year,category,residency,lower_bound,upper_bound,rate,label\n2025,aop,resident,0,,0,x\n2025,company,resident,0,,0.29,x";
        let records = SlabTableLoader::parse(csv.as_bytes()).unwrap();

        let result = SlabTableLoader::load(&mut SlabTableRegistry::new(), &records);

        assert!(matches!(
            result,
            Err(SlabTableLoaderError::UnknownCategory { ref category, row: 2 }) if category == "company"
        ));
    }

    #[test]
    fn test_load_unknown_residency() {
        let csv = "tax_year,category,residency,lower_bound,upper_bound,rate,label\n2025,aop,tourist,0,,0,x";
        let records = SlabTableLoader::parse(csv.as_bytes()).unwrap();

        let result = SlabTableLoader::load(&mut SlabTableRegistry::new(), &records);

        assert!(matches!(
            result,
            Err(SlabTableLoaderError::UnknownResidency { row: 1, .. })
        ));
    }

    #[test]
    fn test_load_rejects_gap() {
        let csv = r#"tax_year,category,residency,lower_bound,upper_bound,rate,label
2025,aop,resident,0,600000,0,"Up to 600,000"
2025,aop,resident,700000,,0.15,"Above 700,000"
"#;

        let result = SlabTableLoader::registry_from_reader(csv.as_bytes());

        assert!(matches!(
            result,
            Err(SlabTableLoaderError::Configuration(
                ConfigurationError::NonContiguousSlabs { index: 1, .. }
            ))
        ));
    }

    #[test]
    fn test_load_rejects_duplicate_table() {
        let records = SlabTableLoader::parse(TEST_CSV.as_bytes()).unwrap();
        let mut registry = SlabTableRegistry::new();
        SlabTableLoader::load(&mut registry, &records).unwrap();

        let result = SlabTableLoader::load(&mut registry, &records);

        assert!(matches!(
            result,
            Err(SlabTableLoaderError::Configuration(
                ConfigurationError::DuplicateSlabTable(_)
            ))
        ));
    }
}
