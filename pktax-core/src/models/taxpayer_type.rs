use serde::{Deserialize, Serialize};

/// Taxpayer categories that carry their own slab schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TaxpayerType {
    Individual,
    Salaried,
    AssociationOfPersons,
}

impl TaxpayerType {
    pub const ALL: [TaxpayerType; 3] = [
        Self::Individual,
        Self::Salaried,
        Self::AssociationOfPersons,
    ];

    /// Short code used in slab table data files.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Individual => "individual",
            Self::Salaried => "salaried",
            Self::AssociationOfPersons => "aop",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "individual" => Some(Self::Individual),
            "salaried" => Some(Self::Salaried),
            "aop" => Some(Self::AssociationOfPersons),
            _ => None,
        }
    }

    /// Maps a client-record category label onto the closed set.
    ///
    /// Business owners are taxed on the non-salaried individual schedule, so
    /// the `"Business"` label folds into [`TaxpayerType::Individual`].
    pub fn from_category_label(label: &str) -> Option<Self> {
        match label.trim() {
            "Individual" | "Business" => Some(Self::Individual),
            "Salaried" => Some(Self::Salaried),
            "Association of Persons" | "AOP" => Some(Self::AssociationOfPersons),
            other => Self::parse(other),
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Individual => "Individual",
            Self::Salaried => "Salaried",
            Self::AssociationOfPersons => "Association of Persons",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Residency {
    Resident,
    NonResident,
}

impl Residency {
    pub const ALL: [Residency; 2] = [Self::Resident, Self::NonResident];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Resident => "resident",
            Self::NonResident => "non_resident",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "resident" => Some(Self::Resident),
            "non_resident" | "nonresident" => Some(Self::NonResident),
            _ => None,
        }
    }
}

impl From<bool> for Residency {
    fn from(resident: bool) -> Self {
        if resident {
            Self::Resident
        } else {
            Self::NonResident
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn taxpayer_type_codes_round_trip() {
        for taxpayer_type in TaxpayerType::ALL {
            assert_eq!(TaxpayerType::parse(taxpayer_type.as_str()), Some(taxpayer_type));
        }
    }

    #[test]
    fn category_labels_map_into_closed_set() {
        assert_eq!(
            TaxpayerType::from_category_label("Association of Persons"),
            Some(TaxpayerType::AssociationOfPersons)
        );
        assert_eq!(
            TaxpayerType::from_category_label("Business"),
            Some(TaxpayerType::Individual)
        );
        assert_eq!(
            TaxpayerType::from_category_label("Salaried"),
            Some(TaxpayerType::Salaried)
        );
        assert_eq!(TaxpayerType::from_category_label("Company"), None);
    }

    #[test]
    fn residency_parses_both_spellings() {
        assert_eq!(Residency::parse("non-resident"), Some(Residency::NonResident));
        assert_eq!(Residency::parse("Non_Resident"), Some(Residency::NonResident));
        assert_eq!(Residency::parse("resident"), Some(Residency::Resident));
        assert_eq!(Residency::parse("alien"), None);
    }

    #[test]
    fn residency_from_flag() {
        assert_eq!(Residency::from(true), Residency::Resident);
        assert_eq!(Residency::from(false), Residency::NonResident);
    }
}
