//! Property tests over the bundled tables.

use proptest::prelude::*;
use rust_decimal::Decimal;

use pktax_core::calculations::PROFESSIONAL_FIRM_CAP_RATE;
use pktax_core::{IncomeProfile, TaxEngine, TaxResult, TaxpayerType};
use pktax_data::bundled_registry;

fn taxpayer_type() -> impl Strategy<Value = TaxpayerType> {
    prop_oneof![
        Just(TaxpayerType::Individual),
        Just(TaxpayerType::Salaried),
        Just(TaxpayerType::AssociationOfPersons),
    ]
}

/// Whole rupees and paisa up to PKR 200 million.
fn amount() -> impl Strategy<Value = Decimal> {
    (0u64..20_000_000_000).prop_map(|paisa| Decimal::new(paisa as i64, 2))
}

prop_compose! {
    fn profile()(
        tax_year in prop_oneof![Just(2024), Just(2025)],
        taxpayer_type in taxpayer_type(),
        resident in any::<bool>(),
        professional_firm in any::<bool>(),
        salary_income in amount(),
        business_income in amount(),
        other_taxable_income in amount(),
        deductions in amount(),
    ) -> IncomeProfile {
        IncomeProfile {
            resident,
            professional_firm,
            salary_income,
            business_income,
            other_taxable_income,
            deductions,
            ..IncomeProfile::new(tax_year, taxpayer_type)
        }
    }
}

fn compute(profile: &IncomeProfile) -> TaxResult {
    TaxEngine::new(bundled_registry().unwrap())
        .compute_composite_tax(profile)
        .unwrap()
}

proptest! {
    #[test]
    fn breakdown_sums_to_totals(profile in profile()) {
        let result = compute(&profile);

        prop_assert_eq!(result.allocated_tax(), result.total_tax);
        prop_assert_eq!(result.allocated_income(), result.taxable_income);
    }

    #[test]
    fn taxable_income_never_negative(profile in profile()) {
        let result = compute(&profile);

        prop_assert!(result.taxable_income >= Decimal::ZERO);
        prop_assert!(result.total_tax >= Decimal::ZERO);
        prop_assert!(result.taxable_income <= result.gross_income);
    }

    #[test]
    fn more_income_never_less_tax(profile in profile(), extra in amount()) {
        let base = compute(&profile);
        let raised = compute(&IncomeProfile {
            business_income: profile.business_income + extra,
            ..profile.clone()
        });

        prop_assert!(raised.total_tax >= base.total_tax);
    }

    #[test]
    fn professional_aop_stays_under_cap(profile in profile()) {
        let profile = IncomeProfile {
            taxpayer_type: TaxpayerType::AssociationOfPersons,
            professional_firm: true,
            ..profile
        };

        let result = compute(&profile);

        prop_assert!(result.total_tax <= result.taxable_income * PROFESSIONAL_FIRM_CAP_RATE);
        prop_assert!(result.average_rate <= PROFESSIONAL_FIRM_CAP_RATE);
    }

    #[test]
    fn cap_ignored_outside_aop(profile in profile()) {
        let profile = IncomeProfile {
            professional_firm: true,
            ..profile
        };
        prop_assume!(profile.taxpayer_type != TaxpayerType::AssociationOfPersons);

        let result = compute(&profile);

        prop_assert!(!result.cap_applied);
        prop_assert_eq!(result, compute(&IncomeProfile { professional_firm: false, ..profile }));
    }

    #[test]
    fn repeated_computation_is_identical(profile in profile()) {
        prop_assert_eq!(compute(&profile), compute(&profile));
    }

    #[test]
    fn zero_income_zero_tax(profile in profile()) {
        let profile = IncomeProfile {
            salary_income: Decimal::ZERO,
            business_income: Decimal::ZERO,
            other_taxable_income: Decimal::ZERO,
            ..profile
        };

        let result = compute(&profile);

        prop_assert_eq!(result.total_tax, Decimal::ZERO);
        prop_assert_eq!(result.average_rate, Decimal::ZERO);
        prop_assert!(result.breakdown.is_empty());
    }
}
