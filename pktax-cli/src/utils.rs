use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

/// Error returned when a string cannot be parsed as a [`Decimal`].
#[derive(Debug, Error)]
#[error("invalid amount '{input}': {source}")]
pub struct ParseDecimalError {
    input: String,
    #[source]
    source: rust_decimal::Error,
}

/// Error returned for a yes/no cell that is neither.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid yes/no value '{0}'")]
pub struct ParseFlagError(pub String);

/// Normalizes input for decimal parsing: trims whitespace and removes commas (thousands separator).
fn normalize_decimal_input(s: &str) -> String {
    s.trim().replace(',', "")
}

/// Parses a string into a [`Decimal`].
///
/// Handles comma as thousands separator (e.g. `"8,500,000"`).
/// Empty or whitespace-only input is treated as 0.
pub fn parse_decimal(s: &str) -> Result<Decimal, ParseDecimalError> {
    let normalized = normalize_decimal_input(s);
    if normalized.is_empty() {
        return Ok(Decimal::ZERO);
    }
    normalized.parse().map_err(|e| {
        tracing::debug!(input = %s, "invalid decimal: {}", e);
        ParseDecimalError {
            input: s.to_string(),
            source: e,
        }
    })
}

/// Parses a yes/no cell. Empty input is `false`.
pub fn parse_flag(s: &str) -> Result<bool, ParseFlagError> {
    match s.trim().to_ascii_lowercase().as_str() {
        "" | "no" | "n" | "false" | "0" => Ok(false),
        "yes" | "y" | "true" | "1" => Ok(true),
        _ => Err(ParseFlagError(s.to_string())),
    }
}

/// Formats an amount with two decimals and comma thousands separators,
/// e.g. `3,005,000.00`.
pub fn format_pkr(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let text = format!("{:.2}", rounded.abs());
    let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}{grouped}.{fraction}")
}

/// Formats a rate as a percentage with two decimals, e.g. `34.54%`.
pub fn format_rate(rate: Decimal) -> String {
    let percent = (rate * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{percent:.2}%")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn parse_decimal_accepts_comma_thousands_separator() {
        assert_eq!(parse_decimal("8,500,000").unwrap(), dec!(8500000));
        assert_eq!(parse_decimal("1,234,567.89").unwrap(), dec!(1234567.89));
    }

    #[test]
    fn parse_decimal_trim_whitespace() {
        assert_eq!(parse_decimal("  950000  ").unwrap(), dec!(950000));
    }

    #[test]
    fn parse_decimal_empty_treated_as_zero() {
        assert_eq!(parse_decimal("").unwrap(), Decimal::ZERO);
        assert_eq!(parse_decimal("   ").unwrap(), Decimal::ZERO);
    }

    #[test]
    fn parse_decimal_keeps_sign() {
        assert_eq!(parse_decimal("-1").unwrap(), dec!(-1));
    }

    #[test]
    fn parse_decimal_invalid_returns_error() {
        let err = parse_decimal("abc").unwrap_err();
        assert!(err.to_string().starts_with("invalid amount 'abc'"));
    }

    #[test]
    fn parse_flag_accepts_common_spellings() {
        for yes in ["yes", "Y", "TRUE", "1"] {
            assert_eq!(parse_flag(yes), Ok(true), "{yes}");
        }
        for no in ["", "no", "N", "false", "0"] {
            assert_eq!(parse_flag(no), Ok(false), "{no}");
        }
        assert_eq!(parse_flag("maybe"), Err(ParseFlagError("maybe".to_string())));
    }

    #[test]
    fn format_pkr_groups_thousands() {
        assert_eq!(format_pkr(dec!(3005000)), "3,005,000.00");
        assert_eq!(format_pkr(dec!(600000)), "600,000.00");
        assert_eq!(format_pkr(dec!(999.5)), "999.50");
        assert_eq!(format_pkr(dec!(0)), "0.00");
        assert_eq!(format_pkr(dec!(1234567.891)), "1,234,567.89");
        assert_eq!(format_pkr(dec!(-1500)), "-1,500.00");
    }

    #[test]
    fn format_rate_as_percentage() {
        assert_eq!(format_rate(dec!(0.15)), "15.00%");
        assert_eq!(format_rate(dec!(0.025)), "2.50%");
        assert_eq!(format_rate(dec!(3005000) / dec!(8700000)), "34.54%");
    }
}
