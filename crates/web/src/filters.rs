//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Formats a decimal amount as a dollar price.
///
/// Usage in templates: `{{ book.price|money }}`
#[askama::filter_fn]
pub fn money(amount: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(format_money(&amount.to_string()))
}

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

fn format_money(raw: &str) -> String {
    raw.parse::<rust_decimal::Decimal>().map_or_else(
        |_| format!("${raw}"),
        |amount| format!("${amount:.2}"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_formats_two_decimals() {
        assert_eq!(format_money("10.9"), "$10.90");
        assert_eq!(format_money("8.99"), "$8.99");
        assert_eq!(format_money("7"), "$7.00");
    }

    #[test]
    fn test_money_passes_through_unparseable() {
        assert_eq!(format_money("free"), "$free");
    }
}
