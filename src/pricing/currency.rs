//! Display conversion of USD cent prices.

use crate::catalog::models::ExchangeRates;

/// Convert a USD cent amount into `currency` units (not cents).
pub fn convert_usd_cents(cents: i64, currency: &str, rates: &ExchangeRates) -> Option<f64> {
    rates.rate(currency).map(|rate| cents as f64 / 100.0 * rate)
}

/// Format a USD cent amount for display, e.g. `"EUR 4.60"`.
///
/// Falls back to USD when the currency is unknown.
pub fn format_price(cents: i64, currency: &str, rates: &ExchangeRates) -> String {
    match convert_usd_cents(cents, currency, rates) {
        Some(amount) => format!("{} {:.2}", currency.trim().to_uppercase(), amount),
        None => format!("USD {:.2}", cents as f64 / 100.0),
    }
}
