/// Currency symbol printed in front of amounts (South African rand).
pub const CURRENCY_SYMBOL: &str = "R";

/// Round to two fractional digits, half away from zero.
/// Only used for presentation; quotes keep full precision.
pub fn round_to_cents(value: f64) -> f64 {
    // + 0.0 folds -0.0 into 0.0
    (value * 100.0).round() / 100.0 + 0.0
}

/// Format an amount with two fractional digits.
/// Example: 862.5 -> "862.50", 669.375 -> "669.38"
pub fn format_amount(value: f64) -> String {
    format!("{:.2}", round_to_cents(value))
}

/// Format an amount with the currency symbol.
/// Example: 6555.0 -> "R6555.00"
pub fn format_currency(value: f64) -> String {
    format!("{}{}", CURRENCY_SYMBOL, format_amount(value))
}

/// Format a rate as a whole percentage.
/// Example: 0.05 -> "5%"
pub fn format_rate(rate: f64) -> String {
    format!("{}%", (rate * 100.0).round() as i64)
}
