//! Formatting helpers for amounts and labels.

/// Formats an amount with a currency symbol, keeping the sign in front.
///
/// `format_amount(-50.0, "$", 0)` gives `-$50`.
pub fn format_amount(value: f64, symbol: &str, precision: usize) -> String {
    if value < 0.0 {
        format!("-{symbol}{:.precision$}", value.abs())
    } else {
        format!("{symbol}{value:.precision$}")
    }
}

/// Formats a percentage with one decimal place.
pub fn format_percentage(value: f64) -> String {
    format!("{value:.1}%")
}

/// Truncates a string to a maximum number of characters with ellipsis.
pub fn truncate_string(input: &str, max_length: usize) -> String {
    if input.chars().count() <= max_length {
        input.to_string()
    } else {
        let kept: String = input.chars().take(max_length.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}
