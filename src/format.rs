use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};

/// Thousands separator used by the ru locale (no-break space).
pub const GROUP_SEPARATOR: char = '\u{a0}';

pub fn format_date(date: NaiveDate) -> String {
    date.format("%d.%m.%Y").to_string()
}

/// Whole units with grouped thousands and a currency suffix, e.g. `1 235 р`.
///
/// Rounding is for display only; halves go away from zero.
pub fn format_amount(amount: Decimal, currency: &str) -> String {
    let rounded = amount
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .trunc();
    let digits = rounded.abs().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(GROUP_SEPARATOR);
        }
        grouped.push(digit);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}{grouped} {currency}")
}

/// Cuts `text` to `width` characters, marking the cut with `...`.
pub fn truncate_description(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut truncated: String = text.chars().take(width).collect();
    truncated.push_str("...");
    truncated
}
