use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};

/// Fraction digits of every formatted amount.
pub const DISPLAY_PRECISION: u32 = 2;

/// Parses a monetary field such as `$1,234.56`, `-$50` or `($12.00)`.
///
/// The currency `symbol`, thousands separators and whitespace are removed
/// before conversion. A leading `+`/`-` may sit on either side of the symbol,
/// and a value wrapped in parentheses is negative. Returns `None` when what is
/// left is not a plain decimal number.
pub fn parse_amount(raw: &str, symbol: &str) -> Option<Decimal> {
    let symbol = symbol.trim();
    let mut cleaned: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ',')
        .collect();
    if !symbol.is_empty() {
        cleaned = cleaned.replace(symbol, "");
    }

    let (parenthesized, body) = match cleaned.strip_prefix('(').and_then(|s| s.strip_suffix(')')) {
        Some(inner) => (true, inner),
        None => (false, cleaned.as_str()),
    };

    let (negative, digits) = if let Some(rest) = body.strip_prefix('-') {
        (true, rest)
    } else if let Some(rest) = body.strip_prefix('+') {
        (false, rest)
    } else {
        (false, body)
    };

    // "(-5)" has no sensible reading.
    if parenthesized && digits.len() != body.len() {
        return None;
    }

    if !is_plain_number(digits) {
        return None;
    }

    let value = Decimal::from_str(digits).ok()?;
    if parenthesized || negative {
        Some(-value)
    } else {
        Some(value)
    }
}

fn is_plain_number(text: &str) -> bool {
    let mut seen_digit = false;
    let mut seen_point = false;

    for c in text.chars() {
        match c {
            '0'..='9' => seen_digit = true,
            '.' if !seen_point => seen_point = true,
            _ => return false,
        }
    }

    seen_digit
}

/// Renders `value` as `<symbol>1234.50`, negatives as `-<symbol>1234.50`.
/// Midpoints round away from zero.
pub fn format_currency(value: Decimal, symbol: &str) -> String {
    let mut rounded = value.round_dp_with_strategy(DISPLAY_PRECISION, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(DISPLAY_PRECISION);

    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("-{}{}", symbol, rounded.abs())
    } else {
        format!("{}{}", symbol, rounded.abs())
    }
}
