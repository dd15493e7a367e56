use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds to the nearest whole dollar, halves away from zero.
pub fn round_dollars(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// `$7,525`. Cents are rounded away.
pub fn format_usd(amount: Decimal) -> String {
    let rounded = round_dollars(amount);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    format!("{sign}${}", group_thousands(&rounded.abs().trunc().to_string()))
}

/// Like [`format_usd`] but keeps cents when the rate has them (`$28.50`).
pub fn format_rate(rate: Decimal) -> String {
    let rounded = rate.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    if rounded.fract().is_zero() {
        return format_usd(rounded);
    }

    let sign = if rounded.is_sign_negative() { "-" } else { "" };
    let whole = group_thousands(&rounded.abs().trunc().to_string());
    let cents = (rounded.abs().fract() * Decimal::ONE_HUNDRED).trunc().normalize().to_string();
    format!("{sign}${whole}.{cents:0>2}")
}

pub fn format_hours(hours: Decimal) -> String {
    format_quantity(hours)
}

/// At most three decimals, trailing zeros dropped (`2.5`, `1.296`).
pub fn format_quantity(value: Decimal) -> String {
    value.round_dp_with_strategy(3, RoundingStrategy::MidpointAwayFromZero).normalize().to_string()
}

pub fn format_percent(percentage: Decimal) -> String {
    let sign = if percentage.is_sign_negative() { "" } else { "+" };
    format!("{sign}{}%", percentage.normalize())
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
