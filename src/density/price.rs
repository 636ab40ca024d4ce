//! Compact price labels
//!
//! Three tiers: plain below 1000, thousands as `k`, millions as `M` with one
//! decimal. Rounding is half away from zero.

/// Format a price for a map label
pub fn format_price(price: f64) -> String {
    if price < 1_000.0 {
        format_number(price)
    } else if price < 1_000_000.0 {
        format!("{}k", format_number((price / 1_000.0).round()))
    } else {
        let millions = (price / 1_000_000.0 * 10.0).round() / 10.0;
        format!("{:.1}M", millions)
    }
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}
