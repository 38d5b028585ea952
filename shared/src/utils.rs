//! # Shared Utility Functions
//!
//! Display formatting used by the client and its command-line driver.
//!
//! ## Money and Percentages
//!
//! - [`format_currency`] - Brazilian Real with `.` thousands and `,` decimals
//! - [`format_percentage`] - Fixed-decimals percentage
//!
//! ## Dates
//!
//! - [`format_date`] - `dd/mm/yyyy`
//! - [`relative_time`] - Compact "time ago" label (`agora`, `5m`, `3h`, `2d`)
//!
//! ## Usage
//!
//! ```rust
//! use shared::utils::format_currency;
//! use rust_decimal::Decimal;
//!
//! assert_eq!(format_currency(Decimal::new(123456, 2)), "R$ 1.234,56");
//! assert_eq!(format_currency(Decimal::new(-4000, 2)), "-R$ 40,00");
//! ```

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::{Decimal, RoundingStrategy};

/// Format a monetary value as BRL (`R$ 1.234,56`).
///
/// Rounds half away from zero to cents. Negative values are prefixed with `-`.
pub fn format_currency(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    let plain = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));
    format!("{}R$ {},{}", sign, group_thousands(int_part), frac_part)
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

/// Format a percentage with a fixed number of decimals (`60.0%`).
///
/// # Examples
///
/// ```rust
/// use shared::utils::format_percentage;
/// use rust_decimal::Decimal;
///
/// assert_eq!(format_percentage(Decimal::from(60), 1), "60.0%");
/// assert_eq!(format_percentage(Decimal::new(12345, 3), 2), "12.35%");
/// ```
pub fn format_percentage(value: Decimal, decimals: u32) -> String {
    let rounded = value.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.*}%", decimals as usize, rounded)
}

/// Format a date as `dd/mm/yyyy`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// Compact elapsed-time label between `then` and `now`.
///
/// Under one minute (or in the future) is `agora`; then minutes, hours and days.
pub fn relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let mins = (now - then).num_minutes();
    if mins < 1 {
        return "agora".to_string();
    }
    if mins < 60 {
        return format!("{}m", mins);
    }
    let hours = mins / 60;
    if hours < 24 {
        return format!("{}h", hours);
    }
    format!("{}d", hours / 24)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(Decimal::ZERO), "R$ 0,00");
        assert_eq!(format_currency(Decimal::new(5, 1)), "R$ 0,50");
        assert_eq!(format_currency(Decimal::from(1_000_000)), "R$ 1.000.000,00");
        assert_eq!(format_currency(Decimal::new(999, 0)), "R$ 999,00");
    }

    #[test]
    fn test_format_currency_rounds_half_up() {
        assert_eq!(format_currency(Decimal::new(10005, 3)), "R$ 10,01");
        assert_eq!(format_currency(Decimal::new(-1, 3)), "R$ 0,00");
    }

    #[test]
    fn test_format_date() {
        let d = NaiveDate::from_ymd_opt(2025, 1, 5).unwrap();
        assert_eq!(format_date(d), "05/01/2025");
    }

    #[test]
    fn test_relative_time() {
        let now = Utc.with_ymd_and_hms(2025, 1, 25, 12, 0, 0).unwrap();
        assert_eq!(relative_time(now - Duration::seconds(30), now), "agora");
        assert_eq!(relative_time(now - Duration::minutes(5), now), "5m");
        assert_eq!(relative_time(now - Duration::hours(3), now), "3h");
        assert_eq!(relative_time(now - Duration::days(2), now), "2d");
        assert_eq!(relative_time(now + Duration::minutes(5), now), "agora");
    }
}
