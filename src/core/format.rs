use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::RoiError;

const COMPACT_THRESHOLD: f64 = 1_000_000.0;
const COMPACT_UNITS: [(f64, &str); 3] = [(1e6, "M"), (1e9, "B"), (1e12, "T")];

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Gbp,
    Usd,
    Eur,
    Aud,
}

impl Currency {
    pub const ALL: [Currency; 4] = [Currency::Gbp, Currency::Usd, Currency::Eur, Currency::Aud];

    pub fn code(self) -> &'static str {
        match self {
            Currency::Gbp => "GBP",
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Aud => "AUD",
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Currency::Gbp => "£",
            Currency::Usd => "$",
            Currency::Eur => "€",
            Currency::Aud => "A$",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = RoiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GBP" => Ok(Currency::Gbp),
            "USD" => Ok(Currency::Usd),
            "EUR" => Ok(Currency::Eur),
            "AUD" => Ok(Currency::Aud),
            _ => Err(RoiError::UnknownCurrency(s.to_string())),
        }
    }
}

pub fn format_gbp(value: f64) -> String {
    format_currency(value, Currency::Gbp)
}

/// Whole-unit currency, e.g. `£28,576`, `-£1,499`, `£12M`.
pub fn format_currency(value: f64, currency: Currency) -> String {
    let symbol = currency.symbol();
    if !value.is_finite() {
        return format!("{symbol}0");
    }

    if value >= COMPACT_THRESHOLD {
        let (scaled, suffix) = compact_whole(value);
        return format!("{symbol}{}{suffix}", group_digits(scaled));
    }

    let rounded = normalize_zero(value.round());
    let sign = if rounded < 0.0 { "-" } else { "" };
    format!("{sign}{symbol}{}", group_digits(rounded.abs()))
}

/// Nearest integer (halves toward +infinity), e.g. `1,807`, `1.2M`.
pub fn format_int(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }

    let rounded = normalize_zero(round_half_up(value));
    if value >= COMPACT_THRESHOLD {
        return compact_two_significant(rounded);
    }

    let sign = if rounded < 0.0 { "-" } else { "" };
    format!("{sign}{}", group_digits(rounded.abs()))
}

pub fn format_percent(value: f64) -> String {
    format!("{}%", format_int(value))
}

/// Halves go toward +infinity. `(value + 0.5).floor()` is not used because the
/// addition rounds 0.49999999999999994 up to 1.
fn round_half_up(value: f64) -> f64 {
    let floor = value.floor();
    if value - floor >= 0.5 { floor + 1.0 } else { floor }
}

fn normalize_zero(value: f64) -> f64 {
    if value == 0.0 { 0.0 } else { value }
}

fn unit_index_for(value: f64) -> usize {
    COMPACT_UNITS
        .iter()
        .rposition(|(unit, _)| value >= *unit)
        .unwrap_or(0)
}

/// Scales into the largest unit and rounds to a whole number, promoting to the
/// next unit when rounding reaches 1000 (e.g. 999.6M becomes 1B).
fn compact_whole(value: f64) -> (f64, &'static str) {
    let mut idx = unit_index_for(value);
    let mut scaled = (value / COMPACT_UNITS[idx].0).round();
    if scaled >= 1_000.0 && idx + 1 < COMPACT_UNITS.len() {
        idx += 1;
        scaled = (value / COMPACT_UNITS[idx].0).round();
    }
    (scaled, COMPACT_UNITS[idx].1)
}

fn compact_two_significant(value: f64) -> String {
    let mut idx = unit_index_for(value);
    loop {
        let (unit, suffix) = COMPACT_UNITS[idx];
        let scaled = value / unit;
        let rounded = if scaled < 10.0 {
            (scaled * 10.0).round() / 10.0
        } else {
            scaled.round()
        };

        if rounded >= 1_000.0 && idx + 1 < COMPACT_UNITS.len() {
            idx += 1;
            continue;
        }

        if rounded < 10.0 && rounded.fract() != 0.0 {
            return format!("{rounded:.1}{suffix}");
        }
        return format!("{}{suffix}", group_digits(rounded));
    }
}

/// Formats a non-negative whole number with `,` thousands separators.
fn group_digits(value: f64) -> String {
    let digits = format!("{:.0}", value);
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
