use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Amounts are shown with this many decimal places.
pub const DISPLAY_PRECISION: u32 = 2;

/// Presentation preferences for monetary values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurrencyFormat {
    pub symbol: String,
    pub decimal_separator: char,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grouping_separator: Option<char>,
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        Self {
            symbol: "R$".into(),
            decimal_separator: '.',
            grouping_separator: None,
        }
    }
}

impl CurrencyFormat {
    /// Renders `amount` as `<symbol> <digits>`, e.g. `R$ 1234.57`.
    pub fn format_amount(&self, amount: Decimal) -> String {
        let body = format_number(self, amount);
        if self.symbol.is_empty() {
            body
        } else {
            format!("{} {}", self.symbol, body)
        }
    }

    /// Parses user input such as `"250"`, `" 10,50 "` or `"R$ 99.90"`.
    ///
    /// With `.` as the decimal separator a lone comma is read as a decimal
    /// comma, except when exactly three digits follow it: `"1,000"` could be
    /// a grouped thousand and is rejected as ambiguous.
    pub fn parse_amount(&self, input: &str) -> Result<Decimal, ParseAmountError> {
        let mut raw = input.trim();
        if !self.symbol.is_empty() {
            raw = raw.strip_prefix(self.symbol.as_str()).unwrap_or(raw).trim();
        }
        if raw.is_empty() {
            return Err(ParseAmountError::Empty);
        }
        let mut normalized: String = match self.grouping_separator {
            Some(separator) => raw.chars().filter(|ch| *ch != separator).collect(),
            None => raw.to_string(),
        };
        if self.decimal_separator != '.' {
            normalized = normalized.replace(self.decimal_separator, ".");
        } else if !normalized.contains('.') && normalized.matches(',').count() == 1 {
            if let Some((_, fraction)) = normalized.split_once(',') {
                if fraction.len() == 3 && fraction.chars().all(|ch| ch.is_ascii_digit()) {
                    return Err(ParseAmountError::Ambiguous(input.trim().into()));
                }
            }
            normalized = normalized.replace(',', ".");
        }
        Decimal::from_str(&normalized).map_err(|_| ParseAmountError::NotANumber(input.trim().into()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseAmountError {
    #[error("Please enter an amount.")]
    Empty,
    #[error("`{0}` is not a valid amount.")]
    NotANumber(String),
    #[error("`{0}` is ambiguous: use `.` for decimals and no thousands separator.")]
    Ambiguous(String),
}

pub fn round_for_display(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(DISPLAY_PRECISION, RoundingStrategy::MidpointAwayFromZero)
}

fn format_number(format: &CurrencyFormat, amount: Decimal) -> String {
    let rounded = round_for_display(amount);
    let mut body = format!("{:.*}", DISPLAY_PRECISION as usize, rounded.abs());
    let (int_part, frac_part) = match body.find('.') {
        Some(pos) => (body[..pos].to_string(), body[pos + 1..].to_string()),
        None => (body.clone(), String::new()),
    };
    let grouped = match format.grouping_separator {
        Some(separator) => group_digits(&int_part, separator),
        None => int_part,
    };
    body = if frac_part.is_empty() {
        grouped
    } else {
        format!("{}{}{}", grouped, format.decimal_separator, frac_part)
    };
    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("-{}", body)
    } else {
        body
    }
}

fn group_digits(digits: &str, separator: char) -> String {
    let mut grouped = String::new();
    for (count, ch) in digits.chars().rev().enumerate() {
        if count != 0 && count % 3 == 0 {
            grouped.insert(0, separator);
        }
        grouped.insert(0, ch);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn default_format_matches_branch_style() {
        let format = CurrencyFormat::default();
        assert_eq!(format.format_amount(dec!(1234.567)), "R$ 1234.57");
        assert_eq!(format.format_amount(Decimal::ZERO), "R$ 0.00");
        assert_eq!(format.format_amount(dec!(-42.5)), "R$ -42.50");
    }

    #[test]
    fn grouping_and_separator_are_applied() {
        let format = CurrencyFormat {
            symbol: "€".into(),
            decimal_separator: ',',
            grouping_separator: Some('.'),
        };
        assert_eq!(format.format_amount(dec!(1234567.891)), "€ 1.234.567,89");
        assert_eq!(format.parse_amount("€ 1.234,50").unwrap(), dec!(1234.50));
    }

    #[test]
    fn parse_accepts_symbol_and_comma() {
        let format = CurrencyFormat::default();
        assert_eq!(format.parse_amount(" R$ 10,50 ").unwrap(), dec!(10.50));
        assert_eq!(format.parse_amount("200").unwrap(), dec!(200));
        assert_eq!(format.parse_amount("-3.5").unwrap(), dec!(-3.5));
    }

    #[test]
    fn parse_rejects_garbage() {
        let format = CurrencyFormat::default();
        assert_eq!(format.parse_amount("   "), Err(ParseAmountError::Empty));
        assert_eq!(
            format.parse_amount("ten"),
            Err(ParseAmountError::NotANumber("ten".into()))
        );
    }

    #[test]
    fn comma_before_three_digits_is_ambiguous() {
        let format = CurrencyFormat::default();
        assert_eq!(
            format.parse_amount("1,000"),
            Err(ParseAmountError::Ambiguous("1,000".into()))
        );
        assert_eq!(
            format.parse_amount("R$ 12,345"),
            Err(ParseAmountError::Ambiguous("R$ 12,345".into()))
        );
        assert_eq!(format.parse_amount("1,5").unwrap(), dec!(1.5));
        assert_eq!(format.parse_amount("1,0000").unwrap(), dec!(1.0000));

        let grouped = CurrencyFormat {
            grouping_separator: Some(','),
            ..CurrencyFormat::default()
        };
        assert_eq!(grouped.parse_amount("1,000").unwrap(), dec!(1000));
    }
}
