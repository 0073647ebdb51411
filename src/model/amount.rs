//! Amount type for cash balance values.
//!
//! Spreadsheet exports format money inconsistently: a currency symbol may or
//! may not be present, and thousands separators come and go. `Amount` wraps
//! `Decimal`, accepts all of those forms, and remembers the style it was
//! parsed from so values round-trip through display unchanged.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Currency symbols accepted by the parser. The symbol is passed through on
/// display; no conversion or normalization is performed.
const CURRENCY_SYMBOLS: &[char] = &['$', '£', '€'];

/// How an amount was written in its source cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
struct AmountStyle {
    /// Currency symbol present in the source, if any.
    symbol: Option<char>,
    /// Whether thousands separators were present.
    commas: bool,
}

/// A cash balance value parsed from a spreadsheet cell.
///
/// Style is significant for equality; compare [`Amount::value`] for numeric
/// comparisons.
///
/// ```
/// # use burnrate::model::Amount;
/// # use std::str::FromStr;
/// let a = Amount::from_str("25000.00").unwrap();
/// let b = Amount::from_str("£25,000.00").unwrap();
/// assert_ne!(a, b);
/// assert_eq!(a.value(), b.value());
/// assert_eq!(b.to_string(), "£25,000.00");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount {
    value: Decimal,
    style: AmountStyle,
}

impl Amount {
    /// Creates an amount with no currency symbol and no separators.
    pub const fn new(value: Decimal) -> Self {
        Self {
            value,
            style: AmountStyle {
                symbol: None,
                commas: false,
            },
        }
    }

    /// The underlying numeric value.
    pub fn value(&self) -> Decimal {
        self.value
    }

    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }
}

/// Error produced when a cell cannot be parsed as an amount.
#[derive(Debug, thiserror::Error)]
#[error("not a valid amount: {0}")]
pub struct AmountError(String);

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(AmountError("empty cell".to_string()));
        }

        // The symbol may precede or follow the sign: "£-50" and "-£50" both
        // occur in the wild.
        let mut rest = trimmed;
        let mut negative = false;
        if let Some(r) = rest.strip_prefix('-') {
            negative = true;
            rest = r;
        }
        let mut symbol = None;
        if let Some(c) = rest.chars().next().filter(|c| CURRENCY_SYMBOLS.contains(c)) {
            symbol = Some(c);
            rest = &rest[c.len_utf8()..];
        }
        if !negative {
            if let Some(r) = rest.strip_prefix('-') {
                negative = true;
                rest = r;
            }
        }

        let without_commas = rest.replace(',', "");
        let commas = without_commas.len() < rest.len();

        let magnitude = Decimal::from_str(&without_commas)
            .map_err(|e| AmountError(format!("'{trimmed}': {e}")))?;
        let value = if negative { -magnitude } else { magnitude };
        Ok(Amount {
            value,
            style: AmountStyle { symbol, commas },
        })
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (sign, magnitude) = if self.value.is_sign_negative() {
            ("-", self.value.abs())
        } else {
            ("", self.value)
        };
        let symbol = self.style.symbol.map(String::from).unwrap_or_default();
        if self.style.commas {
            write!(
                f,
                "{sign}{symbol}{}",
                format_num::format_num!(",.2", magnitude.to_f64().unwrap_or_default())
            )
        } else {
            write!(f, "{sign}{symbol}{magnitude}")
        }
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Amount::from_str(&s).map_err(serde::de::Error::custom)
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Amount::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain() {
        let amount = Amount::from_str("25000").unwrap();
        assert_eq!(amount.value(), Decimal::from(25000));
    }

    #[test]
    fn test_parse_dollar_sign() {
        let amount = Amount::from_str("$85,000.00").unwrap();
        assert_eq!(amount.value(), Decimal::from_str("85000.00").unwrap());
        assert_eq!(amount.to_string(), "$85,000.00");
    }

    #[test]
    fn test_parse_pound_after_sign() {
        let amount = Amount::from_str("-£1,500.00").unwrap();
        assert_eq!(amount.value(), Decimal::from_str("-1500.00").unwrap());
        assert_eq!(amount.to_string(), "-£1,500.00");
    }

    #[test]
    fn test_parse_sign_after_pound() {
        let amount = Amount::from_str("£-1500").unwrap();
        assert_eq!(amount.value(), Decimal::from(-1500));
    }

    #[test]
    fn test_empty_is_error() {
        assert!(Amount::from_str("").is_err());
        assert!(Amount::from_str("   ").is_err());
    }

    #[test]
    fn test_garbage_is_error() {
        assert!(Amount::from_str("n/a").is_err());
    }

    #[test]
    fn test_display_preserves_plain_style() {
        let s = "100000.00";
        assert_eq!(Amount::from_str(s).unwrap().to_string(), s);
    }

    #[test]
    fn test_style_significant_for_equality() {
        let a = Amount::from_str("$50.00").unwrap();
        let b = Amount::from_str("50.00").unwrap();
        assert_ne!(a, b);
        assert_eq!(a.value(), b.value());
    }

    #[test]
    fn test_serde_round_trip() {
        let amount = Amount::from_str("$1,234.56").unwrap();
        let json = serde_json::to_string(&amount).unwrap();
        assert_eq!(json, "\"$1,234.56\"");
        let back: Amount = serde_json::from_str(&json).unwrap();
        assert_eq!(back.value(), amount.value());
    }
}
