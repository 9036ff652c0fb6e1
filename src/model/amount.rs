//! Amount type for the non-negative monetary value of an expense.
//!
//! This module provides the `Amount` type which wraps `Decimal`. Parsing tolerates a leading dollar
//! sign and thousands separators so that values typed into a form, like `$1,250.00`, are accepted.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::de::Visitor;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::error::Error;
use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

/// Represents the amount of an expense. An `Amount` is never negative.
///
/// Amounts are written as plain decimal strings so that the scale survives a round trip through
/// storage, e.g. `3.50` is stored as `"3.50"` and not `3.5`.
///
/// # Examples
///
/// ```
/// # use iexpense::model::Amount;
/// # use std::str::FromStr;
/// let amount = Amount::from_str("$1,250.00").unwrap();
/// assert_eq!(amount.to_string(), "1250.00");
/// assert!(Amount::from_str("-5").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(Decimal);

impl Amount {
    /// Creates a new `Amount`, failing if `value` is negative.
    pub fn new(value: Decimal) -> Result<Self, AmountError> {
        if value.is_zero() {
            return Ok(Self(value.abs()));
        }
        if value.is_sign_negative() {
            return Err(AmountError::Negative(value));
        }
        Ok(Self(value))
    }

    /// Returns the underlying Decimal value.
    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Returns true if the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

/// An error that can occur when parsing or constructing an `Amount`.
pub enum AmountError {
    /// Nothing was provided.
    Empty,
    /// The text could not be parsed as a decimal number.
    Parse(rust_decimal::Error),
    /// Expenses cannot be negative.
    Negative(Decimal),
}

impl Debug for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(self, f)
    }
}

impl Display for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            AmountError::Empty => write!(f, "Amount is required"),
            AmountError::Parse(e) => write!(f, "Invalid amount: {e}"),
            AmountError::Negative(d) => write!(f, "Amount cannot be negative, got {d}"),
        }
    }
}

impl Error for AmountError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            AmountError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(AmountError::Empty);
        }

        // "-$5" and "$5" are both accepted here; the sign check happens in `new`.
        let without_dollar = if let Some(after_minus) = trimmed.strip_prefix('-') {
            match after_minus.strip_prefix('$') {
                Some(after_dollar) => format!("-{after_dollar}"),
                None => trimmed.to_string(),
            }
        } else {
            trimmed.strip_prefix('$').unwrap_or(trimmed).to_string()
        };

        let without_commas = without_dollar.replace(',', "");
        let value = Decimal::from_str(without_commas.trim()).map_err(AmountError::Parse)?;
        Amount::new(value)
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
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
        deserializer.deserialize_any(AmountVisitor)
    }
}

/// Accepts decimal strings, which is how amounts are written, and plain JSON numbers, which is how
/// lists exported by other expense apps store them.
struct AmountVisitor;

impl<'de> Visitor<'de> for AmountVisitor {
    type Value = Amount;

    fn expecting(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "a non-negative decimal amount as a string or number")
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Amount::from_str(v).map_err(E::custom)
    }

    fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Amount::new(Decimal::from(v)).map_err(E::custom)
    }

    fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Amount::new(Decimal::from(v)).map_err(E::custom)
    }

    fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        let value = Decimal::from_f64(v)
            .ok_or_else(|| E::custom(format!("{v} cannot be represented as a decimal")))?;
        Amount::new(value).map_err(E::custom)
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = AmountError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Amount::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.value()
    }
}
