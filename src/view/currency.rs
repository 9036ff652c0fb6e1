//! Display formatting of amounts in the user's currency.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use tracing::debug;

/// Used when neither the config nor the locale names a currency.
pub const DEFAULT_CURRENCY: &str = "USD";

/// Environment variables consulted, in order, to find the user's locale.
const LOCALE_VARS: [&str; 3] = ["LC_ALL", "LC_MONETARY", "LANG"];

const EURO_TERRITORIES: [&str; 12] = [
    "AT", "BE", "DE", "ES", "FI", "FR", "GR", "IE", "IT", "NL", "PT", "SK",
];

/// An ISO 4217 currency code that amounts are displayed in. No conversion ever takes place; the
/// currency only changes how a number is written.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Currency(String);

impl Default for Currency {
    fn default() -> Self {
        Currency(DEFAULT_CURRENCY.to_string())
    }
}

impl Display for Currency {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl Currency {
    pub fn new(code: impl AsRef<str>) -> Self {
        Currency(code.as_ref().trim().to_ascii_uppercase())
    }

    pub fn code(&self) -> &str {
        &self.0
    }

    /// Looks at `LC_ALL`, `LC_MONETARY` and `LANG` and returns the currency of the first locale
    /// whose territory is known, or `USD`.
    pub fn from_env() -> Self {
        LOCALE_VARS
            .iter()
            .filter_map(|var| std::env::var(var).ok())
            .find_map(|locale| Currency::from_locale(&locale))
            .unwrap_or_else(|| {
                debug!("No currency found in the locale, using {DEFAULT_CURRENCY}");
                Currency::default()
            })
    }

    /// Maps a POSIX locale such as `en_GB.UTF-8` or `de_DE@euro` to its currency using the
    /// territory part. Returns `None` for `C`, `POSIX` and unknown territories.
    pub fn from_locale(locale: &str) -> Option<Self> {
        let base = locale.split(['.', '@']).next()?;
        let territory = base.split(['_', '-']).nth(1)?.to_ascii_uppercase();
        let code = match territory.as_str() {
            "US" => "USD",
            "CA" => "CAD",
            "GB" => "GBP",
            "AU" => "AUD",
            "JP" => "JPY",
            "IN" => "INR",
            "CH" => "CHF",
            t if EURO_TERRITORIES.contains(&t) => "EUR",
            _ => return None,
        };
        Some(Currency::new(code))
    }

    fn symbol(&self) -> Option<&'static str> {
        Some(match self.code() {
            "USD" => "$",
            "CAD" => "CA$",
            "AUD" => "A$",
            "EUR" => "€",
            "GBP" => "£",
            "JPY" => "¥",
            "INR" => "₹",
            "CHF" => "CHF ",
            _ => return None,
        })
    }

    fn minor_digits(&self) -> u32 {
        match self.code() {
            "JPY" => 0,
            _ => 2,
        }
    }

    /// Formats `value` with a symbol (or the code), thousands separators and the currency's
    /// number of decimal places, e.g. `$1,234.50` or `NOK 12.00`.
    pub fn format(&self, value: Decimal) -> String {
        let (sign, num) = if value.is_sign_negative() && !value.is_zero() {
            ("-", value.abs())
        } else {
            ("", value)
        };
        let num = num.round_dp(self.minor_digits()).to_f64().unwrap_or_default();
        let digits = match self.minor_digits() {
            0 => format_num::format_num!(",.0", num),
            _ => format_num::format_num!(",.2", num),
        };
        match self.symbol() {
            Some(symbol) => format!("{sign}{symbol}{digits}"),
            None => format!("{sign}{} {digits}", self.code()),
        }
    }
}
