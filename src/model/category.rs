use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

/// The fixed set of buckets an expense can be filed under. Each one is shown as its own section.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Category {
    #[default]
    Personal,
    Business,
}

serde_plain::derive_display_from_serialize!(Category);

impl Category {
    /// All categories in section order.
    pub const ALL: [Category; 2] = [Category::Personal, Category::Business];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Personal => "Personal",
            Category::Business => "Business",
        }
    }

    /// The next category in section order, wrapping around.
    pub fn next(self) -> Self {
        match self {
            Category::Personal => Category::Business,
            Category::Business => Category::Personal,
        }
    }

    /// The previous category in section order, wrapping around. With two categories this is the
    /// same as `next`, but callers should not rely on that.
    pub fn prev(self) -> Self {
        match self {
            Category::Personal => Category::Business,
            Category::Business => Category::Personal,
        }
    }
}

/// Returned when text does not name one of the known categories.
pub struct CategoryError(String);

impl Debug for CategoryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

impl Display for CategoryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Unknown category '{}', expected one of: {}",
            self.0,
            Category::ALL.map(|c| c.as_str()).join(", ")
        )
    }
}

impl Error for CategoryError {}

impl FromStr for Category {
    type Err = CategoryError;

    /// Case-insensitive, surrounding whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| CategoryError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_case_insensitive() {
        assert_eq!(Category::from_str("personal").unwrap(), Category::Personal);
        assert_eq!(Category::from_str(" BUSINESS ").unwrap(), Category::Business);
    }

    #[test]
    fn test_parse_unknown() {
        let err = Category::from_str("Food").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unknown category 'Food', expected one of: Personal, Business"
        );
    }

    #[test]
    fn test_display_matches_serialized_form() {
        assert_eq!(Category::Business.to_string(), "Business");
        assert_eq!(
            serde_json::to_string(&Category::Personal).unwrap(),
            "\"Personal\""
        );
    }

    #[test]
    fn test_deserialize_is_exact() {
        assert!(serde_json::from_str::<Category>("\"Business\"").is_ok());
        assert!(serde_json::from_str::<Category>("\"business\"").is_err());
        assert!(serde_json::from_str::<Category>("\"Other\"").is_err());
    }

    #[test]
    fn test_cycle() {
        assert_eq!(Category::Personal.next(), Category::Business);
        assert_eq!(Category::Business.next(), Category::Personal);
        assert_eq!(Category::Personal.prev(), Category::Business);
    }
}
