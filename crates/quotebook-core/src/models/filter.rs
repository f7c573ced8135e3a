//! Category filter model

use std::fmt;

use super::Quote;

/// Sentinel value selecting every category
pub const ALL_CATEGORIES: &str = "all";

/// Active category filter.
///
/// A specific category does not have to match any current quote.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Category(String),
}

impl CategoryFilter {
    /// Parse a stored or user-provided filter value.
    ///
    /// Empty input and the `all` sentinel both select every category.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() || value == ALL_CATEGORIES {
            Self::All
        } else {
            Self::Category(value.to_string())
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::All => ALL_CATEGORIES,
            Self::Category(category) => category,
        }
    }

    #[must_use]
    pub fn matches(&self, quote: &Quote) -> bool {
        match self {
            Self::All => true,
            Self::Category(category) => quote.category == *category,
        }
    }

    /// Apply the filter, preserving collection order
    #[must_use]
    pub fn apply(&self, quotes: &[Quote]) -> Vec<Quote> {
        quotes
            .iter()
            .filter(|quote| self.matches(quote))
            .cloned()
            .collect()
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
