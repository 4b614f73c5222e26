// 🔍 Filter Engine - non-destructive view selection
//
// Category and inclusive date range, ANDed together. Never mutates or
// reorders the input; matching records keep their relative order.

use crate::entities::{Category, Transaction, ALL_CATEGORIES_LABEL};
use crate::error::ValidationError;
use chrono::NaiveDate;
use std::fmt;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    /// "All" (any case) or empty means no restriction.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(ALL_CATEGORIES_LABEL) {
            return Ok(CategoryFilter::All);
        }
        Ok(CategoryFilter::Only(trimmed.parse()?))
    }

    pub fn matches(&self, category: Category) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(wanted) => *wanted == category,
        }
    }

    /// Choices offered by filter forms: "All" then every category.
    pub fn choices() -> Vec<CategoryFilter> {
        std::iter::once(CategoryFilter::All)
            .chain(Category::ALL.into_iter().map(CategoryFilter::Only))
            .collect()
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::All => f.write_str(ALL_CATEGORIES_LABEL),
            CategoryFilter::Only(category) => write!(f, "{category}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FilterCriteria {
    pub category: CategoryFilter,
    /// Inclusive lower bound
    pub from: Option<NaiveDate>,
    /// Inclusive upper bound
    pub to: Option<NaiveDate>,
}

impl FilterCriteria {
    /// Builds criteria from form text. Blank dates mean "no bound".
    /// A `from` later than `to` is accepted and simply matches nothing.
    pub fn parse(category: &str, from: &str, to: &str) -> Result<Self, ValidationError> {
        Ok(FilterCriteria {
            category: CategoryFilter::parse(category)?,
            from: parse_optional_date(from)?,
            to: parse_optional_date(to)?,
        })
    }

    /// True when every record passes (the "cleared" filter).
    pub fn is_unrestricted(&self) -> bool {
        self.category == CategoryFilter::All && self.from.is_none() && self.to.is_none()
    }

    pub fn matches(&self, tx: &Transaction) -> bool {
        self.category.matches(tx.category)
            && self.from.map_or(true, |from| tx.date >= from)
            && self.to.map_or(true, |to| tx.date <= to)
    }
}

impl fmt::Display for FilterCriteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.category)?;
        if let Some(from) = self.from {
            write!(f, " from {}", from.format(DATE_FORMAT))?;
        }
        if let Some(to) = self.to {
            write!(f, " to {}", to.format(DATE_FORMAT))?;
        }
        Ok(())
    }
}

pub fn parse_optional_date(input: &str) -> Result<Option<NaiveDate>, ValidationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .map(Some)
        .map_err(|_| ValidationError::InvalidDate(input.to_string()))
}

/// Records of `transactions` matching `criteria`, in their original order.
pub fn filter(transactions: &[Transaction], criteria: &FilterCriteria) -> Vec<Transaction> {
    transactions
        .iter()
        .filter(|tx| criteria.matches(tx))
        .cloned()
        .collect()
}
