// 💸 Transaction - the single recorded entity
//
// Identity is a UUID assigned at creation and never reused. Position in a
// list is NOT identity: two transactions with identical values are still
// distinct records and removal always goes through `id`.

use crate::error::ValidationError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::Category;

// ============================================================================
// IDENTITY
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(uuid::Uuid);

impl TransactionId {
    pub fn new() -> Self {
        TransactionId(uuid::Uuid::new_v4())
    }
}

impl Default for TransactionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// TRANSACTION TYPE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money coming in
    Income,

    /// Money going out; the only type counted in category breakdowns
    Expense,
}

impl TransactionType {
    pub const ALL: [TransactionType; 2] = [TransactionType::Income, TransactionType::Expense];

    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }

    /// Capitalised form for labels and tooltips.
    pub fn label(&self) -> &'static str {
        match self {
            TransactionType::Income => "Income",
            TransactionType::Expense => "Expense",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            _ => Err(ValidationError::UnknownType(s.to_string())),
        }
    }
}

// ============================================================================
// TRANSACTION
// ============================================================================

/// A stored income or expense record.
///
/// The JSON shape matches the browser tracker's `localStorage` export
/// (`description`, `amount`, `category`, `type`, `date`), plus `id`.
/// Records without an `id` get a fresh one when decoded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(default = "TransactionId::new")]
    pub id: TransactionId,

    pub description: String,

    pub amount: f64,

    pub category: Category,

    #[serde(rename = "type")]
    pub kind: TransactionType,

    /// Serialized as `YYYY-MM-DD`
    pub date: NaiveDate,
}

impl Transaction {
    pub fn is_expense(&self) -> bool {
        self.kind == TransactionType::Expense
    }

    /// Re-checks the invariants enforced at creation. Used on records that
    /// arrive from storage or an import file rather than from the form.
    pub fn check(&self) -> Result<(), ValidationError> {
        if self.description.trim().is_empty() {
            return Err(ValidationError::EmptyDescription);
        }
        check_amount(self.amount, &self.amount.to_string())?;
        Ok(())
    }
}

// ============================================================================
// NEW TRANSACTION (raw form input)
// ============================================================================

/// Unvalidated input as typed by the user.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewTransaction {
    pub description: String,
    pub amount: String,
    pub category: String,
    pub kind: String,
}

impl NewTransaction {
    pub fn new(
        description: impl Into<String>,
        amount: impl Into<String>,
        category: impl Into<String>,
        kind: impl Into<String>,
    ) -> Self {
        NewTransaction {
            description: description.into(),
            amount: amount.into(),
            category: category.into(),
            kind: kind.into(),
        }
    }

    /// Validates every field and builds a record dated `date` with a fresh id.
    pub fn validate(&self, date: NaiveDate) -> Result<Transaction, ValidationError> {
        let description = self.description.trim();
        if description.is_empty() {
            return Err(ValidationError::EmptyDescription);
        }

        let amount = parse_amount(&self.amount)?;
        let category: Category = self.category.parse()?;
        let kind: TransactionType = self.kind.parse()?;

        Ok(Transaction {
            id: TransactionId::new(),
            description: description.to_string(),
            amount,
            category,
            kind,
            date,
        })
    }
}

/// Strict decimal parse: the whole string must be a finite, non-negative number.
pub fn parse_amount(input: &str) -> Result<f64, ValidationError> {
    let trimmed = input.trim();
    let amount: f64 = trimmed
        .parse()
        .map_err(|_| ValidationError::InvalidAmount(input.to_string()))?;
    check_amount(amount, input)?;
    // "-0" parses to negative zero
    Ok(if amount == 0.0 { 0.0 } else { amount })
}

fn check_amount(amount: f64, raw: &str) -> Result<(), ValidationError> {
    if !amount.is_finite() {
        return Err(ValidationError::InvalidAmount(raw.to_string()));
    }
    if amount < 0.0 {
        return Err(ValidationError::NegativeAmount(amount));
    }
    Ok(())
}
