// 📦 Entity Models
//
// Category: the fixed expense classification and its palette
// Transaction: the stored record, its identity, and raw form input

pub mod category;
pub mod transaction;

pub use category::{Category, ALL_CATEGORIES_LABEL};
pub use transaction::{parse_amount, NewTransaction, Transaction, TransactionId, TransactionType};
