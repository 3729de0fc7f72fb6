//! Defines the core data models for transactions.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{database_id::TransactionId, money::Amount};

// ============================================================================
// MODELS
// ============================================================================

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// To create a new `Transaction`, use [Transaction::build].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction, assigned by the store.
    pub id: TransactionId,
    /// The owner of the transaction.
    ///
    /// This is an opaque identifier issued by the identity provider.
    pub user_id: String,
    /// A short text description of what the transaction was for.
    pub title: String,
    /// The amount of money spent (negative) or earned (positive).
    pub amount: Amount,
    /// The category label, e.g. "Food & Drinks".
    pub category: String,
    /// When the transaction was recorded.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(user_id: &str, title: &str, amount: Amount, category: &str) -> TransactionBuilder {
        TransactionBuilder {
            user_id: user_id.to_owned(),
            title: title.to_owned(),
            amount,
            category: category.to_owned(),
            created_at: None,
        }
    }
}

/// A builder for creating [Transaction] instances.
///
/// The store assigns the ID, and the creation time unless one is set with
/// [TransactionBuilder::created_at].
///
/// # Examples
///
/// ```ignore
/// use rust_decimal_macros::dec;
///
/// let builder = Transaction::build("user_123", "Coffee", Amount::new(dec!(-4.50))?, "Food & Drinks");
/// let transaction = store.create(builder)?;
/// ```
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct TransactionBuilder {
    /// The owner of the transaction.
    pub user_id: String,

    /// A short text description of the transaction.
    pub title: String,

    /// The monetary amount of the transaction.
    ///
    /// Positive values represent income, negative values represent expenses.
    /// Zero is counted as income.
    ///
    /// # Examples
    /// - `150.00` - Salary deposit
    /// - `-4.50` - Coffee
    /// - `-1200.00` - Rent payment
    pub amount: Amount,

    /// The category label of the transaction.
    pub category: String,

    /// When the transaction happened.
    ///
    /// `None` means the store uses the time of insertion.
    pub created_at: Option<OffsetDateTime>,
}

impl TransactionBuilder {
    /// Set the creation time for the transaction.
    pub fn created_at(mut self, created_at: Option<OffsetDateTime>) -> Self {
        self.created_at = created_at;
        self
    }
}

/// The mutable fields of a transaction.
///
/// Updates replace all three fields at once. The owner and creation time of a
/// transaction never change.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct TransactionChanges {
    /// The new title.
    pub title: String,
    /// The new amount.
    pub amount: Amount,
    /// The new category label.
    pub category: String,
}
