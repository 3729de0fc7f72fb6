//! Defines the transaction store trait.

use crate::{
    Error,
    aggregation::Summary,
    database_id::TransactionId,
    money::Amount,
    range_filter::DateWindow,
    transaction::{Transaction, TransactionBuilder, TransactionChanges},
};

/// Handles the persistence of transactions.
///
/// Every method is a single atomic operation against the underlying storage.
/// Storage faults are returned as errors and never retried.
pub trait TransactionStore {
    /// Create a new transaction in the store.
    ///
    /// Implementers must reject builders with an empty user ID, title or
    /// category with [Error::Validation].
    fn create(&self, builder: TransactionBuilder) -> Result<Transaction, Error>;

    /// Retrieve a transaction from the store.
    fn get(&self, id: TransactionId) -> Result<Transaction, Error>;

    /// Retrieve every transaction in the store, in no particular order.
    fn get_all(&self) -> Result<Vec<Transaction>, Error>;

    /// Retrieve all transactions owned by `user_id`.
    ///
    /// An empty list is a valid result.
    fn get_by_user(&self, user_id: &str) -> Result<Vec<Transaction>, Error>;

    /// Retrieve the transactions owned by `user_id` that were created within
    /// `window` (inclusive on both ends).
    fn get_by_user_in_range(
        &self,
        user_id: &str,
        window: DateWindow,
    ) -> Result<Vec<Transaction>, Error>;

    /// Replace the title, amount and category of the transaction `id`.
    ///
    /// Returns [Error::NotFound] if there is no such transaction.
    fn update(&self, id: TransactionId, changes: TransactionChanges)
    -> Result<Transaction, Error>;

    /// Remove the transaction `id`, returning its state before removal.
    ///
    /// Returns [Error::NotFound] if there is no such transaction.
    fn delete(&self, id: TransactionId) -> Result<Transaction, Error>;

    /// Sum the amounts of the transactions owned by `user_id` that match `sign`.
    ///
    /// Returns [Amount::ZERO] when no transactions match.
    fn sum_where(&self, user_id: &str, sign: AmountSign) -> Result<Amount, Error>;

    /// Sum the amounts of the transactions owned by `user_id` for every
    /// [AmountSign] at once.
    ///
    /// The three sums are read from the same snapshot of the store, so
    /// `balance == income + expenses` holds even while other requests write.
    fn summary(&self, user_id: &str) -> Result<Summary, Error>;

    /// Get the total number of transactions in the store.
    fn count(&self) -> Result<usize, Error>;
}

/// Selects transactions by the sign of their amount in [TransactionStore::sum_where].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountSign {
    /// Every transaction.
    Any,
    /// Amounts of zero or more.
    Income,
    /// Amounts below zero.
    Expense,
}
