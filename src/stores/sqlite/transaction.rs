//! Implements a SQLite backed transaction store.
use std::sync::{Arc, Mutex, MutexGuard};

use axum::extract::FromRef;
use rusqlite::{Connection, Row, params, types::Type};
use time::OffsetDateTime;

use crate::{
    AppState, Error,
    aggregation::Summary,
    database_id::TransactionId,
    money::Amount,
    range_filter::DateWindow,
    stores::{AmountSign, TransactionStore},
    transaction::{Transaction, TransactionBuilder, TransactionChanges},
    validation::validate_text,
};

const TRANSACTION_COLUMNS: &str = "id, user_id, title, amount, category, created_at";

/// Stores transactions in a SQLite database.
///
/// Amounts are stored as integer cents and creation times as milliseconds
/// since the Unix epoch, so sums and range comparisons are exact.
#[derive(Debug, Clone)]
pub struct SQLiteTransactionStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteTransactionStore {
    /// Create a new store for the SQLite `connection`.
    ///
    /// The transaction table must already exist, see [crate::initialize_db].
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.connection.lock().map_err(|error| {
            tracing::error!("Could not acquire database lock: {error}");
            Error::DatabaseLockError
        })
    }

    fn query_transactions(
        &self,
        query: &str,
        params: impl rusqlite::Params,
    ) -> Result<Vec<Transaction>, Error> {
        self.lock()?
            .prepare(query)?
            .query_map(params, map_transaction_row)?
            .map(|maybe_transaction| maybe_transaction.map_err(Error::from))
            .collect()
    }
}

impl FromRef<AppState> for SQLiteTransactionStore {
    fn from_ref(state: &AppState) -> Self {
        state.transaction_store.clone()
    }
}

impl TransactionStore for SQLiteTransactionStore {
    /// Create a new transaction in the database.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::Validation] if the user ID, title or category is empty,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn create(&self, builder: TransactionBuilder) -> Result<Transaction, Error> {
        let user_id = validate_text("user_id", &builder.user_id)?;
        let title = validate_text("title", &builder.title)?;
        let category = validate_text("category", &builder.category)?;
        let created_at = builder
            .created_at
            .unwrap_or_else(OffsetDateTime::now_utc);

        let transaction = self
            .lock()?
            .prepare(&format!(
                "INSERT INTO transactions (user_id, title, amount, category, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 RETURNING {TRANSACTION_COLUMNS}"
            ))?
            .query_row(
                params![
                    user_id,
                    title,
                    builder.amount,
                    category,
                    to_unix_millis(created_at)
                ],
                map_transaction_row,
            )?;

        Ok(transaction)
    }

    /// Retrieve a transaction in the database by its `id`.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if `id` does not refer to a valid transaction,
    /// - or [Error::SqlError] there is some other SQL error.
    fn get(&self, id: TransactionId) -> Result<Transaction, Error> {
        let transaction = self
            .lock()?
            .prepare(&format!(
                "SELECT {TRANSACTION_COLUMNS} FROM transactions WHERE id = :id"
            ))?
            .query_row(&[(":id", &id)], map_transaction_row)?;

        Ok(transaction)
    }

    fn get_all(&self) -> Result<Vec<Transaction>, Error> {
        self.query_transactions(
            &format!("SELECT {TRANSACTION_COLUMNS} FROM transactions"),
            [],
        )
    }

    fn get_by_user(&self, user_id: &str) -> Result<Vec<Transaction>, Error> {
        self.query_transactions(
            &format!("SELECT {TRANSACTION_COLUMNS} FROM transactions WHERE user_id = ?1"),
            [user_id],
        )
    }

    /// Query for a user's transactions created within `window`.
    ///
    /// Results are sorted by creation time, most recent first, and then by
    /// descending ID.
    fn get_by_user_in_range(
        &self,
        user_id: &str,
        window: DateWindow,
    ) -> Result<Vec<Transaction>, Error> {
        self.query_transactions(
            &format!(
                "SELECT {TRANSACTION_COLUMNS} FROM transactions
                 WHERE user_id = ?1 AND created_at BETWEEN ?2 AND ?3
                 ORDER BY created_at DESC, id DESC"
            ),
            params![
                user_id,
                to_unix_millis(window.start),
                to_unix_millis(window.end)
            ],
        )
    }

    /// Update the mutable fields of the transaction `id`.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::Validation] if the title or category is empty,
    /// - [Error::NotFound] if `id` does not refer to a valid transaction,
    /// - or [Error::SqlError] there is some other SQL error.
    fn update(
        &self,
        id: TransactionId,
        changes: TransactionChanges,
    ) -> Result<Transaction, Error> {
        let title = validate_text("title", &changes.title)?;
        let category = validate_text("category", &changes.category)?;

        let transaction = self
            .lock()?
            .prepare(&format!(
                "UPDATE transactions
                 SET title = ?1, amount = ?2, category = ?3
                 WHERE id = ?4
                 RETURNING {TRANSACTION_COLUMNS}"
            ))?
            .query_row(
                params![title, changes.amount, category, id],
                map_transaction_row,
            )?;

        Ok(transaction)
    }

    /// Delete the transaction `id`.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if `id` does not refer to a valid transaction,
    /// - or [Error::SqlError] there is some other SQL error.
    fn delete(&self, id: TransactionId) -> Result<Transaction, Error> {
        let transaction = self
            .lock()?
            .prepare(&format!(
                "DELETE FROM transactions WHERE id = :id RETURNING {TRANSACTION_COLUMNS}"
            ))?
            .query_row(&[(":id", &id)], map_transaction_row)?;

        Ok(transaction)
    }

    fn sum_where(&self, user_id: &str, sign: AmountSign) -> Result<Amount, Error> {
        let sign_clause = match sign {
            AmountSign::Any => "",
            AmountSign::Income => "AND amount >= 0",
            AmountSign::Expense => "AND amount < 0",
        };

        self.lock()?
            .query_row(
                &format!(
                    "SELECT COALESCE(SUM(amount), 0) FROM transactions
                     WHERE user_id = ?1 {sign_clause}"
                ),
                [user_id],
                |row| row.get(0),
            )
            .map_err(Error::from)
    }

    fn summary(&self, user_id: &str) -> Result<Summary, Error> {
        self.lock()?
            .query_row(
                "SELECT
                    COALESCE(SUM(amount), 0),
                    COALESCE(SUM(CASE WHEN amount >= 0 THEN amount END), 0),
                    COALESCE(SUM(CASE WHEN amount < 0 THEN amount END), 0)
                 FROM transactions
                 WHERE user_id = ?1",
                [user_id],
                |row| {
                    Ok(Summary {
                        balance: row.get(0)?,
                        income: row.get(1)?,
                        expenses: row.get(2)?,
                    })
                },
            )
            .map_err(Error::from)
    }

    /// Get the total number of transactions in the database.
    ///
    /// # Errors
    /// This function will return a [Error::SqlError] there is some SQL error.
    fn count(&self) -> Result<usize, Error> {
        self.lock()?
            .query_row("SELECT COUNT(id) FROM transactions;", [], |row| row.get(0))
            .map_err(Error::from)
    }
}

/// Create the transaction table in the database.
///
/// Safe to call on every start up, existing tables are left untouched.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS transactions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id TEXT NOT NULL CHECK (length(user_id) > 0),
                title TEXT NOT NULL CHECK (length(title) > 0),
                amount INTEGER NOT NULL,
                category TEXT NOT NULL CHECK (length(category) > 0),
                created_at INTEGER NOT NULL DEFAULT (CAST(strftime('%s', 'now') AS INTEGER) * 1000)
                )",
        (),
    )?;

    // Used by the per-user listing, range and summary queries.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transactions_user_created_at
         ON transactions(user_id, created_at);",
        (),
    )?;

    Ok(())
}

/// Map a database row to a Transaction.
///
/// The row must contain the columns in the order of `TRANSACTION_COLUMNS`.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let user_id = row.get(1)?;
    let title = row.get(2)?;
    let amount = row.get(3)?;
    let category = row.get(4)?;
    let created_at = from_unix_millis(row.get(5)?).map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(5, Type::Integer, Box::new(error))
    })?;

    Ok(Transaction {
        id,
        user_id,
        title,
        amount,
        category,
        created_at,
    })
}

fn to_unix_millis(date_time: OffsetDateTime) -> i64 {
    date_time.unix_timestamp_nanos().div_euclid(1_000_000) as i64
}

fn from_unix_millis(millis: i64) -> Result<OffsetDateTime, time::error::ComponentRange> {
    OffsetDateTime::from_unix_timestamp_nanos(i128::from(millis) * 1_000_000)
}
