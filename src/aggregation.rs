//! Derived values over a user's ledger: the balance summary and date range listings.

use serde::{Deserialize, Serialize};

use crate::{
    Error,
    money::Amount,
    range_filter::DateWindow,
    stores::TransactionStore,
    transaction::Transaction,
};

/// The balance, income and expenses of a user's ledger.
///
/// `expenses` is the signed sum of the negative amounts, so it is never
/// positive. Clients flip the sign for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Summary {
    /// The sum of all amounts.
    pub balance: Amount,
    /// The sum of the amounts that are zero or more.
    pub income: Amount,
    /// The sum of the amounts below zero.
    pub expenses: Amount,
}

/// Compute the [Summary] of the ledger owned by `user_id`.
///
/// Each figure is summed independently by the store from one snapshot, so an
/// empty ledger yields all zeros.
///
/// # Errors
/// Returns an error if the sums could not be read from the store.
pub fn summarize(store: &impl TransactionStore, user_id: &str) -> Result<Summary, Error> {
    store.summary(user_id)
}

/// List the transactions owned by `user_id` that were created within
/// `window`, most recent first.
///
/// The order does not depend on the order the store returns rows in. Ties on
/// the creation time are broken by descending ID.
///
/// # Errors
/// Returns [Error::NoTransactions] if no transactions fall within the window,
/// or an error from the store.
pub fn list_in_range(
    store: &impl TransactionStore,
    user_id: &str,
    window: DateWindow,
) -> Result<Vec<Transaction>, Error> {
    let mut transactions = store.get_by_user_in_range(user_id, window)?;

    if transactions.is_empty() {
        return Err(Error::NoTransactions);
    }

    sort_most_recent_first(&mut transactions);

    Ok(transactions)
}

fn sort_most_recent_first(transactions: &mut [Transaction]) {
    transactions.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    });
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use rusqlite::Connection;
    use rust_decimal_macros::dec;
    use time::{
        OffsetDateTime, UtcOffset,
        macros::{date, datetime},
    };

    use crate::{
        Error,
        aggregation::{Summary, list_in_range, sort_most_recent_first, summarize},
        db::initialize,
        money::Amount,
        range_filter::{DateWindow, RangeFilter},
        stores::{SQLiteTransactionStore, TransactionStore},
        transaction::Transaction,
    };

    fn get_store() -> SQLiteTransactionStore {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        SQLiteTransactionStore::new(Arc::new(Mutex::new(conn)))
    }

    fn create(
        store: &SQLiteTransactionStore,
        user_id: &str,
        cents: i64,
        created_at: OffsetDateTime,
    ) -> Transaction {
        store
            .create(
                Transaction::build(user_id, "Item", Amount::from_cents(cents), "Misc")
                    .created_at(Some(created_at)),
            )
            .expect("could not create test transaction")
    }

    #[test]
    fn empty_ledger_summary_is_zero() {
        let store = get_store();

        let summary = summarize(&store, "u1").unwrap();

        assert_eq!(
            summary,
            Summary {
                balance: Amount::ZERO,
                income: Amount::ZERO,
                expenses: Amount::ZERO,
            }
        );
    }

    #[test]
    fn balance_is_income_plus_signed_expenses() {
        let store = get_store();
        let now = OffsetDateTime::now_utc();
        for cents in [250_000, -4_550, -120_000, 0, 1_999, -1] {
            create(&store, "u1", cents, now);
        }

        let summary = summarize(&store, "u1").unwrap();

        assert_eq!(summary.income, Amount::from_cents(251_999));
        assert_eq!(summary.expenses, Amount::from_cents(-124_551));
        assert_eq!(summary.balance, summary.income + summary.expenses);
    }

    #[test]
    fn summary_does_not_include_other_users() {
        let store = get_store();
        let now = OffsetDateTime::now_utc();
        create(&store, "u1", -450, now);
        create(&store, "u2", 100_000, now);

        let summary = summarize(&store, "u1").unwrap();

        assert_eq!(summary.balance.as_decimal(), dec!(-4.50));
        assert_eq!(summary.income, Amount::ZERO);
        assert_eq!(summary.expenses.as_decimal(), dec!(-4.50));
    }

    #[test]
    fn summary_serializes_exact_strings() {
        let summary = Summary {
            balance: Amount::from_cents(-450),
            income: Amount::ZERO,
            expenses: Amount::from_cents(-450),
        };

        let json = serde_json::to_value(summary).unwrap();

        assert_eq!(
            json,
            serde_json::json!({"balance": "-4.50", "income": "0.00", "expenses": "-4.50"})
        );
    }

    #[test]
    fn last7_on_day_d_lists_only_the_trailing_week() {
        let store = get_store();
        let today = date!(2025 - 06 - 15);
        let window = RangeFilter::Last7.window(today, &UtcOffset::UTC);
        let oldest = create(&store, "u1", 100, datetime!(2025-06-09 00:00:00.000 UTC));
        let newest = create(&store, "u1", 200, datetime!(2025-06-15 23:59:59.999 UTC));
        let middle = create(&store, "u1", 300, datetime!(2025-06-12 09:00:00 UTC));
        create(&store, "u1", 400, datetime!(2025-06-08 23:59:59.999 UTC));

        let got = list_in_range(&store, "u1", window).unwrap();

        assert_eq!(got, vec![newest, middle, oldest]);
    }

    #[test]
    fn empty_range_is_no_transactions() {
        let store = get_store();
        create(&store, "u1", 100, datetime!(2025-01-01 12:00:00 UTC));
        let window = DateWindow::from_days(
            date!(2025 - 06 - 01),
            date!(2025 - 06 - 30),
            &UtcOffset::UTC,
        );

        assert_eq!(
            list_in_range(&store, "u1", window),
            Err(Error::NoTransactions)
        );
    }

    #[test]
    fn sorts_by_creation_time_then_id() {
        let same_time = datetime!(2025-06-12 09:00:00 UTC);
        let transaction = |id, created_at| Transaction {
            id,
            user_id: "u1".to_owned(),
            title: "Item".to_owned(),
            amount: Amount::ZERO,
            category: "Misc".to_owned(),
            created_at,
        };
        let mut transactions = vec![
            transaction(1, datetime!(2025-06-01 09:00:00 UTC)),
            transaction(2, same_time),
            transaction(3, same_time),
            transaction(4, datetime!(2025-06-20 09:00:00 UTC)),
        ];

        sort_most_recent_first(&mut transactions);

        let ids: Vec<_> = transactions.iter().map(|transaction| transaction.id).collect();
        assert_eq!(ids, vec![4, 3, 2, 1]);
    }
}
