use axum::{
    Json,
    extract::{FromRef, Path, Query, State, rejection::QueryRejection},
};

use crate::{
    AppState, Error,
    aggregation::list_in_range,
    range_filter::{RangeFilter, RangeQuery},
    stores::SQLiteTransactionStore,
    timezone::{get_timezone, local_today},
    transaction::Transaction,
};

/// The state needed to list transactions by date.
#[derive(Debug, Clone)]
pub struct DateRangeState {
    /// The store for the transaction ledger.
    pub transaction_store: SQLiteTransactionStore,
    /// The canonical timezone that day boundaries are computed in.
    pub local_timezone: String,
}

impl FromRef<AppState> for DateRangeState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            transaction_store: state.transaction_store.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// A route handler that lists a user's transactions within a date window,
/// most recent first.
///
/// The window is chosen by the `filter` query parameter, one of `today`,
/// `last7`, `last30` or `custom` (with `start` and `end` dates).
/// Responds with 400 for an invalid filter and 404 if no transactions fall
/// within the window.
pub async fn get_transactions_by_date_endpoint(
    State(state): State<DateRangeState>,
    Path(user_id): Path<String>,
    query: Result<Query<RangeQuery>, QueryRejection>,
) -> Result<Json<Vec<Transaction>>, Error> {
    let Query(query) = query.map_err(|rejection| Error::Validation(rejection.body_text()))?;
    let filter = RangeFilter::parse(&query)?;

    let Some(timezone) = get_timezone(&state.local_timezone) else {
        tracing::error!("Invalid timezone {}", state.local_timezone);
        return Err(Error::InvalidTimezone(state.local_timezone));
    };
    let window = filter.window(local_today(timezone), timezone);

    list_in_range(&state.transaction_store, &user_id, window)
        .map(Json)
        .inspect_err(|error| {
            if !matches!(error, Error::NoTransactions) {
                tracing::error!("Could not list transactions for user {user_id}: {error}");
            }
        })
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Json,
        extract::{Path, Query, State},
    };
    use rusqlite::Connection;
    use time::{Duration, OffsetDateTime};

    use crate::{
        Error,
        db::initialize,
        money::Amount,
        range_filter::RangeQuery,
        stores::{SQLiteTransactionStore, TransactionStore},
        transaction::{
            Transaction,
            date_range_endpoint::{DateRangeState, get_transactions_by_date_endpoint},
        },
    };

    fn get_state() -> DateRangeState {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();

        DateRangeState {
            transaction_store: SQLiteTransactionStore::new(Arc::new(Mutex::new(conn))),
            local_timezone: "Etc/UTC".to_owned(),
        }
    }

    fn query(filter: &str) -> RangeQuery {
        RangeQuery {
            filter: Some(filter.to_owned()),
            ..Default::default()
        }
    }

    fn create_at(state: &DateRangeState, created_at: OffsetDateTime) -> Transaction {
        state
            .transaction_store
            .create(
                Transaction::build("u1", "Coffee", Amount::from_cents(-450), "Food & Drinks")
                    .created_at(Some(created_at)),
            )
            .unwrap()
    }

    #[tokio::test]
    async fn lists_recent_transactions_newest_first() {
        let state = get_state();
        let now = OffsetDateTime::now_utc();
        let older = create_at(&state, now - Duration::days(3));
        let newer = create_at(&state, now);
        create_at(&state, now - Duration::days(10));

        let Json(transactions) = get_transactions_by_date_endpoint(
            State(state),
            Path("u1".to_owned()),
            Ok(Query(query("last7"))),
        )
        .await
        .unwrap();

        assert_eq!(transactions, vec![newer, older]);
    }

    #[tokio::test]
    async fn custom_range_is_inclusive() {
        let state = get_state();
        let first = create_at(&state, time::macros::datetime!(2025-01-01 00:00:00 UTC));
        let last = create_at(&state, time::macros::datetime!(2025-01-31 23:59:59.999 UTC));
        create_at(&state, time::macros::datetime!(2025-02-01 00:00:00 UTC));
        let query = RangeQuery {
            filter: Some("custom".to_owned()),
            start: Some("2025-01-01".to_owned()),
            end: Some("2025-01-31".to_owned()),
        };

        let Json(transactions) =
            get_transactions_by_date_endpoint(State(state), Path("u1".to_owned()), Ok(Query(query)))
                .await
                .unwrap();

        assert_eq!(transactions, vec![last, first]);
    }

    #[tokio::test]
    async fn unknown_filter_is_rejected() {
        let result = get_transactions_by_date_endpoint(
            State(get_state()),
            Path("u1".to_owned()),
            Ok(Query(query("bogus"))),
        )
        .await;

        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[tokio::test]
    async fn empty_window_is_no_transactions() {
        let result = get_transactions_by_date_endpoint(
            State(get_state()),
            Path("u1".to_owned()),
            Ok(Query(query("today"))),
        )
        .await;

        assert!(matches!(result, Err(Error::NoTransactions)));
    }

    #[tokio::test]
    async fn custom_range_uses_offset_of_its_own_days() {
        let state = DateRangeState {
            local_timezone: "Pacific/Auckland".to_owned(),
            ..get_state()
        };
        // Local June 30 and July 1 in NZST (+12), whatever the offset is today.
        create_at(&state, time::macros::datetime!(2025-06-30 23:30:00 +12));
        let july_first = create_at(&state, time::macros::datetime!(2025-07-01 00:30:00 +12));
        let query = RangeQuery {
            filter: Some("custom".to_owned()),
            start: Some("2025-07-01".to_owned()),
            end: Some("2025-07-31".to_owned()),
        };

        let Json(transactions) = get_transactions_by_date_endpoint(
            State(state),
            Path("u1".to_owned()),
            Ok(Query(query)),
        )
        .await
        .unwrap();

        assert_eq!(transactions, vec![july_first]);
    }
}
