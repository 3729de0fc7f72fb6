//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{
    Error, admission::AdmissionControl, db::initialize, stores::SQLiteTransactionStore,
    timezone::get_timezone,
};

/// The state of the REST server.
///
/// Built once at start up and shared by every request.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The store for the transaction ledger.
    pub transaction_store: SQLiteTransactionStore,

    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    ///
    /// Day boundaries for date range queries are computed in this timezone.
    pub local_timezone: String,

    /// Decides whether a caller may make another request.
    pub admission: Arc<dyn AdmissionControl>,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for the domain models.
    /// `local_timezone` should be a valid, canonical timezone name, e.g. "Pacific/Auckland".
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized or the timezone is invalid.
    pub fn new(
        db_connection: Connection,
        local_timezone: &str,
        admission: Arc<dyn AdmissionControl>,
    ) -> Result<Self, Error> {
        if get_timezone(local_timezone).is_none() {
            return Err(Error::InvalidTimezone(local_timezone.to_owned()));
        }

        initialize(&db_connection)?;

        let connection = Arc::new(Mutex::new(db_connection));

        Ok(Self {
            transaction_store: SQLiteTransactionStore::new(connection),
            local_timezone: local_timezone.to_owned(),
            admission,
        })
    }
}
