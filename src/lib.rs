//! A JSON API for recording personal income and expenses.
//!
//! Each user has a ledger of transactions. The API lists, creates, updates and
//! deletes transactions, summarizes a user's balance, income and expenses,
//! and lists transactions within named or custom date windows.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod admission;
mod aggregation;
mod app_state;
mod database_id;
mod db;
mod endpoints;
mod error;
mod logging;
mod money;
mod range_filter;
mod routing;
pub mod stores;
mod timezone;
mod transaction;
mod validation;

pub use admission::{AdmissionControl, SlidingWindowLimiter};
pub use aggregation::Summary;
pub use app_state::AppState;
pub use db::initialize as initialize_db;
pub use error::Error;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use money::Amount;
pub use range_filter::DateWindow;
pub use routing::build_router;
pub use transaction::{Transaction, TransactionBuilder, TransactionChanges};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("Could not listen for the ctrl+c signal: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut terminate) => {
                terminate.recv().await;
            }
            Err(error) => {
                tracing::error!("Could not install the terminate signal handler: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}
