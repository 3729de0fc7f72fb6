//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/api/transactions/{id}', use [format_endpoint].

/// The route to list all transactions and create new ones.
pub const TRANSACTIONS: &str = "/api/transactions";
/// The route for a single transaction.
///
/// `GET` treats the parameter as a user ID and lists that user's
/// transactions, `PUT` and `DELETE` treat it as a transaction ID.
pub const TRANSACTION: &str = "/api/transactions/{id}";
/// The route for the balance summary of a user.
pub const TRANSACTION_SUMMARY: &str = "/api/transactions/summary/{user_id}";
/// The route for listing a user's transactions within a date range.
pub const TRANSACTIONS_BY_DATE: &str = "/api/transactions/date/{user_id}";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// Assumes `endpoint_path` contains exactly one parameter wrapped in braces.
#[cfg(test)]
pub fn format_endpoint(endpoint_path: &str, id: impl std::fmt::Display) -> String {
    match (endpoint_path.find('{'), endpoint_path.find('}')) {
        (Some(start), Some(end)) if start < end => {
            format!("{}{id}{}", &endpoint_path[..start], &endpoint_path[end + 1..])
        }
        _ => endpoint_path.to_owned(),
    }
}
