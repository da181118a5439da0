//! Error handling utilities for repositories

use sqlx::Error as SqlxError;
use tally_core::DomainError;

/// Convert a SQLx error into the typed store error.
///
/// Every connectivity or query failure surfaces as `StoreUnavailable`, which
/// callers treat as retryable with no side effects assumed persisted.
pub fn map_db_error(e: SqlxError) -> DomainError {
    DomainError::StoreUnavailable(e.to_string())
}

/// Check for unique violation and return appropriate error or fallback
pub fn map_unique_violation<F>(e: SqlxError, on_unique: F) -> DomainError
where
    F: FnOnce() -> DomainError,
{
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return on_unique();
        }
    }
    DomainError::StoreUnavailable(e.to_string())
}
