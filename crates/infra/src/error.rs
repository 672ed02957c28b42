//! Storage error model.
//!
//! SQLx errors are mapped to `StoreError` as follows:
//!
//! | SQLx Error | PostgreSQL Error Code | StoreError | Scenario |
//! |------------|----------------------|------------|----------|
//! | Database (unique violation) | `23505` | `Conflict` | Duplicate username/email |
//! | Database (check constraint violation) | `23514` | `Database` | Out-of-range count or enum value |
//! | Database (other) | Any other | `Database` | Other database errors |
//! | PoolClosed | N/A | `Database` | Connection pool was closed |
//! | Other | N/A | `Database` | Network errors, connection failures, etc. |

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The backing database rejected or failed the operation.
    #[error("{0}")]
    Database(String),

    /// A uniqueness constraint was violated.
    #[error("{0}")]
    Conflict(String),

    /// A stored row could not be decoded into a domain record.
    #[error("corrupt row: {0}")]
    Corrupt(String),

    /// An in-memory store lock was poisoned by a panicking writer.
    #[error("store lock poisoned")]
    Poisoned,
}

pub type StoreResult<T> = Result<T, StoreError>;

pub(crate) fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            let msg = format!("database error in {}: {}", operation, db_err.message());

            match db_err.code().as_deref() {
                Some("23505") => StoreError::Conflict(msg),
                _ => StoreError::Database(msg),
            }
        }
        sqlx::Error::PoolClosed => StoreError::Database(format!("connection pool closed in {}", operation)),
        sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
            StoreError::Corrupt(format!("{} in {}", err, operation))
        }
        _ => StoreError::Database(format!("sqlx error in {}: {}", operation, err)),
    }
}
