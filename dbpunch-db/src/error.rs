//! Error types for the MySQL layer.

use thiserror::Error;

/// Errors raised by the MySQL layer, one variant per failing operation.
#[derive(Debug, Error)]
pub enum DbError {
    /// Connecting to the server failed.
    #[error("failed connecting to mysql: {0}")]
    Connect(#[source] sqlx::Error),

    /// Creating the database failed.
    #[error("failed creating the database: {0}")]
    CreateDatabase(#[source] sqlx::Error),

    /// Creating the punch table failed.
    #[error("failed creating the punch table: {0}")]
    CreateTable(#[source] sqlx::Error),

    /// Inserting a record failed.
    #[error("failed inserting a record: {0}")]
    Insert(#[source] sqlx::Error),

    /// Resetting the punch table failed.
    #[error("failed resetting punch records: {0}")]
    Reset(#[source] sqlx::Error),
}

/// Result type for database operations.
pub type Result<T> = std::result::Result<T, DbError>;
