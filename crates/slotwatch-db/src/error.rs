use thiserror::Error;

/// Database layer errors
#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] diesel::result::Error),

    #[error("Pool error: {0}")]
    PoolError(#[from] diesel_async::pooled_connection::bb8::RunError),

    #[error("Migration error: {0}")]
    MigrationError(String),

    #[error("Corrupt {table} row {id}: {reason}")]
    CorruptRow {
        table: &'static str,
        id: uuid::Uuid,
        reason: String,
    },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    CoreError(#[from] slotwatch_core::error::CoreError),
}

pub type DbResult<T> = std::result::Result<T, DbError>;
