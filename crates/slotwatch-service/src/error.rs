use thiserror::Error;

use crate::browser::BrowserError;
use crate::scrape::error::ScrapeError;

/// Service layer errors - combines all error types
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    DatabaseError(#[from] slotwatch_db::error::DbError),

    #[error(transparent)]
    CoreError(#[from] slotwatch_core::error::CoreError),

    #[error("Failed to check locations: {0}")]
    ScrapeError(#[from] ScrapeError),

    #[error(transparent)]
    BrowserError(#[from] BrowserError),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

impl ServiceError {
    /// Whether retrying the same tick right away is expected to succeed.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        match self {
            Self::ScrapeError(err) => err.is_transient(),
            Self::BrowserError(err) => err.is_transient(),
            Self::DatabaseError(_) | Self::CoreError(_) | Self::InvalidConfiguration(_) => false,
        }
    }
}

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;
