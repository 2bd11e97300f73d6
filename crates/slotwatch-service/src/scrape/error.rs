use std::time::Duration;

use slotwatch_core::catalog::Location;
use thiserror::Error;

use crate::browser::BrowserError;

/// Errors raised while scraping the booking site
#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error(transparent)]
    Browser(#[from] BrowserError),

    #[error("Calendar changed while walking it: expected {expected} days, found {actual}")]
    CalendarDrift { expected: usize, actual: usize },

    #[error("Found no node for location {0:?}")]
    LocationNodeMissing(Location),

    #[error("Found {count} nodes for location {location:?}")]
    DuplicateLocationNodes { location: Location, count: usize },

    #[error("Malformed time dropdown: {0}")]
    Markup(String),

    #[error("Scrape deadline of {0:?} exceeded")]
    DeadlineExceeded(Duration),

    #[error("Scrape task for {0:?} panicked")]
    TaskPanicked(Location),

    #[error("Scrape of {0:?} cancelled after another location failed")]
    Cancelled(Location),

    #[error("Result channel closed before every location reported")]
    ResultChannelClosed,
}

impl ScrapeError {
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        match self {
            Self::Browser(err) => err.is_transient(),
            _ => false,
        }
    }
}

pub type ScrapeResult<T> = std::result::Result<T, ScrapeError>;
