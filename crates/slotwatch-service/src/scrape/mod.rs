//! Browser-driven discovery of appointment slots.

use std::time::Duration;

pub mod calendar;
pub mod error;
pub mod navigator;
pub mod orchestrator;
pub mod times;

pub use calendar::CalendarWalker;
pub use navigator::FlowNavigator;
pub use orchestrator::LocationOrchestrator;

/// Deadlines for the browser waits of one location flow.
#[derive(Debug, Clone, Copy)]
pub struct ScrapeOptions {
    /// Deadline of waits whose expiry means the page has nothing to offer.
    pub wait_timeout: Duration,
    /// Deadline of waits whose expiry is an automation failure.
    pub step_timeout: Duration,
}
