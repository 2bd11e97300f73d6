//! The monitoring loop: scrape, diff, update and notify.

use std::time::Duration;

use slotwatch_core::catalog::{AppointmentType, Location};
use slotwatch_core::config::Settings;

pub mod diff;
pub mod dispatch;
pub mod scheduler;
pub mod tick;

pub use diff::{DiffOutcome, diff_appointments};
pub use dispatch::{DispatchSettings, Dispatcher};
pub use scheduler::{Scheduler, SchedulerSettings};
pub use tick::{Monitor, TickReport};

/// What one tick watches and how it announces changes.
#[derive(Debug, Clone)]
pub struct MonitorSettings {
    pub appointment_type: AppointmentType,
    pub locations: Vec<Location>,
    /// Shared deadline for scraping every location.
    pub timeout: Duration,
    pub notify_unavailable: bool,
    pub pacing: Duration,
}

impl MonitorSettings {
    #[must_use]
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            appointment_type: settings.monitor.appointment_type,
            locations: settings.monitor.locations.clone(),
            timeout: settings.monitor.timeout(),
            notify_unavailable: settings.monitor.notify_unavailable,
            pacing: settings.notify.pacing(),
        }
    }

    #[must_use]
    pub const fn dispatch(&self) -> DispatchSettings {
        DispatchSettings {
            appointment_type: self.appointment_type,
            notify_unavailable: self.notify_unavailable,
            pacing: self.pacing,
        }
    }
}
