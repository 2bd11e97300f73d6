use std::fmt;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::catalog::{AppointmentType, Location};

/// Natural identity of an appointment slot, independent of any storage id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NaturalKey {
    pub location: Location,
    pub starts_at: DateTime<Utc>,
}

/// A slot seen on the booking site during a scrape, not yet persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObservedAppointment {
    pub location: Location,
    pub starts_at: DateTime<Utc>,
}

impl ObservedAppointment {
    #[must_use]
    pub const fn new(location: Location, starts_at: DateTime<Utc>) -> Self {
        Self {
            location,
            starts_at,
        }
    }

    #[must_use]
    pub const fn natural_key(&self) -> NaturalKey {
        NaturalKey {
            location: self.location,
            starts_at: self.starts_at,
        }
    }
}

impl fmt::Display for ObservedAppointment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Appointment(location: {:?}, time: {})",
            self.location.as_str(),
            self.starts_at
        )
    }
}

/// A persisted appointment slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Appointment {
    /// UUID v7 primary key.
    pub id: Uuid,
    pub location: Location,
    pub starts_at: DateTime<Utc>,
    /// Whether the slot was bookable the last time it was checked.
    pub available: bool,
}

impl Appointment {
    #[must_use]
    pub const fn natural_key(&self) -> NaturalKey {
        NaturalKey {
            location: self.location,
            starts_at: self.starts_at,
        }
    }
}

/// Proof that a notification was delivered for an appointment in a given availability state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationRecord {
    pub id: Uuid,
    pub appointment_id: Uuid,
    /// Delivery address the message went to (webhook URL or `log`).
    pub target: String,
    /// Availability of the appointment as announced.
    pub available: bool,
    /// Appointment type the monitor was watching when it announced.
    pub appointment_type: AppointmentType,
    pub notified_at: DateTime<Utc>,
}
