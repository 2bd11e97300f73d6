//! Conversions from stored rows to domain types.

use slotwatch_core::catalog::{AppointmentType, Location};
use slotwatch_core::types::{Appointment, NotificationRecord};

use crate::error::{DbError, DbResult};
use crate::model::appointment::AppointmentRow;
use crate::model::notification::NotificationRow;

impl AppointmentRow {
    /// ## Summary
    /// Converts the row into a domain [`Appointment`].
    ///
    /// ## Errors
    /// Returns `DbError::CorruptRow` if the stored location is not a known location.
    pub fn into_domain(self) -> DbResult<Appointment> {
        let location = Location::parse(&self.location);
        if !location.is_valid() {
            return Err(DbError::CorruptRow {
                table: "appointment",
                id: self.id,
                reason: format!("unknown location {:?}", self.location),
            });
        }
        Ok(Appointment {
            id: self.id,
            location,
            starts_at: self.starts_at,
            available: self.available,
        })
    }
}

impl NotificationRow {
    /// ## Summary
    /// Converts the row into a domain [`NotificationRecord`].
    ///
    /// ## Errors
    /// Returns `DbError::CorruptRow` if the stored appointment type is unknown.
    pub fn into_domain(self) -> DbResult<NotificationRecord> {
        let appointment_type = AppointmentType::parse(&self.appointment_type);
        if !appointment_type.is_valid() {
            return Err(DbError::CorruptRow {
                table: "notification",
                id: self.id,
                reason: format!("unknown appointment type {:?}", self.appointment_type),
            });
        }
        Ok(NotificationRecord {
            id: self.id,
            appointment_id: self.appointment_id,
            target: self.target,
            available: self.available,
            appointment_type,
            notified_at: self.notified_at,
        })
    }
}

/// Converts a batch of rows, failing on the first corrupt one.
pub(crate) fn appointments_into_domain(rows: Vec<AppointmentRow>) -> DbResult<Vec<Appointment>> {
    rows.into_iter().map(AppointmentRow::into_domain).collect()
}
