//! The repository seam between the monitor and its persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use slotwatch_core::catalog::{AppointmentType, Location};
use slotwatch_core::types::{Appointment, NotificationRecord};

use crate::error::DbResult;

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Narrow repository the monitor needs. Every implementation must treat `(location, starts_at)`
/// as a natural key and `(appointment, target, available)` as the notification boundary.
#[async_trait]
pub trait AppointmentStore: Send + Sync {
    /// Returns the stored appointment for the slot, inserting it as available if it is new.
    async fn create_appointment_if_absent(
        &self,
        location: Location,
        starts_at: DateTime<Utc>,
    ) -> DbResult<Appointment>;

    /// Appointments starting at or after `now` in any of `locations`, earliest first.
    async fn list_tracked_appointments_not_past(
        &self,
        now: DateTime<Utc>,
        locations: &[Location],
    ) -> DbResult<Vec<Appointment>>;

    /// Marks every available appointment starting before `now` unavailable and returns them.
    async fn mark_past(&self, now: DateTime<Utc>) -> DbResult<Vec<Appointment>>;

    async fn update_availability(&self, id: Uuid, available: bool) -> DbResult<()>;

    async fn notification_count(&self, appointment_id: Uuid, target: &str) -> DbResult<i64>;

    /// Most recent notification for the appointment sent to `target`, if any.
    async fn last_notification(
        &self,
        appointment_id: Uuid,
        target: &str,
    ) -> DbResult<Option<NotificationRecord>>;

    async fn record_notification(
        &self,
        appointment_id: Uuid,
        target: &str,
        available: bool,
        appointment_type: AppointmentType,
    ) -> DbResult<NotificationRecord>;
}
