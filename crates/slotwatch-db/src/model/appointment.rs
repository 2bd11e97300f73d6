//! Models for observed appointment slots.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::schema::appointment;

/// Stored appointment slot.
///
/// `(location, starts_at)` is unique, so re-observing a slot always lands on the same row.
#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = appointment)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct AppointmentRow {
    /// UUID v7 primary key.
    pub id: Uuid,
    /// Location name as produced by `Location::as_str`.
    pub location: String,
    pub starts_at: DateTime<Utc>,
    pub available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New appointment for insertion.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = appointment)]
pub struct NewAppointment<'a> {
    pub id: Uuid,
    pub location: &'a str,
    pub starts_at: DateTime<Utc>,
    pub available: bool,
}

impl<'a> NewAppointment<'a> {
    /// Creates an available appointment with a fresh UUID v7.
    #[must_use]
    pub fn new(location: &'a str, starts_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::now_v7(),
            location,
            starts_at,
            available: true,
        }
    }
}
