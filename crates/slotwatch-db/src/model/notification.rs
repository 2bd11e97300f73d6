//! Models for delivered notifications.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::schema::notification;

/// Stored notification.
#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = notification)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NotificationRow {
    pub id: Uuid,
    pub appointment_id: Uuid,
    pub target: String,
    pub available: bool,
    pub appointment_type: String,
    pub notified_at: DateTime<Utc>,
}

/// New notification for insertion.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = notification)]
pub struct NewNotification<'a> {
    pub id: Uuid,
    pub appointment_id: Uuid,
    pub target: &'a str,
    pub available: bool,
    pub appointment_type: &'a str,
    pub notified_at: DateTime<Utc>,
}
