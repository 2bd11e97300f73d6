//! `PostgreSQL` implementation of [`AppointmentStore`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use slotwatch_core::catalog::{AppointmentType, Location};
use slotwatch_core::types::{Appointment, NotificationRecord};

use super::AppointmentStore;
use crate::db::DbProvider;
use crate::db::connection::DbPool;
use crate::db::map::appointments_into_domain;
use crate::db::query::{appointment, notification};
use crate::error::DbResult;
use crate::model::appointment::AppointmentRow;
use crate::model::notification::{NewNotification, NotificationRow};

/// Store backed by a pooled `PostgreSQL` database.
#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AppointmentStore for PgStore {
    #[tracing::instrument(skip(self), fields(location = %location))]
    async fn create_appointment_if_absent(
        &self,
        location: Location,
        starts_at: DateTime<Utc>,
    ) -> DbResult<Appointment> {
        let mut conn = self.pool.get_connection().await?;
        appointment::create_if_absent(&mut conn, location.as_str(), starts_at)
            .await?
            .into_domain()
    }

    #[tracing::instrument(skip(self, locations), fields(locations = locations.len()))]
    async fn list_tracked_appointments_not_past(
        &self,
        now: DateTime<Utc>,
        locations: &[Location],
    ) -> DbResult<Vec<Appointment>> {
        let names = locations.iter().map(|l| l.as_str().to_owned()).collect();
        let mut conn = self.pool.get_connection().await?;
        let rows = appointment::not_past_in_locations(now, names)
            .select(AppointmentRow::as_select())
            .load(&mut conn)
            .await?;
        appointments_into_domain(rows)
    }

    #[tracing::instrument(skip(self))]
    async fn mark_past(&self, now: DateTime<Utc>) -> DbResult<Vec<Appointment>> {
        let mut conn = self.pool.get_connection().await?;
        let rows = appointment::mark_past(&mut conn, now).await?;
        appointments_into_domain(rows)
    }

    #[tracing::instrument(skip(self))]
    async fn update_availability(&self, id: Uuid, available: bool) -> DbResult<()> {
        let mut conn = self.pool.get_connection().await?;
        appointment::update_available(&mut conn, id, available).await
    }

    async fn notification_count(&self, appointment_id: Uuid, target: &str) -> DbResult<i64> {
        let mut conn = self.pool.get_connection().await?;
        notification::count(&mut conn, appointment_id, target).await
    }

    async fn last_notification(
        &self,
        appointment_id: Uuid,
        target: &str,
    ) -> DbResult<Option<NotificationRecord>> {
        let mut conn = self.pool.get_connection().await?;
        notification::latest(&mut conn, appointment_id, target)
            .await?
            .map(NotificationRow::into_domain)
            .transpose()
    }

    #[tracing::instrument(skip(self, target))]
    async fn record_notification(
        &self,
        appointment_id: Uuid,
        target: &str,
        available: bool,
        appointment_type: AppointmentType,
    ) -> DbResult<NotificationRecord> {
        let now = Utc::now();
        let new = NewNotification {
            id: Uuid::now_v7(),
            appointment_id,
            target,
            available,
            appointment_type: appointment_type.as_str(),
            notified_at: now,
        };
        let mut conn = self.pool.get_connection().await?;
        notification::record(&mut conn, &new, now)
            .await?
            .into_domain()
    }
}
