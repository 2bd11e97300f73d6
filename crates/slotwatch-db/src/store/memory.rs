//! In-process implementation of [`AppointmentStore`] for runs without a database.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use slotwatch_core::catalog::{AppointmentType, Location};
use slotwatch_core::types::{Appointment, NaturalKey, NotificationRecord};

use super::AppointmentStore;
use crate::error::{DbError, DbResult};

#[derive(Debug, Default)]
struct State {
    appointments: BTreeMap<NaturalKey, Appointment>,
    notifications: Vec<NotificationRecord>,
}

impl State {
    fn appointment_mut(&mut self, id: Uuid) -> Option<&mut Appointment> {
        self.appointments.values_mut().find(|a| a.id == id)
    }
}

/// Store that keeps every appointment and notification in memory. State is lost on exit.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Locks the state and recovers from poisoning.
    fn lock(&self) -> MutexGuard<'_, State> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                self.state.clear_poison();
                poisoned.into_inner()
            }
        }
    }

    /// Every stored appointment, ordered by natural key.
    #[must_use]
    pub fn appointments(&self) -> Vec<Appointment> {
        self.lock().appointments.values().cloned().collect()
    }

    /// Every recorded notification, in recording order.
    #[must_use]
    pub fn notifications(&self) -> Vec<NotificationRecord> {
        self.lock().notifications.clone()
    }
}

#[async_trait]
impl AppointmentStore for MemoryStore {
    async fn create_appointment_if_absent(
        &self,
        location: Location,
        starts_at: DateTime<Utc>,
    ) -> DbResult<Appointment> {
        let key = NaturalKey {
            location,
            starts_at,
        };
        let mut state = self.lock();
        let appointment = state.appointments.entry(key).or_insert_with(|| Appointment {
            id: Uuid::now_v7(),
            location,
            starts_at,
            available: true,
        });
        Ok(appointment.clone())
    }

    async fn list_tracked_appointments_not_past(
        &self,
        now: DateTime<Utc>,
        locations: &[Location],
    ) -> DbResult<Vec<Appointment>> {
        let state = self.lock();
        let mut tracked: Vec<Appointment> = state
            .appointments
            .values()
            .filter(|a| a.starts_at >= now && locations.contains(&a.location))
            .cloned()
            .collect();
        tracked.sort_by_key(|a| (a.starts_at, a.location));
        Ok(tracked)
    }

    async fn mark_past(&self, now: DateTime<Utc>) -> DbResult<Vec<Appointment>> {
        let mut state = self.lock();
        let mut pruned = Vec::new();
        for appointment in state.appointments.values_mut() {
            if appointment.available && appointment.starts_at < now {
                appointment.available = false;
                pruned.push(appointment.clone());
            }
        }
        Ok(pruned)
    }

    async fn update_availability(&self, id: Uuid, available: bool) -> DbResult<()> {
        let mut state = self.lock();
        let appointment = state
            .appointment_mut(id)
            .ok_or_else(|| DbError::NotFound(format!("appointment {id}")))?;
        appointment.available = available;
        Ok(())
    }

    async fn notification_count(&self, appointment_id: Uuid, target: &str) -> DbResult<i64> {
        let state = self.lock();
        let count = state
            .notifications
            .iter()
            .filter(|n| n.appointment_id == appointment_id && n.target == target)
            .count();
        Ok(i64::try_from(count).unwrap_or(i64::MAX))
    }

    async fn last_notification(
        &self,
        appointment_id: Uuid,
        target: &str,
    ) -> DbResult<Option<NotificationRecord>> {
        let state = self.lock();
        Ok(state
            .notifications
            .iter()
            .filter(|n| n.appointment_id == appointment_id && n.target == target)
            .max_by_key(|n| n.notified_at)
            .cloned())
    }

    async fn record_notification(
        &self,
        appointment_id: Uuid,
        target: &str,
        available: bool,
        appointment_type: AppointmentType,
    ) -> DbResult<NotificationRecord> {
        let mut state = self.lock();
        if !state.appointments.values().any(|a| a.id == appointment_id) {
            return Err(DbError::NotFound(format!("appointment {appointment_id}")));
        }

        let now = Utc::now();
        if let Some(existing) = state.notifications.iter_mut().find(|n| {
            n.appointment_id == appointment_id && n.target == target && n.available == available
        }) {
            existing.notified_at = now.max(existing.notified_at);
            existing.appointment_type = appointment_type;
            return Ok(existing.clone());
        }

        let record = NotificationRecord {
            id: Uuid::now_v7(),
            appointment_id,
            target: target.to_owned(),
            available,
            appointment_type,
            notified_at: now,
        };
        state.notifications.push(record.clone());
        Ok(record)
    }
}
