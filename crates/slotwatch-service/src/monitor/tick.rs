//! One monitoring cycle.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use slotwatch_db::store::AppointmentStore;

use super::MonitorSettings;
use super::diff::diff_appointments;
use super::dispatch::Dispatcher;
use crate::browser::SessionFactory;
use crate::error::ServiceResult;
use crate::notify::Notifier;
use crate::scrape::LocationOrchestrator;

/// Counts describing what one tick did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Past appointments marked unavailable.
    pub pruned: usize,
    /// Stored appointments compared against.
    pub existing: usize,
    /// Slots seen on the site.
    pub observed: usize,
    pub updated: usize,
    /// Appointments announced and recorded.
    pub notified: usize,
}

/// Ties the scraper, the store and the notifier together.
pub struct Monitor<F: SessionFactory> {
    store: Arc<dyn AppointmentStore>,
    notifier: Arc<dyn Notifier>,
    orchestrator: LocationOrchestrator<F>,
    settings: MonitorSettings,
}

impl<F: SessionFactory> Monitor<F> {
    #[must_use]
    pub fn new(
        store: Arc<dyn AppointmentStore>,
        notifier: Arc<dyn Notifier>,
        orchestrator: LocationOrchestrator<F>,
        settings: MonitorSettings,
    ) -> Self {
        Self {
            store,
            notifier,
            orchestrator,
            settings,
        }
    }

    #[must_use]
    pub const fn settings(&self) -> &MonitorSettings {
        &self.settings
    }

    /// ## Summary
    /// Runs one cycle: prune past appointments, load the stored ones, scrape every tracked
    /// location, persist what was seen, apply availability changes and announce them.
    ///
    /// The store is only written after every location task has finished.
    ///
    /// ## Errors
    /// Returns an error if scraping any location fails or the store fails. Delivery failures are
    /// logged and do not fail the tick.
    #[tracing::instrument(skip(self), fields(appointment_type = %self.settings.appointment_type))]
    pub async fn handle_tick(&self) -> ServiceResult<TickReport> {
        let now = Utc::now();
        let settings = &self.settings;

        let pruned = self.store.mark_past(now).await?;
        if !pruned.is_empty() {
            tracing::info!(count = pruned.len(), "Pruned past appointments");
        }

        let existing = self
            .store
            .list_tracked_appointments_not_past(now, &settings.locations)
            .await?;
        tracing::info!(
            count = existing.len(),
            "Listed existing appointments in tracked locations"
        );

        let observed = self
            .orchestrator
            .run_for_locations(
                settings.appointment_type,
                &settings.locations,
                settings.timeout,
            )
            .await?;

        let mut fresh = Vec::with_capacity(observed.len());
        for slot in &observed {
            let mut appointment = self
                .store
                .create_appointment_if_absent(slot.location, slot.starts_at)
                .await?;
            appointment.available = true;
            fresh.push(appointment);
        }

        let outcome = diff_appointments(&fresh, &existing, &settings.locations);
        tracing::info!(
            to_update = outcome.to_update.len(),
            to_notify = outcome.to_notify.len(),
            "Found appointments to update and notify"
        );

        for appointment in &outcome.to_update {
            self.store
                .update_availability(appointment.id, appointment.available)
                .await?;
        }

        let flipped: BTreeSet<Uuid> = outcome.to_update.iter().map(|a| a.id).collect();
        let notified = Dispatcher::new(
            self.store.as_ref(),
            self.notifier.as_ref(),
            settings.dispatch(),
        )
        .dispatch(outcome.to_notify, &flipped)
        .await?;

        let report = TickReport {
            pruned: pruned.len(),
            existing: existing.len(),
            observed: observed.len(),
            updated: outcome.to_update.len(),
            notified,
        };
        tracing::info!(
            pruned = report.pruned,
            existing = report.existing,
            observed = report.observed,
            updated = report.updated,
            notified = report.notified,
            "Tick complete"
        );
        Ok(report)
    }
}
