//! Rendering, delivery and recording of change notifications.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write;
use std::time::Duration;

use chrono::{DateTime, Utc};
use chrono_tz::America::New_York;
use uuid::Uuid;

use slotwatch_core::catalog::{AppointmentType, Location};
use slotwatch_core::constants::MAX_ENTRIES_PER_MESSAGE;
use slotwatch_core::types::Appointment;
use slotwatch_db::error::DbResult;
use slotwatch_db::store::AppointmentStore;

use crate::notify::Notifier;

const CHANGES_HEADER: &str = "Found appointment change(s) at the following locations and times:\n";
const AVAILABLE_HEADER: &str =
    "Found available appointment(s) at the following locations and times:\n";
const BOOKING_FOOTER: &str = "\nBook an appointment here: https://skiptheline.ncdot.gov";
const OVERFLOW_LINE: &str = "  - `(... more appointments available)`\n";

/// How announcements are worded and paced.
#[derive(Debug, Clone, Copy)]
pub struct DispatchSettings {
    pub appointment_type: AppointmentType,
    /// Also announce appointments that stopped being available.
    pub notify_unavailable: bool,
    /// Pause between two location messages.
    pub pacing: Duration,
}

/// Local wall-clock rendering of an appointment time.
#[must_use]
pub fn format_time(starts_at: DateTime<Utc>) -> String {
    starts_at
        .with_timezone(&New_York)
        .format("%Y-%m-%d %H:%M:%S %z %Z")
        .to_string()
}

/// ## Summary
/// Sorts appointments by time and groups them by location, groups ordered by location name.
#[must_use]
pub fn group_by_location(mut appointments: Vec<Appointment>) -> Vec<(Location, Vec<Appointment>)> {
    appointments.sort_by_key(|a| a.starts_at);

    let mut groups: BTreeMap<&'static str, (Location, Vec<Appointment>)> = BTreeMap::new();
    for appointment in appointments {
        groups
            .entry(appointment.location.as_str())
            .or_insert_with(|| (appointment.location, Vec::new()))
            .1
            .push(appointment);
    }
    groups.into_values().collect()
}

/// ## Summary
/// Renders the message for one location. The first message of a batch opens with a header, the
/// last one closes with the booking link.
#[must_use]
pub fn render_message(
    location: Location,
    entries: &[Appointment],
    first: bool,
    last: bool,
    notify_unavailable: bool,
) -> String {
    let mut message = String::new();

    if first {
        message.push_str(if notify_unavailable {
            CHANGES_HEADER
        } else {
            AVAILABLE_HEADER
        });
    }

    let _ = write!(message, "\n- **{location}**:\n");
    for (position, entry) in entries.iter().enumerate() {
        if position == MAX_ENTRIES_PER_MESSAGE {
            message.push_str(OVERFLOW_LINE);
            break;
        }
        let marker = if entry.available {
            ":white_check_mark:"
        } else {
            ":x:"
        };
        let _ = writeln!(message, "  - {marker} `{}`", format_time(entry.starts_at));
    }

    if last {
        message.push_str(BOOKING_FOOTER);
    }
    message
}

/// Sends and records announcements through one notifier.
pub struct Dispatcher<'a> {
    store: &'a dyn AppointmentStore,
    notifier: &'a dyn Notifier,
    settings: DispatchSettings,
}

impl<'a> Dispatcher<'a> {
    #[must_use]
    pub const fn new(
        store: &'a dyn AppointmentStore,
        notifier: &'a dyn Notifier,
        settings: DispatchSettings,
    ) -> Self {
        Self {
            store,
            notifier,
            settings,
        }
    }

    /// ## Summary
    /// Announces `to_notify`, one message per location, and records every appointment of each
    /// message that was delivered. Returns how many appointments were recorded.
    ///
    /// Unavailable entries are dropped unless the settings ask for them. Entries whose latest
    /// record for this notifier already carries the same availability are dropped too, except
    /// those in `flipped`: their stored availability just changed, and a suppressed unavailable
    /// announcement leaves the latest record behind the store. A failed delivery is logged and
    /// its location skipped.
    ///
    /// ## Errors
    /// Returns an error if the store cannot be read or a delivered notification cannot be
    /// recorded.
    #[tracing::instrument(skip_all, fields(notify_target = %self.notifier.target(), candidates = to_notify.len()))]
    pub async fn dispatch(
        &self,
        to_notify: Vec<Appointment>,
        flipped: &BTreeSet<Uuid>,
    ) -> DbResult<usize> {
        let target = self.notifier.target();

        let mut pending = Vec::with_capacity(to_notify.len());
        for appointment in to_notify {
            if !appointment.available && !self.settings.notify_unavailable {
                continue;
            }
            if !flipped.contains(&appointment.id) {
                let last = self.store.last_notification(appointment.id, target).await?;
                if last.is_some_and(|record| record.available == appointment.available) {
                    tracing::debug!(appointment_id = %appointment.id, "Already notified");
                    continue;
                }
            }
            pending.push(appointment);
        }

        let groups = group_by_location(pending);
        let group_count = groups.len();
        let mut recorded = 0;

        for (position, (location, entries)) in groups.into_iter().enumerate() {
            if position > 0 && !self.settings.pacing.is_zero() {
                tokio::time::sleep(self.settings.pacing).await;
            }

            let message = render_message(
                location,
                &entries,
                position == 0,
                position + 1 == group_count,
                self.settings.notify_unavailable,
            );
            if let Err(err) = self.notifier.send(&message).await {
                tracing::error!(%location, error = %err, "Failed to send notification");
                continue;
            }

            for entry in &entries {
                self.store
                    .record_notification(
                        entry.id,
                        target,
                        entry.available,
                        self.settings.appointment_type,
                    )
                    .await?;
            }
            recorded += entries.len();
        }

        Ok(recorded)
    }
}
