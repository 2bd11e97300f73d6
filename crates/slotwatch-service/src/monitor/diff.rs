//! Classification of freshly observed appointments against persisted state.

use std::collections::BTreeMap;

use slotwatch_core::catalog::Location;
use slotwatch_core::types::{Appointment, NaturalKey};

/// What a tick must write back and announce.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffOutcome {
    /// Appointments whose stored availability must change, carrying the new value.
    pub to_update: Vec<Appointment>,
    /// Appointments to announce, carrying the availability to announce.
    pub to_notify: Vec<Appointment>,
}

/// ## Summary
/// Compares `fresh` (just observed, all available) with `existing` (stored, not past, in tracked
/// locations) by natural key.
///
/// - Fresh and not stored: notify.
/// - Fresh and stored with a different availability: update and notify.
/// - Stored, available, in a tracked location and no longer observed: flip to unavailable,
///   update and notify.
///
/// Every key lands in at most one class. Repeated fresh observations of one key count once.
/// Output is ordered by natural key.
#[must_use]
pub fn diff_appointments(
    fresh: &[Appointment],
    existing: &[Appointment],
    tracked: &[Location],
) -> DiffOutcome {
    let fresh_by_key: BTreeMap<NaturalKey, &Appointment> =
        fresh.iter().map(|a| (a.natural_key(), a)).collect();
    let existing_by_key: BTreeMap<NaturalKey, &Appointment> =
        existing.iter().map(|a| (a.natural_key(), a)).collect();

    let mut outcome = DiffOutcome::default();

    for (key, appointment) in &fresh_by_key {
        match existing_by_key.get(key) {
            None => outcome.to_notify.push((*appointment).clone()),
            Some(stored) if stored.available != appointment.available => {
                outcome.to_update.push((*appointment).clone());
                outcome.to_notify.push((*appointment).clone());
            }
            Some(_) => {}
        }
    }

    for (key, stored) in &existing_by_key {
        if !stored.available
            || !tracked.contains(&stored.location)
            || fresh_by_key.contains_key(key)
        {
            continue;
        }
        let gone = Appointment {
            available: false,
            ..(*stored).clone()
        };
        outcome.to_update.push(gone.clone());
        outcome.to_notify.push(gone);
    }

    outcome
}
