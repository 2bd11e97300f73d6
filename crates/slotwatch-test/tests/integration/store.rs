#![allow(clippy::expect_used, clippy::unwrap_used)]
//! Tests for the `PostgreSQL` appointment store.
//!
//! Each test creates its own database and returns early when `TEST_DATABASE_URL` is unset.

use chrono::{DateTime, TimeZone, Utc};

use slotwatch_test::component::catalog::{AppointmentType, Location};
use slotwatch_test::component::db::error::DbError;
use slotwatch_test::component::db::store::{AppointmentStore, PgStore};

use super::helpers::*;

fn at(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2031, 5, 6, hour, 0, 0).unwrap()
}

async fn pg_store() -> Option<PgStore> {
    let db = test_db().await?;
    Some(PgStore::new(db.pool))
}

#[test_log::test(tokio::test)]
async fn creation_is_idempotent_on_natural_key() {
    let Some(store) = pg_store().await else {
        return;
    };

    let first = store
        .create_appointment_if_absent(Location::Cary, at(9))
        .await
        .unwrap();
    store.update_availability(first.id, false).await.unwrap();
    let second = store
        .create_appointment_if_absent(Location::Cary, at(9))
        .await
        .unwrap();

    assert_eq!(first.id, second.id);
    assert!(first.available);
    assert!(!second.available);
}

#[test_log::test(tokio::test)]
async fn listing_is_limited_to_future_tracked_slots() {
    let Some(store) = pg_store().await else {
        return;
    };
    for (location, hour) in [
        (Location::Cary, 8),
        (Location::Cary, 12),
        (Location::DurhamEast, 11),
        (Location::Wilson, 13),
    ] {
        store
            .create_appointment_if_absent(location, at(hour))
            .await
            .unwrap();
    }

    let tracked = store
        .list_tracked_appointments_not_past(at(10), &[Location::Cary, Location::DurhamEast])
        .await
        .unwrap();

    let seen: Vec<_> = tracked.iter().map(|a| (a.location, a.starts_at)).collect();
    assert_eq!(
        seen,
        vec![(Location::DurhamEast, at(11)), (Location::Cary, at(12))]
    );
}

#[test_log::test(tokio::test)]
async fn pruning_marks_every_past_slot_unavailable() {
    let Some(store) = pg_store().await else {
        return;
    };
    for hour in [7, 8, 12] {
        store
            .create_appointment_if_absent(Location::Cary, at(hour))
            .await
            .unwrap();
    }

    let pruned = store.mark_past(at(10)).await.unwrap();
    let mut pruned_at: Vec<_> = pruned.iter().map(|a| a.starts_at).collect();
    pruned_at.sort();
    assert_eq!(pruned_at, vec![at(7), at(8)]);
    assert!(pruned.iter().all(|a| !a.available));

    assert!(store.mark_past(at(10)).await.unwrap().is_empty());
    let future = store
        .list_tracked_appointments_not_past(at(10), &[Location::Cary])
        .await
        .unwrap();
    assert!(future.iter().all(|a| a.available));
}

#[test_log::test(tokio::test)]
async fn updating_an_unknown_appointment_is_not_found() {
    let Some(store) = pg_store().await else {
        return;
    };

    let err = store
        .update_availability(uuid::Uuid::now_v7(), true)
        .await
        .unwrap_err();

    assert!(matches!(err, DbError::NotFound(_)));
}

#[test_log::test(tokio::test)]
async fn notifications_upsert_per_availability() {
    let Some(store) = pg_store().await else {
        return;
    };
    let appointment = store
        .create_appointment_if_absent(Location::Cary, at(12))
        .await
        .unwrap();

    assert!(
        store
            .last_notification(appointment.id, RECORDING_TARGET)
            .await
            .unwrap()
            .is_none()
    );

    let first = store
        .record_notification(appointment.id, RECORDING_TARGET, true, AppointmentType::Permit)
        .await
        .unwrap();
    let again = store
        .record_notification(appointment.id, RECORDING_TARGET, true, AppointmentType::Permit)
        .await
        .unwrap();
    assert_eq!(first.id, again.id);
    assert!(again.notified_at >= first.notified_at);
    assert_eq!(
        store
            .notification_count(appointment.id, RECORDING_TARGET)
            .await
            .unwrap(),
        1
    );

    store
        .record_notification(appointment.id, RECORDING_TARGET, false, AppointmentType::Permit)
        .await
        .unwrap();
    assert_eq!(
        store
            .notification_count(appointment.id, RECORDING_TARGET)
            .await
            .unwrap(),
        2
    );
    let last = store
        .last_notification(appointment.id, RECORDING_TARGET)
        .await
        .unwrap()
        .expect("records exist");
    assert!(!last.available);
    assert_eq!(last.appointment_type, AppointmentType::Permit);
    assert_eq!(
        store.notification_count(appointment.id, "elsewhere").await.unwrap(),
        0
    );
}
