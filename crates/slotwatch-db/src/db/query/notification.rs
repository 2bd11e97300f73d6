//! Query functions for delivered notifications.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::db::connection::DbConnection;
use crate::db::schema::notification;
use crate::error::DbResult;
use crate::model::notification::{NewNotification, NotificationRow};

/// ## Summary
/// Returns a query for the notifications of one appointment sent to `target`.
#[must_use]
pub fn by_appointment_and_target(
    appointment_id: Uuid,
    target: &str,
) -> notification::BoxedQuery<'_, diesel::pg::Pg> {
    notification::table
        .into_boxed()
        .filter(notification::appointment_id.eq(appointment_id))
        .filter(notification::target.eq(target))
}

/// ## Summary
/// Counts the notifications of one appointment sent to `target`.
///
/// ## Errors
/// Returns an error if the query fails.
pub async fn count(
    conn: &mut DbConnection<'_>,
    appointment_id: Uuid,
    target: &str,
) -> DbResult<i64> {
    let count = by_appointment_and_target(appointment_id, target)
        .count()
        .get_result::<i64>(conn)
        .await?;
    Ok(count)
}

/// ## Summary
/// Returns the most recent notification of one appointment sent to `target`.
///
/// ## Errors
/// Returns an error if the query fails.
pub async fn latest(
    conn: &mut DbConnection<'_>,
    appointment_id: Uuid,
    target: &str,
) -> DbResult<Option<NotificationRow>> {
    let row = by_appointment_and_target(appointment_id, target)
        .order(notification::notified_at.desc())
        .select(NotificationRow::as_select())
        .first(conn)
        .await
        .optional()?;
    Ok(row)
}

/// ## Summary
/// Records a notification. Re-recording the same `(appointment, target, available)` refreshes
/// its timestamp instead of adding a row.
///
/// ## Errors
/// Returns an error if the upsert fails.
pub async fn record(
    conn: &mut DbConnection<'_>,
    new: &NewNotification<'_>,
    now: DateTime<Utc>,
) -> DbResult<NotificationRow> {
    let row = diesel::insert_into(notification::table)
        .values(new)
        .on_conflict((
            notification::appointment_id,
            notification::target,
            notification::available,
        ))
        .do_update()
        .set((
            notification::notified_at.eq(now),
            notification::appointment_type.eq(new.appointment_type),
        ))
        .returning(NotificationRow::as_returning())
        .get_result(conn)
        .await?;
    Ok(row)
}
