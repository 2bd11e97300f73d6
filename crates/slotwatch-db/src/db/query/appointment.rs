//! Query functions for appointment slots.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::db::connection::DbConnection;
use crate::db::schema::appointment;
use crate::error::{DbError, DbResult};
use crate::model::appointment::{AppointmentRow, NewAppointment};

/// ## Summary
/// Returns a query to select all appointments.
#[must_use]
pub fn all() -> appointment::BoxedQuery<'static, diesel::pg::Pg> {
    appointment::table.into_boxed()
}

/// ## Summary
/// Returns a query to find an appointment by its natural key.
#[must_use]
pub fn by_natural_key(
    location: &str,
    starts_at: DateTime<Utc>,
) -> appointment::BoxedQuery<'_, diesel::pg::Pg> {
    appointment::table
        .into_boxed()
        .filter(appointment::location.eq(location))
        .filter(appointment::starts_at.eq(starts_at))
}

/// ## Summary
/// Returns a query for appointments at or after `now` in any of `locations`, earliest first.
#[must_use]
pub fn not_past_in_locations(
    now: DateTime<Utc>,
    locations: Vec<String>,
) -> appointment::BoxedQuery<'static, diesel::pg::Pg> {
    all()
        .filter(appointment::starts_at.ge(now))
        .filter(appointment::location.eq_any(locations))
        .order(appointment::starts_at.asc())
}

/// ## Summary
/// Inserts the slot unless its natural key already exists, then returns the stored row.
///
/// ## Errors
/// Returns an error if either statement fails.
pub async fn create_if_absent(
    conn: &mut DbConnection<'_>,
    location: &str,
    starts_at: DateTime<Utc>,
) -> DbResult<AppointmentRow> {
    let inserted = diesel::insert_into(appointment::table)
        .values(&NewAppointment::new(location, starts_at))
        .on_conflict((appointment::location, appointment::starts_at))
        .do_nothing()
        .execute(conn)
        .await?;

    if inserted == 0 {
        tracing::debug!(location, %starts_at, "Appointment already processed");
    }

    let row = by_natural_key(location, starts_at)
        .select(AppointmentRow::as_select())
        .first(conn)
        .await?;
    Ok(row)
}

/// ## Summary
/// Marks every still-available appointment that starts before `now` as unavailable.
///
/// ## Errors
/// Returns an error if the update fails.
pub async fn mark_past(
    conn: &mut DbConnection<'_>,
    now: DateTime<Utc>,
) -> DbResult<Vec<AppointmentRow>> {
    let rows = diesel::update(
        appointment::table
            .filter(appointment::starts_at.lt(now))
            .filter(appointment::available.eq(true)),
    )
    .set((
        appointment::available.eq(false),
        appointment::updated_at.eq(now),
    ))
    .returning(AppointmentRow::as_returning())
    .get_results(conn)
    .await?;
    Ok(rows)
}

/// ## Summary
/// Sets the availability of one appointment.
///
/// ## Errors
/// Returns `DbError::NotFound` if no appointment has this id.
pub async fn update_available(
    conn: &mut DbConnection<'_>,
    id: Uuid,
    available: bool,
) -> DbResult<()> {
    let updated = diesel::update(appointment::table.find(id))
        .set((
            appointment::available.eq(available),
            appointment::updated_at.eq(Utc::now()),
        ))
        .execute(conn)
        .await?;

    if updated == 0 {
        return Err(DbError::NotFound(format!("appointment {id}")));
    }
    Ok(())
}
