use crate::models::{join_subjects, DbBooking};
use chrono::{DateTime, Utc};
use eyre::Result;
use sqlx::{Pool, Postgres};
use tutorslot_core::models::booking::NewBooking;
use uuid::Uuid;

/// SQLSTATE raised by Postgres for a unique constraint violation.
const UNIQUE_VIOLATION: &str = "23505";

/// Result of inserting a booking.
#[derive(Debug)]
pub enum CreateBookingOutcome {
    Created(DbBooking),
    /// Another booking already holds this `session_datetime`.
    SlotTaken,
}

pub async fn create_booking(
    pool: &Pool<Postgres>,
    booking: &NewBooking,
) -> Result<CreateBookingOutcome> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!(
        "Creating booking: id={}, session_datetime={}",
        id,
        booking.session_datetime
    );

    let result = sqlx::query_as::<_, DbBooking>(
        r#"
        INSERT INTO bookings (id, session_datetime, client_name, client_email, status, subjects, price, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING id, session_datetime, client_name, client_email, status, subjects, price::float8 AS price, created_at
        "#,
    )
    .bind(id)
    .bind(booking.session_datetime)
    .bind(&booking.client_name)
    .bind(&booking.client_email)
    .bind(booking.status.as_str())
    .bind(join_subjects(&booking.subjects))
    .bind(booking.price)
    .bind(now)
    .fetch_one(pool)
    .await;

    match result {
        Ok(row) => Ok(CreateBookingOutcome::Created(row)),
        Err(sqlx::Error::Database(db_err)) if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) => {
            tracing::debug!(
                "Slot already booked: session_datetime={}",
                booking.session_datetime
            );
            Ok(CreateBookingOutcome::SlotTaken)
        }
        Err(e) => Err(e.into()),
    }
}

/// Session start times booked in `[from, to)`.
pub async fn get_booked_times_between(
    pool: &Pool<Postgres>,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> Result<Vec<DateTime<Utc>>> {
    let times = sqlx::query_scalar::<_, DateTime<Utc>>(
        r#"
        SELECT session_datetime
        FROM bookings
        WHERE session_datetime >= $1 AND session_datetime < $2
        ORDER BY session_datetime ASC
        "#,
    )
    .bind(from)
    .bind(to)
    .fetch_all(pool)
    .await?;

    Ok(times)
}

pub async fn get_bookings_by_email(pool: &Pool<Postgres>, email: &str) -> Result<Vec<DbBooking>> {
    let bookings = sqlx::query_as::<_, DbBooking>(
        r#"
        SELECT id, session_datetime, client_name, client_email, status, subjects, price::float8 AS price, created_at
        FROM bookings
        WHERE client_email = $1
        ORDER BY session_datetime ASC
        "#,
    )
    .bind(email)
    .fetch_all(pool)
    .await?;

    Ok(bookings)
}

/// Deletes the booking only when both `id` and `email` match.
pub async fn delete_booking_for_owner(
    pool: &Pool<Postgres>,
    id: Uuid,
    email: &str,
) -> Result<Option<DbBooking>> {
    let deleted = sqlx::query_as::<_, DbBooking>(
        r#"
        DELETE FROM bookings
        WHERE id = $1 AND client_email = $2
        RETURNING id, session_datetime, client_name, client_email, status, subjects, price::float8 AS price, created_at
        "#,
    )
    .bind(id)
    .bind(email)
    .fetch_optional(pool)
    .await?;

    if deleted.is_none() {
        tracing::debug!("No booking matched for deletion: id={}", id);
    }

    Ok(deleted)
}
