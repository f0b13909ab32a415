//! The datastore seam used by the service layer.
//!
//! Services never touch the pool directly; they receive an
//! `Arc<dyn BookingStore>` so tests can swap in a mock or an in-memory store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use eyre::Result;
use tutorslot_core::models::{
    availability::AvailabilityWindow,
    booking::{Booking, NewBooking},
};
use uuid::Uuid;

use crate::{
    repositories::{availability, booking, booking::CreateBookingOutcome},
    DbPool,
};

/// Outcome of storing a new booking, in domain terms.
#[derive(Debug, Clone, PartialEq)]
pub enum InsertOutcome {
    Inserted(Booking),
    SlotTaken,
}

#[async_trait]
pub trait BookingStore: Send + Sync {
    /// Round-trips to the datastore; used by the health check.
    async fn ping(&self) -> Result<()>;

    /// Availability windows for a weekday (0 = Sunday), ordered by start time.
    async fn windows_for_day(&self, day_of_week: u8) -> Result<Vec<AvailabilityWindow>>;

    /// Booked session start times in `[from, to)`.
    async fn booked_times_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<DateTime<Utc>>>;

    async fn insert_booking(&self, booking: NewBooking) -> Result<InsertOutcome>;

    /// All bookings for an email, ascending by session time.
    async fn bookings_for_email(&self, email: &str) -> Result<Vec<Booking>>;

    /// Deletes the booking matching both `id` and `email` and returns it.
    async fn delete_booking(&self, id: Uuid, email: &str) -> Result<Option<Booking>>;
}

/// Postgres-backed store.
#[derive(Clone)]
pub struct PgBookingStore {
    pool: DbPool,
}

impl PgBookingStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[async_trait]
impl BookingStore for PgBookingStore {
    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn windows_for_day(&self, day_of_week: u8) -> Result<Vec<AvailabilityWindow>> {
        availability::get_windows_for_day(&self.pool, day_of_week)
            .await?
            .into_iter()
            .map(AvailabilityWindow::try_from)
            .collect()
    }

    async fn booked_times_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<DateTime<Utc>>> {
        booking::get_booked_times_between(&self.pool, from, to).await
    }

    async fn insert_booking(&self, new_booking: NewBooking) -> Result<InsertOutcome> {
        match booking::create_booking(&self.pool, &new_booking).await? {
            CreateBookingOutcome::Created(row) => Ok(InsertOutcome::Inserted(row.try_into()?)),
            CreateBookingOutcome::SlotTaken => Ok(InsertOutcome::SlotTaken),
        }
    }

    async fn bookings_for_email(&self, email: &str) -> Result<Vec<Booking>> {
        booking::get_bookings_by_email(&self.pool, email)
            .await?
            .into_iter()
            .map(Booking::try_from)
            .collect()
    }

    async fn delete_booking(&self, id: Uuid, email: &str) -> Result<Option<Booking>> {
        booking::delete_booking_for_owner(&self.pool, id, email)
            .await?
            .map(Booking::try_from)
            .transpose()
    }
}
