use chrono::{DateTime, NaiveTime, Utc};
use eyre::{eyre, Report};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tutorslot_core::models::{
    availability::AvailabilityWindow,
    booking::{Booking, BookingStatus},
};
use uuid::Uuid;

/// Separator used to store the ordered subject list in the `subjects` column.
///
/// Subject names never contain a comma, so splitting on this delimiter
/// restores the original list.
pub const SUBJECT_DELIMITER: &str = ", ";

pub fn join_subjects(subjects: &[String]) -> String {
    subjects.join(SUBJECT_DELIMITER)
}

pub fn split_subjects(stored: &str) -> Vec<String> {
    if stored.is_empty() {
        return Vec::new();
    }
    stored.split(SUBJECT_DELIMITER).map(str::to_string).collect()
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbAvailabilityWindow {
    pub day_of_week: i16,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbBooking {
    pub id: Uuid,
    pub session_datetime: DateTime<Utc>,
    pub client_name: String,
    pub client_email: String,
    pub status: String,
    pub subjects: String,
    pub price: f64,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<DbAvailabilityWindow> for AvailabilityWindow {
    type Error = Report;

    fn try_from(row: DbAvailabilityWindow) -> Result<Self, Self::Error> {
        let day = u8::try_from(row.day_of_week)
            .map_err(|_| eyre!("day_of_week out of range: {}", row.day_of_week))?;
        AvailabilityWindow::new(day, row.start_time, row.end_time)
            .map_err(|e| eyre!("Invalid availability row: {}", e))
    }
}

impl TryFrom<DbBooking> for Booking {
    type Error = Report;

    fn try_from(row: DbBooking) -> Result<Self, Self::Error> {
        let status = row
            .status
            .parse::<BookingStatus>()
            .map_err(|e| eyre!("Booking {}: {}", row.id, e))?;

        Ok(Booking {
            id: row.id,
            session_datetime: row.session_datetime,
            client_name: row.client_name,
            client_email: row.client_email,
            status,
            subjects: split_subjects(&row.subjects),
            price: row.price,
            created_at: row.created_at,
        })
    }
}
