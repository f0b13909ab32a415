use std::sync::Arc;

use tracing::{info, warn};
use tutorslot_core::{
    errors::{BookingError, BookingResult},
    models::booking::{Booking, BookingRequest, BookingStatus, NewBooking},
    slots::parse_session_time,
};
use tutorslot_db::store::{BookingStore, InsertOutcome};

use super::{required, Notifications};

pub const SLOT_TAKEN_MESSAGE: &str = "Sorry, this time slot was just booked.";

/// Largest price the `NUMERIC(10, 2)` column holds.
pub const MAX_PRICE: f64 = 99_999_999.99;

#[derive(Clone)]
pub struct BookingService {
    store: Arc<dyn BookingStore>,
    notifications: Notifications,
}

impl BookingService {
    pub fn new(store: Arc<dyn BookingStore>, notifications: Notifications) -> Self {
        Self {
            store,
            notifications,
        }
    }

    /// Validates and stores a booking request, then queues the confirmation
    /// email.
    ///
    /// Losing a race for the same slot yields [`BookingError::Conflict`]. The
    /// returned booking is durable whether or not the email goes out.
    pub async fn request_booking(&self, request: BookingRequest) -> BookingResult<Booking> {
        let new_booking = validate_request(request)?;
        let session = new_booking.session_datetime;

        match self.store.insert_booking(new_booking).await? {
            InsertOutcome::Inserted(booking) => {
                info!(booking_id = %booking.id, %session, "Booking created");
                self.notifications.booking_confirmed(&booking);
                Ok(booking)
            }
            InsertOutcome::SlotTaken => {
                warn!(%session, "Booking rejected, slot already taken");
                Err(BookingError::Conflict(SLOT_TAKEN_MESSAGE.to_string()))
            }
        }
    }

    /// Every booking held by `email`, earliest session first.
    pub async fn list_bookings(&self, email: Option<String>) -> BookingResult<Vec<Booking>> {
        let email = required(email, "email")?;
        Ok(self.store.bookings_for_email(&email).await?)
    }
}

fn validate_request(request: BookingRequest) -> BookingResult<NewBooking> {
    let time_slot = required(request.time_slot, "timeSlot")?;
    let name = required(request.name, "name")?;
    let email = required(request.email, "email")?;
    let subjects = request.subjects.ok_or_else(|| BookingError::missing("subjects"))?;
    let price = request.price.ok_or_else(|| BookingError::missing("price"))?;

    let session_datetime = parse_session_time(&time_slot)?;

    let subjects = subjects
        .into_iter()
        .map(|s| s.trim().to_string())
        .collect::<Vec<_>>();
    if subjects.is_empty() {
        return Err(BookingError::Validation(
            "At least one subject is required".to_string(),
        ));
    }
    if let Some(bad) = subjects.iter().find(|s| s.is_empty() || s.contains(',')) {
        return Err(BookingError::Validation(format!(
            "Invalid subject '{bad}': subjects must be non-empty and may not contain commas"
        )));
    }

    if !price.is_finite() || price < 0.0 || price > MAX_PRICE {
        return Err(BookingError::Validation(format!(
            "Invalid price {price}: must be between 0 and {MAX_PRICE}"
        )));
    }
    if (price * 100.0).round() / 100.0 != price {
        return Err(BookingError::Validation(format!(
            "Invalid price {price}: at most two decimal places are allowed"
        )));
    }

    Ok(NewBooking {
        session_datetime,
        client_name: name,
        client_email: email,
        status: BookingStatus::Pending,
        subjects,
        price,
    })
}
