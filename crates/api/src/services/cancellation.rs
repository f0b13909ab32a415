use std::sync::Arc;

use tracing::info;
use tutorslot_core::{
    errors::{BookingError, BookingResult},
    models::booking::{Booking, CancelBookingRequest},
};
use tutorslot_db::store::BookingStore;
use uuid::Uuid;

use super::{required, Notifications};

/// Returned for every failed match so callers cannot tell a missing booking
/// from one owned by someone else.
pub const NOT_FOUND_MESSAGE: &str = "Booking not found or email does not match.";

#[derive(Clone)]
pub struct CancellationService {
    store: Arc<dyn BookingStore>,
    notifications: Notifications,
}

impl CancellationService {
    pub fn new(store: Arc<dyn BookingStore>, notifications: Notifications) -> Self {
        Self {
            store,
            notifications,
        }
    }

    /// Deletes the booking when both id and email match, then queues the
    /// cancellation email.
    pub async fn cancel_booking(&self, request: CancelBookingRequest) -> BookingResult<Booking> {
        let booking_id = required(request.booking_id, "bookingId")?;
        let email = required(request.email, "email")?;
        let booking_id = Uuid::parse_str(&booking_id).map_err(|_| {
            BookingError::Validation(format!("Invalid bookingId '{booking_id}'"))
        })?;

        let canceled = self
            .store
            .delete_booking(booking_id, &email)
            .await?
            .ok_or_else(|| BookingError::NotFound(NOT_FOUND_MESSAGE.to_string()))?;

        info!(
            booking_id = %canceled.id,
            session = %canceled.session_datetime,
            "Booking canceled"
        );
        self.notifications.booking_canceled(&canceled);

        Ok(canceled)
    }
}
