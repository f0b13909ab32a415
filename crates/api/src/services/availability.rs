use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;
use tutorslot_core::{
    errors::BookingResult,
    slots::{compute_available_slots, day_bounds, day_of_week, parse_slot_date},
};
use tutorslot_db::store::BookingStore;

use super::required;

#[derive(Clone)]
pub struct AvailabilityService {
    store: Arc<dyn BookingStore>,
}

impl AvailabilityService {
    pub fn new(store: Arc<dyn BookingStore>) -> Self {
        Self { store }
    }

    /// Open session start times on `date` (`YYYY-MM-DD`).
    pub async fn available_slots(&self, date: Option<String>) -> BookingResult<Vec<DateTime<Utc>>> {
        let date = parse_slot_date(&required(date, "date")?)?;
        let weekday = day_of_week(date);

        let windows = self.store.windows_for_day(weekday).await?;
        if windows.is_empty() {
            debug!(%date, weekday, "No availability configured");
            return Ok(Vec::new());
        }

        let (from, to) = day_bounds(date)?;
        let booked = self.store.booked_times_between(from, to).await?;

        let slots = compute_available_slots(date, &windows, &booked);
        debug!(
            %date,
            windows = windows.len(),
            booked = booked.len(),
            open = slots.len(),
            "Computed available slots"
        );

        Ok(slots)
    }
}
