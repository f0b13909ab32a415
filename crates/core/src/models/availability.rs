use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::errors::{BookingError, BookingResult};

/// A recurring weekly block during which sessions may be booked.
///
/// `day_of_week` follows the 0 (Sunday) to 6 (Saturday) convention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityWindow {
    pub day_of_week: u8,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

impl AvailabilityWindow {
    pub fn new(day_of_week: u8, start_time: NaiveTime, end_time: NaiveTime) -> BookingResult<Self> {
        if day_of_week > 6 {
            return Err(BookingError::Validation(format!(
                "day_of_week must be between 0 and 6, got {day_of_week}"
            )));
        }
        if start_time >= end_time {
            return Err(BookingError::Validation(format!(
                "availability window must start before it ends ({start_time} >= {end_time})"
            )));
        }

        Ok(Self {
            day_of_week,
            start_time,
            end_time,
        })
    }
}
