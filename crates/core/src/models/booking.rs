use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle state of a booking. Canceled bookings are deleted, so there is
/// no canceled state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(BookingStatus::Pending),
            "confirmed" => Ok(BookingStatus::Confirmed),
            other => Err(format!("unknown booking status: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub session_datetime: DateTime<Utc>,
    pub client_name: String,
    pub client_email: String,
    pub status: BookingStatus,
    pub subjects: Vec<String>,
    pub price: f64,
    pub created_at: DateTime<Utc>,
}

/// A validated booking that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBooking {
    pub session_datetime: DateTime<Utc>,
    pub client_name: String,
    pub client_email: String,
    pub status: BookingStatus,
    pub subjects: Vec<String>,
    pub price: f64,
}

/// Body of `POST /request-booking`.
///
/// Every field is optional at the wire level so that a missing field can be
/// reported as a validation error instead of a deserialization failure.
/// `price: 0` is a valid price; an absent or `null` price is not.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub time_slot: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub subjects: Option<Vec<String>>,
    pub price: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingCreatedResponse {
    pub success: bool,
}

/// Body of `DELETE /api/cancel-booking`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelBookingRequest {
    pub booking_id: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelBookingResponse {
    pub success: bool,
    pub message: String,
}
