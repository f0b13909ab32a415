//! # Services
//!
//! The booking core. Each service receives the injected datastore handle and
//! the notification glue; handlers only translate HTTP to and from these calls.
//!
//! Validation always happens before the first store call.

pub mod availability;
pub mod booking;
pub mod cancellation;

use std::sync::Arc;

use tutorslot_core::{
    errors::{BookingError, BookingResult},
    models::booking::Booking,
};
use tutorslot_mailer::{dispatch, templates::MailTemplates, Notifier};

/// Glue between the services and the mailer: renders a template and hands
/// it to a detached send. Never awaited by the request.
#[derive(Clone)]
pub struct Notifications {
    notifier: Arc<dyn Notifier>,
    templates: Arc<MailTemplates>,
}

impl Notifications {
    pub fn new(notifier: Arc<dyn Notifier>, templates: MailTemplates) -> Self {
        Self {
            notifier,
            templates: Arc::new(templates),
        }
    }

    pub fn booking_confirmed(&self, booking: &Booking) {
        dispatch(self.notifier.clone(), self.templates.confirmation(booking));
    }

    pub fn booking_canceled(&self, booking: &Booking) {
        dispatch(self.notifier.clone(), self.templates.cancellation(booking));
    }
}

/// Returns the trimmed value, treating absent and blank as missing.
pub(crate) fn required(value: Option<String>, field: &str) -> BookingResult<String> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(BookingError::missing(field)),
    }
}
