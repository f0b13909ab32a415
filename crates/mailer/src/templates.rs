use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use html_escape::encode_text;
use tutorslot_core::models::booking::Booking;

use crate::{Mail, MailKind};

pub const CONFIRMATION_SUBJECT: &str = "Your Tutoring Session is Booked!";
pub const CANCELLATION_SUBJECT: &str = "Your Tutoring Session Has Been Canceled";

/// Renders the booking emails.
#[derive(Debug, Clone)]
pub struct MailTemplates {
    /// Blind-copied on every email.
    pub operator: String,
    /// Fixed meeting location printed in confirmations.
    pub location: String,
    /// Timezone used to print session times.
    pub display_timezone: Tz,
}

impl MailTemplates {
    pub fn confirmation(&self, booking: &Booking) -> Mail {
        let html = format!(
            "<h1>Booking Confirmation</h1>\
             <p>Hi {name},</p>\
             <p>Your tutoring session for <strong>{subjects}</strong> is confirmed for:</p>\
             <p><strong>{when}</strong></p>\
             <p>The meeting location is: [{location}]</p>\
             <p>Total amount due at session: ${price:.2}</p>\
             <p>Thank you!</p>",
            name = encode_text(&booking.client_name),
            subjects = encode_text(&booking.subjects.join(", ")),
            when = self.session_time(booking.session_datetime),
            location = encode_text(&self.location),
            price = booking.price,
        );

        Mail {
            kind: MailKind::Confirmation,
            to: booking.client_email.clone(),
            bcc: Some(self.operator.clone()),
            subject: CONFIRMATION_SUBJECT.to_string(),
            html,
        }
    }

    pub fn cancellation(&self, booking: &Booking) -> Mail {
        let html = format!(
            "<h1>Booking Canceled</h1>\
             <p>Hi {name},</p>\
             <p>This is a confirmation that your tutoring session for <strong>{when}</strong> has been successfully canceled.</p>\
             <p>We hope to see you again soon!</p>",
            name = encode_text(&booking.client_name),
            when = self.session_time(booking.session_datetime),
        );

        Mail {
            kind: MailKind::Cancellation,
            to: booking.client_email.clone(),
            bcc: Some(self.operator.clone()),
            subject: CANCELLATION_SUBJECT.to_string(),
            html,
        }
    }

    /// Human-readable session time, e.g. `Monday, January 1, 2024 at 9:00 AM UTC`.
    pub fn session_time(&self, at: DateTime<Utc>) -> String {
        at.with_timezone(&self.display_timezone)
            .format("%A, %B %-d, %Y at %-I:%M %p %Z")
            .to_string()
    }
}
