use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use chrono::{DateTime, NaiveTime, Utc};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tutorslot_api::ApiState;
use tutorslot_core::models::{
    availability::AvailabilityWindow,
    booking::{Booking, BookingRequest, NewBooking},
};
use tutorslot_db::store::{BookingStore, InsertOutcome};
use tutorslot_mailer::{templates::MailTemplates, Mail, Notifier, NotifyError};
use uuid::Uuid;

pub const OPERATOR: &str = "tutor@example.com";

/// Store that keeps everything in memory and enforces one booking per
/// session instant, like the unique constraint in Postgres.
#[derive(Default)]
pub struct InMemoryStore {
    windows: Vec<AvailabilityWindow>,
    bookings: Mutex<Vec<Booking>>,
}

impl InMemoryStore {
    pub fn with_windows(windows: Vec<AvailabilityWindow>) -> Self {
        Self {
            windows,
            bookings: Mutex::new(Vec::new()),
        }
    }

    pub fn booking_count(&self) -> usize {
        self.bookings.lock().unwrap().len()
    }

    pub fn bookings_at(&self, at: DateTime<Utc>) -> usize {
        self.bookings
            .lock()
            .unwrap()
            .iter()
            .filter(|b| b.session_datetime == at)
            .count()
    }
}

#[async_trait]
impl BookingStore for InMemoryStore {
    async fn ping(&self) -> eyre::Result<()> {
        Ok(())
    }

    async fn windows_for_day(&self, day_of_week: u8) -> eyre::Result<Vec<AvailabilityWindow>> {
        Ok(self
            .windows
            .iter()
            .filter(|w| w.day_of_week == day_of_week)
            .cloned()
            .collect())
    }

    async fn booked_times_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> eyre::Result<Vec<DateTime<Utc>>> {
        Ok(self
            .bookings
            .lock()
            .unwrap()
            .iter()
            .map(|b| b.session_datetime)
            .filter(|at| *at >= from && *at < to)
            .collect())
    }

    async fn insert_booking(&self, booking: NewBooking) -> eyre::Result<InsertOutcome> {
        // Give a concurrent request the chance to interleave before the
        // check-and-insert, which is atomic like a unique index.
        tokio::task::yield_now().await;

        let mut bookings = self.bookings.lock().unwrap();
        if bookings
            .iter()
            .any(|b| b.session_datetime == booking.session_datetime)
        {
            return Ok(InsertOutcome::SlotTaken);
        }

        let stored = Booking {
            id: Uuid::new_v4(),
            session_datetime: booking.session_datetime,
            client_name: booking.client_name,
            client_email: booking.client_email,
            status: booking.status,
            subjects: booking.subjects,
            price: booking.price,
            created_at: Utc::now(),
        };
        bookings.push(stored.clone());

        Ok(InsertOutcome::Inserted(stored))
    }

    async fn bookings_for_email(&self, email: &str) -> eyre::Result<Vec<Booking>> {
        let mut found: Vec<Booking> = self
            .bookings
            .lock()
            .unwrap()
            .iter()
            .filter(|b| b.client_email == email)
            .cloned()
            .collect();
        found.sort_by_key(|b| b.session_datetime);
        Ok(found)
    }

    async fn delete_booking(&self, id: Uuid, email: &str) -> eyre::Result<Option<Booking>> {
        let mut bookings = self.bookings.lock().unwrap();
        let position = bookings
            .iter()
            .position(|b| b.id == id && b.client_email == email);
        Ok(position.map(|i| bookings.remove(i)))
    }
}

/// Forwards every mail to a channel the test can read.
pub struct RecordingNotifier {
    sender: UnboundedSender<Mail>,
}

impl RecordingNotifier {
    pub fn new() -> (Arc<Self>, UnboundedReceiver<Mail>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Arc::new(Self { sender }), receiver)
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, mail: Mail) -> Result<(), NotifyError> {
        let _ = self.sender.send(mail);
        Ok(())
    }
}

/// Fails every send, as an unreachable relay would.
pub struct FailingNotifier;

#[async_trait]
impl Notifier for FailingNotifier {
    async fn send(&self, _mail: Mail) -> Result<(), NotifyError> {
        let error = "no-at-sign"
            .parse::<lettre::Address>()
            .expect_err("address should be invalid");
        Err(NotifyError::Address(error))
    }
}

/// Never completes a send, as a relay that accepts the connection and hangs.
pub struct StalledNotifier;

#[async_trait]
impl Notifier for StalledNotifier {
    async fn send(&self, _mail: Mail) -> Result<(), NotifyError> {
        std::future::pending().await
    }
}

pub fn templates() -> MailTemplates {
    MailTemplates {
        operator: OPERATOR.to_string(),
        location: "117 Satterfield Circle".to_string(),
        display_timezone: chrono_tz::UTC,
    }
}

pub fn build_state(store: Arc<dyn BookingStore>, notifier: Arc<dyn Notifier>) -> Arc<ApiState> {
    Arc::new(ApiState::new(store, notifier, templates()))
}

pub fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

/// Monday 09:00 to 11:00, the window used throughout these tests.
pub fn monday_morning() -> AvailabilityWindow {
    AvailabilityWindow::new(1, time(9, 0), time(11, 0)).unwrap()
}

pub fn booking_request(time_slot: &str, email: &str) -> BookingRequest {
    BookingRequest {
        time_slot: Some(time_slot.to_string()),
        name: Some("Ada Lovelace".to_string()),
        email: Some(email.to_string()),
        subjects: Some(vec!["Math".to_string(), "Physics".to_string()]),
        price: Some(45.0),
    }
}

/// Waits for the next detached notification.
pub async fn next_mail(receiver: &mut UnboundedReceiver<Mail>) -> Mail {
    tokio::time::timeout(Duration::from_secs(2), receiver.recv())
        .await
        .expect("timed out waiting for notification")
        .expect("notification channel closed")
}
