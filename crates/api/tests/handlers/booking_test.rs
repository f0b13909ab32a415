use std::{sync::Arc, time::Duration};

use chrono::{TimeZone, Utc};
use fake::{
    faker::{internet::en::SafeEmail, name::en::Name},
    Fake,
};
use pretty_assertions::assert_eq;
use tutorslot_core::{
    errors::BookingError,
    models::booking::{BookingRequest, BookingStatus, CancelBookingRequest},
};
use tutorslot_db::mock::MockStore;
use tutorslot_mailer::MailKind;

use crate::test_utils::{
    booking_request, build_state, next_mail, FailingNotifier, InMemoryStore, RecordingNotifier,
    StalledNotifier, OPERATOR,
};

#[tokio::test]
async fn test_request_booking_persists_pending_booking() {
    let store = Arc::new(InMemoryStore::default());
    let (notifier, _mail) = RecordingNotifier::new();
    let state = build_state(store.clone(), notifier);
    let name: String = Name().fake();
    let email: String = SafeEmail().fake();

    let mut request = booking_request("2024-01-01T09:00:00.000Z", &email);
    request.name = Some(name.clone());

    let booking = state.bookings.request_booking(request).await.unwrap();

    assert_eq!(booking.status, BookingStatus::Pending);
    assert_eq!(booking.client_name, name);
    assert_eq!(booking.client_email, email);
    assert_eq!(booking.subjects, vec!["Math", "Physics"]);
    assert_eq!(
        booking.session_datetime,
        Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap()
    );
    assert_eq!(store.booking_count(), 1);
}

#[tokio::test]
async fn test_request_booking_sends_confirmation() {
    let store = Arc::new(InMemoryStore::default());
    let (notifier, mut mail) = RecordingNotifier::new();
    let state = build_state(store, notifier);

    state
        .bookings
        .request_booking(booking_request("2024-01-01T09:00:00.000Z", "ada@example.com"))
        .await
        .unwrap();

    let sent = next_mail(&mut mail).await;
    assert_eq!(sent.kind, MailKind::Confirmation);
    assert_eq!(sent.to, "ada@example.com");
    assert_eq!(sent.bcc.as_deref(), Some(OPERATOR));
    assert!(sent.html.contains("$45.00"));
}

#[test_log::test(tokio::test)]
async fn test_notifier_failure_does_not_undo_booking() {
    let store = Arc::new(InMemoryStore::default());
    let state = build_state(store.clone(), Arc::new(FailingNotifier));

    let result = state
        .bookings
        .request_booking(booking_request("2024-01-01T09:00:00.000Z", "ada@example.com"))
        .await;

    assert!(result.is_ok());
    // Let the detached send run and fail
    tokio::task::yield_now().await;
    assert_eq!(store.booking_count(), 1);
}

#[tokio::test]
async fn test_stalled_notifier_does_not_hold_requests() {
    let store = Arc::new(InMemoryStore::default());
    let state = build_state(store.clone(), Arc::new(StalledNotifier));
    let limit = Duration::from_secs(1);

    let booking = tokio::time::timeout(
        limit,
        state
            .bookings
            .request_booking(booking_request("2024-01-01T09:00:00.000Z", "ada@example.com")),
    )
    .await
    .expect("booking waited on the email")
    .unwrap();
    assert_eq!(store.booking_count(), 1);

    let canceled = tokio::time::timeout(
        limit,
        state.cancellations.cancel_booking(CancelBookingRequest {
            booking_id: Some(booking.id.to_string()),
            email: Some("ada@example.com".to_string()),
        }),
    )
    .await
    .expect("cancellation waited on the email")
    .unwrap();
    assert_eq!(canceled.id, booking.id);
    assert_eq!(store.booking_count(), 0);
}

#[tokio::test]
async fn test_concurrent_requests_for_one_slot() {
    let store = Arc::new(InMemoryStore::default());
    let (notifier, mut mail) = RecordingNotifier::new();
    let state = build_state(store.clone(), notifier);
    let slot = "2024-01-01T10:00:00.000Z";

    let (first, second) = tokio::join!(
        state
            .bookings
            .request_booking(booking_request(slot, "first@example.com")),
        state
            .bookings
            .request_booking(booking_request(slot, "second@example.com")),
    );

    let outcomes = [first, second];
    assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
    assert_eq!(
        outcomes
            .iter()
            .filter(|r| matches!(r, Err(BookingError::Conflict(_))))
            .count(),
        1
    );
    assert_eq!(
        store.bookings_at(Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap()),
        1
    );

    // Only the winner is notified
    next_mail(&mut mail).await;
    tokio::task::yield_now().await;
    assert!(mail.try_recv().is_err());
}

#[tokio::test]
async fn test_same_instant_with_offset_conflicts() {
    let store = Arc::new(InMemoryStore::default());
    let (notifier, _mail) = RecordingNotifier::new();
    let state = build_state(store, notifier);

    state
        .bookings
        .request_booking(booking_request("2024-01-01T09:00:00Z", "first@example.com"))
        .await
        .unwrap();
    let result = state
        .bookings
        .request_booking(booking_request(
            "2024-01-01T10:00:00+01:00",
            "second@example.com",
        ))
        .await;

    assert!(matches!(result, Err(BookingError::Conflict(_))));
}

#[tokio::test]
async fn test_missing_price_is_rejected_without_insert() {
    // No expectations: any store call would panic
    let store = MockStore::new();
    let (notifier, mut mail) = RecordingNotifier::new();
    let state = build_state(Arc::new(store), notifier);

    let mut request = booking_request("2024-01-01T09:00:00.000Z", "ada@example.com");
    request.price = None;

    let result = state.bookings.request_booking(request).await;

    match result {
        Err(BookingError::Validation(message)) => assert!(message.contains("price")),
        other => panic!("Expected Validation error, got: {:?}", other),
    }
    assert!(mail.try_recv().is_err());
}

#[tokio::test]
async fn test_zero_price_is_accepted() {
    let store = Arc::new(InMemoryStore::default());
    let (notifier, _mail) = RecordingNotifier::new();
    let state = build_state(store, notifier);

    let mut request = booking_request("2024-01-01T09:00:00.000Z", "ada@example.com");
    request.price = Some(0.0);

    let booking = state.bookings.request_booking(request).await.unwrap();

    assert_eq!(booking.price, 0.0);
}

#[tokio::test]
async fn test_each_missing_field_is_reported() {
    let store = Arc::new(InMemoryStore::default());
    let (notifier, _mail) = RecordingNotifier::new();
    let state = build_state(store.clone(), notifier);

    let cases: [(&str, fn(&mut BookingRequest)); 4] = [
        ("timeSlot", |r| r.time_slot = None),
        ("name", |r| r.name = None),
        ("email", |r| r.email = Some(String::new())),
        ("subjects", |r| r.subjects = None),
    ];

    for (field, strip) in cases {
        let mut request = booking_request("2024-01-01T09:00:00.000Z", "ada@example.com");
        strip(&mut request);

        match state.bookings.request_booking(request).await {
            Err(BookingError::Validation(message)) => assert!(
                message.contains(field),
                "message {message:?} should name {field}"
            ),
            other => panic!("Expected Validation error for {field}, got: {:?}", other),
        }
    }
    assert_eq!(store.booking_count(), 0);
}

#[tokio::test]
async fn test_store_failure_on_insert_is_database_error() {
    let mut store = MockStore::new();
    store
        .expect_insert_booking()
        .times(1)
        .returning(|_| Err(eyre::eyre!("connection reset by peer")));
    let (notifier, mut mail) = RecordingNotifier::new();
    let state = build_state(Arc::new(store), notifier);

    let result = state
        .bookings
        .request_booking(booking_request("2024-01-01T09:00:00.000Z", "ada@example.com"))
        .await;

    assert!(matches!(result, Err(BookingError::Database(_))));
    assert!(mail.try_recv().is_err());
}

#[tokio::test]
async fn test_list_bookings_sorted_by_session() {
    let store = Arc::new(InMemoryStore::default());
    let (notifier, _mail) = RecordingNotifier::new();
    let state = build_state(store, notifier);

    for slot in [
        "2024-01-03T09:00:00.000Z",
        "2024-01-01T09:00:00.000Z",
        "2024-01-02T09:00:00.000Z",
    ] {
        state
            .bookings
            .request_booking(booking_request(slot, "ada@example.com"))
            .await
            .unwrap();
    }
    state
        .bookings
        .request_booking(booking_request("2024-01-04T09:00:00.000Z", "bob@example.com"))
        .await
        .unwrap();

    let bookings = state
        .bookings
        .list_bookings(Some("ada@example.com".to_string()))
        .await
        .unwrap();

    let days: Vec<String> = bookings
        .iter()
        .map(|b| b.session_datetime.format("%Y-%m-%d").to_string())
        .collect();
    assert_eq!(days, vec!["2024-01-01", "2024-01-02", "2024-01-03"]);
}

#[tokio::test]
async fn test_list_bookings_requires_email() {
    let store = MockStore::new();
    let (notifier, _mail) = RecordingNotifier::new();
    let state = build_state(Arc::new(store), notifier);

    let result = state.bookings.list_bookings(None).await;

    assert!(matches!(result, Err(BookingError::Validation(_))));
}
