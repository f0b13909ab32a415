use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use tutorslot_core::models::booking::{
    Booking, BookingCreatedResponse, BookingRequest, CancelBookingRequest, CancelBookingResponse,
};

use crate::{middleware::error_handling::AppError, ApiState};

#[derive(Debug, Deserialize)]
pub struct BookingsQuery {
    pub email: Option<String>,
}

/// `POST /request-booking`
#[axum::debug_handler]
pub async fn request_booking(
    State(state): State<Arc<ApiState>>,
    payload: Result<Json<BookingRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<BookingCreatedResponse>), AppError> {
    let Json(payload) = payload?;

    state.bookings.request_booking(payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(BookingCreatedResponse { success: true }),
    ))
}

/// `GET /api/bookings?email=...`
#[axum::debug_handler]
pub async fn list_bookings(
    State(state): State<Arc<ApiState>>,
    query: Result<Query<BookingsQuery>, QueryRejection>,
) -> Result<Json<Vec<Booking>>, AppError> {
    let Query(query) = query?;

    let bookings = state.bookings.list_bookings(query.email).await?;

    Ok(Json(bookings))
}

/// `DELETE /api/cancel-booking`
#[axum::debug_handler]
pub async fn cancel_booking(
    State(state): State<Arc<ApiState>>,
    payload: Result<Json<CancelBookingRequest>, JsonRejection>,
) -> Result<Json<CancelBookingResponse>, AppError> {
    let Json(payload) = payload?;

    state.cancellations.cancel_booking(payload).await?;

    Ok(Json(CancelBookingResponse {
        success: true,
        message: "Booking canceled successfully.".to_string(),
    }))
}
