use axum::{
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/request-booking", post(handlers::bookings::request_booking))
        .route("/api/bookings", get(handlers::bookings::list_bookings))
        .route(
            "/api/cancel-booking",
            delete(handlers::bookings::cancel_booking),
        )
}
