use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use tutorslot_core::slots::format_slot;

use crate::{middleware::error_handling::AppError, ApiState};

#[derive(Debug, Deserialize)]
pub struct SlotsQuery {
    /// Calendar date in YYYY-MM-DD format
    pub date: Option<String>,
}

/// `GET /api/available-slots?date=YYYY-MM-DD`
///
/// Responds with the open session start times as ISO-8601 strings, e.g.
/// `["2024-01-01T09:00:00.000Z"]`.
#[axum::debug_handler]
pub async fn available_slots(
    State(state): State<Arc<ApiState>>,
    query: Result<Query<SlotsQuery>, QueryRejection>,
) -> Result<Json<Vec<String>>, AppError> {
    let Query(query) = query?;

    let slots = state.availability.available_slots(query.date).await?;

    Ok(Json(slots.into_iter().map(format_slot).collect()))
}
