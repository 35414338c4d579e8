//! Handler for the `/holidays` resource.

use std::ops::RangeInclusive;

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;

use crate::error::{AppError, AppResult};
use crate::response::ApiResponse;
use crate::state::AppState;

const SUPPORTED_YEARS: RangeInclusive<i32> = 2000..=2100;

/// GET /api/holidays/{year}
///
/// Public holidays of the configured region as sorted ISO dates.
pub async fn get_holidays(
    State(state): State<AppState>,
    Path(year): Path<String>,
) -> AppResult<impl IntoResponse> {
    let year: i32 = year
        .trim()
        .parse()
        .ok()
        .filter(|y| SUPPORTED_YEARS.contains(y))
        .ok_or_else(|| AppError::BadRequest("Invalid year".into()))?;

    let holidays = state.holidays.holidays(year).await;

    Ok(Json(ApiResponse::data(holidays)))
}
