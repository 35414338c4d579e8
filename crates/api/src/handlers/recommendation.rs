//! Handlers for the `/recommendations` resource.
//!
//! Both flows count a request against a daily limit, serve a cached result
//! when one exists, and otherwise ask the completion model. Model failures
//! never surface as errors: the deterministic fallback ranking is returned
//! with `fallback: true` instead.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use docent_core::coverage::{CoverageGap, RECOMMENDATION_GAP_COUNT};
use docent_core::error::CoreError;
use docent_core::rate_limit::LimitDecision;
use docent_core::recommendation::{
    admin_fallback, build_admin_prompt, build_volunteer_prompt, parse_admin_reply,
    parse_volunteer_reply, volunteer_fallback, CompletionRequest, Recommendation,
    ReplyParseError, SlotRecommendation, VolunteerWithStats,
};
use docent_core::stats::VolunteerStats;
use docent_core::status::AccountStatus;
use docent_core::types::DbId;
use docent_db::repositories::VolunteerRepo;
use futures::future::try_join_all;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{ensure_owner_or_admin, ensure_self_or_admin, RequireAdmin};
use crate::response::ApiResponse;
use crate::scheduling::{coverage_gaps, volunteer_stats};
use crate::state::AppState;

const ADMIN_CACHE_KEY: &str = "admin_recommendations";
const ADMIN_LIMIT_PREFIX: &str = "admin_recommendations_limit";
const VOLUNTEER_CACHE_PREFIX: &str = "recommendations_";
const VOLUNTEER_LIMIT_PREFIX: &str = "recommendations_limit_";

/// Drop every cached recommendation result. Open shifts are shared by all
/// volunteers, so any change to the schedule makes all of them stale. Daily
/// limit counters are kept.
pub(crate) async fn forget_cached_recommendations(state: &AppState) {
    let removed = state
        .cache
        .invalidate_where(|key| {
            key == ADMIN_CACHE_KEY
                || (key.starts_with(VOLUNTEER_CACHE_PREFIX)
                    && !key.starts_with(VOLUNTEER_LIMIT_PREFIX))
        })
        .await;
    if removed > 0 {
        tracing::debug!(removed, "Cached recommendations invalidated");
    }
}

/// GET /api/recommendations/smart-recommendations/{email}
///
/// Up to three open shifts suited to one approved volunteer.
pub async fn smart_recommendations(
    user: AuthUser,
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> AppResult<impl IntoResponse> {
    ensure_self_or_admin(&user, &email)?;

    let volunteer = VolunteerRepo::find_by_email(&state.pool, email.trim())
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFoundByEmail {
                entity: "Volunteer",
                email: email.clone(),
            })
        })?;
    ensure_owner_or_admin(&user, volunteer.id)?;
    if !volunteer.is_approved() {
        return Err(AppError::forbidden(
            "Recommendations are only available to approved volunteers",
        ));
    }

    let limit_prefix = format!("{VOLUNTEER_LIMIT_PREFIX}{}", volunteer.email);
    if state.volunteer_limiter.try_acquire(&limit_prefix).await == LimitDecision::LimitReached {
        let (stats, gaps) = volunteer_inputs(&state, volunteer.id).await?;
        tracing::info!(volunteer_id = volunteer.id, "Daily recommendation limit reached");
        return Ok(Json(
            ApiResponse::data(volunteer_fallback(&gaps, &stats))
                .with_fallback()
                .with_limit_reached(),
        ));
    }

    let cache_key = format!("{VOLUNTEER_CACHE_PREFIX}{}", volunteer.email);
    if let Some(cached) = state.cache.get::<Vec<Recommendation>>(&cache_key).await {
        return Ok(Json(ApiResponse::data(cached).with_cached(true)));
    }

    let (stats, gaps) = volunteer_inputs(&state, volunteer.id).await?;
    let prompt = build_volunteer_prompt(&state.config.organization_name, &stats, &gaps);

    match ask_model(&state, CompletionRequest::volunteer(prompt), parse_volunteer_reply).await {
        Some(recommendations) => {
            state.cache.set(cache_key, recommendations.clone()).await;
            tracing::info!(
                volunteer_id = volunteer.id,
                count = recommendations.len(),
                "Recommendations generated"
            );
            Ok(Json(ApiResponse::data(recommendations).with_cached(false)))
        }
        None => Ok(Json(
            ApiResponse::data(volunteer_fallback(&gaps, &stats)).with_fallback(),
        )),
    }
}

/// GET /api/recommendations/admin-recommendations
///
/// Ranked volunteer suggestions for each open shift.
pub async fn admin_recommendations(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let approved = VolunteerRepo::list_by_status(&state.pool, AccountStatus::Approved).await?;
    if approved.is_empty() {
        return Ok(Json(
            ApiResponse::data(Vec::<SlotRecommendation>::new())
                .with_message("No approved volunteers"),
        ));
    }

    let volunteers: Vec<VolunteerWithStats> =
        try_join_all(approved.into_iter().map(|volunteer| {
            let pool = state.pool.clone();
            async move {
                let stats = volunteer_stats(&pool, volunteer.id).await?;
                Ok::<_, sqlx::Error>(VolunteerWithStats {
                    volunteer_id: volunteer.id,
                    name: volunteer.full_name(),
                    email: volunteer.email,
                    stats,
                })
            }
        }))
        .await?;

    let gaps = coverage_gaps(&state, state.clock.today(), RECOMMENDATION_GAP_COUNT).await?;
    if gaps.is_empty() {
        return Ok(Json(
            ApiResponse::data(Vec::<SlotRecommendation>::new())
                .with_message("All slots are covered"),
        ));
    }

    if state.admin_limiter.try_acquire(ADMIN_LIMIT_PREFIX).await == LimitDecision::LimitReached {
        tracing::info!(admin_id = admin.account_id, "Daily admin recommendation limit reached");
        return Ok(Json(
            ApiResponse::data(admin_fallback(&volunteers, &gaps))
                .with_fallback()
                .with_limit_reached(),
        ));
    }

    if let Some(cached) = state
        .cache
        .get::<Vec<SlotRecommendation>>(ADMIN_CACHE_KEY)
        .await
    {
        return Ok(Json(ApiResponse::data(cached).with_cached(true)));
    }

    let prompt = build_admin_prompt(&state.config.organization_name, &volunteers, &gaps);

    match ask_model(&state, CompletionRequest::admin(prompt), parse_admin_reply).await {
        Some(recommendations) => {
            state
                .cache
                .set(ADMIN_CACHE_KEY, recommendations.clone())
                .await;
            tracing::info!(
                admin_id = admin.account_id,
                volunteers = volunteers.len(),
                gaps = gaps.len(),
                count = recommendations.len(),
                "Admin recommendations generated"
            );
            Ok(Json(ApiResponse::data(recommendations).with_cached(false)))
        }
        None => Ok(Json(
            ApiResponse::data(admin_fallback(&volunteers, &gaps)).with_fallback(),
        )),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn volunteer_inputs(
    state: &AppState,
    volunteer_id: DbId,
) -> AppResult<(VolunteerStats, Vec<CoverageGap>)> {
    let stats = volunteer_stats(&state.pool, volunteer_id).await?;
    let gaps = coverage_gaps(state, state.clock.today(), RECOMMENDATION_GAP_COUNT).await?;
    Ok((stats, gaps))
}

/// Run one completion and parse it. `None` means "use the fallback": the
/// model failed, replied with something unparsable, or yielded no entries.
async fn ask_model<T>(
    state: &AppState,
    request: CompletionRequest,
    parse: fn(&str) -> Result<Vec<T>, ReplyParseError>,
) -> Option<Vec<T>> {
    let reply = match state.model.complete(&request).await {
        Ok(reply) => reply,
        Err(e) => {
            tracing::warn!(error = %e, "Completion failed, using fallback ranking");
            return None;
        }
    };

    match parse(&reply) {
        Ok(entries) if !entries.is_empty() => Some(entries),
        Ok(_) => {
            tracing::warn!("Completion yielded no usable entries, using fallback ranking");
            None
        }
        Err(e) => {
            tracing::warn!(error = %e, "Unparsable completion, using fallback ranking");
            None
        }
    }
}
