//! Database-backed wrappers around the coverage and stats computations.
//!
//! The algorithms live in `docent_core`; this module loads their inputs.

use chrono::NaiveDate;
use docent_core::coverage::{find_coverage_gaps, CoverageGap, CoveredSlots, GapSlot};
use docent_core::stats::{ShiftRecord, VolunteerStats};
use docent_core::types::DbId;
use docent_db::repositories::{ApplicationRepo, SlotRepo};
use docent_db::DbPool;

use crate::state::AppState;

/// Up to `number_of_gaps` uncovered (date, main slot) pairs from `start`.
pub async fn coverage_gaps(
    state: &AppState,
    start: NaiveDate,
    number_of_gaps: usize,
) -> Result<Vec<CoverageGap>, sqlx::Error> {
    let main_slots: Vec<GapSlot> = SlotRepo::list_main(&state.pool)
        .await?
        .iter()
        .map(GapSlot::from)
        .collect();
    if main_slots.is_empty() {
        return Ok(Vec::new());
    }

    let covered: CoveredSlots = ApplicationRepo::covered_pairs(&state.pool, start)
        .await?
        .into_iter()
        .collect();

    Ok(find_coverage_gaps(
        start,
        number_of_gaps,
        &main_slots,
        &covered,
        state.holidays.as_ref(),
    )
    .await)
}

/// Aggregate a volunteer's counted shifts.
pub async fn volunteer_stats(
    pool: &DbPool,
    volunteer_id: DbId,
) -> Result<VolunteerStats, sqlx::Error> {
    let history: Vec<ShiftRecord> = ApplicationRepo::shift_history(pool, volunteer_id)
        .await?
        .into_iter()
        .map(ShiftRecord::from)
        .collect();
    Ok(VolunteerStats::from_history(&history))
}
