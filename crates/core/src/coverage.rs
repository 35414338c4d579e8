//! Coverage gap finder.
//!
//! Walks forward one calendar day at a time from a start date and reports
//! every (date, main slot) pair on a qualifying day that no active
//! application covers.

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::Serialize;

use crate::calendar::{is_qualifying_day, slot_display_text, weekday_name, HolidayCalendar};
use crate::types::DbId;

/// How far ahead the walk may go before giving up on reaching the requested
/// number of gaps.
pub const GAP_SEARCH_HORIZON_DAYS: u32 = 730;

/// Number of gaps computed for recommendation requests.
pub const RECOMMENDATION_GAP_COUNT: usize = 30;

/// A slot participating in gap analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct GapSlot {
    pub slot_id: DbId,
    pub name: String,
    pub start_time: String,
    pub end_time: String,
}

impl GapSlot {
    pub fn display_text(&self) -> String {
        slot_display_text(&self.start_time, &self.end_time)
    }
}

/// A qualifying (date, slot) pair with no active application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverageGap {
    pub date: NaiveDate,
    pub slot_id: DbId,
    pub slot_name: String,
    pub slot_display: String,
    pub day_of_week: String,
}

/// (date, slot) pairs that already have an active application.
#[derive(Debug, Clone, Default)]
pub struct CoveredSlots(HashSet<(NaiveDate, DbId)>);

impl CoveredSlots {
    pub fn insert(&mut self, date: NaiveDate, slot_id: DbId) {
        self.0.insert((date, slot_id));
    }

    pub fn contains(&self, date: NaiveDate, slot_id: DbId) -> bool {
        self.0.contains(&(date, slot_id))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(NaiveDate, DbId)> for CoveredSlots {
    fn from_iter<I: IntoIterator<Item = (NaiveDate, DbId)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Find up to `number_of_gaps` coverage gaps starting at `start`.
///
/// `main_slots` are visited in the given order for every qualifying day.
/// Returns fewer gaps only when there are no main slots or the walk reaches
/// [`GAP_SEARCH_HORIZON_DAYS`].
pub async fn find_coverage_gaps(
    start: NaiveDate,
    number_of_gaps: usize,
    main_slots: &[GapSlot],
    covered: &CoveredSlots,
    holidays: &dyn HolidayCalendar,
) -> Vec<CoverageGap> {
    let mut gaps = Vec::with_capacity(number_of_gaps);
    if main_slots.is_empty() || number_of_gaps == 0 {
        return gaps;
    }

    let mut current = start;
    for _ in 0..GAP_SEARCH_HORIZON_DAYS {
        if is_qualifying_day(current, holidays).await {
            for slot in main_slots {
                if covered.contains(current, slot.slot_id) {
                    continue;
                }
                gaps.push(CoverageGap {
                    date: current,
                    slot_id: slot.slot_id,
                    slot_name: slot.name.clone(),
                    slot_display: slot.display_text(),
                    day_of_week: weekday_name(current).to_string(),
                });
                if gaps.len() >= number_of_gaps {
                    return gaps;
                }
            }
        }

        current = match current.succ_opt() {
            Some(next) => next,
            None => break,
        };
    }

    tracing::warn!(
        %start,
        requested = number_of_gaps,
        found = gaps.len(),
        horizon_days = GAP_SEARCH_HORIZON_DAYS,
        "Coverage gap search reached its horizon"
    );
    gaps
}
