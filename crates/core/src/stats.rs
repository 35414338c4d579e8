//! Volunteer shift history aggregation.

use chrono::NaiveDate;
use serde::Serialize;

use crate::calendar::weekday_name;
use crate::types::DbId;

/// One past shift counted towards a volunteer's history.
#[derive(Debug, Clone, PartialEq)]
pub struct ShiftRecord {
    pub date: NaiveDate,
    pub slot_id: DbId,
    pub slot_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotBreakdown {
    pub slot_id: DbId,
    pub slot_name: String,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferredDay {
    pub day: String,
    pub total: u32,
    pub slots: Vec<SlotBreakdown>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VolunteerStats {
    pub total_shifts: u32,
    pub preferred_days: Vec<PreferredDay>,
    pub last_volunteered: Option<NaiveDate>,
}

impl VolunteerStats {
    /// Summarize a volunteer's history.
    ///
    /// Days and per-day slots appear in the order they are first seen in
    /// `history`; days are then sorted by total, descending, with ties kept
    /// in encounter order.
    pub fn from_history(history: &[ShiftRecord]) -> Self {
        let mut days: Vec<PreferredDay> = Vec::new();
        let mut last_volunteered: Option<NaiveDate> = None;

        for record in history {
            let day_name = weekday_name(record.date);
            let day_index = match days.iter().position(|d| d.day == day_name) {
                Some(i) => i,
                None => {
                    days.push(PreferredDay {
                        day: day_name.to_string(),
                        total: 0,
                        slots: Vec::new(),
                    });
                    days.len() - 1
                }
            };
            let day = &mut days[day_index];
            day.total += 1;

            match day.slots.iter_mut().find(|s| s.slot_id == record.slot_id) {
                Some(slot) => slot.count += 1,
                None => day.slots.push(SlotBreakdown {
                    slot_id: record.slot_id,
                    slot_name: record.slot_name.clone(),
                    count: 1,
                }),
            }

            if last_volunteered.map_or(true, |last| record.date > last) {
                last_volunteered = Some(record.date);
            }
        }

        // Vec::sort_by is stable.
        days.sort_by(|a, b| b.total.cmp(&a.total));

        Self {
            total_shifts: history.len() as u32,
            preferred_days: days,
            last_volunteered,
        }
    }

    /// Whether the volunteer has worked on the given weekday before.
    pub fn has_worked_on(&self, day: &str) -> bool {
        self.preferred_days.iter().any(|d| d.day == day)
    }

    pub fn day(&self, day: &str) -> Option<&PreferredDay> {
        self.preferred_days.iter().find(|d| d.day == day)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shift(y: i32, m: u32, d: u32, slot_id: DbId, slot_name: &str) -> ShiftRecord {
        ShiftRecord {
            date: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            slot_id,
            slot_name: slot_name.to_string(),
        }
    }

    #[test]
    fn empty_history_yields_zeroed_stats() {
        let stats = VolunteerStats::from_history(&[]);
        assert_eq!(stats.total_shifts, 0);
        assert!(stats.preferred_days.is_empty());
        assert_eq!(stats.last_volunteered, None);

        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "totalShifts": 0, "preferredDays": [], "lastVolunteered": null })
        );
    }

    #[test]
    fn groups_by_weekday_then_slot() {
        let history = vec![
            shift(2025, 3, 1, 1, "Morning Shift"),   // Saturday
            shift(2025, 3, 8, 1, "Morning Shift"),   // Saturday
            shift(2025, 3, 15, 2, "Afternoon Shift"), // Saturday
            shift(2025, 3, 2, 2, "Afternoon Shift"), // Sunday
        ];
        let stats = VolunteerStats::from_history(&history);

        assert_eq!(stats.total_shifts, 4);
        assert_eq!(stats.preferred_days.len(), 2);
        let saturday = &stats.preferred_days[0];
        assert_eq!(saturday.day, "Saturday");
        assert_eq!(saturday.total, 3);
        assert_eq!(saturday.slots.len(), 2);
        assert_eq!(saturday.slots[0].slot_name, "Morning Shift");
        assert_eq!(saturday.slots[0].count, 2);
        assert_eq!(saturday.slots[1].count, 1);
        assert_eq!(stats.preferred_days[1].day, "Sunday");
    }

    #[test]
    fn day_totals_sum_to_total_shifts() {
        let history = vec![
            shift(2025, 3, 2, 1, "Morning Shift"),
            shift(2025, 3, 8, 2, "Afternoon Shift"),
            shift(2025, 10, 3, 1, "Morning Shift"),
        ];
        let stats = VolunteerStats::from_history(&history);
        let sum: u32 = stats.preferred_days.iter().map(|d| d.total).sum();
        assert_eq!(sum, stats.total_shifts);
    }

    #[test]
    fn ties_keep_encounter_order() {
        let history = vec![
            shift(2025, 3, 2, 1, "Morning Shift"),  // Sunday
            shift(2025, 3, 8, 1, "Morning Shift"),  // Saturday
            shift(2025, 10, 3, 1, "Morning Shift"), // Friday
            shift(2025, 10, 10, 1, "Morning Shift"), // Friday
        ];
        let stats = VolunteerStats::from_history(&history);
        let order: Vec<_> = stats.preferred_days.iter().map(|d| d.day.as_str()).collect();
        assert_eq!(order, vec!["Friday", "Sunday", "Saturday"]);
    }

    #[test]
    fn last_volunteered_is_the_latest_date_regardless_of_order() {
        let history = vec![
            shift(2025, 3, 15, 1, "Morning Shift"),
            shift(2025, 3, 1, 1, "Morning Shift"),
        ];
        let stats = VolunteerStats::from_history(&history);
        assert_eq!(stats.last_volunteered, NaiveDate::from_ymd_opt(2025, 3, 15));
        assert!(stats.has_worked_on("Saturday"));
        assert!(!stats.has_worked_on("Sunday"));
    }
}
