//! Recommendation engine: LLM prompt construction, reply parsing and the
//! deterministic fallback rankings used when the model is unavailable.
//!
//! The engine itself performs no I/O. Callers gather stats and coverage gaps,
//! hand a prompt to a [`CompletionModel`], and feed the reply back into
//! [`parse_volunteer_reply`] / [`parse_admin_reply`]. Any failure along the
//! way degrades to [`volunteer_fallback`] / [`admin_fallback`].

use std::fmt::Write as _;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::calendar::{short_date, weekday_name};
use crate::coverage::CoverageGap;
use crate::stats::{PreferredDay, VolunteerStats};
use crate::types::DbId;

/// Recommendations returned to a volunteer.
pub const MAX_RECOMMENDATIONS: usize = 3;

/// Gaps listed in a prompt. Slot references still cover every gap.
pub const PROMPT_GAP_LIMIT: usize = 20;

/// Gaps considered by the admin fallback ranking.
pub const ADMIN_FALLBACK_GAP_LIMIT: usize = 10;

/// Volunteers suggested per gap by the admin fallback ranking.
pub const ADMIN_FALLBACK_VOLUNTEERS_PER_GAP: usize = 3;

pub const VOLUNTEER_MAX_TOKENS: u32 = 500;
pub const ADMIN_MAX_TOKENS: u32 = 2000;
pub const TEMPERATURE: f32 = 0.7;

const DATE_FORMAT: &str = "%Y-%m-%d";

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A (date, slot) suggestion for one volunteer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub date: NaiveDate,
    pub slot_id: DbId,
    pub slot_name: String,
    pub slot_display: String,
}

impl From<&CoverageGap> for Recommendation {
    fn from(gap: &CoverageGap) -> Self {
        Self {
            date: gap.date,
            slot_id: gap.slot_id,
            slot_name: gap.slot_name.clone(),
            slot_display: gap.slot_display.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VolunteerSuggestion {
    pub name: String,
    pub email: String,
    pub reason: String,
}

/// Ranked volunteer suggestions for one open (date, slot).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotRecommendation {
    pub date: NaiveDate,
    pub slot_id: DbId,
    pub slot_name: String,
    pub slot_display: String,
    pub day_of_week: String,
    pub volunteers: Vec<VolunteerSuggestion>,
}

/// An approved volunteer together with their shift history summary.
#[derive(Debug, Clone, PartialEq)]
pub struct VolunteerWithStats {
    pub volunteer_id: DbId,
    pub name: String,
    pub email: String,
    pub stats: VolunteerStats,
}

// ---------------------------------------------------------------------------
// Completion model seam
// ---------------------------------------------------------------------------

/// A single-prompt text completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl CompletionRequest {
    pub fn volunteer(prompt: String) -> Self {
        Self {
            prompt,
            max_tokens: VOLUNTEER_MAX_TOKENS,
            temperature: TEMPERATURE,
        }
    }

    pub fn admin(prompt: String) -> Self {
        Self {
            prompt,
            max_tokens: ADMIN_MAX_TOKENS,
            temperature: TEMPERATURE,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    #[error("Completion model is not configured")]
    NotConfigured,

    #[error("Completion request failed: {0}")]
    Request(String),

    #[error("Completion model returned an empty reply")]
    EmptyReply,
}

/// An external text-generation model.
#[async_trait]
pub trait CompletionModel: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError>;
}

// ---------------------------------------------------------------------------
// Prompts
// ---------------------------------------------------------------------------

fn last_active(stats: &VolunteerStats) -> String {
    stats
        .last_volunteered
        .map(short_date)
        .unwrap_or_else(|| "Never".to_string())
}

/// `- Saturday: 3 shifts (2x Morning Shift, 1x Afternoon Shift)` per day.
fn day_breakdown(days: &[PreferredDay]) -> String {
    if days.is_empty() {
        return "No history yet".to_string();
    }
    days.iter()
        .map(|d| {
            let slots = d
                .slots
                .iter()
                .map(|s| format!("{}x {}", s.count, s.slot_name))
                .collect::<Vec<_>>()
                .join(", ");
            format!("- {}: {} shifts ({slots})", d.day, d.total)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn gap_list(gaps: &[CoverageGap]) -> String {
    if gaps.is_empty() {
        return "No gaps found - all slots are covered.".to_string();
    }
    gaps.iter()
        .take(PROMPT_GAP_LIMIT)
        .map(|g| {
            format!(
                "- {}, {}: {} ({}) [slotId: {}]",
                g.day_of_week,
                g.date.format(DATE_FORMAT),
                g.slot_name,
                g.slot_display,
                g.slot_id
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// One line per distinct slot among `gaps`, in first-seen order.
fn slot_reference(gaps: &[CoverageGap]) -> String {
    let mut seen: Vec<DbId> = Vec::new();
    let mut out = String::new();
    for gap in gaps {
        if seen.contains(&gap.slot_id) {
            continue;
        }
        seen.push(gap.slot_id);
        if !out.is_empty() {
            out.push('\n');
        }
        let _ = write!(
            out,
            "- slotId \"{}\" = {} ({})",
            gap.slot_id, gap.slot_name, gap.slot_display
        );
    }
    out
}

/// Prompt asking the model for three slots suited to one volunteer.
pub fn build_volunteer_prompt(
    organization: &str,
    stats: &VolunteerStats,
    gaps: &[CoverageGap],
) -> String {
    format!(
        r#"You help schedule volunteer shifts at {organization}.
Recommend the {MAX_RECOMMENDATIONS} best time slots for the volunteer described below.

VOLUNTEER PROFILE:
- Past shifts: {total} total
- Last volunteered: {last}

SHIFT HISTORY BY DAY (day: count, slot breakdown):
{breakdown}

AVAILABLE SLOTS:
{slots}

COVERAGE GAPS (upcoming dates that still need a volunteer):
{gaps}

INSTRUCTIONS:
1. Every recommendation is a single slot on a single date. Two slots on the same date are fine when both are gaps.
2. Prefer gaps on weekdays this volunteer has worked before, ranked by how often they took that slot.
3. If the volunteer has not been active recently, prefer earlier dates.
4. If there are no gaps, suggest slots on weekdays the volunteer has worked before.
5. Only suggest future dates.
6. Copy slotId, slotName and slotDisplay exactly from AVAILABLE SLOTS.

Reply with JSON only, in exactly this shape:
{{
  "recommendations": [
    {{
      "date": "YYYY-MM-DD",
      "slotId": 1,
      "slotName": "Morning Shift",
      "slotDisplay": "11 - 14"
    }}
  ]
}}"#,
        total = stats.total_shifts,
        last = last_active(stats),
        breakdown = day_breakdown(&stats.preferred_days),
        slots = slot_reference(gaps),
        gaps = gap_list(gaps),
    )
}

/// Prompt asking the model to rank volunteers for every gap.
pub fn build_admin_prompt(
    organization: &str,
    volunteers: &[VolunteerWithStats],
    gaps: &[CoverageGap],
) -> String {
    let roster = if volunteers.is_empty() {
        "No volunteers available.".to_string()
    } else {
        volunteers
            .iter()
            .enumerate()
            .map(|(i, v)| {
                format!(
                    "{}. {} ({}) - {} shifts, last active: {}\n{}",
                    i + 1,
                    v.name,
                    v.email,
                    v.stats.total_shifts,
                    last_active(&v.stats),
                    day_breakdown(&v.stats.preferred_days)
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    };

    format!(
        r#"You help schedule volunteer shifts at {organization}.
Using the coverage gaps and every volunteer's shift history, suggest the best-fit volunteers for each open slot.

AVAILABLE SLOTS:
{slots}

COVERAGE GAPS (upcoming dates that still need a volunteer):
{gaps}

VOLUNTEERS:
{roster}

INSTRUCTIONS:
1. For EACH gap, list 3 to 5 volunteers, best fit first.
2. Weigh weekday match, slot match, recency and overall activity.
3. The same volunteer may be suggested for several gaps.
4. Give each suggestion a short reason of at most 20 words.
5. Copy slotId, slotName and slotDisplay exactly from AVAILABLE SLOTS.

Reply with JSON only, in exactly this shape:
{{
  "slotRecommendations": [
    {{
      "date": "YYYY-MM-DD",
      "slotId": 1,
      "slotName": "Morning Shift",
      "slotDisplay": "11 - 14",
      "volunteers": [
        {{ "name": "Jane Doe", "email": "jane@example.org", "reason": "Short reason" }}
      ]
    }}
  ]
}}"#,
        slots = slot_reference(gaps),
        gaps = gap_list(gaps),
    )
}

// ---------------------------------------------------------------------------
// Reply parsing
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ReplyParseError {
    #[error("No JSON object found in model reply")]
    NoJson,

    #[error("Model reply does not match the expected shape: {0}")]
    Shape(#[from] serde_json::Error),
}

#[derive(Deserialize)]
struct VolunteerEnvelope {
    recommendations: Vec<Value>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AdminEnvelope {
    slot_recommendations: Vec<Value>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRecommendation {
    date: Option<String>,
    slot_id: Option<Value>,
    slot_name: Option<String>,
    slot_display: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSlotRecommendation {
    #[serde(flatten)]
    slot: RawRecommendation,
    day_of_week: Option<String>,
    volunteers: Option<Vec<Value>>,
}

#[derive(Deserialize)]
struct RawSuggestion {
    name: Option<String>,
    email: Option<String>,
    reason: Option<String>,
}

/// The JSON object embedded in a model reply, tolerating code fences and
/// surrounding prose.
fn extract_json_object(reply: &str) -> Option<&str> {
    let start = reply.find('{')?;
    let end = reply.rfind('}')?;
    (end > start).then(|| &reply[start..=end])
}

fn parse_slot_id(value: &Value) -> Option<DbId> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

impl RawRecommendation {
    fn validate(self) -> Option<Recommendation> {
        let date = NaiveDate::parse_from_str(self.date?.trim(), DATE_FORMAT).ok()?;
        let slot_id = parse_slot_id(self.slot_id.as_ref()?)?;
        let slot_display = non_empty(self.slot_display)?;
        Some(Recommendation {
            date,
            slot_id,
            slot_name: self.slot_name.unwrap_or_default(),
            slot_display,
        })
    }
}

/// Parse a volunteer reply into at most [`MAX_RECOMMENDATIONS`] entries.
///
/// The envelope must match; individual entries without a `YYYY-MM-DD` date,
/// a slot id or a slot display are dropped.
pub fn parse_volunteer_reply(reply: &str) -> Result<Vec<Recommendation>, ReplyParseError> {
    let json = extract_json_object(reply).ok_or(ReplyParseError::NoJson)?;
    let envelope: VolunteerEnvelope = serde_json::from_str(json)?;

    let recommendations: Vec<Recommendation> = envelope
        .recommendations
        .into_iter()
        .filter_map(|entry| serde_json::from_value::<RawRecommendation>(entry).ok())
        .filter_map(RawRecommendation::validate)
        .take(MAX_RECOMMENDATIONS)
        .collect();
    Ok(recommendations)
}

/// Parse an admin reply. Entries also need at least one volunteer with an
/// email; `dayOfWeek` is derived from the date when the model omits it.
pub fn parse_admin_reply(reply: &str) -> Result<Vec<SlotRecommendation>, ReplyParseError> {
    let json = extract_json_object(reply).ok_or(ReplyParseError::NoJson)?;
    let envelope: AdminEnvelope = serde_json::from_str(json)?;

    let slots = envelope
        .slot_recommendations
        .into_iter()
        .filter_map(|entry| serde_json::from_value::<RawSlotRecommendation>(entry).ok())
        .filter_map(|raw| {
            let volunteers: Vec<VolunteerSuggestion> = raw
                .volunteers
                .unwrap_or_default()
                .into_iter()
                .filter_map(|v| serde_json::from_value::<RawSuggestion>(v).ok())
                .filter_map(|v| {
                    Some(VolunteerSuggestion {
                        email: non_empty(v.email)?,
                        name: v.name.unwrap_or_default(),
                        reason: v.reason.unwrap_or_default(),
                    })
                })
                .collect();
            if volunteers.is_empty() {
                return None;
            }

            let slot = raw.slot.validate()?;
            let day_of_week = non_empty(raw.day_of_week)
                .unwrap_or_else(|| weekday_name(slot.date).to_string());
            Some(SlotRecommendation {
                date: slot.date,
                slot_id: slot.slot_id,
                slot_name: slot.slot_name,
                slot_display: slot.slot_display,
                day_of_week,
                volunteers,
            })
        })
        .collect();
    Ok(slots)
}

// ---------------------------------------------------------------------------
// Fallback rankings
// ---------------------------------------------------------------------------

/// Gaps on weekdays the volunteer has worked before come first; order is
/// otherwise preserved. Returns at most [`MAX_RECOMMENDATIONS`].
pub fn volunteer_fallback(gaps: &[CoverageGap], stats: &VolunteerStats) -> Vec<Recommendation> {
    let (preferred, others): (Vec<&CoverageGap>, Vec<&CoverageGap>) = gaps
        .iter()
        .partition(|gap| stats.has_worked_on(&gap.day_of_week));

    preferred
        .into_iter()
        .chain(others)
        .take(MAX_RECOMMENDATIONS)
        .map(Recommendation::from)
        .collect()
}

/// Fit score of a volunteer for a gap: total shifts, plus 10 if they have
/// worked that weekday, plus 2 per previous shift in that slot on that weekday.
pub fn fallback_score(stats: &VolunteerStats, gap: &CoverageGap) -> u32 {
    let mut score = stats.total_shifts;
    if let Some(day) = stats.day(&gap.day_of_week) {
        score += 10;
        if let Some(slot) = day.slots.iter().find(|s| s.slot_id == gap.slot_id) {
            score += slot.count * 2;
        }
    }
    score
}

/// Rank volunteers for the first [`ADMIN_FALLBACK_GAP_LIMIT`] gaps. Gaps
/// where nobody scores above zero are omitted.
pub fn admin_fallback(
    volunteers: &[VolunteerWithStats],
    gaps: &[CoverageGap],
) -> Vec<SlotRecommendation> {
    gaps.iter()
        .take(ADMIN_FALLBACK_GAP_LIMIT)
        .filter_map(|gap| {
            let mut ranked: Vec<(u32, &VolunteerWithStats)> = volunteers
                .iter()
                .map(|v| (fallback_score(&v.stats, gap), v))
                .filter(|(score, _)| *score > 0)
                .collect();
            ranked.sort_by(|a, b| b.0.cmp(&a.0));

            let suggestions: Vec<VolunteerSuggestion> = ranked
                .into_iter()
                .take(ADMIN_FALLBACK_VOLUNTEERS_PER_GAP)
                .map(|(_, v)| VolunteerSuggestion {
                    name: v.name.clone(),
                    email: v.email.clone(),
                    reason: format!(
                        "Has worked {}s before with {} total shifts.",
                        gap.day_of_week, v.stats.total_shifts
                    ),
                })
                .collect();
            if suggestions.is_empty() {
                return None;
            }

            Some(SlotRecommendation {
                date: gap.date,
                slot_id: gap.slot_id,
                slot_name: gap.slot_name.clone(),
                slot_display: gap.slot_display.clone(),
                day_of_week: gap.day_of_week.clone(),
                volunteers: suggestions,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::ShiftRecord;
    use assert_matches::assert_matches;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn gap(d: NaiveDate, slot_id: DbId) -> CoverageGap {
        let (slot_name, slot_display) = match slot_id {
            1 => ("Morning Shift", "11 - 14"),
            _ => ("Afternoon Shift", "14 - 17"),
        };
        CoverageGap {
            date: d,
            slot_id,
            slot_name: slot_name.into(),
            slot_display: slot_display.into(),
            day_of_week: weekday_name(d).into(),
        }
    }

    fn history(shifts: &[(NaiveDate, DbId)]) -> VolunteerStats {
        let records: Vec<ShiftRecord> = shifts
            .iter()
            .map(|(d, slot_id)| ShiftRecord {
                date: *d,
                slot_id: *slot_id,
                slot_name: (if *slot_id == 1 { "Morning Shift" } else { "Afternoon Shift" }).into(),
            })
            .collect();
        VolunteerStats::from_history(&records)
    }

    fn volunteer(id: DbId, name: &str, stats: VolunteerStats) -> VolunteerWithStats {
        VolunteerWithStats {
            volunteer_id: id,
            name: name.into(),
            email: format!("{}@example.org", name.to_lowercase()),
            stats,
        }
    }

    // -- prompts --

    #[test]
    fn volunteer_prompt_embeds_history_and_gaps() {
        let stats = history(&[
            (date(2025, 3, 1), 1),
            (date(2025, 3, 8), 1),
            (date(2025, 3, 15), 2),
        ]);
        let gaps = vec![gap(date(2025, 3, 22), 1), gap(date(2025, 3, 22), 2)];
        let prompt = build_volunteer_prompt("Overbeck Museum", &stats, &gaps);

        assert!(prompt.contains("Overbeck Museum"));
        assert!(prompt.contains("- Past shifts: 3 total"));
        assert!(prompt.contains("- Last volunteered: Mar 15, 2025"));
        assert!(prompt.contains("- Saturday: 3 shifts (2x Morning Shift, 1x Afternoon Shift)"));
        assert!(prompt.contains("- slotId \"1\" = Morning Shift (11 - 14)"));
        assert!(prompt.contains("- Saturday, 2025-03-22: Afternoon Shift (14 - 17) [slotId: 2]"));
    }

    #[test]
    fn volunteer_prompt_for_newcomer_without_gaps() {
        let prompt = build_volunteer_prompt("Museum", &VolunteerStats::default(), &[]);
        assert!(prompt.contains("- Last volunteered: Never"));
        assert!(prompt.contains("No history yet"));
        assert!(prompt.contains("No gaps found - all slots are covered."));
    }

    #[test]
    fn prompt_lists_at_most_twenty_gaps() {
        let mut gaps = Vec::new();
        let mut d = date(2025, 3, 1);
        while gaps.len() < 30 {
            gaps.push(gap(d, 1));
            d = d.succ_opt().unwrap();
        }
        let prompt = build_volunteer_prompt("Museum", &VolunteerStats::default(), &gaps);
        assert_eq!(prompt.matches("[slotId: 1]").count(), PROMPT_GAP_LIMIT);
    }

    #[test]
    fn admin_prompt_numbers_volunteers() {
        let volunteers = vec![
            volunteer(1, "Anna", history(&[(date(2025, 3, 2), 2)])),
            volunteer(2, "Ben", VolunteerStats::default()),
        ];
        let prompt = build_admin_prompt("Museum", &volunteers, &[gap(date(2025, 3, 8), 1)]);
        assert!(prompt.contains("1. Anna (anna@example.org) - 1 shifts, last active: Mar 2, 2025"));
        assert!(prompt.contains("- Sunday: 1 shifts (1x Afternoon Shift)"));
        assert!(prompt.contains("2. Ben (ben@example.org) - 0 shifts, last active: Never\nNo history yet"));
        assert!(prompt.contains("\"slotRecommendations\""));
    }

    // -- parsing --

    #[test]
    fn parses_plain_and_fenced_replies() {
        let body = r#"{"recommendations":[{"date":"2025-03-08","slotId":1,"slotName":"Morning Shift","slotDisplay":"11 - 14"}]}"#;
        let fenced = format!("Here you go:\n```json\n{body}\n```");
        for reply in [body.to_string(), fenced] {
            let recs = parse_volunteer_reply(&reply).unwrap();
            assert_eq!(recs.len(), 1);
            assert_eq!(recs[0].date, date(2025, 3, 8));
            assert_eq!(recs[0].slot_id, 1);
        }
    }

    #[test]
    fn malformed_entries_are_dropped_and_result_capped() {
        let reply = r#"{"recommendations":[
            {"date":"2025-03-08","slotDisplay":"11 - 14","slotName":"Morning Shift"},
            {"date":"not-a-date","slotId":1,"slotDisplay":"11 - 14"},
            {"date":"2025-03-08","slotId":"2","slotDisplay":"14 - 17"},
            {"date":"2025-03-09","slotId":1,"slotDisplay":""},
            "garbage",
            {"date":"2025-03-09","slotId":1,"slotDisplay":"11 - 14"},
            {"date":"2025-03-15","slotId":1,"slotDisplay":"11 - 14"},
            {"date":"2025-03-16","slotId":2,"slotDisplay":"14 - 17"}
        ]}"#;
        let recs = parse_volunteer_reply(reply).unwrap();
        assert_eq!(recs.len(), MAX_RECOMMENDATIONS);
        assert_eq!(recs[0].slot_id, 2);
        assert_eq!(recs[0].slot_name, "");
        assert_eq!(recs[1].date, date(2025, 3, 9));
        assert_eq!(recs[2].date, date(2025, 3, 15));
    }

    #[test]
    fn non_conforming_envelope_is_rejected() {
        assert_matches!(parse_volunteer_reply("no json here"), Err(ReplyParseError::NoJson));
        assert_matches!(
            parse_volunteer_reply(r#"{"recs":[]}"#),
            Err(ReplyParseError::Shape(_))
        );
        assert_matches!(
            parse_volunteer_reply(r#"{"recommendations":"soon"}"#),
            Err(ReplyParseError::Shape(_))
        );
    }

    #[test]
    fn admin_reply_requires_volunteers_and_fills_weekday() {
        let reply = r#"{"slotRecommendations":[
            {"date":"2025-03-08","slotId":1,"slotName":"Morning Shift","slotDisplay":"11 - 14",
             "volunteers":[{"name":"Anna","email":"anna@example.org","reason":"Saturday regular"}]},
            {"date":"2025-03-09","slotId":2,"slotDisplay":"14 - 17","volunteers":[]},
            {"date":"2025-03-15","slotId":2,"slotDisplay":"14 - 17","dayOfWeek":"Saturday",
             "volunteers":[{"name":"No Email"}]}
        ]}"#;
        let slots = parse_admin_reply(reply).unwrap();
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].day_of_week, "Saturday");
        assert_eq!(slots[0].volunteers[0].email, "anna@example.org");
    }

    // -- fallbacks --

    #[test]
    fn volunteer_fallback_prefers_known_weekdays_stably() {
        let stats = history(&[(date(2025, 3, 2), 1)]); // Sunday
        let gaps = vec![
            gap(date(2025, 3, 8), 1),
            gap(date(2025, 3, 8), 2),
            gap(date(2025, 3, 9), 1),
            gap(date(2025, 3, 9), 2),
        ];
        let recs = volunteer_fallback(&gaps, &stats);
        let pairs: Vec<_> = recs.iter().map(|r| (r.date, r.slot_id)).collect();
        assert_eq!(
            pairs,
            vec![(date(2025, 3, 9), 1), (date(2025, 3, 9), 2), (date(2025, 3, 8), 1)]
        );
    }

    #[test]
    fn volunteer_fallback_without_history_keeps_gap_order() {
        let gaps = vec![gap(date(2025, 3, 8), 1), gap(date(2025, 3, 8), 2)];
        let recs = volunteer_fallback(&gaps, &VolunteerStats::default());
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0].slot_id, 1);
        assert!(volunteer_fallback(&[], &VolunteerStats::default()).is_empty());
    }

    #[test]
    fn fallback_score_rewards_day_and_slot_matches() {
        let stats = history(&[(date(2025, 3, 1), 1), (date(2025, 3, 8), 1), (date(2025, 3, 2), 2)]);
        // total 3, Saturday match +10, two Saturday mornings +4.
        assert_eq!(fallback_score(&stats, &gap(date(2025, 3, 15), 1)), 17);
        // Saturday afternoon: day matches, slot does not.
        assert_eq!(fallback_score(&stats, &gap(date(2025, 3, 15), 2)), 13);
        assert_eq!(fallback_score(&VolunteerStats::default(), &gap(date(2025, 3, 15), 1)), 0);
    }

    #[test]
    fn admin_fallback_ranks_and_omits_empty_gaps() {
        let volunteers = vec![
            volunteer(1, "Newbie", VolunteerStats::default()),
            volunteer(2, "Sunday", history(&[(date(2025, 3, 2), 1)])),
            volunteer(3, "Saturday", history(&[(date(2025, 3, 1), 1), (date(2025, 3, 8), 1)])),
        ];
        let gaps = vec![gap(date(2025, 3, 15), 1)];
        let slots = admin_fallback(&volunteers, &gaps);

        assert_eq!(slots.len(), 1);
        let names: Vec<_> = slots[0].volunteers.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["Saturday", "Sunday"]);
        assert_eq!(
            slots[0].volunteers[0].reason,
            "Has worked Saturdays before with 2 total shifts."
        );

        let only_newbies = vec![volunteer(1, "Newbie", VolunteerStats::default())];
        assert!(admin_fallback(&only_newbies, &gaps).is_empty());
    }

    #[test]
    fn admin_fallback_considers_first_ten_gaps_only() {
        let volunteers = vec![volunteer(1, "Anna", history(&[(date(2025, 3, 1), 1)]))];
        let mut gaps = Vec::new();
        let mut d = date(2025, 3, 1);
        while gaps.len() < 15 {
            gaps.push(gap(d, 1));
            d = d.succ_opt().unwrap();
        }
        assert_eq!(admin_fallback(&volunteers, &gaps).len(), ADMIN_FALLBACK_GAP_LIMIT);
    }
}
