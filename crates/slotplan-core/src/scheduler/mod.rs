//! Slot scheduler for matched issues.
//!
//! Turns a set of open issues and a contract's tickets into calendar slots:
//! - Matches issues to tickets by title similarity
//! - Sorts matched pairs by estimate (smallest first for quick wins)
//! - Walks the calendar day by day, alternating a morning and an evening
//!   anchor, spacing placements by estimate and injecting rest days once
//!   enough consecutive load has accumulated
//!
//! The whole computation is a single deterministic pass over
//! `(issues, tickets, config, now)`. The clock is injected -- the planner
//! never reads wall time itself.

pub mod matcher;

use std::collections::HashSet;

use chrono::{DateTime, Datelike, Duration, NaiveTime, Utc, Weekday};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::contract::Ticket;
use crate::error::ScheduleError;

pub use matcher::DEFAULT_ESTIMATE;

/// Time-of-day anchor for even-numbered placements.
const MORNING_ANCHOR: &str = "07:00";

/// Time-of-day the walking cursor is pinned to on initialization.
const CURSOR_ANCHOR: &str = "18:00";

/// Per-item bound on the day-step search.
const MAX_ATTEMPTS: u32 = 365;

/// Accumulated spacing days that trigger a rest injection.
const MAX_CONSECUTIVE_LOAD: u32 = 7;

/// An externally tracked work item to be scheduled. Read-only input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    pub number: i64,
    pub title: String,
}

/// Transient pairing of an issue with its most plausible ticket.
/// Lives for one scheduling run.
#[derive(Debug, Clone)]
pub struct MatchedPair<'a> {
    pub issue: &'a Issue,
    pub ticket: Option<&'a Ticket>,
    pub estimate: u32,
}

/// One scheduled placement: an issue pinned to a date/time anchor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub id: String,
    pub issue_number: i64,
    pub issue_title: String,
    pub slot_time: DateTime<Utc>,
    pub estimate_slots: u32,
}

impl ScheduleEntry {
    fn new(issue: &Issue, slot_time: DateTime<Utc>, estimate_slots: u32) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            issue_number: issue.number,
            issue_title: issue.title.clone(),
            slot_time,
            estimate_slots,
        }
    }
}

/// Working hours as parsed time-of-day bounds.
#[derive(Debug, Clone, Copy)]
pub struct WorkHours {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

/// Configuration for one scheduling run.
#[derive(Debug, Clone)]
pub struct SlotPlannerConfig {
    /// First day considered for placement.
    pub start_date: DateTime<Utc>,
    /// Work-hours start, `HH:MM`.
    pub work_start: String,
    /// Work-hours end, `HH:MM`. Doubles as the evening slot anchor.
    pub work_end: String,
    /// Calendar-event duration for each slot, in minutes.
    pub slot_minutes: u32,
    /// Days eligible for placement. `None` means every day of the week.
    pub work_days: Option<Vec<Weekday>>,
    /// Days appended to the cursor on each rest injection.
    pub rest_days_per_week: u32,
}

/// The slot-scheduling engine.
#[derive(Debug)]
pub struct SlotPlanner {
    start_date: DateTime<Utc>,
    work_hours: WorkHours,
    slot_minutes: u32,
    work_days: HashSet<Weekday>,
    rest_days_per_week: u32,
    morning_anchor: NaiveTime,
    cursor_anchor: NaiveTime,
}

impl SlotPlanner {
    /// Validate the configuration and build a planner.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError`] for unparsable work-hour strings or a zero
    /// slot duration. No partial scheduling happens under invalid
    /// configuration.
    pub fn new(config: SlotPlannerConfig) -> Result<Self, ScheduleError> {
        let work_hours = WorkHours {
            start: parse_work_time(&config.work_start)?,
            end: parse_work_time(&config.work_end)?,
        };

        if config.slot_minutes == 0 {
            return Err(ScheduleError::InvalidSlotDuration {
                minutes: config.slot_minutes,
            });
        }

        let work_days: HashSet<Weekday> = match config.work_days {
            Some(days) => days.into_iter().collect(),
            None => [
                Weekday::Mon,
                Weekday::Tue,
                Weekday::Wed,
                Weekday::Thu,
                Weekday::Fri,
                Weekday::Sat,
                Weekday::Sun,
            ]
            .into_iter()
            .collect(),
        };

        Ok(Self {
            start_date: config.start_date,
            work_hours,
            slot_minutes: config.slot_minutes,
            work_days,
            rest_days_per_week: config.rest_days_per_week,
            morning_anchor: parse_work_time(MORNING_ANCHOR)?,
            cursor_anchor: parse_work_time(CURSOR_ANCHOR)?,
        })
    }

    /// Event duration for each produced slot, in minutes.
    pub fn slot_minutes(&self) -> u32 {
        self.slot_minutes
    }

    /// Pair every issue with its most plausible ticket and resolve the
    /// effective estimate. Unmatched issues keep the default estimate.
    pub fn match_pairs<'a>(
        &self,
        issues: &'a [Issue],
        tickets: &'a [Ticket],
    ) -> Vec<MatchedPair<'a>> {
        issues
            .iter()
            .map(|issue| {
                let ticket = matcher::match_issue_to_ticket(&issue.title, tickets);
                let estimate = matcher::effective_estimate(ticket);
                debug!(
                    issue = issue.number,
                    ticket = ticket.map(|t| t.name.as_str()),
                    estimate,
                    "matched issue"
                );
                MatchedPair {
                    issue,
                    ticket,
                    estimate,
                }
            })
            .collect()
    }

    /// Compute the schedule: one slot per issue, in estimate-ascending
    /// processing order. Items that cannot be placed within the search
    /// bound are warned about and omitted; the run continues.
    ///
    /// `now` is the instant every slot must come strictly after. Pass
    /// `Utc::now()` for live planning or a fixed instant for reproducible
    /// output.
    pub fn plan(
        &self,
        issues: &[Issue],
        tickets: &[Ticket],
        now: DateTime<Utc>,
    ) -> Vec<ScheduleEntry> {
        let mut pairs = self.match_pairs(issues, tickets);
        // Stable sort: issue input order breaks estimate ties.
        pairs.sort_by_key(|pair| pair.estimate);

        let mut schedule = Vec::new();
        let mut cursor = at_time(self.start_date, self.cursor_anchor);
        if cursor < now {
            cursor = at_time(now, self.cursor_anchor);
        }

        let mut consecutive_load: u32 = 0;
        let mut placed_count: usize = 0;

        for pair in &pairs {
            let mut placed = false;

            for _ in 0..MAX_ATTEMPTS {
                if self.work_days.contains(&cursor.weekday()) {
                    let slot_time = if placed_count % 2 == 0 {
                        at_time(cursor, self.morning_anchor)
                    } else {
                        at_time(cursor, self.work_hours.end)
                    };

                    if slot_time > now {
                        schedule.push(ScheduleEntry::new(pair.issue, slot_time, pair.estimate));
                        placed_count += 1;

                        let spacing = spacing_days(pair.estimate);
                        cursor += Duration::days(i64::from(spacing));
                        consecutive_load += spacing;

                        if consecutive_load >= MAX_CONSECUTIVE_LOAD {
                            cursor += Duration::days(i64::from(self.rest_days_per_week));
                            consecutive_load = 0;
                        }

                        placed = true;
                        break;
                    }
                }

                cursor += Duration::days(1);
            }

            if !placed {
                warn!(
                    issue = pair.issue.number,
                    title = %pair.issue.title,
                    "could not schedule issue within the search window"
                );
            }
        }

        schedule
    }
}

/// Forward spacing after a placement, in days.
///
/// Small items pack densely; large items push the cursor proportionally so
/// one big unit of work does not crowd the near-term calendar.
fn spacing_days(estimate: u32) -> u32 {
    match estimate {
        0..=2 => 1,
        3..=5 => 2,
        _ => (estimate / 2).max(3),
    }
}

/// Pin a datetime to a time-of-day on the same date.
fn at_time(day: DateTime<Utc>, time: NaiveTime) -> DateTime<Utc> {
    day.date_naive().and_time(time).and_utc()
}

/// Parse an `HH:MM` work-hour string. A missing or empty minute part
/// defaults to zero.
fn parse_work_time(value: &str) -> Result<NaiveTime, ScheduleError> {
    let invalid = || ScheduleError::InvalidWorkHours {
        value: value.to_string(),
    };

    let mut parts = value.split(':');
    let hour: u32 = parts
        .next()
        .filter(|h| !h.is_empty())
        .and_then(|h| h.trim().parse().ok())
        .ok_or_else(invalid)?;
    let minute: u32 = match parts.next() {
        None | Some("") => 0,
        Some(m) => m.trim().parse().map_err(|_| invalid())?,
    };

    NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(invalid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn make_issue(number: i64, title: &str) -> Issue {
        Issue {
            number,
            title: title.to_string(),
        }
    }

    fn make_ticket(name: &str, estimate: Option<u32>) -> Ticket {
        Ticket {
            name: name.to_string(),
            estimate_slots: estimate,
            description: String::new(),
            scope_excluded: Vec::new(),
        }
    }

    fn make_config(start_date: DateTime<Utc>) -> SlotPlannerConfig {
        SlotPlannerConfig {
            start_date,
            work_start: "09:00".to_string(),
            work_end: "18:00".to_string(),
            slot_minutes: 45,
            work_days: None,
            rest_days_per_week: 1,
        }
    }

    /// Monday 2026-01-05, noon.
    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 5, 12, 0, 0).unwrap()
    }

    #[test]
    fn every_slot_is_strictly_after_now() {
        let now = fixed_now();
        let planner = SlotPlanner::new(make_config(now - Duration::days(30))).unwrap();

        let issues = vec![
            make_issue(1, "one"),
            make_issue(2, "two"),
            make_issue(3, "three"),
        ];
        let schedule = planner.plan(&issues, &[], now);

        assert_eq!(schedule.len(), 3);
        for entry in &schedule {
            assert!(entry.slot_time > now);
        }
    }

    #[test]
    fn slots_fall_on_configured_work_days_only() {
        let now = fixed_now();
        let mut config = make_config(now + Duration::days(1));
        config.work_days = Some(vec![
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
        ]);
        let planner = SlotPlanner::new(config).unwrap();

        let issues: Vec<Issue> = (1..=8).map(|n| make_issue(n, "task")).collect();
        let schedule = planner.plan(&issues, &[], now);

        assert_eq!(schedule.len(), 8);
        for entry in &schedule {
            let weekday = entry.slot_time.weekday();
            assert_ne!(weekday, Weekday::Sat);
            assert_ne!(weekday, Weekday::Sun);
        }
    }

    #[test]
    fn no_two_slots_share_a_timestamp() {
        let now = fixed_now();
        let planner = SlotPlanner::new(make_config(now + Duration::days(1))).unwrap();

        let issues: Vec<Issue> = (1..=10).map(|n| make_issue(n, "task")).collect();
        let schedule = planner.plan(&issues, &[], now);

        let mut seen = HashSet::new();
        for entry in &schedule {
            assert!(seen.insert(entry.slot_time), "duplicate slot {}", entry.slot_time);
        }
    }

    #[test]
    fn placements_alternate_morning_and_evening_anchors() {
        let now = fixed_now();
        let planner = SlotPlanner::new(make_config(now + Duration::days(1))).unwrap();

        let issues: Vec<Issue> = (1..=4).map(|n| make_issue(n, "task")).collect();
        let schedule = planner.plan(&issues, &[], now);

        let morning = NaiveTime::from_hms_opt(7, 0, 0).unwrap();
        let evening = NaiveTime::from_hms_opt(18, 0, 0).unwrap();
        assert_eq!(schedule[0].slot_time.time(), morning);
        assert_eq!(schedule[1].slot_time.time(), evening);
        assert_eq!(schedule[2].slot_time.time(), morning);
        assert_eq!(schedule[3].slot_time.time(), evening);
    }

    #[test]
    fn processing_order_is_estimate_ascending_with_tiered_spacing() {
        let now = fixed_now();
        let planner = SlotPlanner::new(make_config(now + Duration::days(3))).unwrap();

        let issues = vec![
            make_issue(1, "Build data exporter"),
            make_issue(2, "Fix login typo"),
            make_issue(3, "Rework billing engine"),
        ];
        let tickets = vec![
            make_ticket("Build data exporter", Some(8)),
            make_ticket("Fix login typo", Some(1)),
            make_ticket("Rework billing engine", Some(5)),
        ];

        let schedule = planner.plan(&issues, &tickets, now);
        assert_eq!(schedule.len(), 3);

        // Quick wins first.
        assert_eq!(schedule[0].issue_number, 2);
        assert_eq!(schedule[1].issue_number, 3);
        assert_eq!(schedule[2].issue_number, 1);

        // Spacing law: 1 day after the estimate-1 item, 2 days after the
        // estimate-5 item.
        let d0 = schedule[0].slot_time.date_naive();
        let d1 = schedule[1].slot_time.date_naive();
        let d2 = schedule[2].slot_time.date_naive();
        assert_eq!((d1 - d0).num_days(), 1);
        assert_eq!((d2 - d1).num_days(), 2);
    }

    #[test]
    fn equal_estimates_preserve_issue_input_order() {
        let now = fixed_now();
        let planner = SlotPlanner::new(make_config(now + Duration::days(1))).unwrap();

        let issues = vec![
            make_issue(10, "alpha work"),
            make_issue(11, "beta work"),
            make_issue(12, "gamma work"),
        ];
        let schedule = planner.plan(&issues, &[], now);

        let numbers: Vec<i64> = schedule.iter().map(|e| e.issue_number).collect();
        assert_eq!(numbers, vec![10, 11, 12]);
    }

    #[test]
    fn unmatched_issue_is_scheduled_with_default_estimate() {
        let now = fixed_now();
        let planner = SlotPlanner::new(make_config(now + Duration::days(1))).unwrap();

        let tickets = vec![make_ticket("database migration", Some(8))];
        let issues = vec![make_issue(7, "Completely unrelated chore")];

        let schedule = planner.plan(&issues, &tickets, now);
        assert_eq!(schedule.len(), 1);
        assert_eq!(schedule[0].estimate_slots, DEFAULT_ESTIMATE);
    }

    #[test]
    fn rest_days_injected_once_load_reaches_seven() {
        let now = fixed_now();
        let mut config = make_config(now + Duration::days(1));
        config.rest_days_per_week = 3;
        let planner = SlotPlanner::new(config).unwrap();

        // Five unmatched issues, estimate 3 each: spacing 2 per placement,
        // load hits 8 >= 7 after the fourth.
        let issues: Vec<Issue> = (1..=5).map(|n| make_issue(n, "chore")).collect();
        let schedule = planner.plan(&issues, &[], now);
        assert_eq!(schedule.len(), 5);

        let dates: Vec<_> = schedule.iter().map(|e| e.slot_time.date_naive()).collect();
        assert_eq!((dates[1] - dates[0]).num_days(), 2);
        assert_eq!((dates[2] - dates[1]).num_days(), 2);
        assert_eq!((dates[3] - dates[2]).num_days(), 2);
        // Rest injection: 2 days of spacing plus 3 rest days.
        assert_eq!((dates[4] - dates[3]).num_days(), 5);
    }

    #[test]
    fn start_date_in_the_past_clamps_to_now() {
        let now = fixed_now();
        let planner = SlotPlanner::new(make_config(now - Duration::days(90))).unwrap();

        let schedule = planner.plan(&[make_issue(1, "task")], &[], now);
        assert_eq!(schedule.len(), 1);
        // The morning anchor of now's own day is already past, so the walk
        // lands on the next day -- never on the stale start date.
        assert_eq!(
            schedule[0].slot_time.date_naive(),
            now.date_naive() + Duration::days(1)
        );
        assert!(schedule[0].slot_time > now);
    }

    #[test]
    fn empty_inputs_yield_empty_schedule() {
        let now = fixed_now();
        let planner = SlotPlanner::new(make_config(now)).unwrap();
        assert!(planner.plan(&[], &[], now).is_empty());
    }

    #[test]
    fn zero_work_days_leaves_everything_unplaced() {
        let now = fixed_now();
        let mut config = make_config(now + Duration::days(1));
        config.work_days = Some(Vec::new());
        let planner = SlotPlanner::new(config).unwrap();

        let issues: Vec<Issue> = (1..=3).map(|n| make_issue(n, "task")).collect();
        let schedule = planner.plan(&issues, &[], now);
        assert!(schedule.is_empty());
    }

    #[test]
    fn invalid_work_hours_fail_construction() {
        let mut config = make_config(fixed_now());
        config.work_end = "6pm".to_string();
        let err = SlotPlanner::new(config).unwrap_err();
        assert!(matches!(err, ScheduleError::InvalidWorkHours { .. }));

        let mut config = make_config(fixed_now());
        config.work_start = "25:00".to_string();
        assert!(SlotPlanner::new(config).is_err());
    }

    #[test]
    fn zero_slot_duration_fails_construction() {
        let mut config = make_config(fixed_now());
        config.slot_minutes = 0;
        let err = SlotPlanner::new(config).unwrap_err();
        assert!(matches!(err, ScheduleError::InvalidSlotDuration { minutes: 0 }));
    }

    #[test]
    fn hour_only_work_time_parses_with_zero_minutes() {
        let parsed = parse_work_time("18").unwrap();
        assert_eq!(parsed, NaiveTime::from_hms_opt(18, 0, 0).unwrap());

        let parsed = parse_work_time("18:").unwrap();
        assert_eq!(parsed, NaiveTime::from_hms_opt(18, 0, 0).unwrap());
    }

    #[test]
    fn spacing_tiers() {
        assert_eq!(spacing_days(1), 1);
        assert_eq!(spacing_days(2), 1);
        assert_eq!(spacing_days(3), 2);
        assert_eq!(spacing_days(5), 2);
        assert_eq!(spacing_days(6), 3);
        assert_eq!(spacing_days(8), 4);
        assert_eq!(spacing_days(13), 6);
    }
}
