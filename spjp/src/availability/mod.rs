//! Badge availability classification.
//!
//! Given a badge's schedule entry and a reference instant, [`classify`] decides whether the badge
//! can currently be obtained and how long until that changes. The function is pure: it reads no
//! clock and holds no state, so callers pass `now` explicitly and may call it from anywhere.
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use spjp::availability::{classify, AvailabilityStatus, AvailabilityWindow};
//!
//! let window = AvailabilityWindow::time_limited(
//!     Utc.with_ymd_and_hms(2025, 6, 28, 0, 0, 0).unwrap(),
//!     Utc.with_ymd_and_hms(2025, 6, 29, 23, 59, 59).unwrap(),
//!     "LEGENDUS ITADAKI event June 28-29, 2025",
//! );
//! let now = Utc.with_ymd_and_hms(2025, 6, 25, 0, 0, 0).unwrap();
//!
//! let result = classify(Some(&window), now);
//! assert_eq!(result.status, AvailabilityStatus::Upcoming);
//! assert!(!result.is_available);
//! ```

pub mod schedule;

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;

use crate::i18n::{self, Language};

pub use schedule::Schedule;

/// How a badge is distributed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum WindowKind {
    /// No end condition, always obtainable
    Ongoing,
    /// Obtainable between two instants, both inclusive
    TimeLimited { start: DateTime<Utc>, end: DateTime<Utc> },
    /// Exists but distribution has not started and no dates are known
    Future,
}

/// A schedule entry for one badge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AvailabilityWindow {
    #[serde(flatten)]
    pub kind: WindowKind,
    pub description: String,
}

impl AvailabilityWindow {
    pub fn ongoing(description: impl Into<String>) -> Self {
        Self {
            kind: WindowKind::Ongoing,
            description: description.into(),
        }
    }

    pub fn time_limited(start: DateTime<Utc>, end: DateTime<Utc>, description: impl Into<String>) -> Self {
        Self {
            kind: WindowKind::TimeLimited { start, end },
            description: description.into(),
        }
    }

    pub fn future(description: impl Into<String>) -> Self {
        Self {
            kind: WindowKind::Future,
            description: description.into(),
        }
    }
}

/// Classification of a badge at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AvailabilityStatus {
    /// Ongoing distribution
    Available,
    /// Inside a time-limited window
    Limited,
    /// Time-limited window not yet open
    Upcoming,
    /// Time-limited window closed
    Expired,
    /// Distribution planned, no dates
    Future,
    /// Badge has no schedule entry
    Unknown,
}

impl AvailabilityStatus {
    /// Style class used by the listing; `Unknown` badges show no availability line at all.
    pub fn css_class(self) -> Option<&'static str> {
        match self {
            AvailabilityStatus::Available => Some("availability-available"),
            AvailabilityStatus::Limited => Some("availability-limited"),
            AvailabilityStatus::Upcoming => Some("availability-upcoming"),
            AvailabilityStatus::Expired => Some("availability-expired"),
            AvailabilityStatus::Future => Some("availability-future"),
            AvailabilityStatus::Unknown => None,
        }
    }
}

/// Locale-independent form of the status message. Render with [`AvailabilityResult::message`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Countdown {
    AvailableNow,
    StartsInDays(i64),
    EndsInHours(i64),
    EndsToday,
    EndsTomorrow,
    EndsInDays(i64),
    Ended,
    Scheduled,
    NoInformation,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AvailabilityResult {
    pub status: AvailabilityStatus,
    pub is_available: bool,
    pub countdown: Countdown,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
}

impl AvailabilityResult {
    pub fn message(&self, lang: Language) -> String {
        i18n::countdown_message(self.countdown, lang)
    }

    /// Both ends of the window, when the window has dates.
    pub fn period(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        self.start_date.zip(self.end_date)
    }

    fn unknown() -> Self {
        Self {
            status: AvailabilityStatus::Unknown,
            is_available: false,
            countdown: Countdown::NoInformation,
            description: None,
            start_date: None,
            end_date: None,
        }
    }
}

/// Classify a badge's schedule entry at `now`.
///
/// A missing entry is not an error: most badges have no special window and come back as
/// [`AvailabilityStatus::Unknown`]. Both ends of a time-limited window are inclusive.
pub fn classify(window: Option<&AvailabilityWindow>, now: DateTime<Utc>) -> AvailabilityResult {
    let Some(window) = window else {
        return AvailabilityResult::unknown();
    };
    let description = Some(window.description.clone());

    match window.kind {
        WindowKind::Ongoing => AvailabilityResult {
            status: AvailabilityStatus::Available,
            is_available: true,
            countdown: Countdown::AvailableNow,
            description,
            start_date: None,
            end_date: None,
        },
        WindowKind::Future => AvailabilityResult {
            status: AvailabilityStatus::Future,
            is_available: false,
            countdown: Countdown::Scheduled,
            description,
            start_date: None,
            end_date: None,
        },
        WindowKind::TimeLimited { start, end } => {
            let (status, countdown) = if now < start {
                (AvailabilityStatus::Upcoming, Countdown::StartsInDays(ceil_days(start - now)))
            } else if now > end {
                (AvailabilityStatus::Expired, Countdown::Ended)
            } else {
                (AvailabilityStatus::Limited, remaining_countdown(end - now))
            };

            AvailabilityResult {
                status,
                is_available: status == AvailabilityStatus::Limited,
                countdown,
                description,
                start_date: Some(start),
                end_date: Some(end),
            }
        }
    }
}

/// Countdown for an open window with `remaining` time left (never negative).
fn remaining_countdown(remaining: TimeDelta) -> Countdown {
    if remaining < TimeDelta::hours(24) {
        return Countdown::EndsInHours(ceil_hours(remaining));
    }
    match remaining.num_days() {
        0 => Countdown::EndsToday,
        1 => Countdown::EndsTomorrow,
        days => Countdown::EndsInDays(days),
    }
}

fn ceil_days(delta: TimeDelta) -> i64 {
    let days = delta.num_days();
    if delta > TimeDelta::days(days) { days + 1 } else { days }
}

fn ceil_hours(delta: TimeDelta) -> i64 {
    let hours = delta.num_hours();
    if delta > TimeDelta::hours(hours) { hours + 1 } else { hours }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    fn legendus() -> AvailabilityWindow {
        AvailabilityWindow::time_limited(
            at(2025, 6, 28, 0, 0, 0),
            at(2025, 6, 29, 23, 59, 59),
            "LEGENDUS ITADAKI event June 28-29, 2025",
        )
    }

    #[test]
    fn test_missing_window_is_unknown() {
        for now in [at(2000, 1, 1, 0, 0, 0), at(2025, 6, 29, 0, 0, 0), at(2100, 12, 31, 23, 59, 59)] {
            let result = classify(None, now);
            assert_eq!(result.status, AvailabilityStatus::Unknown);
            assert!(!result.is_available);
            assert_eq!(result.countdown, Countdown::NoInformation);
            assert_eq!(result.description, None);
        }
    }

    #[test]
    fn test_ongoing_is_always_available() {
        let window = AvailabilityWindow::ongoing("Ongoing feature since April 11, 2025");
        for now in [at(2011, 6, 1, 0, 0, 0), at(2025, 4, 11, 0, 0, 0), at(2099, 1, 1, 0, 0, 0)] {
            let result = classify(Some(&window), now);
            assert_eq!(result.status, AvailabilityStatus::Available);
            assert!(result.is_available);
            assert_eq!(result.message(Language::Ja), "現在入手可能");
            assert_eq!(result.period(), None);
        }
    }

    #[test]
    fn test_future_is_never_available() {
        let window = AvailabilityWindow::future("Added to system but not yet distributed");
        for now in [at(2011, 6, 1, 0, 0, 0), at(2099, 1, 1, 0, 0, 0)] {
            let result = classify(Some(&window), now);
            assert_eq!(result.status, AvailabilityStatus::Future);
            assert!(!result.is_available);
            assert_eq!(result.countdown, Countdown::Scheduled);
        }
    }

    #[test]
    fn test_upcoming_counts_whole_days_until_start() {
        let result = classify(Some(&legendus()), at(2025, 6, 25, 0, 0, 0));
        assert_eq!(result.status, AvailabilityStatus::Upcoming);
        assert!(!result.is_available);
        assert_eq!(result.countdown, Countdown::StartsInDays(3));
        assert_eq!(result.message(Language::Ja), "3日後に入手可能");
        assert_eq!(result.period(), Some((at(2025, 6, 28, 0, 0, 0), at(2025, 6, 29, 23, 59, 59))));
    }

    #[test]
    fn test_upcoming_rounds_partial_days_up() {
        let window = legendus();
        // One second before start is still a full day away in whole days.
        let result = classify(Some(&window), at(2025, 6, 27, 23, 59, 59));
        assert_eq!(result.countdown, Countdown::StartsInDays(1));

        let result = classify(Some(&window), at(2025, 6, 25, 0, 0, 1));
        assert_eq!(result.countdown, Countdown::StartsInDays(3));

        let result = classify(Some(&window), at(2025, 6, 24, 23, 59, 59));
        assert_eq!(result.countdown, Countdown::StartsInDays(4));

        let almost = at(2025, 6, 28, 0, 0, 0) - TimeDelta::nanoseconds(1);
        let result = classify(Some(&window), almost);
        assert_eq!(result.status, AvailabilityStatus::Upcoming);
        assert_eq!(result.countdown, Countdown::StartsInDays(1));
    }

    #[test]
    fn test_limited_uses_hours_in_last_day() {
        let result = classify(Some(&legendus()), at(2025, 6, 29, 20, 0, 0));
        assert_eq!(result.status, AvailabilityStatus::Limited);
        assert!(result.is_available);
        assert_eq!(result.countdown, Countdown::EndsInHours(4));
        assert_eq!(result.message(Language::Ja), "あと4時間で終了");
    }

    #[test]
    fn test_expired_after_end() {
        let result = classify(Some(&legendus()), at(2025, 6, 30, 0, 0, 0));
        assert_eq!(result.status, AvailabilityStatus::Expired);
        assert!(!result.is_available);
        assert_eq!(result.message(Language::Ja), "入手期間終了");
        assert!(result.start_date.is_some() && result.end_date.is_some());
    }

    #[test]
    fn test_start_boundary_is_inclusive() {
        let result = classify(Some(&legendus()), at(2025, 6, 28, 0, 0, 0));
        assert_eq!(result.status, AvailabilityStatus::Limited);
        assert!(result.is_available);
        // 47h59m59s remaining
        assert_eq!(result.countdown, Countdown::EndsTomorrow);
    }

    #[test]
    fn test_end_boundary_is_inclusive() {
        let result = classify(Some(&legendus()), at(2025, 6, 29, 23, 59, 59));
        assert_eq!(result.status, AvailabilityStatus::Limited);
        assert!(result.is_available);
        assert_eq!(result.countdown, Countdown::EndsInHours(0));

        let result = classify(Some(&legendus()), at(2025, 6, 29, 23, 59, 59) + TimeDelta::milliseconds(1));
        assert_eq!(result.status, AvailabilityStatus::Expired);
    }

    #[test]
    fn test_zero_length_window() {
        let instant = at(2025, 2, 14, 12, 0, 0);
        let window = AvailabilityWindow::time_limited(instant, instant, "flash drop");

        let before = classify(Some(&window), instant - TimeDelta::seconds(1));
        assert_eq!(before.status, AvailabilityStatus::Upcoming);
        assert_eq!(before.countdown, Countdown::StartsInDays(1));

        let during = classify(Some(&window), instant);
        assert_eq!(during.status, AvailabilityStatus::Limited);
        assert_eq!(during.countdown, Countdown::EndsInHours(0));

        let after = classify(Some(&window), instant + TimeDelta::seconds(1));
        assert_eq!(after.status, AvailabilityStatus::Expired);
    }

    #[test]
    fn test_hour_and_day_threshold() {
        let start = at(2025, 8, 1, 0, 0, 0);
        let end = at(2025, 8, 4, 23, 59, 59);
        let window = AvailabilityWindow::time_limited(start, end, "Evo 2025");

        let result = classify(Some(&window), end - TimeDelta::minutes(23 * 60 + 59));
        assert_eq!(result.countdown, Countdown::EndsInHours(24));

        let result = classify(Some(&window), end - TimeDelta::hours(24));
        assert_eq!(result.countdown, Countdown::EndsTomorrow);

        let result = classify(Some(&window), end - TimeDelta::minutes(24 * 60 + 1));
        assert_eq!(result.countdown, Countdown::EndsTomorrow);
        assert_eq!(result.message(Language::Ja), "あと1日で終了");
        assert_eq!(result.message(Language::En), "Ends in 1 day");

        let result = classify(Some(&window), end - TimeDelta::hours(48));
        assert_eq!(result.countdown, Countdown::EndsInDays(2));

        let result = classify(Some(&window), start);
        // 3 days 23:59:59 remaining, floored
        assert_eq!(result.countdown, Countdown::EndsInDays(3));
        assert_eq!(result.message(Language::Ja), "あと3日で終了");
    }

    #[test]
    fn test_remaining_countdown_branches() {
        assert_eq!(remaining_countdown(TimeDelta::zero()), Countdown::EndsInHours(0));
        assert_eq!(remaining_countdown(TimeDelta::minutes(1)), Countdown::EndsInHours(1));
        assert_eq!(remaining_countdown(TimeDelta::hours(1)), Countdown::EndsInHours(1));
        assert_eq!(remaining_countdown(TimeDelta::hours(24) - TimeDelta::milliseconds(1)), Countdown::EndsInHours(24));
        assert_eq!(remaining_countdown(TimeDelta::hours(24)), Countdown::EndsTomorrow);
        assert_eq!(remaining_countdown(TimeDelta::hours(47)), Countdown::EndsTomorrow);
        assert_eq!(remaining_countdown(TimeDelta::days(10)), Countdown::EndsInDays(10));
    }

    #[test]
    fn test_classification_is_deterministic() {
        let window = legendus();
        let now = at(2025, 6, 29, 1, 2, 3);
        assert_eq!(classify(Some(&window), now), classify(Some(&window), now));
    }

    #[test]
    fn test_status_css_classes() {
        assert_eq!(AvailabilityStatus::Limited.css_class(), Some("availability-limited"));
        assert_eq!(AvailabilityStatus::Expired.css_class(), Some("availability-expired"));
        assert_eq!(AvailabilityStatus::Unknown.css_class(), None);
    }

    #[test]
    fn test_result_serializes_for_display_layer() {
        let result = classify(Some(&legendus()), at(2025, 6, 29, 20, 0, 0));
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["status"], "limited");
        assert_eq!(json["is_available"], true);
        assert_eq!(json["countdown"]["kind"], "ends_in_hours");
        assert_eq!(json["countdown"]["value"], 4);
        assert_eq!(json["end_date"], "2025-06-29T23:59:59Z");
    }
}
