//! The badge schedule table.
//!
//! A single table maps badge `set_id`s to their [`AvailabilityWindow`]. It ships built in (see
//! `schedule.yaml` next to this file) and can be extended or corrected with a YAML file of the
//! same shape, whose entries replace built-in ones with the same id:
//!
//! ```yaml
//! badges:
//!   evo-2026:
//!     type: time-limited
//!     start: "2026-07-31T00:00:00Z"
//!     end: "2026-08-02T23:59:59Z"
//!     description: "Evo 2026"
//!   bot-badge:
//!     type: ongoing
//!     description: "Now handed out to verified bots"
//! ```
//!
//! Timestamps are validated when the table is loaded, so the classifier only ever sees valid
//! instants.

use chrono::{DateTime, Utc};
use figment::{
    Figment,
    providers::{Format, Yaml},
};
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error as ThisError;
use tracing::{debug, info, warn};

use super::{AvailabilityResult, AvailabilityWindow, WindowKind, classify};

const BUILTIN_SCHEDULE: &str = include_str!("schedule.yaml");

static BUILTIN: Lazy<Result<Schedule, ScheduleError>> = Lazy::new(|| Schedule::from_yaml_str(BUILTIN_SCHEDULE));

#[derive(ThisError, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    /// The document is not valid YAML or does not have the expected shape
    #[error("Failed to parse schedule: {message}")]
    Parse { message: String },

    /// The schedule file could not be read
    #[error("Failed to read schedule file {path}: {message}")]
    Read { path: String, message: String },

    /// A start/end value is not an RFC 3339 instant
    #[error("Badge {badge_id}: invalid {field} timestamp {value:?}")]
    InvalidTimestamp {
        badge_id: String,
        field: &'static str,
        value: String,
    },

    /// A time-limited entry lacks one of its bounds
    #[error("Badge {badge_id}: time-limited window requires both start and end")]
    MissingBounds { badge_id: String },

    /// A time-limited entry ends before it starts
    #[error("Badge {badge_id}: window ends ({end}) before it starts ({start})")]
    InvertedWindow {
        badge_id: String,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum RecordKind {
    Ongoing,
    TimeLimited,
    Future,
}

/// A window as written in YAML, before timestamp validation.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct WindowRecord {
    #[serde(rename = "type")]
    kind: RecordKind,
    #[serde(default)]
    start: Option<String>,
    #[serde(default)]
    end: Option<String>,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ScheduleFile {
    badges: BTreeMap<String, WindowRecord>,
}

fn parse_instant(badge_id: &str, field: &'static str, value: &str) -> Result<DateTime<Utc>, ScheduleError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| ScheduleError::InvalidTimestamp {
            badge_id: badge_id.to_string(),
            field,
            value: value.to_string(),
        })
}

impl WindowRecord {
    fn into_window(self, badge_id: &str) -> Result<AvailabilityWindow, ScheduleError> {
        let kind = match self.kind {
            RecordKind::Ongoing | RecordKind::Future => {
                if self.start.is_some() || self.end.is_some() {
                    warn!(badge_id, "Ignoring start/end on a window without dates");
                }
                if matches!(self.kind, RecordKind::Ongoing) {
                    WindowKind::Ongoing
                } else {
                    WindowKind::Future
                }
            }
            RecordKind::TimeLimited => {
                let (Some(start), Some(end)) = (self.start.as_deref(), self.end.as_deref()) else {
                    return Err(ScheduleError::MissingBounds {
                        badge_id: badge_id.to_string(),
                    });
                };
                let start = parse_instant(badge_id, "start", start)?;
                let end = parse_instant(badge_id, "end", end)?;
                if end < start {
                    return Err(ScheduleError::InvertedWindow {
                        badge_id: badge_id.to_string(),
                        start,
                        end,
                    });
                }
                WindowKind::TimeLimited { start, end }
            }
        };

        Ok(AvailabilityWindow {
            kind,
            description: self.description,
        })
    }
}

/// Read-only lookup table from badge id to availability window.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schedule {
    windows: BTreeMap<String, AvailabilityWindow>,
}

impl Schedule {
    /// The table compiled into the binary.
    pub fn builtin() -> Result<Self, ScheduleError> {
        BUILTIN.clone()
    }

    /// Built-in table, with entries from `overrides` (if given) replacing or adding to it.
    pub fn load(overrides: Option<&Path>) -> Result<Self, ScheduleError> {
        let mut schedule = Self::builtin()?;
        if let Some(path) = overrides {
            let extra = Self::from_file(path)?;
            info!("Loaded {} schedule entries from {}", extra.len(), path.display());
            schedule.merge(extra);
        }
        debug!("Schedule has {} entries", schedule.len());
        Ok(schedule)
    }

    pub fn from_file(path: &Path) -> Result<Self, ScheduleError> {
        let contents = std::fs::read_to_string(path).map_err(|e| ScheduleError::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_yaml_str(&contents)
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, ScheduleError> {
        let file: ScheduleFile = Figment::from(Yaml::string(yaml))
            .extract()
            .map_err(|e| ScheduleError::Parse { message: e.to_string() })?;

        let windows = file
            .badges
            .into_iter()
            .map(|(badge_id, record)| {
                let window = record.into_window(&badge_id)?;
                Ok((badge_id, window))
            })
            .collect::<Result<BTreeMap<_, _>, ScheduleError>>()?;

        Ok(Self { windows })
    }

    /// Entries in `other` replace entries with the same badge id.
    pub fn merge(&mut self, other: Schedule) {
        self.windows.extend(other.windows);
    }

    pub fn insert(&mut self, badge_id: impl Into<String>, window: AvailabilityWindow) {
        self.windows.insert(badge_id.into(), window);
    }

    pub fn get(&self, badge_id: &str) -> Option<&AvailabilityWindow> {
        self.windows.get(badge_id)
    }

    /// Look up `badge_id` and classify it at `now`.
    pub fn classify(&self, badge_id: &str, now: DateTime<Utc>) -> AvailabilityResult {
        classify(self.get(badge_id), now)
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AvailabilityWindow)> {
        self.windows.iter().map(|(id, window)| (id.as_str(), window))
    }
}
