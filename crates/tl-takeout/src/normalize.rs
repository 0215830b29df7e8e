//! Raw Takeout entries to validated [`TimelineEvent`]s.

use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::Tz;
use thiserror::Error;
use tl_core::{ActivitySegment, PlaceVisit, TimeRange, TimelineEvent};

use crate::raw::{RawDuration, RawTimelineObject};

/// Why a timeline entry was rejected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("entry is neither a place visit nor an activity segment")]
    NoVariant,

    #[error("entry is both a place visit and an activity segment")]
    BothVariants,

    #[error("missing {0}")]
    MissingTimestamp(&'static str),

    #[error("invalid timestamp: {0:?}")]
    InvalidTimestamp(String),

    #[error("unexpected entry shape: {0}")]
    Shape(String),
}

/// Types an entry as read from a month file, then validates it.
pub fn normalize_value(
    value: serde_json::Value,
    tz: Tz,
) -> Result<TimelineEvent, NormalizeError> {
    let raw: RawTimelineObject =
        serde_json::from_value(value).map_err(|err| NormalizeError::Shape(err.to_string()))?;
    normalize(raw, tz)
}

/// Validates a raw entry and converts its timestamps to `tz`.
///
/// Missing names, addresses, coordinates, distances and activity types
/// default to empty or zero.
pub fn normalize(raw: RawTimelineObject, tz: Tz) -> Result<TimelineEvent, NormalizeError> {
    match (raw.place_visit, raw.activity_segment) {
        (Some(visit), None) => Ok(PlaceVisit {
            duration: time_range(visit.duration, tz)?,
            location: visit.location,
        }
        .into()),
        (None, Some(activity)) => Ok(ActivitySegment {
            duration: time_range(activity.duration, tz)?,
            activity_type: activity.activity_type,
            distance: activity.distance,
            start_location: activity.start_location,
            end_location: activity.end_location,
        }
        .into()),
        (None, None) => Err(NormalizeError::NoVariant),
        (Some(_), Some(_)) => Err(NormalizeError::BothVariants),
    }
}

fn time_range(duration: Option<RawDuration>, tz: Tz) -> Result<TimeRange, NormalizeError> {
    let duration = duration.ok_or(NormalizeError::MissingTimestamp("duration"))?;
    let start = timestamp(
        duration.start_timestamp,
        duration.start_timestamp_ms,
        "startTimestamp",
    )?;
    let end = timestamp(
        duration.end_timestamp,
        duration.end_timestamp_ms,
        "endTimestamp",
    )?;
    Ok(TimeRange::new(start.with_timezone(&tz), end.with_timezone(&tz)))
}

/// Prefers the ISO 8601 field, falling back to epoch milliseconds.
fn timestamp(
    iso: Option<String>,
    millis: Option<String>,
    field: &'static str,
) -> Result<DateTime<Utc>, NormalizeError> {
    if let Some(iso) = iso {
        return DateTime::parse_from_rfc3339(&iso)
            .map(|ts| ts.with_timezone(&Utc))
            .map_err(|_| NormalizeError::InvalidTimestamp(iso));
    }
    let millis = millis.ok_or(NormalizeError::MissingTimestamp(field))?;
    millis
        .parse::<i64>()
        .ok()
        .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
        .ok_or(NormalizeError::InvalidTimestamp(millis))
}
