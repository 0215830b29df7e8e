//! Location-history events as they flow through the binning engine.

use chrono::DateTime;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Activity type recorded for trips by car.
pub const IN_PASSENGER_VEHICLE: &str = "IN_PASSENGER_VEHICLE";

/// A place as recorded in the location history.
///
/// Every field is optional in the source data and defaults to empty or zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Location {
    /// Human-readable place name.
    pub name: String,
    /// Postal address.
    pub address: String,
    /// Latitude in degrees times 10^7.
    pub latitude_e7: i64,
    /// Longitude in degrees times 10^7.
    pub longitude_e7: i64,
}

/// When an event started and ended, in the reference timezone.
///
/// `start <= end` is assumed but not checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeRange {
    #[serde(rename = "startTimestamp")]
    pub start: DateTime<Tz>,
    #[serde(rename = "endTimestamp")]
    pub end: DateTime<Tz>,
}

impl TimeRange {
    pub const fn new(start: DateTime<Tz>, end: DateTime<Tz>) -> Self {
        Self { start, end }
    }
}

/// A stay at a location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceVisit {
    pub location: Location,
    pub duration: TimeRange,
}

/// Movement between two locations, tagged with a transportation mode.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivitySegment {
    /// Transportation mode, e.g. `WALKING` or `IN_PASSENGER_VEHICLE`.
    pub activity_type: String,
    /// Distance in meters.
    pub distance: f64,
    pub start_location: Location,
    pub end_location: Location,
    pub duration: TimeRange,
}

/// One entry of the location history.
///
/// Serializes in the same shape as the source documents:
/// `{"placeVisit": {...}}` or `{"activitySegment": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum TimelineEvent {
    #[serde(rename = "placeVisit")]
    PlaceVisit(PlaceVisit),
    #[serde(rename = "activitySegment")]
    ActivitySegment(ActivitySegment),
}

impl TimelineEvent {
    /// The time span covered by this event.
    pub const fn duration(&self) -> &TimeRange {
        match self {
            Self::PlaceVisit(visit) => &visit.duration,
            Self::ActivitySegment(activity) => &activity.duration,
        }
    }

    /// The visited location, if this is a place visit.
    pub const fn visited_location(&self) -> Option<&Location> {
        match self {
            Self::PlaceVisit(visit) => Some(&visit.location),
            Self::ActivitySegment(_) => None,
        }
    }

    /// Distance travelled in meters. Place visits contribute nothing.
    pub const fn distance(&self) -> f64 {
        match self {
            Self::PlaceVisit(_) => 0.0,
            Self::ActivitySegment(activity) => activity.distance,
        }
    }
}

impl From<PlaceVisit> for TimelineEvent {
    fn from(visit: PlaceVisit) -> Self {
        Self::PlaceVisit(visit)
    }
}

impl From<ActivitySegment> for TimelineEvent {
    fn from(activity: ActivitySegment) -> Self {
        Self::ActivitySegment(activity)
    }
}
