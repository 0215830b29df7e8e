//! Serde types mirroring the Takeout JSON documents.
//!
//! Only the keys the binning pipeline uses are declared; everything else in
//! the export (waypoints, confidence values, candidate places) is ignored.

use serde::Deserialize;
use tl_core::Location;

/// One month file: `{"timelineObjects": [...]}`.
///
/// Entries stay untyped here so one badly shaped entry cannot fail the whole
/// month; each is converted to a [`RawTimelineObject`] on its own.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineDocument {
    pub timeline_objects: Vec<serde_json::Value>,
}

/// A timeline entry before validation. Well-formed entries carry exactly one
/// of the two keys.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTimelineObject {
    pub place_visit: Option<RawPlaceVisit>,
    pub activity_segment: Option<RawActivitySegment>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawPlaceVisit {
    pub location: Location,
    pub duration: Option<RawDuration>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawActivitySegment {
    pub activity_type: String,
    /// Meters. Older exports omit it for very short segments.
    pub distance: f64,
    pub start_location: Location,
    pub end_location: Location,
    pub duration: Option<RawDuration>,
}

/// Timestamps as exported: ISO 8601 strings in recent exports, epoch
/// milliseconds (as strings) in older ones.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawDuration {
    pub start_timestamp: Option<String>,
    pub end_timestamp: Option<String>,
    pub start_timestamp_ms: Option<String>,
    pub end_timestamp_ms: Option<String>,
}
