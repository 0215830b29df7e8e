//! Timeline segmentation and journey binning.
//!
//! This crate turns a chronological stream of location-history events into
//! journeys:
//! - Segmentation: maximal runs of events split where a drive meets a place
//! - Binning: origin place, journey, destination place, chained bin to bin
//! - Policy: keeping journeys made within business hours
//! - Records: flat rows for tabular output

pub mod binning;
mod classify;
pub mod cursor;
pub mod event;
pub mod policy;
pub mod record;
pub mod segment;
pub mod stream;

#[cfg(test)]
mod testing;

pub use binning::{Bin, BinOutcome, build_bin};
pub use classify::{Boundary, EventKind, boundary_between};
pub use cursor::Cursor;
pub use event::{
    ActivitySegment, IN_PASSENGER_VEHICLE, Location, PlaceVisit, TimeRange, TimelineEvent,
};
pub use policy::{
    HolidayRange, MatchRule, PolicyConfig, PolicyError, TemporalPolicy, TimeWindow,
    WeekdayWindows,
};
pub use record::{JourneyRecord, extract};
pub use segment::{Segment, build_segment};
pub use stream::{BinStream, StreamSummary};
