//! Flat journey records for tabular output.

use chrono::DateTime;
use chrono_tz::Tz;
use serde::Serialize;

use crate::binning::Bin;
use crate::event::TimelineEvent;

/// One row per accepted journey.
///
/// An origin or destination without any place visit yields empty name and
/// address fields (an unknown location).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JourneyRecord {
    pub start_location_name: String,
    pub start_location_address: String,
    pub trip_start: DateTime<Tz>,
    pub trip_end: DateTime<Tz>,
    /// Meters, summed over the journey's activities.
    pub distance: f64,
    pub end_location_name: String,
    pub end_location_address: String,
}

/// Projects a bin onto a [`JourneyRecord`].
///
/// The start location is the last place visited in the origin segment and the
/// end location the first place visited in the destination segment.
pub fn extract(bin: &Bin) -> JourneyRecord {
    let start = bin
        .origin()
        .events()
        .iter()
        .rev()
        .find_map(TimelineEvent::visited_location)
        .cloned()
        .unwrap_or_default();
    let end = bin
        .destination()
        .events()
        .iter()
        .find_map(TimelineEvent::visited_location)
        .cloned()
        .unwrap_or_default();
    let journey = bin.journey();

    JourneyRecord {
        start_location_name: start.name,
        start_location_address: start.address,
        trip_start: journey.first().duration().start,
        trip_end: journey.last().duration().end,
        distance: journey.events().iter().map(TimelineEvent::distance).sum(),
        end_location_name: end.name,
        end_location_address: end.address,
    }
}

impl JourneyRecord {
    /// True if the origin or the destination had no place visit.
    pub fn has_unknown_endpoint(&self) -> bool {
        (self.start_location_name.is_empty() && self.start_location_address.is_empty())
            || (self.end_location_name.is_empty() && self.end_location_address.is_empty())
    }
}
