//! Event builders shared by the unit tests.

use chrono::{DateTime, Duration, TimeZone};
use chrono_tz::Europe::Amsterdam;
use chrono_tz::Tz;

use crate::binning::Bin;
use crate::event::{
    ActivitySegment, IN_PASSENGER_VEHICLE, Location, PlaceVisit, TimeRange, TimelineEvent,
};
use crate::segment::Segment;

/// Monday 2023-06-05 12:00 in Amsterdam, shifted by `minutes`.
pub fn ts(minutes: i64) -> DateTime<Tz> {
    Amsterdam
        .with_ymd_and_hms(2023, 6, 5, 12, 0, 0)
        .single()
        .expect("valid test timestamp")
        + Duration::minutes(minutes)
}

/// A wall-clock time in Amsterdam.
pub fn local(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Tz> {
    Amsterdam
        .with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .expect("valid test timestamp")
}

/// Half an hour starting at `start`.
pub fn half_hour(start: DateTime<Tz>) -> TimeRange {
    TimeRange::new(start, start + Duration::minutes(30))
}

pub fn place(start: DateTime<Tz>) -> TimelineEvent {
    place_named(start, "", "")
}

pub fn place_named(start: DateTime<Tz>, name: &str, address: &str) -> TimelineEvent {
    TimelineEvent::PlaceVisit(PlaceVisit {
        location: Location {
            name: name.to_string(),
            address: address.to_string(),
            ..Location::default()
        },
        duration: half_hour(start),
    })
}

pub fn activity(start: DateTime<Tz>, activity_type: &str, distance: f64) -> TimelineEvent {
    TimelineEvent::ActivitySegment(ActivitySegment {
        activity_type: activity_type.to_string(),
        distance,
        start_location: Location::default(),
        end_location: Location::default(),
        duration: half_hour(start),
    })
}

pub fn walk(start: DateTime<Tz>) -> TimelineEvent {
    activity(start, "WALKING", 100.0)
}

pub fn drive(start: DateTime<Tz>, distance: f64) -> TimelineEvent {
    activity(start, IN_PASSENGER_VEHICLE, distance)
}

/// Noon on the given day of June 2023 in Amsterdam.
pub fn june(day: u32) -> DateTime<Tz> {
    local(2023, 6, day, 12, 0)
}

/// A month of history: two activities before the first place, three
/// complete journeys, and a trailing drive that never arrives anywhere.
///
/// Segments: `[walk, drive]`, `[home]`, `[drive]`, `[customer 1 .. walk]`,
/// `[drive, walk]`, `[home, walk, place]`, `[drive]`, `[customer 2 .. place]`,
/// `[drive]`.
pub fn reference_history() -> Vec<TimelineEvent> {
    vec![
        walk(june(1)),
        drive(june(2), 5_000.0),
        place_named(june(5), "Home", "Dorpsstraat 1"),
        drive(june(6), 12_000.0),
        place_named(june(7), "Customer 1", "Marktplein 3"),
        walk(june(8)),
        place(june(9)),
        walk(june(12)),
        place(june(13)),
        walk(june(14)),
        place(june(15)),
        place(june(16)),
        walk(june(19)),
        drive(june(20), 15_000.0),
        walk(june(21)),
        place_named(june(22), "Home", "Dorpsstraat 1"),
        walk(june(23)),
        place(june(26)),
        drive(june(27), 20_000.0),
        place_named(june(28), "Customer 2", "Stationsweg 9"),
        walk(june(29)),
        place(june(30)),
        drive(local(2023, 7, 3, 12, 0), 8_000.0),
    ]
}

/// A bin around `journey`, with single place visits on either side.
pub fn bin_with_journey(journey: Vec<TimelineEvent>) -> Bin {
    let departure = journey[0].duration().start - Duration::hours(1);
    let arrival = journey[journey.len() - 1].duration().end;
    Bin::new(
        Segment::seal(vec![place(departure)]),
        Segment::seal(journey),
        Segment::seal(vec![place(arrival)]),
    )
}
