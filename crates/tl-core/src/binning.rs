//! Bin assembly: origin place, journey, destination place.

use serde::{Serialize, Serializer};
use tracing::debug;

use crate::cursor::Cursor;
use crate::event::TimelineEvent;
use crate::segment::{Segment, build_segment};

/// One journey candidate: the place segment it leaves from, the trip, and the
/// place segment it arrives at.
///
/// Serializes as an array of three segments.
#[derive(Debug, Clone, PartialEq)]
pub struct Bin {
    origin: Segment,
    journey: Segment,
    destination: Segment,
}

impl Bin {
    pub(crate) const fn new(origin: Segment, journey: Segment, destination: Segment) -> Self {
        Self {
            origin,
            journey,
            destination,
        }
    }

    /// The place segment the journey starts from.
    pub const fn origin(&self) -> &Segment {
        &self.origin
    }

    /// The trip itself.
    pub const fn journey(&self) -> &Segment {
        &self.journey
    }

    /// The place segment the journey ends at.
    pub const fn destination(&self) -> &Segment {
        &self.destination
    }
}

impl Serialize for Bin {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        (&self.origin, &self.journey, &self.destination).serialize(serializer)
    }
}

/// Result of [`build_bin`].
#[derive(Debug)]
pub enum BinOutcome {
    Complete(Bin),
    /// The stream ended first. Holds the seed and whatever followed it.
    Incomplete(Vec<Segment>),
}

/// Appends segments to `seed` until the bin holds three or the stream ends.
pub fn build_bin<I>(cursor: &mut Cursor<I>, seed: Segment) -> BinOutcome
where
    I: Iterator<Item = TimelineEvent>,
{
    let Some(journey) = build_segment(cursor) else {
        debug!("stream ended after the origin segment");
        return BinOutcome::Incomplete(vec![seed]);
    };
    let Some(destination) = build_segment(cursor) else {
        debug!("stream ended after the journey segment");
        return BinOutcome::Incomplete(vec![seed, journey]);
    };

    BinOutcome::Complete(Bin::new(seed, journey, destination))
}
