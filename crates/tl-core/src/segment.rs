//! Segment building.
//!
//! A segment is a maximal run of events that the boundary rule keeps
//! together. Only a drive meeting a place visit separates two segments; a
//! non-drive activity in between (a walk to the car, a stroll around the
//! block) is resolved by looking further back into the segment built so far.

use std::sync::Arc;

use serde::{Serialize, Serializer};
use tracing::{debug, trace};

use crate::classify::{Boundary, EventKind, boundary_between};
use crate::cursor::Cursor;
use crate::event::TimelineEvent;

/// A sealed, non-empty run of events.
///
/// Cloning shares the underlying buffer, so the segment that closes one bin
/// and opens the next is the same value in both.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    events: Arc<[TimelineEvent]>,
}

impl Segment {
    /// Seals a buffer. Callers guarantee `events` is non-empty.
    pub(crate) fn seal(events: Vec<TimelineEvent>) -> Self {
        debug_assert!(!events.is_empty(), "segments are never empty");
        Self {
            events: events.into(),
        }
    }

    pub fn events(&self) -> &[TimelineEvent] {
        &self.events
    }

    pub fn first(&self) -> &TimelineEvent {
        &self.events[0]
    }

    pub fn last(&self) -> &TimelineEvent {
        &self.events[self.events.len() - 1]
    }

    pub fn contains_place_visit(&self) -> bool {
        self.events.iter().any(TimelineEvent::is_place_visit)
    }

    /// True if both segments are backed by the same buffer.
    pub fn shares_buffer_with(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.events, &other.events)
    }
}

impl Serialize for Segment {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(self.events.iter())
    }
}

/// Grows a maximal segment starting at the cursor head.
///
/// Returns `None` only if the cursor is already at the end of the stream.
/// Afterwards the cursor head is the first event of the next segment, or the
/// end marker.
pub fn build_segment<I>(cursor: &mut Cursor<I>) -> Option<Segment>
where
    I: Iterator<Item = TimelineEvent>,
{
    let mut events: Vec<TimelineEvent> = Vec::new();

    while let Some(current) = cursor.current() {
        if starts_new_segment(&events, current) {
            break;
        }
        let Some(event) = cursor.advance() else {
            break;
        };
        events.push(event);
    }

    if events.is_empty() {
        return None;
    }

    debug!(
        events = events.len(),
        places = events.iter().filter(|e| e.kind() == EventKind::Place).count(),
        drives = events.iter().filter(|e| e.kind() == EventKind::Drive).count(),
        at_end = cursor.is_exhausted(),
        "sealed segment"
    );
    Some(Segment::seal(events))
}

/// Decides whether `current` opens a new segment after `segment`.
///
/// Scans backward from the most recent event while the comparison is
/// ambiguous. Running past the start of the segment means no boundary.
fn starts_new_segment(segment: &[TimelineEvent], current: &TimelineEvent) -> bool {
    for (offset, earlier) in segment.iter().rev().enumerate() {
        match boundary_between(earlier, current) {
            Boundary::Definite => {
                trace!(lookback = offset + 1, "segment boundary");
                return true;
            }
            Boundary::Ambiguous => {}
            Boundary::Absent => return false,
        }
    }
    false
}
