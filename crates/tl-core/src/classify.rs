//! Event classification and the pairwise segment boundary rule.

use crate::event::{IN_PASSENGER_VEHICLE, TimelineEvent};

/// Coarse category of a timeline event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// A place visit.
    Place,
    /// An activity in a passenger vehicle.
    Drive,
    /// Any other activity (walking, cycling, public transport, ...).
    OtherActivity,
}

impl TimelineEvent {
    /// The category used by the boundary rule.
    pub fn kind(&self) -> EventKind {
        if self.is_place_visit() {
            EventKind::Place
        } else if self.is_drive() {
            EventKind::Drive
        } else {
            EventKind::OtherActivity
        }
    }

    pub const fn is_place_visit(&self) -> bool {
        matches!(self, Self::PlaceVisit(_))
    }

    pub const fn is_activity(&self) -> bool {
        matches!(self, Self::ActivitySegment(_))
    }

    /// An activity in a passenger vehicle.
    pub fn is_drive(&self) -> bool {
        matches!(self, Self::ActivitySegment(activity) if activity.activity_type == IN_PASSENGER_VEHICLE)
    }

    /// An activity that is not a drive.
    ///
    /// Not the same as `!is_drive()`, which also holds for place visits.
    pub fn is_non_drive_activity(&self) -> bool {
        self.is_activity() && !self.is_drive()
    }
}

/// Relation between an event already in a segment and the event being added.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    /// A drive meets a place visit: the new event starts a new segment.
    Definite,
    /// A non-drive activity meets a place visit or a drive: decided by the
    /// event before the earlier one.
    Ambiguous,
    /// The new event belongs to the same segment.
    Absent,
}

/// Classifies `current` against an `earlier` event of the segment being built.
pub fn boundary_between(earlier: &TimelineEvent, current: &TimelineEvent) -> Boundary {
    match (earlier.kind(), current.kind()) {
        (EventKind::Drive, EventKind::Place) | (EventKind::Place, EventKind::Drive) => {
            Boundary::Definite
        }
        (EventKind::OtherActivity, EventKind::Place | EventKind::Drive) => Boundary::Ambiguous,
        _ => Boundary::Absent,
    }
}
