//! Pull-based traversal of an event source.

use std::iter::Fuse;

use crate::event::TimelineEvent;

/// Position in a lazy event stream: the current head plus the rest of the source.
///
/// An empty head is the end marker. Once reached it stays reached, even if the
/// underlying iterator would yield again.
#[derive(Debug)]
pub struct Cursor<I> {
    head: Option<TimelineEvent>,
    rest: Fuse<I>,
}

impl<I: Iterator<Item = TimelineEvent>> Cursor<I> {
    /// Creates a cursor positioned on the first event of `source`.
    pub fn new<S>(source: S) -> Self
    where
        S: IntoIterator<IntoIter = I>,
    {
        let mut rest = source.into_iter().fuse();
        let head = rest.next();
        Self { head, rest }
    }

    /// The event at the head, or `None` at the end of the stream.
    pub const fn current(&self) -> Option<&TimelineEvent> {
        self.head.as_ref()
    }

    pub const fn is_exhausted(&self) -> bool {
        self.head.is_none()
    }

    /// Takes the head and pulls the next event from the source into its place.
    pub fn advance(&mut self) -> Option<TimelineEvent> {
        let taken = self.head.take()?;
        self.head = self.rest.next();
        Some(taken)
    }
}
