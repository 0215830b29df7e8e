//! Bin streams - journeys across a whole location history.

use std::iter::FusedIterator;

use serde::Serialize;
use tracing::{debug, info};

use crate::binning::{Bin, BinOutcome, build_bin};
use crate::cursor::Cursor;
use crate::event::TimelineEvent;
use crate::segment::{Segment, build_segment};

/// Events the stream discarded at its edges.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StreamSummary {
    /// Events before the first segment that contains a place visit.
    pub leading_events_skipped: usize,

    /// Events after the last complete bin that never made it into one.
    pub trailing_events_dropped: usize,

    /// Complete bins produced.
    pub bins_emitted: usize,
}

#[derive(Debug)]
enum State {
    /// Nothing read yet; the first bin still needs an origin.
    Start,
    /// The destination of the last bin, to be the origin of the next.
    Chained(Segment),
    Done,
}

/// Lazily turns a chronological event source into complete bins.
///
/// The first bin starts at the first segment containing a place visit; each
/// following bin starts with the previous bin's destination segment (shared,
/// not rebuilt). A trailing bin cut short by the end of the input is dropped.
/// What was dropped is reported by [`BinStream::summary`].
///
/// Single pass: to start over, build a new stream from a fresh source.
#[derive(Debug)]
pub struct BinStream<I> {
    cursor: Cursor<I>,
    state: State,
    summary: StreamSummary,
}

impl<I: Iterator<Item = TimelineEvent>> BinStream<I> {
    pub fn new<S>(source: S) -> Self
    where
        S: IntoIterator<IntoIter = I>,
    {
        Self {
            cursor: Cursor::new(source),
            state: State::Start,
            summary: StreamSummary::default(),
        }
    }

    /// Counts so far. Final once the stream has returned `None`.
    pub const fn summary(&self) -> StreamSummary {
        self.summary
    }

    /// Skips whole segments until one contains a place visit.
    fn first_place_segment(&mut self) -> Option<Segment> {
        loop {
            let segment = build_segment(&mut self.cursor)?;
            if segment.contains_place_visit() {
                return Some(segment);
            }
            let skipped = segment.events().len();
            self.summary.leading_events_skipped += skipped;
            debug!(skipped, "skipping activities before the first place visit");
        }
    }

    fn finish(&mut self) {
        self.state = State::Done;
        info!(
            bins = self.summary.bins_emitted,
            leading_events_skipped = self.summary.leading_events_skipped,
            trailing_events_dropped = self.summary.trailing_events_dropped,
            "bin stream finished"
        );
    }
}

impl<I: Iterator<Item = TimelineEvent>> Iterator for BinStream<I> {
    type Item = Bin;

    fn next(&mut self) -> Option<Bin> {
        let (seed, seed_emitted) = match std::mem::replace(&mut self.state, State::Done) {
            State::Start => {
                let Some(segment) = self.first_place_segment() else {
                    self.finish();
                    return None;
                };
                (segment, false)
            }
            State::Chained(segment) => (segment, true),
            State::Done => return None,
        };

        match build_bin(&mut self.cursor, seed) {
            BinOutcome::Complete(bin) => {
                self.summary.bins_emitted += 1;
                debug!(
                    bin = self.summary.bins_emitted,
                    journey_events = bin.journey().events().len(),
                    "assembled bin"
                );
                self.state = State::Chained(bin.destination().clone());
                Some(bin)
            }
            BinOutcome::Incomplete(segments) => {
                // A chained seed already went out as the previous destination.
                let dropped: usize = segments
                    .iter()
                    .skip(usize::from(seed_emitted))
                    .map(|segment| segment.events().len())
                    .sum();
                self.summary.trailing_events_dropped += dropped;
                self.finish();
                None
            }
        }
    }
}

impl<I: Iterator<Item = TimelineEvent>> FusedIterator for BinStream<I> {}
