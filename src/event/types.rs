//! Scheduler-side identities and the step notification.

use std::fmt;

use super::beat::Beat;
use crate::generate::StepEvent;

/// Identifies a track in the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TrackId(pub u32);

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "track {}", self.0)
    }
}

/// One step boundary crossed by a playing track.
#[derive(Debug, Clone, PartialEq)]
pub struct StepTick {
    pub track_id: TrackId,
    /// Index into the track's sequence.
    pub step: usize,
    /// Absolute transport time of the step.
    pub time: Beat,
    /// What sounds. `None` for rests and for muted tracks.
    pub event: Option<StepEvent>,
    /// Pin behind this step, for highlighting. `None` for chord progressions.
    pub node: Option<String>,
}
