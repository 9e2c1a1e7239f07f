//! Sequence scheduling: looping generated sequences against a transport.
//!
//! The [`SequenceScheduler`] is the playback side of the board. It does not
//! make sound: it keeps musical time via [`Transport`], loops each attached
//! track's [`GeneratedSequence`] over a fixed four-bar cycle, and reports
//! every step boundary it crosses through a caller-provided callback. The
//! caller decides what to do with each [`StepTick`] (trigger a voice,
//! highlight a pin).
//!
//! Each track has at most one attached sequence. Attaching a new one for a
//! track that is already playing stops the old loop before the new one
//! starts, so regenerating a shape mid-playback never leaves two versions of
//! a track running.

pub mod beat;
pub mod transport;
pub mod types;

pub use beat::{Beat, BEATS_PER_BAR, TICKS_PER_BEAT};
pub use transport::{PlayState, Transport};
pub use types::{StepTick, TrackId};

use crate::generate::GeneratedSequence;
use crate::track::Track;

/// Every attached sequence loops over this many bars, whatever its length.
pub const LOOP_BARS: u32 = 4;

/// Whether the transport can run at `bpm`. NaN, infinite, and non-positive
/// tempos would stall or overflow the tick clock.
pub fn is_playable_bpm(bpm: f64) -> bool {
    bpm.is_finite() && bpm > 0.0
}

/// A sequence attached to a track.
#[derive(Debug)]
struct LoopSlot {
    track_id: TrackId,
    sequence: GeneratedSequence,
    muted: bool,
    step_ticks: u64,
}

impl LoopSlot {
    fn new(track_id: TrackId, sequence: GeneratedSequence, muted: bool) -> Self {
        let loop_ticks = Beat::from_bars(LOOP_BARS).ticks();
        let step_ticks = (loop_ticks / sequence.len() as u64).max(1);
        Self {
            track_id,
            sequence,
            muted,
            step_ticks,
        }
    }

    /// Steps starting in `[from, to)`.
    fn ticks_in(&self, from: Beat, to: Beat) -> Vec<StepTick> {
        let len = self.sequence.len() as u64;
        let per_node = self.sequence.node_order.len() == self.sequence.len();

        let mut out = Vec::new();
        let mut k = from.ticks().div_ceil(self.step_ticks);
        while k * self.step_ticks < to.ticks() {
            let step = (k % len) as usize;
            let event = if self.muted {
                None
            } else {
                self.sequence.sequence[step].clone()
            };
            out.push(StepTick {
                track_id: self.track_id,
                step,
                time: Beat::from_ticks(k * self.step_ticks),
                event,
                node: per_node.then(|| self.sequence.node_order[step].clone()),
            });
            k += 1;
        }
        out
    }
}

/// Loops generated sequences and reports step boundaries.
pub struct SequenceScheduler {
    transport: Transport,
    slots: Vec<LoopSlot>,
    block_size_frames: u32,
}

impl SequenceScheduler {
    /// A stopped scheduler with no tracks attached.
    pub fn new(bpm: f64, sample_rate: u32, block_size_frames: u32) -> Self {
        Self {
            transport: Transport::new(bpm, sample_rate),
            slots: Vec::new(),
            block_size_frames,
        }
    }

    pub fn play(&mut self) {
        self.transport.play();
    }

    pub fn stop(&mut self) {
        self.transport.stop();
    }

    pub fn reset(&mut self) {
        self.transport.reset();
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    /// Attach `sequence` to `track_id`, replacing whatever was playing there.
    ///
    /// The previous loop is detached first. The new one picks up at the
    /// current loop position, so editing a shape does not reset the phase.
    /// An empty sequence simply leaves the track silent.
    pub fn attach(&mut self, track_id: TrackId, sequence: GeneratedSequence, muted: bool) {
        if self.detach(track_id) {
            log::info!("{track_id}: replacing sequence");
        }
        if sequence.is_empty() {
            log::debug!("{track_id}: empty sequence, nothing to attach");
            return;
        }
        log::debug!("{track_id}: attached {} steps", sequence.len());
        self.slots.push(LoopSlot::new(track_id, sequence, muted));
        self.slots.sort_by_key(|s| s.track_id);
    }

    /// Generate `track` and attach the result.
    pub fn attach_track(&mut self, track_id: TrackId, track: &Track) {
        self.attach(track_id, track.generate(), track.muted);
    }

    /// Stop and remove a track's loop. Returns whether one was attached.
    pub fn detach(&mut self, track_id: TrackId) -> bool {
        let before = self.slots.len();
        self.slots.retain(|s| s.track_id != track_id);
        self.slots.len() != before
    }

    pub fn set_muted(&mut self, track_id: TrackId, muted: bool) {
        if let Some(slot) = self.slots.iter_mut().find(|s| s.track_id == track_id) {
            slot.muted = muted;
        }
    }

    pub fn is_attached(&self, track_id: TrackId) -> bool {
        self.slots.iter().any(|s| s.track_id == track_id)
    }

    /// Attached tracks in id order.
    pub fn track_ids(&self) -> Vec<TrackId> {
        self.slots.iter().map(|s| s.track_id).collect()
    }

    /// Advance by `num_frames` and report every step boundary crossed.
    ///
    /// Ticks are delivered in time order; simultaneous steps go in track
    /// order. Returns the beat range covered, or `None` while stopped.
    pub fn advance_by_frames<F>(&mut self, num_frames: u32, mut on_step: F) -> Option<(Beat, Beat)>
    where
        F: FnMut(&StepTick),
    {
        let (from, to) = self.transport.advance_by_frames(num_frames)?;

        let mut ticks: Vec<StepTick> = self
            .slots
            .iter()
            .flat_map(|slot| slot.ticks_in(from, to))
            .collect();
        ticks.sort_by_key(|t| t.time);

        for tick in &ticks {
            on_step(tick);
        }
        Some((from, to))
    }

    /// Advance by one block of the configured size.
    pub fn render_block<F>(&mut self, on_step: F) -> Option<(Beat, Beat)>
    where
        F: FnMut(&StepTick),
    {
        self.advance_by_frames(self.block_size_frames, on_step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::{DrumHit, StepEvent};

    /// One second of audio at 60 BPM is exactly one beat.
    const RATE: u32 = 1000;

    fn scheduler() -> SequenceScheduler {
        let mut s = SequenceScheduler::new(60.0, RATE, RATE);
        s.play();
        s
    }

    fn pattern(hit: DrumHit, len: usize) -> GeneratedSequence {
        GeneratedSequence {
            sequence: (0..len)
                .map(|i| (i % 4 == 0).then_some(StepEvent::Hit(hit)))
                .collect(),
            node_order: (0..len).map(|i| format!("n{i}")).collect(),
        }
    }

    fn collect(s: &mut SequenceScheduler, frames: u32) -> Vec<StepTick> {
        let mut ticks = Vec::new();
        s.advance_by_frames(frames, |t| ticks.push(t.clone()));
        ticks
    }

    #[test]
    fn sixty_four_steps_are_sixteenths() {
        let mut s = scheduler();
        s.attach(TrackId(0), pattern(DrumHit::Kick, 64), false);
        let ticks = collect(&mut s, RATE);
        assert_eq!(ticks.len(), 4);
        assert_eq!(ticks[1].time, Beat::from_ticks(TICKS_PER_BEAT / 4));
        assert_eq!(ticks[0].event, Some(StepEvent::Hit(DrumHit::Kick)));
        assert_eq!(ticks[1].event, None);
        assert_eq!(ticks[2].node.as_deref(), Some("n2"));
    }

    #[test]
    fn chord_progression_steps_once_per_bar() {
        let mut s = scheduler();
        let chords = GeneratedSequence {
            sequence: vec![
                Some(StepEvent::Chord {
                    pitches: vec![60, 64],
                });
                4
            ],
            node_order: vec!["60".into(), "64".into()],
        };
        s.attach(TrackId(2), chords, false);
        let ticks = collect(&mut s, 8 * RATE);
        assert_eq!(ticks.len(), 2);
        assert_eq!(ticks[1].time, Beat::from_bars(1));
        assert_eq!(ticks[1].step, 1);
        assert_eq!(ticks[1].node, None);
    }

    #[test]
    fn loop_wraps_after_four_bars() {
        let mut s = scheduler();
        s.attach(TrackId(0), pattern(DrumHit::Snare, 64), false);
        let ticks = collect(&mut s, 17 * RATE);
        let wrapped: Vec<_> = ticks.iter().filter(|t| t.step == 0).collect();
        assert_eq!(wrapped.len(), 2);
        assert_eq!(wrapped[1].time, Beat::from_bars(LOOP_BARS));
    }

    #[test]
    fn reattaching_replaces_rather_than_layers() {
        let mut s = scheduler();
        s.attach(TrackId(0), pattern(DrumHit::Kick, 64), false);
        collect(&mut s, RATE);
        s.attach(TrackId(0), pattern(DrumHit::Clap, 64), false);
        assert_eq!(s.track_ids(), vec![TrackId(0)]);

        let ticks = collect(&mut s, RATE);
        assert_eq!(ticks.len(), 4);
        assert!(ticks
            .iter()
            .filter_map(|t| t.event.as_ref())
            .all(|e| *e == StepEvent::Hit(DrumHit::Clap)));
        // Phase carried over: the second beat starts at step 4.
        assert_eq!(ticks[0].step, 4);
    }

    #[test]
    fn simultaneous_steps_in_track_order() {
        let mut s = scheduler();
        s.attach(TrackId(1), pattern(DrumHit::Snare, 64), false);
        s.attach(TrackId(0), pattern(DrumHit::Kick, 64), false);
        let ticks = collect(&mut s, RATE);
        assert_eq!(ticks[0].track_id, TrackId(0));
        assert_eq!(ticks[1].track_id, TrackId(1));
        assert_eq!(ticks[0].time, ticks[1].time);
    }

    #[test]
    fn muted_track_reports_rests() {
        let mut s = scheduler();
        s.attach(TrackId(0), pattern(DrumHit::Kick, 64), true);
        let ticks = collect(&mut s, RATE);
        assert_eq!(ticks.len(), 4);
        assert!(ticks.iter().all(|t| t.event.is_none()));

        s.set_muted(TrackId(0), false);
        let ticks = collect(&mut s, RATE);
        assert_eq!(ticks[0].event, Some(StepEvent::Hit(DrumHit::Kick)));
    }

    #[test]
    fn empty_sequence_detaches() {
        let mut s = scheduler();
        s.attach(TrackId(0), pattern(DrumHit::Kick, 64), false);
        s.attach(TrackId(0), GeneratedSequence::default(), false);
        assert!(!s.is_attached(TrackId(0)));
        assert!(collect(&mut s, RATE).is_empty());
    }

    #[test]
    fn stopped_scheduler_reports_nothing() {
        let mut s = SequenceScheduler::new(120.0, 44100, 1024);
        s.attach(TrackId(0), pattern(DrumHit::Kick, 64), false);
        let mut count = 0;
        assert!(s.render_block(|_| count += 1).is_none());
        assert_eq!(count, 0);
    }

    #[test]
    fn playable_tempos() {
        assert!(is_playable_bpm(120.0));
        assert!(is_playable_bpm(0.5));
        assert!(!is_playable_bpm(0.0));
        assert!(!is_playable_bpm(-60.0));
        assert!(!is_playable_bpm(f64::NAN));
        assert!(!is_playable_bpm(f64::INFINITY));
    }

    #[test]
    fn detach_unknown_track() {
        let mut s = scheduler();
        assert!(!s.detach(TrackId(9)));
    }
}
