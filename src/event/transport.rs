//! Transport: play/stop and drift-free advancement of musical time.
//!
//! Position is kept in whole ticks; the fractional remainder of each advance
//! is carried forward so long sessions do not drift against the audio clock.

use super::beat::{Beat, TICKS_PER_BEAT};

/// Playback state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayState {
    Stopped,
    Playing,
}

/// Musical transport: position, tempo, and sample rate.
#[derive(Debug)]
pub struct Transport {
    bpm: f64,
    sample_rate: u32,
    state: PlayState,
    position_ticks: u64,
    tick_remainder: f64,
}

impl Transport {
    /// A stopped transport at position zero.
    pub fn new(bpm: f64, sample_rate: u32) -> Self {
        Self {
            bpm,
            sample_rate,
            state: PlayState::Stopped,
            position_ticks: 0,
            tick_remainder: 0.0,
        }
    }

    pub fn play(&mut self) {
        self.state = PlayState::Playing;
    }

    pub fn stop(&mut self) {
        self.state = PlayState::Stopped;
    }

    /// Back to zero without changing play state.
    pub fn reset(&mut self) {
        self.position_ticks = 0;
        self.tick_remainder = 0.0;
    }

    pub fn position(&self) -> Beat {
        Beat::from_ticks(self.position_ticks)
    }

    /// Advance by `num_frames` audio frames.
    ///
    /// Returns the half-open range `[from, to)` covered, or `None` while stopped.
    pub fn advance_by_frames(&mut self, num_frames: u32) -> Option<(Beat, Beat)> {
        if self.state == PlayState::Stopped {
            return None;
        }

        let from = Beat::from_ticks(self.position_ticks);
        let ticks = (num_frames as f64 / self.sample_rate as f64)
            * (self.bpm / 60.0)
            * TICKS_PER_BEAT as f64;

        let total = self.tick_remainder + ticks;
        let whole = total.floor() as u64;
        self.tick_remainder = total - whole as f64;
        self.position_ticks += whole;

        Some((from, Beat::from_ticks(self.position_ticks)))
    }
}
