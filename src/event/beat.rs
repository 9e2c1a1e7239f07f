//! Musical time in integer ticks.
//!
//! 960 ticks per quarter note keeps every step length used on the board
//! (sixteenths for rhythms and phrases, whole bars for chords) an exact
//! integer, so looping never drifts.

use std::cmp::Ordering;

/// Ticks per quarter note (beat).
pub const TICKS_PER_BEAT: u64 = 960;

/// The board plays in 4/4.
pub const BEATS_PER_BAR: u32 = 4;

/// Musical time measured in integer ticks at [`TICKS_PER_BEAT`] resolution.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct Beat {
    ticks: u64,
}

impl Beat {
    pub const ZERO: Beat = Beat { ticks: 0 };

    pub fn from_ticks(ticks: u64) -> Self {
        Self { ticks }
    }

    /// Whole quarter notes.
    pub fn from_beats(beats: u32) -> Self {
        Self {
            ticks: beats as u64 * TICKS_PER_BEAT,
        }
    }

    /// Whole 4/4 bars.
    pub fn from_bars(bars: u32) -> Self {
        Self {
            ticks: bars as u64 * BEATS_PER_BAR as u64 * TICKS_PER_BEAT,
        }
    }

    pub fn ticks(self) -> u64 {
        self.ticks
    }

    /// Bar and beat within the bar, both counted from zero.
    pub fn bar_and_beat(self) -> (u64, f64) {
        let ticks_per_bar = BEATS_PER_BAR as u64 * TICKS_PER_BEAT;
        let bar = self.ticks / ticks_per_bar;
        let beat = (self.ticks % ticks_per_bar) as f64 / TICKS_PER_BEAT as f64;
        (bar, beat)
    }
}

impl Ord for Beat {
    fn cmp(&self, other: &Self) -> Ordering {
        self.ticks.cmp(&other.ticks)
    }
}

impl PartialOrd for Beat {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
