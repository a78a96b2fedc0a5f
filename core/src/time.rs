// Copyright (c) 2024 Mike Tsao. All rights reserved.

use derivative::Derivative;
use derive_more::Display as DeriveDisplay;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Tempo as a standard MIDI file expresses it: microseconds per quarter note.
#[derive(Clone, Copy, Debug, Derivative, PartialEq, Eq, Serialize, Deserialize)]
#[derivative(Default)]
pub struct Tempo(#[derivative(Default(value = "Self::DEFAULT_USEC_PER_QUARTER"))] pub u32);
impl Tempo {
    /// 120 BPM, which is what the MIDI spec assumes when a file doesn't say.
    pub const DEFAULT_USEC_PER_QUARTER: u32 = 500_000;

    /// Beats per minute.
    pub fn bpm(&self) -> f64 {
        if self.0 == 0 {
            return 0.0;
        }
        60_000_000.0 / self.0 as f64
    }

    /// Converts an absolute tick position into seconds.
    ///
    /// `seconds = ticks * tempo / (ticks_per_beat * 1_000_000)`
    pub fn ticks_to_seconds(&self, ticks: u64, ticks_per_beat: u16) -> f64 {
        ticks as f64 * self.0 as f64 / (ticks_per_beat as f64 * 1_000_000.0)
    }
}
impl fmt::Display for Tempo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_fmt(format_args!("{:0.2} BPM", self.bpm()))
    }
}
impl From<u32> for Tempo {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

/// Animation frames per second. The automaton advances one generation per
/// frame.
#[derive(
    Clone, Copy, Debug, Derivative, DeriveDisplay, PartialEq, Eq, Serialize, Deserialize,
)]
#[derivative(Default)]
#[display(fmt = "{} fps", _0)]
pub struct FrameRate(#[derivative(Default(value = "Self::DEFAULT_FPS"))] pub u32);
impl FrameRate {
    #[allow(missing_docs)]
    pub const DEFAULT_FPS: u32 = 20;

    /// The frame that contains the given moment: `floor(seconds * fps)`.
    pub fn frame_at(&self, seconds: f64) -> usize {
        (seconds * self.0 as f64).floor() as usize
    }

    /// Converts an absolute tick position straight into a frame index.
    pub fn ticks_to_frame(&self, ticks: u64, tempo: Tempo, ticks_per_beat: u16) -> usize {
        self.frame_at(tempo.ticks_to_seconds(ticks, ticks_per_beat))
    }
}
impl From<u32> for FrameRate {
    fn from(value: u32) -> Self {
        Self(value)
    }
}
