// Copyright (c) 2024 Mike Tsao. All rights reserved.

use crate::midi::MidiPitch;
use derivative::Derivative;
use derive_more::Display as DeriveDisplay;
use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Div, Mul};

/// [SampleType] is the underlying primitive that makes up [Sample].
pub type SampleType = f64;

/// [ParameterType] is the primitive used for frequencies, durations, and
/// other continuous settings.
pub type ParameterType = f64;

/// [Sample] represents a single-channel audio sample.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
pub struct Sample(pub SampleType);
impl Sample {
    /// The [SampleType] value of silence.
    pub const SILENCE_VALUE: SampleType = 0.0;
    /// A [Sample] that is silent.
    pub const SILENCE: Sample = Sample(Self::SILENCE_VALUE);
    /// The maximum positive [SampleType] value.
    pub const MAX_VALUE: SampleType = 1.0;
    /// The maximum negative [SampleType] value.
    pub const MIN_VALUE: SampleType = -1.0;

    /// Converts [Sample] into an i16 scaled to i16::MIN..i16::MAX, which is
    /// slightly harder than it seems because the negative range of
    /// two's-complement numbers is larger than the positive one.
    pub fn into_i16(&self) -> i16 {
        const MAX_AMPLITUDE: SampleType = i16::MAX as SampleType;
        const MIN_AMPLITUDE: SampleType = i16::MIN as SampleType;
        let v = self.0;

        if v < 0.0 {
            (v.abs() * MIN_AMPLITUDE) as i16
        } else {
            (v * MAX_AMPLITUDE) as i16
        }
    }

    /// The magnitude of this sample, ignoring sign.
    pub fn abs(&self) -> SampleType {
        self.0.abs()
    }
}
impl AddAssign for Sample {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}
impl Add for Sample {
    type Output = Self;

    fn add(self, rhs: Sample) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}
impl Mul<f64> for Sample {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self::Output {
        Self(self.0 * rhs)
    }
}
impl Div<f64> for Sample {
    type Output = Self;

    fn div(self, rhs: f64) -> Self::Output {
        Self(self.0 / rhs)
    }
}
impl From<f64> for Sample {
    fn from(value: f64) -> Self {
        Sample(value)
    }
}
impl From<Sample> for f64 {
    fn from(value: Sample) -> Self {
        value.0
    }
}

/// Samples per second. Always a positive integer; 44.1kHz is CD quality.
#[derive(
    Clone, Copy, Debug, Derivative, DeriveDisplay, PartialEq, Eq, Serialize, Deserialize,
)]
#[derivative(Default)]
#[display(fmt = "{}Hz", _0)]
#[serde(rename_all = "kebab-case")]
pub struct SampleRate(#[derivative(Default(value = "Self::DEFAULT_SAMPLE_RATE"))] pub u32);
impl SampleRate {
    /// The rate used unless someone asks for another.
    pub const DEFAULT_SAMPLE_RATE: u32 = 44100;

    #[allow(missing_docs)]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }
}
impl From<u32> for SampleRate {
    fn from(value: u32) -> Self {
        Self(value)
    }
}
impl From<SampleRate> for u32 {
    fn from(value: SampleRate) -> Self {
        value.0
    }
}
impl From<SampleRate> for f64 {
    fn from(value: SampleRate) -> Self {
        value.0 as f64
    }
}

/// [FrequencyHz] is a frequency measured in
/// [Hertz](https://en.wikipedia.org/wiki/Hertz), or cycles per second.
#[derive(Clone, Copy, Debug, Derivative, PartialEq, PartialOrd, Serialize, Deserialize)]
#[derivative(Default)]
#[serde(rename_all = "kebab-case")]
pub struct FrequencyHz(#[derivative(Default(value = "440.0"))] pub ParameterType);
impl FrequencyHz {
    /// Concert A (MIDI note 69), the anchor of equal temperament.
    pub const A4: FrequencyHz = FrequencyHz(440.0);

    /// Equal-tempered frequency of a MIDI pitch, with A4 = 69 = 440Hz.
    pub fn from_midi_pitch(pitch: MidiPitch) -> Self {
        Self(Self::A4.0 * 2.0_f64.powf((pitch as ParameterType - 69.0) / 12.0))
    }
}
impl From<f64> for FrequencyHz {
    fn from(value: f64) -> Self {
        Self(value)
    }
}
impl From<FrequencyHz> for f64 {
    fn from(value: FrequencyHz) -> Self {
        value.0
    }
}

/// One note produced by a generator. `time` means different things to
/// different generators: automaton output uses the grid column, and the
/// event-list generators copy the source event's delta time in MIDI ticks
/// since the previous event of the merged stream. Ticks are not seconds; the
/// tempo never enters into it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NoteEvent {
    #[allow(missing_docs)]
    pub pitch: MidiPitch,
    #[allow(missing_docs)]
    pub velocity: u8,
    #[allow(missing_docs)]
    pub time: f64,
}
impl NoteEvent {
    #[allow(missing_docs)]
    pub const fn new_with(pitch: MidiPitch, velocity: u8, time: f64) -> Self {
        Self {
            pitch,
            velocity,
            time,
        }
    }
}

/// The common currency between generators and the synthesizer.
pub type NoteList = Vec<NoteEvent>;
