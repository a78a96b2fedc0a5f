// Copyright (c) 2024 Mike Tsao. All rights reserved.

//! Machina core transforms MIDI note timelines with generative algorithms
//! and renders the results to audio.

/// Errors reported by the input and export boundaries.
pub mod error;
/// The typed MIDI event stream that every generator consumes.
pub mod events;
/// Handing rendered audio to an encoder.
pub mod export;
/// The four note generators and the [Generator](generators::Generator)
/// dispatcher.
pub mod generators;
/// MIDI-related constants and helpers.
pub mod midi;
/// Provides a random-number generator for debugging and testing.
pub mod rng;
/// Additive sine synthesis of note lists.
pub mod synth;
/// Converts MIDI ticks into seconds and animation frames.
pub mod time;
/// Frame-quantized note triggers.
pub mod timeline;
/// Common structures and constants used across the library.
pub mod types;

/// Recommended imports for easy onboarding.
pub mod prelude {
    pub use super::error::{ExportError, InputError};
    pub use super::events::{EventKind, EventSource, TimedEvent};
    pub use super::export::{AudioFormat, Encodes, HoundEncoder};
    pub use super::generators::prelude::*;
    pub use super::rng::{RandomSource, Rng};
    pub use super::synth::{SampleBuffer, SynthConfig, SynthConfigBuilder, Synthesizer};
    pub use super::time::{FrameRate, Tempo};
    pub use super::timeline::Timeline;
    pub use super::types::{FrequencyHz, NoteEvent, NoteList, Sample, SampleRate};
}
