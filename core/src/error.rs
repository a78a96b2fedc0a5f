// Copyright (c) 2024 Mike Tsao. All rights reserved.

use crate::export::AudioFormat;
use thiserror::Error;

/// Problems with the incoming event stream. The core never tries to recover
/// a partially readable source.
#[derive(Debug, Error)]
pub enum InputError {
    /// The source couldn't be read at all.
    #[error("couldn't read MIDI source: {0}")]
    Io(#[from] std::io::Error),

    /// The bytes aren't a Standard MIDI File.
    #[error("couldn't parse MIDI source: {0}")]
    Parse(#[from] midly::Error),

    /// SMPTE timecode files have no ticks-per-beat, which every tick
    /// conversion needs.
    #[error("MIDI source uses timecode timing; only metrical timing is supported")]
    UnsupportedTiming,

    /// A ticks-per-beat of zero makes every tick conversion divide by zero.
    #[error("MIDI source declares zero ticks per beat")]
    ZeroTicksPerBeat,
}

/// Problems handing a rendered buffer to an encoder.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The encoder doesn't know how to produce this format.
    #[error("encoder doesn't support the {0} format")]
    UnsupportedFormat(AudioFormat),

    /// The output path couldn't be created or written.
    #[error("couldn't write audio file: {0}")]
    Io(#[from] std::io::Error),

    /// The WAV encoder rejected the request.
    #[error("WAV encoder failed: {0}")]
    Wav(#[from] hound::Error),
}
