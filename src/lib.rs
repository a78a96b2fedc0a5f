// Copyright (c) 2024 Mike Tsao. All rights reserved.

#![warn(missing_docs)]

//! The `midi-machina` crate turns MIDI note timelines into new ones with
//! generative algorithms, then renders them to audio.
//!
//! A typical run reads a Standard MIDI File into an
//! [EventSource](events::EventSource), hands it to a
//! [Generator](generators::Generator), picks one note list from the output,
//! and renders that list with a [Synthesizer](audio::Synthesizer).

pub mod audio {
    //! Additive synthesis and the encoder boundary.
    //!
    //! The [Synthesizer] sums one sine per note, normalizes the result so
    //! that its loudest sample is exactly 1.0, and passes it to anything that
    //! [Encodes]. [HoundEncoder] writes WAV files; other formats are
    //! recognized but left to other encoders.

    pub use machina_core::{
        export::{AudioFormat, Encodes, HoundEncoder},
        synth::{SampleBuffer, SynthConfig, SynthConfigBuilder, Synthesizer},
    };

    /// The most commonly used imports.
    pub mod prelude {
        pub use super::{
            AudioFormat, Encodes, HoundEncoder, SampleBuffer, SynthConfig, SynthConfigBuilder,
            Synthesizer,
        };
    }
}

pub mod errors {
    //! Everything that can go wrong at the input and output boundaries.

    pub use machina_core::error::{ExportError, InputError};

    /// The most commonly used imports.
    pub mod prelude {
        pub use super::{ExportError, InputError};
    }
}

pub mod events {
    //! MIDI input. An [EventSource] is one or more tracks of delta-timed
    //! events, plus the file's ticks-per-beat resolution.

    pub use machina_core::{
        events::{EventKind, EventSource, MergedEvent, TimedEvent},
        midi::{
            clamp_to_midi, is_c, pitch_class, wrap_to_midi, MidiPitch, MIDDLE_C, MIDI_VALUE_COUNT,
            MIDI_VALUE_MAX,
        },
        time::{FrameRate, Tempo},
        timeline::{FrameBucket, Timeline},
    };

    /// The most commonly used imports.
    pub mod prelude {
        pub use super::{EventKind, EventSource, FrameRate, MidiPitch, Tempo, TimedEvent, Timeline};
    }
}

pub mod generators {
    //! The four ways to transform a note timeline.
    //!
    //! - [CellularAutomaton] plays Conway's Game of Life on a pitch-by-time
    //!   grid and reports one note list per animation frame.
    //! - [NoiseField] remaps each note-on's pitch through Perlin noise.
    //! - [LorenzAttractor] reads pitch and velocity off a Lorenz trajectory.
    //! - [RandomWalk] drifts a single pitch up and down.
    //!
    //! [Generator] wraps all four behind one entry point.

    pub use machina_core::generators::*;
}

pub mod types {
    //! Numeric newtypes and the note representation shared by every stage.

    pub use machina_core::types::{FrequencyHz, NoteEvent, NoteList, Sample, SampleRate};

    /// The most commonly used imports.
    pub mod prelude {
        pub use super::{FrequencyHz, NoteEvent, NoteList, Sample, SampleRate};
    }
}

pub mod util {
    //! Randomness. Anything that needs a coin flip takes a [RandomSource],
    //! so tests can script the outcome.

    pub use machina_core::rng::{RandomSource, Rng};

    /// The most commonly used imports.
    pub mod prelude {
        pub use super::{RandomSource, Rng};
    }
}

pub use settings::MachinaConfig;
pub use version::app_version;

mod settings;
mod version;

/// A collection of imports that are useful to users of this crate.
pub mod prelude {
    pub use super::{
        audio::prelude::*, errors::prelude::*, events::prelude::*, generators::prelude::*,
        types::prelude::*, util::prelude::*, MachinaConfig,
    };
}
