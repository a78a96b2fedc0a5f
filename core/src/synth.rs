// Copyright (c) 2024 Mike Tsao. All rights reserved.

use crate::{
    error::ExportError,
    export::{AudioFormat, Encodes},
    midi::MIDI_VALUE_MAX,
    types::{FrequencyHz, NoteEvent, Sample, SampleRate},
};
use derivative::Derivative;
use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use std::{f64::consts::TAU, path::Path};

/// Settings for a [Synthesizer].
#[derive(Builder, Clone, Debug, Derivative, PartialEq, Serialize, Deserialize)]
#[derivative(Default)]
#[builder(default)]
#[builder_struct_attr(allow(missing_docs))]
#[serde(default, rename_all = "kebab-case")]
pub struct SynthConfig {
    /// Length of the rendered audio.
    #[derivative(Default(value = "5.0"))]
    pub duration_seconds: f64,

    #[allow(missing_docs)]
    pub sample_rate: SampleRate,
}

/// Rendered mono audio whose peak is at most 1.0.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SampleBuffer {
    samples: Vec<Sample>,
    sample_rate: SampleRate,
}
impl SampleBuffer {
    #[allow(missing_docs)]
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    #[allow(missing_docs)]
    pub fn sample_rate(&self) -> SampleRate {
        self.sample_rate
    }

    #[allow(missing_docs)]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[allow(missing_docs)]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// The largest absolute sample value.
    pub fn peak(&self) -> f64 {
        self.samples.iter().map(Sample::abs).fold(0.0, f64::max)
    }

    /// True if every sample is exactly zero.
    pub fn is_silent(&self) -> bool {
        self.samples.iter().all(|s| *s == Sample::SILENCE)
    }

    // Divides by the true peak so that the loudest sample is exactly 1.0.
    // Silence stays silence.
    fn normalize(&mut self) {
        let peak = self.peak();
        if peak > 0.0 {
            self.samples.iter_mut().for_each(|s| *s = *s / peak);
        }
    }
}

/// Additive sine synthesis. Every note is a sine at its equal-tempered
/// frequency, scaled by its velocity, and every note sounds for the whole
/// duration; note times are ignored.
#[derive(Clone, Debug, Default)]
pub struct Synthesizer {
    config: SynthConfig,
}
impl Synthesizer {
    #[allow(missing_docs)]
    pub fn new_with(config: SynthConfig) -> Self {
        Self { config }
    }

    #[allow(missing_docs)]
    pub fn config(&self) -> &SynthConfig {
        &self.config
    }

    /// The number of samples a render produces.
    pub fn sample_count(&self) -> usize {
        let count = self.config.duration_seconds * f64::from(self.config.sample_rate);
        if count.is_finite() && count > 0.0 {
            count.floor() as usize
        } else {
            0
        }
    }

    /// Sums one sine per note and normalizes the result.
    pub fn render(&self, notes: &[NoteEvent]) -> SampleBuffer {
        let count = self.sample_count();
        let mut buffer = SampleBuffer {
            samples: vec![Sample::SILENCE; count],
            sample_rate: self.config.sample_rate,
        };

        // Notes that share a pitch share a waveform, so add up their
        // amplitudes and generate each pitch once.
        let mut amplitudes = [0.0f64; 256];
        for note in notes {
            amplitudes[note.pitch as usize] += note.velocity as f64 / MIDI_VALUE_MAX as f64;
        }

        // The time grid includes both endpoints.
        let seconds_per_sample = if count > 1 {
            self.config.duration_seconds / (count - 1) as f64
        } else {
            0.0
        };
        for (pitch, amplitude) in amplitudes.iter().enumerate() {
            if *amplitude == 0.0 {
                continue;
            }
            let frequency: f64 = FrequencyHz::from_midi_pitch(pitch as u8).into();
            for (i, sample) in buffer.samples.iter_mut().enumerate() {
                let t = i as f64 * seconds_per_sample;
                *sample += Sample((TAU * frequency * t).sin() * amplitude);
            }
        }

        buffer.normalize();
        log::debug!(
            "rendered {} note(s) into {} samples at {}",
            notes.len(),
            buffer.len(),
            buffer.sample_rate
        );
        buffer
    }

    /// Renders `notes` and hands the result to `encoder`, creating the
    /// output directory if needed.
    pub fn export(
        &self,
        notes: &[NoteEvent],
        path: &Path,
        format: AudioFormat,
        encoder: &dyn Encodes,
    ) -> Result<SampleBuffer, ExportError> {
        let buffer = self.render(notes);
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        encoder.encode(buffer.samples(), buffer.sample_rate(), format, path)?;
        log::info!("exported {} to {}", format, path.display());
        Ok(buffer)
    }
}
