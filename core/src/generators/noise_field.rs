// Copyright (c) 2024 Mike Tsao. All rights reserved.

use crate::{
    events::EventSource,
    midi::MidiPitch,
    types::{NoteEvent, NoteList},
};
use derivative::Derivative;
use derive_builder::Builder;
use noise::{NoiseFn, Perlin};
use serde::{Deserialize, Serialize};

/// Settings for a [NoiseField].
#[derive(Builder, Clone, Debug, Derivative, PartialEq, Serialize, Deserialize)]
#[derivative(Default)]
#[builder(default)]
#[builder_struct_attr(allow(missing_docs))]
#[serde(default, rename_all = "kebab-case")]
pub struct NoiseConfig {
    /// Multiplies pitch and time (in ticks) before sampling. Smaller is
    /// smoother.
    #[derivative(Default(value = "0.1"))]
    pub scale: f64,

    /// Number of layered Perlin samples.
    #[derivative(Default(value = "6"))]
    pub octaves: u32,

    /// Amplitude multiplier per octave.
    #[derivative(Default(value = "0.5"))]
    pub persistence: f64,

    /// Frequency multiplier per octave.
    #[derivative(Default(value = "2.0"))]
    pub lacunarity: f64,

    #[allow(missing_docs)]
    pub seed: u32,
}

/// Moves each note to wherever a 2-D gradient-noise field says it should be.
#[derive(Clone, Debug, Default)]
pub struct NoiseField {
    config: NoiseConfig,
}
impl NoiseField {
    #[allow(missing_docs)]
    pub fn new_with(config: NoiseConfig) -> Self {
        Self { config }
    }

    /// Fractal Brownian motion: the octaves' weighted sum, divided by the sum
    /// of weights so that the result stays in the range of a single octave.
    pub fn sample(&self, perlin: &Perlin, x: f64, y: f64) -> f64 {
        let mut total = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = 1.0;
        let mut max_value = 0.0;

        for _ in 0..self.config.octaves {
            total += perlin.get([x * frequency, y * frequency]) * amplitude;
            max_value += amplitude;
            amplitude *= self.config.persistence;
            frequency *= self.config.lacunarity;
        }

        if max_value == 0.0 {
            0.0
        } else {
            total / max_value
        }
    }

    /// `round((value + 1) * 64)`. There is no clamping: the mapping trusts
    /// the noise to stay within -1.0..=1.0, which puts the result in 0..=128.
    pub fn noise_to_pitch(value: f64) -> MidiPitch {
        ((value + 1.0) * 64.0).round() as MidiPitch
    }

    /// Remaps the pitch of every note-on. Velocity and time pass through.
    pub fn generate(&self, source: &EventSource) -> NoteList {
        let perlin = Perlin::new(self.config.seed);
        let scale = self.config.scale;
        source
            .note_ons()
            .map(|(event, pitch, velocity)| {
                let time = event.delta_ticks as f64;
                let value = self.sample(&perlin, pitch as f64 * scale, time * scale);
                NoteEvent::new_with(Self::noise_to_pitch(value), velocity, time)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::TimedEvent;
    use more_asserts::assert_le;

    #[test]
    fn noise_maps_onto_pitch() {
        assert_eq!(NoiseField::noise_to_pitch(0.0), 64);
        assert_eq!(NoiseField::noise_to_pitch(-1.0), 0);
        assert_eq!(NoiseField::noise_to_pitch(0.5), 96);

        // The top of the noise range lands one past the last MIDI pitch.
        // Staying inside -1.0..=1.0 is the noise library's promise to keep.
        assert_eq!(NoiseField::noise_to_pitch(1.0), 128);
    }

    #[test]
    fn lattice_points_are_zero() {
        let field = NoiseField::default();
        let perlin = Perlin::new(0);
        assert_eq!(field.sample(&perlin, 0.0, 0.0), 0.0);

        // Pitch 0 at time 0 samples the origin at every octave.
        let source = EventSource::new_with(480, vec![vec![TimedEvent::note_on(0, 0, 99)]]);
        assert_eq!(
            NoiseField::new_with(NoiseConfig::default()).generate(&source),
            vec![NoteEvent::new_with(64, 99, 0.0)]
        );
    }

    #[test]
    fn output_is_deterministic_and_in_range() {
        let events: Vec<TimedEvent> = (0..128)
            .map(|i| TimedEvent::note_on(i * 7, i as u8, 100))
            .collect();
        let source = EventSource::new_with(480, vec![events]);
        let field = NoiseField::default();
        let first = field.generate(&source);
        assert_eq!(first.len(), 128);
        assert_eq!(first, field.generate(&source));
        for (i, note) in first.iter().enumerate() {
            assert_le!(note.pitch, 128);
            assert_eq!(note.velocity, 100);
            assert_eq!(note.time, (i * 7) as f64);
        }
    }

    #[test]
    fn time_axis_is_in_ticks() {
        let notes_at = |usec_per_quarter| {
            let source = EventSource::new_with(
                480,
                vec![vec![
                    TimedEvent::tempo(0, usec_per_quarter),
                    TimedEvent::note_on(240, 60, 100),
                ]],
            );
            NoiseField::default().generate(&source)
        };
        let slow = notes_at(1_000_000);
        assert_eq!(slow[0].time, 240.0);
        assert_eq!(slow, notes_at(250_000), "tempo doesn't move the field");
    }

    #[test]
    fn no_note_ons_no_notes() {
        let source = EventSource::new_with(480, vec![vec![TimedEvent::note_off(0, 60)]]);
        assert!(NoiseField::default().generate(&source).is_empty());
    }
}
