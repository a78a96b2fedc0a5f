// Copyright (c) 2024 Mike Tsao. All rights reserved.

use crate::{
    events::EventSource,
    midi::{clamp_to_midi, MidiPitch, MIDDLE_C},
    rng::{RandomSource, Rng},
    types::{NoteEvent, NoteList},
};
use derivative::Derivative;
use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// Settings for a [RandomWalk].
#[derive(Builder, Clone, Debug, Derivative, PartialEq, Serialize, Deserialize)]
#[derivative(Default)]
#[builder(default)]
#[builder_struct_attr(allow(missing_docs))]
#[serde(default, rename_all = "kebab-case")]
pub struct RandomWalkConfig {
    /// Semitones per step.
    #[derivative(Default(value = "1"))]
    pub step_size: u8,

    /// Fixes the walk. Without it, every run wanders differently.
    #[builder(setter(strip_option))]
    pub seed: Option<u64>,
}

/// Brownian motion over pitch: each note-on nudges a running pitch up or down.
#[derive(Clone, Debug, Default)]
pub struct RandomWalk {
    config: RandomWalkConfig,
}
impl RandomWalk {
    /// Where every walk begins.
    pub const START_PITCH: MidiPitch = MIDDLE_C;

    #[allow(missing_docs)]
    pub fn new_with(config: RandomWalkConfig) -> Self {
        Self { config }
    }

    /// Walks using the configured seed, or a fresh one if there is none.
    pub fn generate(&self, source: &EventSource) -> NoteList {
        let mut rng = self
            .config
            .seed
            .map_or_else(Rng::default, |seed| Rng::new_with_seed(seed as u128));
        self.generate_with(source, &mut rng)
    }

    /// Walks using the caller's source of randomness.
    pub fn generate_with(&self, source: &EventSource, rng: &mut dyn RandomSource) -> NoteList {
        let step = self.config.step_size as i64;
        let mut pitch = Self::START_PITCH;
        source
            .note_ons()
            .map(|(event, _, velocity)| {
                let delta = if rng.coin_flip() { step } else { -step };
                pitch = clamp_to_midi(pitch as i64 + delta);
                NoteEvent::new_with(pitch, velocity, event.delta_ticks as f64)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::TimedEvent;
    use more_asserts::assert_le;

    /// Plays back a fixed list of coin flips, then keeps repeating the last.
    struct ScriptedCoin(Vec<bool>);
    impl RandomSource for ScriptedCoin {
        fn rand_range(&mut self, _range: std::ops::Range<u64>) -> u64 {
            let flip = if self.0.len() > 1 {
                self.0.remove(0)
            } else {
                self.0.first().copied().unwrap_or_default()
            };
            flip as u64
        }
    }

    fn source_with_note_ons(count: usize) -> EventSource {
        EventSource::new_with(
            480,
            vec![(0..count)
                .map(|i| TimedEvent::note_on(10, (i % 128) as u8, 77))
                .collect()],
        )
    }

    #[test]
    fn follows_the_coin() {
        let walk = RandomWalk::new_with(
            RandomWalkConfigBuilder::default()
                .step_size(2)
                .build()
                .unwrap(),
        );
        let mut coin = ScriptedCoin(vec![true, true, false, true]);
        let notes = walk.generate_with(&source_with_note_ons(4), &mut coin);
        let pitches: Vec<MidiPitch> = notes.iter().map(|n| n.pitch).collect();
        assert_eq!(pitches, vec![62, 64, 62, 64]);
        assert!(notes.iter().all(|n| n.velocity == 77 && n.time == 10.0));
    }

    #[test]
    fn walk_is_bounded() {
        let notes = RandomWalk::default()
            .generate_with(&source_with_note_ons(200), &mut ScriptedCoin(vec![true]));
        assert_eq!(notes.last().unwrap().pitch, 127);
        let notes = RandomWalk::default()
            .generate_with(&source_with_note_ons(200), &mut ScriptedCoin(vec![false]));
        assert_eq!(notes.last().unwrap().pitch, 0);

        let big_steps = RandomWalk::new_with(
            RandomWalkConfigBuilder::default()
                .step_size(100)
                .seed(7)
                .build()
                .unwrap(),
        );
        for note in big_steps.generate(&source_with_note_ons(1000)) {
            assert_le!(note.pitch, 127);
        }
    }

    #[test]
    fn seeded_walks_repeat() {
        let config = RandomWalkConfigBuilder::default().seed(1234).build().unwrap();
        let source = source_with_note_ons(100);
        assert_eq!(
            RandomWalk::new_with(config.clone()).generate(&source),
            RandomWalk::new_with(config).generate(&source)
        );
    }

    #[test]
    fn no_note_ons_no_notes() {
        let source = EventSource::new_with(480, vec![vec![TimedEvent::note_off(0, 60)]]);
        assert!(RandomWalk::default().generate(&source).is_empty());
    }
}
