// Copyright (c) 2024 Mike Tsao. All rights reserved.

pub use attractor::{AttractorConfig, AttractorConfigBuilder, AttractorState, LorenzAttractor};
pub use automaton::{
    AutomatonConfig, AutomatonConfigBuilder, AutomatonVariant, CellularAutomaton, DurationTable,
};
pub use grid::{Grid, Lifespan, GRID_SIZE};
pub use noise_field::{NoiseConfig, NoiseConfigBuilder, NoiseField};
pub use walk::{RandomWalk, RandomWalkConfig, RandomWalkConfigBuilder};

use crate::{error::InputError, events::EventSource, rng::RandomSource, types::NoteList};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, IntoStaticStr};

mod attractor;
mod automaton;
mod grid;
mod noise_field;
mod walk;

/// Recommended imports for easy onboarding.
pub mod prelude {
    pub use super::{
        AttractorConfig, AutomatonConfig, AutomatonVariant, CellularAutomaton, Generator,
        GeneratorOutput, Grid, LorenzAttractor, NoiseConfig, NoiseField, RandomWalk,
        RandomWalkConfig,
    };
}

/// The four ways to transform a note timeline. Each variant carries its own
/// settings.
#[derive(Clone, Debug, Display, IntoStaticStr, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Generator {
    /// Game of Life on a pitch-by-time grid.
    Automaton(AutomatonConfig),
    /// Perlin-noise pitch remapping.
    Noise(NoiseConfig),
    /// Lorenz-attractor pitch and velocity remapping.
    Attractor(AttractorConfig),
    /// Brownian motion over pitch.
    RandomWalk(RandomWalkConfig),
}
impl Generator {
    /// Transforms `source`. The automaton produces one note list per frame;
    /// everything else produces a single list.
    pub fn produce(&self, source: &EventSource) -> Result<GeneratorOutput, InputError> {
        log::info!("running {self} generator");
        let output = match self {
            Generator::Automaton(config) => GeneratorOutput::Frames(
                CellularAutomaton::new_with(config.clone(), source)?.run(),
            ),
            Generator::Noise(config) => {
                GeneratorOutput::Notes(NoiseField::new_with(config.clone()).generate(source))
            }
            Generator::Attractor(config) => GeneratorOutput::Notes(
                LorenzAttractor::new_with(config.clone()).generate(source),
            ),
            Generator::RandomWalk(config) => {
                GeneratorOutput::Notes(RandomWalk::new_with(config.clone()).generate(source))
            }
        };
        log::debug!("{self} generator produced {} frame(s)", output.frame_count());
        Ok(output)
    }

    /// Like [Generator::produce()], but the random walk draws from `rng`
    /// instead of its configured seed.
    pub fn produce_with(
        &self,
        source: &EventSource,
        rng: &mut dyn RandomSource,
    ) -> Result<GeneratorOutput, InputError> {
        match self {
            Generator::RandomWalk(config) => Ok(GeneratorOutput::Notes(
                RandomWalk::new_with(config.clone()).generate_with(source, rng),
            )),
            _ => self.produce(source),
        }
    }
}

/// What a [Generator] hands back.
#[derive(Clone, Debug, PartialEq)]
pub enum GeneratorOutput {
    /// A single note list.
    Notes(NoteList),
    /// One note list per animation frame.
    Frames(Vec<NoteList>),
}
impl GeneratorOutput {
    /// How many note lists there are to choose from.
    pub fn frame_count(&self) -> usize {
        match self {
            GeneratorOutput::Notes(_) => 1,
            GeneratorOutput::Frames(frames) => frames.len(),
        }
    }

    /// Picks the note list for `frame`. A single list is frame 0.
    pub fn select(&self, frame: usize) -> Option<&NoteList> {
        match self {
            GeneratorOutput::Notes(notes) => (frame == 0).then_some(notes),
            GeneratorOutput::Frames(frames) => frames.get(frame),
        }
    }

    /// Owned version of [GeneratorOutput::select()].
    pub fn into_frame(self, frame: usize) -> Option<NoteList> {
        match self {
            GeneratorOutput::Notes(notes) => (frame == 0).then_some(notes),
            GeneratorOutput::Frames(mut frames) => {
                (frame < frames.len()).then(|| frames.swap_remove(frame))
            }
        }
    }
}
