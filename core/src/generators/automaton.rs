// Copyright (c) 2024 Mike Tsao. All rights reserved.

//! A Game of Life that listens to MIDI. Notes from the source plant cells on
//! a pitch-by-time grid, notes that play again renew the cells they planted,
//! and C in every octave never decays.

use super::grid::{Grid, Lifespan, GRID_SIZE};
use crate::{
    error::InputError,
    events::{EventKind, EventSource},
    midi::{is_c, MidiPitch},
    time::FrameRate,
    timeline::Timeline,
    types::NoteList,
};
use derivative::Derivative;
use derive_builder::Builder;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

/// Which rule set the automaton follows.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Display,
    EnumIter,
    EnumString,
    IntoStaticStr,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum AutomatonVariant {
    /// Lifespans, pitch-class immortality, and MIDI re-triggering, advanced
    /// once per animation frame.
    #[default]
    Canonical,
    /// Plain binary Conway rules, advanced once per generation.
    Legacy,
}

/// Settings for a [CellularAutomaton] run.
#[derive(Builder, Clone, Debug, Derivative, PartialEq, Serialize, Deserialize)]
#[derivative(Default)]
#[builder(default)]
#[builder_struct_attr(allow(missing_docs))]
#[serde(default, rename_all = "kebab-case")]
pub struct AutomatonConfig {
    /// Seconds of animation. The canonical variant runs this many times the
    /// frame rate; the legacy variant runs exactly this many steps.
    #[derivative(Default(value = "10"))]
    pub generations: usize,

    #[allow(missing_docs)]
    pub frame_rate: FrameRate,

    #[allow(missing_docs)]
    pub variant: AutomatonVariant,

    /// Re-triggered cells renew to their note's measured length rather than
    /// to [CellularAutomaton::RENEWAL_LIFESPAN].
    #[derivative(Default(value = "true"))]
    pub track_durations: bool,

    /// Plant a fixed pattern when the source gives the grid nothing to do.
    pub seed_empty_grid: bool,
}
impl AutomatonConfig {
    /// How many steps a run takes.
    pub fn step_count(&self) -> usize {
        match self.variant {
            AutomatonVariant::Canonical => self.generations * self.frame_rate.0 as usize,
            AutomatonVariant::Legacy => self.generations,
        }
    }
}

/// Note lengths, measured in frames, keyed by `(pitch, step)`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DurationTable(FxHashMap<(MidiPitch, usize), Lifespan>);
impl DurationTable {
    /// The lifespan of a cell that no measured note accounts for.
    pub const DEFAULT_LIFESPAN: Lifespan = 10;

    /// Pairs each audible note-on with the next release of the same pitch
    /// (a note-off, or a zero-velocity note-on). Overlapping notes of one
    /// pitch are released first-in, first-out. Unreleased notes are ignored.
    pub fn build(source: &EventSource, frame_rate: FrameRate) -> Result<Self, InputError> {
        source.validate()?;
        let tempo = source.first_tempo();
        let mut open: FxHashMap<MidiPitch, VecDeque<u64>> = FxHashMap::default();
        let mut table = FxHashMap::default();

        for event in source.merged() {
            match event.kind {
                EventKind::NoteOn { pitch, velocity } if velocity > 0 => {
                    open.entry(pitch).or_default().push_back(event.absolute_ticks);
                }
                EventKind::NoteOn { pitch, .. } | EventKind::NoteOff { pitch } => {
                    if let Some(start) = open.get_mut(&pitch).and_then(|q| q.pop_front()) {
                        let frames = frame_rate.ticks_to_frame(
                            event.absolute_ticks - start,
                            tempo,
                            source.ticks_per_beat,
                        );
                        let step = frame_rate.ticks_to_frame(start, tempo, source.ticks_per_beat)
                            % GRID_SIZE;
                        let lifespan = Lifespan::try_from(frames).unwrap_or(Lifespan::MAX);

                        // A note shorter than one frame still deserves to be
                        // seen.
                        table.insert((pitch, step), lifespan.max(1));
                    }
                }
                _ => {}
            }
        }
        Ok(Self(table))
    }

    /// The measured lifespan for a cell, or [Self::DEFAULT_LIFESPAN].
    pub fn lifespan(&self, pitch: MidiPitch, step: usize) -> Lifespan {
        self.0
            .get(&(pitch, step))
            .copied()
            .unwrap_or(Self::DEFAULT_LIFESPAN)
    }

    #[allow(missing_docs)]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[allow(missing_docs)]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Evolves a [Grid] one frame at a time. Each step reads only the previous
/// snapshot and writes a complete successor into a second buffer, then the
/// two swap.
#[derive(Debug)]
pub struct CellularAutomaton {
    config: AutomatonConfig,
    timeline: Timeline,
    durations: DurationTable,
    current: Grid,
    next: Grid,
}
impl CellularAutomaton {
    /// What a re-triggered cell renews to when durations aren't tracked.
    pub const RENEWAL_LIFESPAN: Lifespan = 10;

    /// Every note the automaton emits has this velocity.
    pub const NOTE_VELOCITY: u8 = 64;

    // (pitch, step) pairs. The C cells sit far enough apart to stay lonely;
    // the rest is a glider.
    const SEED_PATTERN: [(usize, usize); 10] = [
        (36, 8),
        (48, 8),
        (60, 8),
        (72, 8),
        (84, 8),
        (65, 20),
        (66, 21),
        (64, 22),
        (65, 22),
        (66, 22),
    ];

    /// Prepares a run over `source`: builds the timeline and duration table
    /// and plants the initial grid.
    pub fn new_with(config: AutomatonConfig, source: &EventSource) -> Result<Self, InputError> {
        source.validate()?;
        let (timeline, durations) = match config.variant {
            AutomatonVariant::Canonical => (
                Timeline::build(source, config.generations, config.frame_rate)?,
                if config.track_durations {
                    DurationTable::build(source, config.frame_rate)?
                } else {
                    DurationTable::default()
                },
            ),
            AutomatonVariant::Legacy => (Timeline::default(), DurationTable::default()),
        };

        let tempo = source.first_tempo();
        let mut grid = Grid::default();
        for event in source.merged() {
            if let EventKind::NoteOn { pitch, velocity } = event.kind {
                if pitch as usize >= GRID_SIZE {
                    log::warn!("ignoring out-of-range pitch {pitch}");
                    continue;
                }
                let step = config.frame_rate.ticks_to_frame(
                    event.absolute_ticks,
                    tempo,
                    source.ticks_per_beat,
                ) % GRID_SIZE;
                match config.variant {
                    AutomatonVariant::Canonical if velocity > 0 => {
                        grid.set(pitch as usize, step, durations.lifespan(pitch, step))
                    }
                    AutomatonVariant::Canonical => {}
                    AutomatonVariant::Legacy => grid.set(pitch as usize, step, 1),
                }
            }
        }
        log::debug!(
            "automaton ({}) starts with {} living cell(s), {} measured duration(s)",
            config.variant,
            grid.alive_count(),
            durations.len()
        );

        Ok(Self {
            config,
            timeline,
            durations,
            current: grid,
            next: Grid::default(),
        })
    }

    /// Starts from an explicit grid with no timeline or measured durations.
    pub fn new_with_grid(config: AutomatonConfig, grid: Grid) -> Self {
        Self {
            config,
            timeline: Timeline::default(),
            durations: DurationTable::default(),
            current: grid,
            next: Grid::default(),
        }
    }

    /// The current snapshot.
    pub fn grid(&self) -> &Grid {
        &self.current
    }

    #[allow(missing_docs)]
    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    #[allow(missing_docs)]
    pub fn config(&self) -> &AutomatonConfig {
        &self.config
    }

    /// Advances one generation, using the timeline's triggers for `frame`.
    pub fn step(&mut self, frame: usize) {
        match self.config.variant {
            AutomatonVariant::Canonical => self.step_canonical(frame),
            AutomatonVariant::Legacy => self.step_legacy(),
        }
        std::mem::swap(&mut self.current, &mut self.next);
    }

    // A trigger reaches only the cell its note was planted in: the note's
    // pitch row, at the frame's column.
    fn step_canonical(&mut self, frame: usize) {
        let trigger_step = frame % GRID_SIZE;
        for pitch in 0..GRID_SIZE {
            let midi_pitch = pitch as MidiPitch;
            let immortal = is_c(midi_pitch);
            let row_triggered = self.timeline.triggers(frame, midi_pitch);

            for step in 0..GRID_SIZE {
                let value = self.current.get(pitch, step);
                let neighbors = self.current.live_neighbors(pitch, step);
                let retriggered = row_triggered && step == trigger_step;
                let successor = if value > 0 {
                    if immortal {
                        value
                    } else if retriggered {
                        if self.config.track_durations {
                            self.durations.lifespan(midi_pitch, step)
                        } else {
                            Self::RENEWAL_LIFESPAN
                        }
                    } else if (2..=3).contains(&neighbors) {
                        value
                    } else {
                        value.saturating_sub(1)
                    }
                } else if neighbors == 3 || retriggered {
                    self.durations.lifespan(midi_pitch, step)
                } else {
                    0
                };
                self.next.set(pitch, step, successor);
            }
        }
    }

    fn step_legacy(&mut self) {
        for pitch in 0..GRID_SIZE {
            for step in 0..GRID_SIZE {
                let neighbors = self.current.live_neighbors(pitch, step);
                let alive = if self.current.is_alive(pitch, step) {
                    (2..=3).contains(&neighbors)
                } else {
                    neighbors == 3
                };
                self.next.set(pitch, step, alive as Lifespan);
            }
        }
    }

    fn plant_seed_pattern(&mut self) {
        for (pitch, step) in Self::SEED_PATTERN {
            self.current
                .set(pitch, step, DurationTable::DEFAULT_LIFESPAN);
        }
    }

    /// Runs to completion and returns one note list per frame. The canonical
    /// variant skips the timeline's leading silence, so its first snapshot
    /// is the frame of the first trigger.
    ///
    /// With nothing on the grid and nothing on the timeline, the result is
    /// empty unless [AutomatonConfig::seed_empty_grid] is set.
    pub fn run(mut self) -> Vec<NoteList> {
        if self.current.is_empty() && self.timeline.is_silent() {
            if self.config.seed_empty_grid {
                log::info!("source has no notes; planting seed pattern");
                self.plant_seed_pattern();
            } else {
                log::warn!("source has no notes; automaton output is empty");
                return Vec::default();
            }
        }

        let end = self.config.step_count();
        let start = match self.config.variant {
            AutomatonVariant::Canonical => self.timeline.first_active_frame().unwrap_or(0),
            AutomatonVariant::Legacy => 0,
        };
        log::debug!("automaton running frames {start}..{end}");

        (start..end)
            .map(|frame| {
                self.step(frame);
                self.current.to_notes(Self::NOTE_VELOCITY)
            })
            .collect()
    }
}
