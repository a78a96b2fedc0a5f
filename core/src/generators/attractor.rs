// Copyright (c) 2024 Mike Tsao. All rights reserved.

use crate::{
    events::{EventKind, EventSource},
    midi::wrap_to_midi,
    types::{NoteEvent, NoteList},
};
use derivative::Derivative;
use derive_builder::Builder;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// A point on the attractor's trajectory.
pub type AttractorState = Vector3<f64>;

/// Settings for a [LorenzAttractor]. The defaults are Lorenz's own, which
/// give the familiar butterfly.
#[derive(Builder, Clone, Debug, Derivative, PartialEq, Serialize, Deserialize)]
#[derivative(Default)]
#[builder(default)]
#[builder_struct_attr(allow(missing_docs))]
#[serde(default, rename_all = "kebab-case")]
pub struct AttractorConfig {
    #[allow(missing_docs)]
    #[derivative(Default(value = "10.0"))]
    pub sigma: f64,

    #[allow(missing_docs)]
    #[derivative(Default(value = "28.0"))]
    pub rho: f64,

    #[allow(missing_docs)]
    #[derivative(Default(value = "8.0 / 3.0"))]
    pub beta: f64,

    /// Where the trajectory starts, as `[x, y, z]`.
    #[derivative(Default(value = "[1.0, 1.0, 1.0]"))]
    pub initial_state: [f64; 3],

    /// The time grid spans `0.0..=duration`.
    #[derivative(Default(value = "100.0"))]
    pub duration: f64,
}

/// Rides the Lorenz system and reads each note's pitch and velocity off the
/// trajectory.
#[derive(Clone, Debug, Default)]
pub struct LorenzAttractor {
    config: AttractorConfig,
}
impl LorenzAttractor {
    /// The largest step the integrator takes between grid points.
    pub const MAX_STEP: f64 = 0.001;

    #[allow(missing_docs)]
    pub fn new_with(config: AttractorConfig) -> Self {
        Self { config }
    }

    /// dx/dt = σ(y − x), dy/dt = x(ρ − z) − y, dz/dt = xy − βz
    pub fn derivative(&self, state: &AttractorState) -> AttractorState {
        let (x, y, z) = (state.x, state.y, state.z);
        Vector3::new(
            self.config.sigma * (y - x),
            x * (self.config.rho - z) - y,
            x * y - self.config.beta * z,
        )
    }

    fn rk4_step(&self, state: &AttractorState, h: f64) -> AttractorState {
        let k1 = self.derivative(state);
        let k2 = self.derivative(&(state + k1 * (h / 2.0)));
        let k3 = self.derivative(&(state + k2 * (h / 2.0)));
        let k4 = self.derivative(&(state + k3 * h));
        state + (k1 + k2 * 2.0 + k3 * 2.0 + k4) * (h / 6.0)
    }

    /// Samples the trajectory at `count` evenly spaced times. The spacing is
    /// that of a `grid_len`-point grid over `0.0..=duration`; asking for more
    /// points than the grid has keeps going at the same spacing.
    pub fn integrate(&self, grid_len: usize, count: usize) -> Vec<AttractorState> {
        if count == 0 {
            return Vec::default();
        }
        let spacing = if grid_len > 1 {
            self.config.duration / (grid_len - 1) as f64
        } else {
            self.config.duration
        };
        let substeps = ((spacing / Self::MAX_STEP).ceil() as usize).max(1);
        let h = spacing / substeps as f64;

        let mut states = Vec::with_capacity(count);
        let mut state = AttractorState::from(self.config.initial_state);
        states.push(state);
        for _ in 1..count {
            for _ in 0..substeps {
                state = self.rk4_step(&state, h);
            }
            states.push(state);
        }
        states
    }

    /// `round((x + 30) * 2) mod 128` for pitch, the same with y for velocity.
    pub fn state_to_note(state: &AttractorState, time: f64) -> NoteEvent {
        NoteEvent::new_with(
            wrap_to_midi(((state.x + 30.0) * 2.0).round() as i64),
            wrap_to_midi(((state.y + 30.0) * 2.0).round() as i64),
            time,
        )
    }

    /// A note-on at position i of the merged stream takes the i-th state of
    /// a trajectory sampled over as many points as the primary track has
    /// events. Tempo changes, note-offs, and everything else count toward
    /// the position.
    pub fn generate(&self, source: &EventSource) -> NoteList {
        let events = source.merged();
        let Some(last_note_on) = events
            .iter()
            .rposition(|e| matches!(e.kind, EventKind::NoteOn { .. }))
        else {
            return NoteList::default();
        };
        let states = self.integrate(source.primary_track_len(), last_note_on + 1);
        events
            .iter()
            .zip(states.iter())
            .filter_map(|(event, state)| match event.kind {
                EventKind::NoteOn { .. } => {
                    Some(Self::state_to_note(state, event.delta_ticks as f64))
                }
                _ => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::TimedEvent;
    use float_cmp::approx_eq;
    use more_asserts::{assert_gt, assert_le, assert_lt};

    #[test]
    fn initial_state_maps_to_62() {
        let note = LorenzAttractor::state_to_note(&Vector3::new(1.0, 1.0, 1.0), 5.0);
        assert_eq!(note, NoteEvent::new_with(62, 62, 5.0));

        let source = EventSource::new_with(
            480,
            vec![vec![
                TimedEvent::note_on(3, 60, 100),
                TimedEvent::note_off(10, 60),
            ]],
        );
        let notes = LorenzAttractor::default().generate(&source);
        assert_eq!(notes, vec![NoteEvent::new_with(62, 62, 3.0)]);
    }

    #[test]
    fn states_follow_stream_position() {
        let source = EventSource::new_with(
            480,
            vec![vec![
                TimedEvent::tempo(0, 500_000),
                TimedEvent::note_on(3, 60, 100),
                TimedEvent::note_off(10, 60),
                TimedEvent::note_on(0, 64, 100),
                TimedEvent::note_off(10, 64),
            ]],
        );
        let attractor = LorenzAttractor::default();
        let states = attractor.integrate(5, 4);
        assert_eq!(
            attractor.generate(&source),
            vec![
                LorenzAttractor::state_to_note(&states[1], 3.0),
                LorenzAttractor::state_to_note(&states[3], 0.0),
            ]
        );
        assert_ne!(
            attractor.generate(&source)[0],
            NoteEvent::new_with(62, 62, 3.0),
            "the tempo event takes the initial state"
        );
    }

    #[test]
    fn derivative_at_start() {
        let d = LorenzAttractor::default().derivative(&Vector3::new(1.0, 1.0, 1.0));
        assert!(approx_eq!(f64, d.x, 0.0));
        assert!(approx_eq!(f64, d.y, 26.0));
        assert!(approx_eq!(f64, d.z, 1.0 - 8.0 / 3.0, ulps = 4));
    }

    #[test]
    fn mapping_wraps() {
        // (97 + 30) * 2 = 254, which wraps to 126.
        let note = LorenzAttractor::state_to_note(&Vector3::new(97.0, -31.0, 0.0), 0.0);
        assert_eq!(note.pitch, 126);
        assert_eq!(note.velocity, 126, "-2 wraps to 126");
    }

    #[test]
    fn trajectory_stays_on_the_attractor() {
        let attractor = LorenzAttractor::default();
        let states = attractor.integrate(1000, 1000);
        assert_eq!(states.len(), 1000);
        assert_eq!(states, attractor.integrate(1000, 1000), "no randomness");
        for state in states.iter().skip(100) {
            assert_lt!(state.x.abs(), 30.0);
            assert_lt!(state.y.abs(), 40.0);
            assert_gt!(state.z, 0.0);
            assert_lt!(state.z, 60.0);
        }
        for note in states.iter().map(|s| LorenzAttractor::state_to_note(s, 0.0)) {
            assert_le!(note.pitch, 127);
            assert_le!(note.velocity, 127);
        }
    }

    #[test]
    fn more_notes_than_grid_points() {
        let attractor = LorenzAttractor::default();
        assert!(attractor.integrate(10, 0).is_empty());
        assert_eq!(attractor.integrate(0, 3).len(), 3);
        assert_eq!(
            attractor.integrate(11, 20)[..11],
            attractor.integrate(11, 11)[..]
        );
    }

    #[test]
    fn no_note_ons_no_notes() {
        let source = EventSource::new_with(480, vec![vec![TimedEvent::tempo(0, 500_000)]]);
        assert!(LorenzAttractor::default().generate(&source).is_empty());
    }
}
