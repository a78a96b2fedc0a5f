// Copyright (c) 2024 Mike Tsao. All rights reserved.

use crate::{
    midi::{MidiPitch, MIDI_VALUE_COUNT},
    types::{NoteEvent, NoteList},
};

/// Remaining life of one automaton cell. Zero is dead.
pub type Lifespan = u32;

/// The grid is square: one row per MIDI pitch, one column per time step.
pub const GRID_SIZE: usize = MIDI_VALUE_COUNT;

/// A 128x128 lifespan matrix indexed `[pitch][step]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    cells: Vec<Lifespan>,
}
impl Default for Grid {
    fn default() -> Self {
        Self {
            cells: vec![0; GRID_SIZE * GRID_SIZE],
        }
    }
}
impl Grid {
    const NEIGHBOR_OFFSETS: [(isize, isize); 8] = [
        (-1, -1),
        (-1, 0),
        (-1, 1),
        (0, -1),
        (0, 1),
        (1, -1),
        (1, 0),
        (1, 1),
    ];

    fn index(pitch: usize, step: usize) -> usize {
        debug_assert!(pitch < GRID_SIZE && step < GRID_SIZE);
        pitch * GRID_SIZE + step
    }

    #[allow(missing_docs)]
    pub fn get(&self, pitch: usize, step: usize) -> Lifespan {
        self.cells[Self::index(pitch, step)]
    }

    #[allow(missing_docs)]
    pub fn set(&mut self, pitch: usize, step: usize, value: Lifespan) {
        self.cells[Self::index(pitch, step)] = value;
    }

    #[allow(missing_docs)]
    pub fn is_alive(&self, pitch: usize, step: usize) -> bool {
        self.get(pitch, step) > 0
    }

    /// How many of the eight surrounding cells are alive. The grid doesn't
    /// wrap, so edge cells have fewer candidates.
    pub fn live_neighbors(&self, pitch: usize, step: usize) -> u8 {
        Self::NEIGHBOR_OFFSETS
            .iter()
            .filter(|(dp, ds)| {
                match (
                    pitch.checked_add_signed(*dp),
                    step.checked_add_signed(*ds),
                ) {
                    (Some(p), Some(s)) if p < GRID_SIZE && s < GRID_SIZE => self.is_alive(p, s),
                    _ => false,
                }
            })
            .count() as u8
    }

    /// True if every cell is dead.
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|c| *c == 0)
    }

    #[allow(missing_docs)]
    pub fn alive_count(&self) -> usize {
        self.cells.iter().filter(|c| **c > 0).count()
    }

    /// Every living cell as `(pitch, step, lifespan)`, in row-major order.
    pub fn iter_alive(&self) -> impl Iterator<Item = (usize, usize, Lifespan)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, value)| **value > 0)
            .map(|(i, value)| (i / GRID_SIZE, i % GRID_SIZE, *value))
    }

    /// Turns each living cell into a note: pitch is the row, time is the
    /// column.
    pub fn to_notes(&self, velocity: u8) -> NoteList {
        self.iter_alive()
            .map(|(pitch, step, _)| NoteEvent::new_with(pitch as MidiPitch, velocity, step as f64))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neighbors_do_not_wrap() {
        let mut grid = Grid::default();
        grid.set(0, 1, 5);
        grid.set(1, 0, 5);
        grid.set(1, 1, 5);
        grid.set(127, 127, 5);
        assert_eq!(grid.live_neighbors(0, 0), 3);
        assert_eq!(grid.live_neighbors(1, 1), 2, "a cell isn't its own neighbor");
        assert_eq!(
            grid.live_neighbors(0, 127),
            0,
            "the far corner is not adjacent"
        );
        assert_eq!(grid.live_neighbors(126, 126), 1);
    }

    #[test]
    fn notes_come_from_living_cells() {
        let mut grid = Grid::default();
        assert!(grid.is_empty());
        assert!(grid.to_notes(64).is_empty());

        grid.set(60, 5, 10);
        grid.set(72, 0, 1);
        assert_eq!(grid.alive_count(), 2);
        assert_eq!(
            grid.to_notes(64),
            vec![
                NoteEvent::new_with(60, 64, 5.0),
                NoteEvent::new_with(72, 64, 0.0)
            ]
        );
    }
}
