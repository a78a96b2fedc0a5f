// Copyright (c) 2024 Mike Tsao. All rights reserved.

/// A MIDI note number. Valid values are 0..=127; 60 is middle C.
pub type MidiPitch = u8;

/// The number of distinct MIDI pitches (and velocities).
pub const MIDI_VALUE_COUNT: usize = 128;

/// The largest valid pitch or velocity.
pub const MIDI_VALUE_MAX: u8 = 127;

/// Middle C.
pub const MIDDLE_C: MidiPitch = 60;

/// Semitones per octave.
pub const PITCH_CLASS_COUNT: u8 = 12;

/// Returns the pitch class, with C = 0.
pub const fn pitch_class(pitch: MidiPitch) -> u8 {
    pitch % PITCH_CLASS_COUNT
}

/// True for C in every octave (0, 12, 24, ...).
pub const fn is_c(pitch: MidiPitch) -> bool {
    pitch_class(pitch) == 0
}

/// Clamps any integer into the valid MIDI range.
pub fn clamp_to_midi(value: i64) -> u8 {
    value.clamp(0, MIDI_VALUE_MAX as i64) as u8
}

/// Wraps any integer into the valid MIDI range, treating negative values the
/// way a mathematician would (-1 wraps to 127).
pub fn wrap_to_midi(value: i64) -> u8 {
    value.rem_euclid(MIDI_VALUE_COUNT as i64) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn c_pitches_are_recognized() {
        for pitch in (0..=MIDI_VALUE_MAX).step_by(12) {
            assert!(is_c(pitch), "{pitch} should be a C");
        }
        assert!(!is_c(61));
        assert!(!is_c(127));
    }

    #[test]
    fn clamp_and_wrap() {
        assert_eq!(clamp_to_midi(-5), 0);
        assert_eq!(clamp_to_midi(64), 64);
        assert_eq!(clamp_to_midi(300), 127);

        assert_eq!(wrap_to_midi(128), 0);
        assert_eq!(wrap_to_midi(130), 2);
        assert_eq!(wrap_to_midi(-1), 127);
    }
}
