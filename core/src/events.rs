// Copyright (c) 2024 Mike Tsao. All rights reserved.

//! The event stream that every generator reads. A real MIDI container is an
//! external concern; [EventSource::from_smf_bytes()] adapts Standard MIDI
//! Files via [midly], and tests build sources by hand.

use crate::{error::InputError, midi::MidiPitch, time::Tempo};
use std::path::Path;

/// What happened at a point in the event stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventKind {
    /// A key went down. A velocity of zero is still reported as a note-on;
    /// consumers decide whether to treat it as a release.
    NoteOn {
        #[allow(missing_docs)]
        pitch: MidiPitch,
        #[allow(missing_docs)]
        velocity: u8,
    },
    /// A key went up.
    NoteOff {
        #[allow(missing_docs)]
        pitch: MidiPitch,
    },
    /// A set-tempo meta event, in microseconds per quarter note.
    Tempo(Tempo),
    /// Anything else the container carried. Kept so that track lengths match
    /// the source.
    Other,
}

/// An [EventKind] stamped with the ticks since the previous event in its
/// track.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimedEvent {
    #[allow(missing_docs)]
    pub delta_ticks: u32,
    #[allow(missing_docs)]
    pub kind: EventKind,
}
impl TimedEvent {
    #[allow(missing_docs)]
    pub const fn new_with(delta_ticks: u32, kind: EventKind) -> Self {
        Self { delta_ticks, kind }
    }

    #[allow(missing_docs)]
    pub const fn note_on(delta_ticks: u32, pitch: MidiPitch, velocity: u8) -> Self {
        Self::new_with(delta_ticks, EventKind::NoteOn { pitch, velocity })
    }

    #[allow(missing_docs)]
    pub const fn note_off(delta_ticks: u32, pitch: MidiPitch) -> Self {
        Self::new_with(delta_ticks, EventKind::NoteOff { pitch })
    }

    #[allow(missing_docs)]
    pub const fn tempo(delta_ticks: u32, usec_per_quarter: u32) -> Self {
        Self::new_with(delta_ticks, EventKind::Tempo(Tempo(usec_per_quarter)))
    }
}

/// One event of the merged stream, with its position resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MergedEvent {
    /// Ticks since the start of the sequence.
    pub absolute_ticks: u64,
    /// Ticks since the previous event of the merged stream.
    pub delta_ticks: u64,
    #[allow(missing_docs)]
    pub kind: EventKind,
}

/// An ordered, multi-track sequence of tick-timed events with a fixed
/// resolution.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EventSource {
    /// Pulses per quarter note.
    pub ticks_per_beat: u16,
    /// Track 0 is the primary track.
    pub tracks: Vec<Vec<TimedEvent>>,
}
impl EventSource {
    #[allow(missing_docs)]
    pub fn new_with(ticks_per_beat: u16, tracks: Vec<Vec<TimedEvent>>) -> Self {
        Self {
            ticks_per_beat,
            tracks,
        }
    }

    /// Parses a Standard MIDI File.
    pub fn from_smf_bytes(data: &[u8]) -> Result<Self, InputError> {
        let smf = midly::Smf::parse(data)?;
        let ticks_per_beat = match smf.header.timing {
            midly::Timing::Metrical(ticks_per_beat) => ticks_per_beat.as_int(),
            midly::Timing::Timecode(..) => return Err(InputError::UnsupportedTiming),
        };
        if ticks_per_beat == 0 {
            return Err(InputError::ZeroTicksPerBeat);
        }

        let tracks: Vec<Vec<TimedEvent>> = smf
            .tracks
            .iter()
            .map(|track| {
                track
                    .iter()
                    .map(|e| TimedEvent::new_with(e.delta.as_int(), Self::convert_kind(&e.kind)))
                    .collect()
            })
            .collect();
        log::debug!(
            "parsed SMF: {} track(s), {} ticks/beat",
            tracks.len(),
            ticks_per_beat
        );
        Ok(Self::new_with(ticks_per_beat, tracks))
    }

    /// Reads and parses a Standard MIDI File from disk.
    pub fn from_smf_path(path: &Path) -> Result<Self, InputError> {
        let data = std::fs::read(path)?;
        Self::from_smf_bytes(&data)
    }

    fn convert_kind(kind: &midly::TrackEventKind) -> EventKind {
        match kind {
            midly::TrackEventKind::Midi { message, .. } => match message {
                midly::MidiMessage::NoteOn { key, vel } => EventKind::NoteOn {
                    pitch: key.as_int(),
                    velocity: vel.as_int(),
                },
                midly::MidiMessage::NoteOff { key, .. } => EventKind::NoteOff {
                    pitch: key.as_int(),
                },
                _ => EventKind::Other,
            },
            midly::TrackEventKind::Meta(midly::MetaMessage::Tempo(tempo)) => {
                EventKind::Tempo(Tempo(tempo.as_int()))
            }
            _ => EventKind::Other,
        }
    }

    /// The number of events in track 0.
    pub fn primary_track_len(&self) -> usize {
        self.tracks.first().map_or(0, |track| track.len())
    }

    /// All tracks interleaved by absolute time. Events that share a tick keep
    /// their track order.
    pub fn merged(&self) -> Vec<MergedEvent> {
        let mut events: Vec<(u64, usize, usize, EventKind)> = Vec::default();
        for (track_index, track) in self.tracks.iter().enumerate() {
            let mut ticks = 0u64;
            for (event_index, event) in track.iter().enumerate() {
                ticks += event.delta_ticks as u64;
                events.push((ticks, track_index, event_index, event.kind));
            }
        }
        events.sort_by_key(|(ticks, track, index, _)| (*ticks, *track, *index));

        let mut previous = 0u64;
        events
            .into_iter()
            .map(|(absolute_ticks, _, _, kind)| {
                let delta_ticks = absolute_ticks - previous;
                previous = absolute_ticks;
                MergedEvent {
                    absolute_ticks,
                    delta_ticks,
                    kind,
                }
            })
            .collect()
    }

    /// Every note-on of the merged stream, including zero-velocity ones.
    pub fn note_ons(&self) -> impl Iterator<Item = (MergedEvent, MidiPitch, u8)> {
        self.merged().into_iter().filter_map(|e| match e.kind {
            EventKind::NoteOn { pitch, velocity } => Some((e, pitch, velocity)),
            _ => None,
        })
    }

    /// The first tempo in the merged stream, or 120 BPM if there is none.
    pub fn first_tempo(&self) -> Tempo {
        self.merged()
            .into_iter()
            .find_map(|e| match e.kind {
                EventKind::Tempo(tempo) => Some(tempo),
                _ => None,
            })
            .unwrap_or_default()
    }

    /// Fails for sources that no tick conversion can handle.
    pub fn validate(&self) -> Result<(), InputError> {
        if self.ticks_per_beat == 0 {
            return Err(InputError::ZeroTicksPerBeat);
        }
        Ok(())
    }
}
