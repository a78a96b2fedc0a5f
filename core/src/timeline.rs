// Copyright (c) 2024 Mike Tsao. All rights reserved.

use crate::{
    error::InputError,
    events::{EventKind, EventSource},
    midi::MidiPitch,
    time::FrameRate,
};

/// The `(pitch, velocity)` pairs that started during one frame.
pub type FrameBucket = Vec<(MidiPitch, u8)>;

/// Note-ons quantized to animation frames. Built once per automaton run and
/// read-only after that.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Timeline {
    buckets: Vec<FrameBucket>,
    first_active_frame: Option<usize>,
}
impl Timeline {
    /// Buckets every audible note-on of `source` by frame. The timeline is
    /// `generations * frame_rate` frames long; anything that lands outside it
    /// is dropped.
    pub fn build(
        source: &EventSource,
        generations: usize,
        frame_rate: FrameRate,
    ) -> Result<Self, InputError> {
        source.validate()?;
        let tempo = source.first_tempo();
        let frame_count = generations * frame_rate.0 as usize;
        let mut buckets = vec![FrameBucket::default(); frame_count];

        let mut dropped = 0;
        for event in source.merged() {
            if let EventKind::NoteOn { pitch, velocity } = event.kind {
                if velocity == 0 {
                    continue;
                }
                let frame =
                    frame_rate.ticks_to_frame(event.absolute_ticks, tempo, source.ticks_per_beat);
                if let Some(bucket) = buckets.get_mut(frame) {
                    bucket.push((pitch, velocity));
                } else {
                    dropped += 1;
                }
            }
        }
        if dropped > 0 {
            log::debug!("timeline dropped {dropped} note-on(s) past frame {frame_count}");
        }

        let first_active_frame = buckets.iter().position(|b| !b.is_empty());
        Ok(Self {
            buckets,
            first_active_frame,
        })
    }

    /// The number of frames, whether or not they hold triggers.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    #[allow(missing_docs)]
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// The first frame with any triggers. Callers use it to skip leading
    /// silence.
    pub fn first_active_frame(&self) -> Option<usize> {
        self.first_active_frame
    }

    /// True if no frame holds a trigger.
    pub fn is_silent(&self) -> bool {
        self.first_active_frame.is_none()
    }

    /// The triggers of one frame. Frames past the end are empty.
    pub fn bucket(&self, frame: usize) -> &[(MidiPitch, u8)] {
        self.buckets.get(frame).map_or(&[], |b| b.as_slice())
    }

    /// True if `pitch` was triggered during `frame`.
    pub fn triggers(&self, frame: usize, pitch: MidiPitch) -> bool {
        self.bucket(frame).iter().any(|(p, _)| *p == pitch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::TimedEvent;

    #[test]
    fn buckets_note_ons_by_frame() {
        // 480 ticks per beat at 120 BPM: 48 ticks per frame at 20 fps.
        let source = EventSource::new_with(
            480,
            vec![vec![
                TimedEvent::note_on(96, 60, 100),
                TimedEvent::note_on(0, 64, 90),
                TimedEvent::note_off(48, 60),
                TimedEvent::note_on(48, 67, 0),
                TimedEvent::note_on(0, 72, 80),
            ]],
        );
        let timeline = Timeline::build(&source, 1, FrameRate::default()).unwrap();
        assert_eq!(timeline.len(), 20);
        assert_eq!(timeline.first_active_frame(), Some(2));
        assert_eq!(timeline.bucket(2), &[(60, 100), (64, 90)]);
        assert!(timeline.bucket(3).is_empty());
        assert_eq!(
            timeline.bucket(4),
            &[(72, 80)],
            "zero-velocity note-ons aren't triggers"
        );
        assert!(timeline.triggers(2, 64));
        assert!(!timeline.triggers(2, 72));
    }

    #[test]
    fn tempo_changes_frame_placement() {
        // At 60 BPM a beat is one second, which is 20 frames.
        let source = EventSource::new_with(
            100,
            vec![vec![
                TimedEvent::tempo(0, 1_000_000),
                TimedEvent::note_on(100, 60, 1),
            ]],
        );
        let timeline = Timeline::build(&source, 2, FrameRate::default()).unwrap();
        assert_eq!(timeline.first_active_frame(), Some(20));
    }

    #[test]
    fn out_of_range_events_are_dropped() {
        let source = EventSource::new_with(
            480,
            vec![vec![
                TimedEvent::note_on(0, 60, 100),
                TimedEvent::note_on(480 * 100, 61, 100),
            ]],
        );
        let timeline = Timeline::build(&source, 1, FrameRate::default()).unwrap();
        let total: usize = (0..timeline.len()).map(|f| timeline.bucket(f).len()).sum();
        assert_eq!(total, 1);
        assert!(timeline.bucket(1000).is_empty());
    }

    #[test]
    fn silent_source_has_no_active_frame() {
        let source = EventSource::new_with(480, vec![vec![TimedEvent::note_off(0, 60)]]);
        let timeline = Timeline::build(&source, 1, FrameRate::default()).unwrap();
        assert!(timeline.is_silent());
        assert_eq!(timeline.first_active_frame(), None);
        assert!(Timeline::build(&EventSource::default(), 1, FrameRate::default()).is_err());
    }
}
