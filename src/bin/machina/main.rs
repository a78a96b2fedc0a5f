// Copyright (c) 2024 Mike Tsao. All rights reserved.

//! `machina` reads a Standard MIDI File, transforms its notes with one of the
//! generators, and renders the result to an audio file.

use anyhow::{bail, Context};
use clap::{
    builder::{PossibleValuesParser, TypedValueParser},
    Parser, ValueEnum,
};
use midi_machina::{app_version, prelude::*};
use std::{path::PathBuf, str::FromStr};
use strum::IntoEnumIterator;

#[derive(Clone, Copy, Debug, Default, PartialEq, ValueEnum)]
enum Algorithm {
    /// Game of Life on a pitch-by-time grid
    #[default]
    Automaton,
    /// Perlin-noise pitch remapping
    Noise,
    /// Lorenz-attractor pitch and velocity
    Attractor,
    /// Brownian motion over pitch
    RandomWalk,
}

#[derive(Parser, Debug)]
#[clap(author, about, long_about = None, version = app_version())]
struct Args {
    /// The MIDI file to transform.
    input: PathBuf,

    /// Which generator to run
    #[clap(short, long, value_enum, default_value_t)]
    algorithm: Algorithm,

    /// Settings file (JSON). Flags given on the command line win.
    #[clap(short, long)]
    config: Option<PathBuf>,

    /// Use the plain binary Game of Life rules
    #[clap(long)]
    legacy: bool,

    /// Length of the automaton run, in seconds of animation
    #[clap(short, long)]
    generations: Option<usize>,

    /// Plant a starter pattern if the input gives the automaton nothing to do
    #[clap(long)]
    seed_empty_grid: bool,

    /// Which automaton frame to render
    #[clap(short, long, default_value_t = 0)]
    frame: usize,

    /// Output format
    #[clap(long, default_value = "wav", value_parser = audio_format_parser())]
    format: AudioFormat,

    /// Length of the rendered audio, in seconds
    #[clap(short, long)]
    duration: Option<f64>,

    /// Fixes the random walk so that runs repeat
    #[clap(short, long)]
    seed: Option<u64>,

    /// Where to write the audio. Defaults to the input path with the
    /// format's extension.
    #[clap(short, long)]
    output: Option<PathBuf>,
}
// Lists every format in --help, even those the WAV encoder will refuse.
fn audio_format_parser() -> impl TypedValueParser<Value = AudioFormat> {
    PossibleValuesParser::new(AudioFormat::iter().map(|f| f.extension()))
        .try_map(|s| AudioFormat::from_str(&s))
}

impl Args {
    fn settings(&self) -> anyhow::Result<MachinaConfig> {
        let mut config = match &self.config {
            Some(path) => MachinaConfig::from_path(path)?,
            None => MachinaConfig::default(),
        };
        if self.legacy {
            config.automaton.variant = AutomatonVariant::Legacy;
        }
        if self.seed_empty_grid {
            config.automaton.seed_empty_grid = true;
        }
        if let Some(generations) = self.generations {
            config.automaton.generations = generations;
        }
        if let Some(duration) = self.duration {
            if !(duration.is_finite() && duration > 0.0) {
                bail!("duration must be a positive number of seconds, not {duration}");
            }
            config.synth.duration_seconds = duration;
        }
        if let Some(seed) = self.seed {
            config.random_walk.seed = Some(seed);
        }
        Ok(config)
    }

    fn output_path(&self, format: AudioFormat) -> anyhow::Result<PathBuf> {
        let path = match &self.output {
            Some(output) if output.extension().is_some() => output.clone(),
            Some(output) => output.with_extension(format.extension()),
            None => self.input.with_extension(format.extension()),
        };
        if path == self.input {
            bail!(
                "would overwrite input file {}; choose another output path",
                path.display()
            );
        }
        Ok(path)
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = args.settings()?;
    let format = args.format;
    let output_path = args.output_path(format)?;

    let source = EventSource::from_smf_path(&args.input)
        .with_context(|| format!("Couldn't read {}", args.input.display()))?;

    let generator = match args.algorithm {
        Algorithm::Automaton => Generator::Automaton(config.automaton.clone()),
        Algorithm::Noise => Generator::Noise(config.noise.clone()),
        Algorithm::Attractor => Generator::Attractor(config.attractor.clone()),
        Algorithm::RandomWalk => Generator::RandomWalk(config.random_walk.clone()),
    };
    let output = generator
        .produce(&source)
        .with_context(|| format!("Couldn't run the {generator} generator"))?;
    let frame_count = output.frame_count();
    let Some(notes) = output.into_frame(args.frame) else {
        bail!(
            "frame {} is out of range; the {generator} generator produced {frame_count} frame(s)",
            args.frame
        );
    };

    let buffer = Synthesizer::new_with(config.synth)
        .export(&notes, &output_path, format, &HoundEncoder::default())
        .with_context(|| format!("Couldn't export to {}", output_path.display()))?;
    eprintln!(
        "Rendered {} note(s) from {} to {} ({} samples at {})",
        notes.len(),
        args.input.display(),
        output_path.display(),
        buffer.len(),
        buffer.sample_rate()
    );
    Ok(())
}
