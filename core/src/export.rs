// Copyright (c) 2024 Mike Tsao. All rights reserved.

use crate::{
    error::ExportError,
    types::{Sample, SampleRate},
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

/// Container formats a caller can ask for. Whether a given encoder can
/// produce one is up to the encoder.
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
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum AudioFormat {
    /// Uncompressed PCM.
    #[default]
    Wav,
    /// Lossless compression.
    Flac,
    /// Ogg Vorbis.
    Ogg,
    #[allow(missing_docs)]
    Mp3,
}
impl AudioFormat {
    /// The conventional file extension, without the dot.
    pub fn extension(&self) -> &'static str {
        self.into()
    }
}

/// Something that [Encodes] turns a normalized mono buffer into a file. The
/// core never looks at the bytes it produces.
pub trait Encodes {
    /// Writes `samples` to `path`. Encoders report formats they can't handle
    /// as [ExportError::UnsupportedFormat].
    fn encode(
        &self,
        samples: &[Sample],
        sample_rate: SampleRate,
        format: AudioFormat,
        path: &Path,
    ) -> Result<(), ExportError>;
}

/// Writes 16-bit mono WAV files with [hound].
#[derive(Debug, Default)]
pub struct HoundEncoder {}
impl Encodes for HoundEncoder {
    fn encode(
        &self,
        samples: &[Sample],
        sample_rate: SampleRate,
        format: AudioFormat,
        path: &Path,
    ) -> Result<(), ExportError> {
        if format != AudioFormat::Wav {
            return Err(ExportError::UnsupportedFormat(format));
        }
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: sample_rate.into(),
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec)?;
        for sample in samples {
            writer.write_sample(sample.into_i16())?;
        }
        writer.finalize()?;
        Ok(())
    }
}
