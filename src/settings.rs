// Copyright (c) 2024 Mike Tsao. All rights reserved.

//! Settings for a whole run, loadable from a JSON file so that a favorite
//! combination of generator parameters can be reused.

use anyhow::Context;
use machina_core::{
    generators::{AttractorConfig, AutomatonConfig, NoiseConfig, RandomWalkConfig},
    synth::SynthConfig,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Every tunable in one place. Missing sections take their defaults, so a
/// file only needs to mention what it changes.
///
/// ```json
/// { "automaton": { "generations": 4 }, "synth": { "duration-seconds": 2.5 } }
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct MachinaConfig {
    #[allow(missing_docs)]
    pub automaton: AutomatonConfig,
    #[allow(missing_docs)]
    pub noise: NoiseConfig,
    #[allow(missing_docs)]
    pub attractor: AttractorConfig,
    #[allow(missing_docs)]
    pub random_walk: RandomWalkConfig,
    #[allow(missing_docs)]
    pub synth: SynthConfig,
}
impl MachinaConfig {
    /// Reads and parses a JSON settings file.
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Couldn't read {}", path.display()))?;
        let config = Self::from_json(&contents)
            .with_context(|| format!("Couldn't parse {}", path.display()))?;
        log::info!("loaded settings from {}", path.display());
        Ok(config)
    }

    /// Parses settings from a JSON string.
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serializes these settings in the same format [MachinaConfig::from_path()]
    /// reads.
    pub fn to_json(&self) -> anyhow::Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| anyhow::format_err!("Unable to serialize settings JSON: {e}"))
    }
}
