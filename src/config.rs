//! Chain description files
//!
//! A chain is described in JSON with its gains written in the compact
//! `OUT/IN` form and its contributions written as measurement strings:
//!
//! ```json
//! {
//!   "input": "Pressure",
//!   "gains": ["40mV/Pa", "+0dB(V/V)", "-10.5dB(FS/V)"],
//!   "noises": [{ "level": "15 dB SPL", "zone": 0, "label": "mic self-noise" }],
//!   "clips": [{ "level": "132 dB SPL", "zone": 0 }]
//! }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{GainStageError, Result};
use crate::gain::Gain;
use crate::level::Level;
use crate::structure::GainStructure;
use crate::units::Field;

/// One noise or clip entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contribution {
    /// Measurement string, e.g. "-128 dBu"
    pub level: String,
    pub zone: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Serialized form of a gain structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChainConfig {
    /// Field of zone 0; taken from the first gain when omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<Field>,
    #[serde(default)]
    pub gains: Vec<String>,
    #[serde(default)]
    pub noises: Vec<Contribution>,
    #[serde(default)]
    pub clips: Vec<Contribution>,
}

impl ChainConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Read a chain description from disk
    pub fn load(path: &Path) -> Result<Self> {
        log::info!("Loading chain: {}", path.display());
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse every entry and assemble the gain structure
    pub fn build(&self) -> Result<GainStructure> {
        let gains = self
            .gains
            .iter()
            .map(|text| text.parse::<Gain>())
            .collect::<Result<Vec<_>>>()?;

        let input = self
            .input
            .or_else(|| gains.first().map(Gain::infield))
            .ok_or_else(|| GainStageError::MissingUnit {
                input: "chain input".to_string(),
            })?;

        let mut structure = GainStructure::with_gains(input, gains)?;
        for noise in &self.noises {
            structure.add_noise(noise.level.parse()?, noise.zone)?;
        }
        for clip in &self.clips {
            structure.add_clip(clip.level.parse()?, clip.zone)?;
        }
        Ok(structure)
    }

    /// Clip entries keyed by label, zoned where they sit.
    ///
    /// Unlabelled entries are named after their position, e.g. "clip 2".
    /// Every clip must end up with its own label.
    pub fn labeled_clips(&self) -> Result<BTreeMap<String, Level>> {
        let mut labeled = BTreeMap::new();
        for (i, clip) in self.clips.iter().enumerate() {
            let label = clip
                .label
                .clone()
                .unwrap_or_else(|| format!("clip {}", i + 1));
            let level = Level::parse_at(&clip.level, clip.zone)?;
            if labeled.contains_key(&label) {
                return Err(GainStageError::DuplicateLabel { label });
            }
            labeled.insert(label, level);
        }
        Ok(labeled)
    }
}
