//! Gain structure accumulator
//!
//! Tracks noise and clip contributions at different zones of a fixed
//! chain and works out the system noise floor and clip ceiling at any
//! zone. Levels are stored in SI RMS values (Pa, V, FS).

use crate::error::{GainStageError, Result};
use crate::gain::Gain;
use crate::level::Level;
use crate::units::Field;
use crate::zone::{level_at_zone, powersum};

/// A chain of gains with the noise and clip contributions recorded on it
///
/// `fields` always holds one entry per zone, i.e. `gains.len() + 1`.
/// The only way in is through the checked constructors; `ChainConfig` is
/// the stored form and rebuilds a structure through them.
#[derive(Debug, Clone)]
pub struct GainStructure {
    gains: Vec<Gain>,
    fields: Vec<Field>,
    noises: Vec<Level>,
    clips: Vec<Level>,
}

impl GainStructure {
    /// Start a chain whose first zone is in `input`
    pub fn new(input: Field) -> Self {
        Self {
            gains: Vec::new(),
            fields: vec![input],
            noises: Vec::new(),
            clips: Vec::new(),
        }
    }

    /// Start a chain and append every gain in order
    pub fn with_gains(input: Field, gains: impl IntoIterator<Item = Gain>) -> Result<Self> {
        let mut structure = Self::new(input);
        for gain in gains {
            structure.push_gain(gain)?;
        }
        Ok(structure)
    }

    /// Append a gain after the last zone, creating a new zone
    pub fn push_gain(&mut self, gain: Gain) -> Result<()> {
        let last = self.output_field();
        if gain.infield() != last {
            return Err(GainStageError::DomainMismatch {
                expected: last,
                found: gain.infield(),
                context: "gain structure",
            });
        }
        self.gains.push(gain);
        self.fields.push(gain.outfield());
        Ok(())
    }

    pub fn gains(&self) -> &[Gain] {
        &self.gains
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Number of zones (one more than the number of gains)
    pub fn zones(&self) -> usize {
        self.fields.len()
    }

    /// Field of the last zone
    pub fn output_field(&self) -> Field {
        // fields is never empty
        self.fields[self.fields.len() - 1]
    }

    /// Field of `zone`
    pub fn field_at(&self, zone: i32) -> Result<Field> {
        usize::try_from(zone)
            .ok()
            .and_then(|index| self.fields.get(index).copied())
            .ok_or(GainStageError::ZoneOutOfRange {
                zone,
                zones: self.zones(),
            })
    }

    /// Recorded noise sources, each zoned where it was added
    pub fn noises(&self) -> &[Level] {
        &self.noises
    }

    /// Recorded clip points, each zoned where it was added
    pub fn clips(&self) -> &[Level] {
        &self.clips
    }

    /// Record a noise source at `zone`
    pub fn add_noise(&mut self, level: Level, zone: i32) -> Result<()> {
        let level = self.checked_contribution(level, zone)?;
        log::debug!("noise {} added", level);
        self.noises.push(level);
        Ok(())
    }

    /// Record a clip point at `zone`
    pub fn add_clip(&mut self, level: Level, zone: i32) -> Result<()> {
        let level = self.checked_contribution(level, zone)?;
        log::debug!("clip {} added", level);
        self.clips.push(level);
        Ok(())
    }

    /// Move a zoned level to `zone` through this chain
    pub fn level_at_zone(&self, level: &Level, zone: i32) -> Result<Level> {
        level_at_zone(&self.gains, level, zone)
    }

    /// Incoherent sum of every noise source, seen at `zone`.
    ///
    /// With no noise recorded this is a zero level.
    pub fn system_noise_at_zone(&self, zone: i32) -> Result<Level> {
        let field = self.field_at(zone)?;
        let noise = if self.noises.is_empty() {
            Level::zoned(0.0, field, zone)
        } else {
            powersum(&self.gains, &self.noises, zone)?
        };
        log::debug!("system noise at zone {}: {}", zone, noise);
        Ok(noise)
    }

    /// Lowest clip point, seen at `zone`.
    ///
    /// With no clip points recorded this is an infinite level.
    pub fn system_clip_at_zone(&self, zone: i32) -> Result<Level> {
        let field = self.field_at(zone)?;
        let mut ceiling = Level::zoned(f64::INFINITY, field, zone);
        for clip in &self.clips {
            let moved = self.level_at_zone(clip, zone)?;
            if moved.value() < ceiling.value() {
                ceiling = moved;
            }
        }
        log::debug!("system clip at zone {}: {}", zone, ceiling);
        Ok(ceiling)
    }

    /// Clip ceiling minus noise floor at `zone`, in dB
    pub fn dynamic_range_at_zone(&self, zone: i32) -> Result<f64> {
        let clip = self.system_clip_at_zone(zone)?;
        let noise = self.system_noise_at_zone(zone)?;
        Ok(clip.db(1.0) - noise.db(1.0))
    }

    fn checked_contribution(&self, level: Level, zone: i32) -> Result<Level> {
        let field = self.field_at(zone)?;
        if level.field() != field {
            return Err(GainStageError::DomainMismatch {
                expected: field,
                found: level.field(),
                context: "gain structure zone",
            });
        }
        Ok(level.with_zone(zone))
    }
}
