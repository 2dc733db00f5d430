//! Level - an RMS magnitude in one physical domain
//!
//! Levels are stored in the SI unit of their field (Pa, V, FS) and may be
//! attached to a zone of a signal chain. They are immutable: every
//! transformation returns a new `Level`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{GainStageError, Result};
use crate::units::{amplitude_to_db, parse_measurement, Field, ReferenceUnit};

/// Reference a level is expressed against in dB
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DbReference {
    /// Literal linear reference in the SI unit of the level's field
    Linear(f64),
    /// One of the named references (SPL, u, ...)
    Named(ReferenceUnit),
}

impl DbReference {
    /// Linear value of the reference
    pub fn resolve(self) -> f64 {
        match self {
            DbReference::Linear(value) => value,
            DbReference::Named(unit) => unit.scale(),
        }
    }
}

impl Default for DbReference {
    fn default() -> Self {
        DbReference::Linear(1.0)
    }
}

impl From<f64> for DbReference {
    fn from(value: f64) -> Self {
        DbReference::Linear(value)
    }
}

impl From<ReferenceUnit> for DbReference {
    fn from(unit: ReferenceUnit) -> Self {
        DbReference::Named(unit)
    }
}

/// An RMS level
///
/// Equality compares value and field only; the zone is bookkeeping.
///
/// # Example
/// ```
/// use gainstage::{Field, Level};
///
/// let level: Level = "0dBu".parse().unwrap();
/// assert_eq!(level.field(), Field::Voltage);
/// assert_eq!(level.to_string(), "0.775 V");
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Level {
    value: f64,
    field: Field,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    zone: Option<i32>,
}

impl Level {
    /// Create an unzoned level from a value in the SI unit of `field`
    pub fn new(value: f64, field: Field) -> Self {
        Self {
            value,
            field,
            zone: None,
        }
    }

    /// Create a level attached to `zone`
    pub fn zoned(value: f64, field: Field, zone: i32) -> Self {
        Self {
            value,
            field,
            zone: Some(zone),
        }
    }

    /// Parse `text` and attach the result to `zone`
    pub fn parse_at(text: &str, zone: i32) -> Result<Self> {
        Ok(text.parse::<Level>()?.with_zone(zone))
    }

    /// Copy of this level attached to `zone`
    pub fn with_zone(self, zone: i32) -> Self {
        Self {
            zone: Some(zone),
            ..self
        }
    }

    /// Copy of this level detached from any chain
    pub fn without_zone(self) -> Self {
        Self { zone: None, ..self }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn field(&self) -> Field {
        self.field
    }

    pub fn zone(&self) -> Option<i32> {
        self.zone
    }

    /// Level in dB relative to `reference`
    ///
    /// A zero level is negative infinity dB regardless of reference.
    pub fn db(&self, reference: impl Into<DbReference>) -> f64 {
        if self.value == 0.0 {
            return f64::NEG_INFINITY;
        }
        amplitude_to_db(self.value / reference.into().resolve())
    }

    /// Level in dB relative to a reference named in text (`"SPL"`, `"u"`, ...)
    pub fn db_named(&self, reference: &str) -> Result<f64> {
        let unit: ReferenceUnit = reference.parse()?;
        Ok(self.db(unit))
    }
}

impl PartialEq for Level {
    fn eq(&self, other: &Self) -> bool {
        self.field == other.field && self.value == other.value
    }
}

impl FromStr for Level {
    type Err = GainStageError;

    fn from_str(s: &str) -> Result<Self> {
        let measurement = parse_measurement(s)?;
        let field = measurement.field.ok_or_else(|| GainStageError::MissingUnit {
            input: s.to_string(),
        })?;
        Ok(Level::new(measurement.value, field))
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value, self.field.si_unit())?;
        if let Some(zone) = self.zone {
            write!(f, " zone: {}", zone)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_level_new() {
        let level = Level::new(1.0, Field::Pressure);
        assert_eq!(level.value(), 1.0);
        assert_eq!(level.field(), Field::Pressure);
        assert_eq!(level.zone(), None);
    }

    #[test]
    fn test_level_display() {
        assert_eq!("0dBu".parse::<Level>().unwrap().to_string(), "0.775 V");
        assert_eq!(Level::zoned(1.0, Field::Digital, 2).to_string(), "1 FS zone: 2");
        assert_eq!(Level::new(0.5, Field::Pressure).to_string(), "0.5 Pa");
    }

    #[test]
    fn test_display_reparses() {
        for text in ["0dBu", "0dB SPL", "-20dBFS", "94 dB SPL", "1nV", "3 kV"] {
            let level: Level = text.parse().unwrap();
            let reparsed: Level = level.to_string().parse().unwrap();
            assert_eq!(reparsed.field(), level.field());
            assert_relative_eq!(reparsed.value(), level.value(), max_relative = 1e-12);
        }
    }

    #[test]
    fn test_level_db() {
        let level = Level::new(1.0, Field::Pressure);
        assert_relative_eq!(level.db(1.0), 0.0);
        assert_relative_eq!(level.db(ReferenceUnit::Spl), 93.979, epsilon = 1e-3);
        assert_relative_eq!(
            Level::new(1.0, Field::Voltage).db_named("u").unwrap(),
            2.2139,
            epsilon = 1e-4
        );
        assert_relative_eq!(Level::new(0.1, Field::Voltage).db(DbReference::default()), -20.0);
    }

    #[test]
    fn test_level_db_zero() {
        let silent = Level::new(0.0, Field::Digital);
        assert_eq!(silent.db(1.0), f64::NEG_INFINITY);
        assert_eq!(silent.db(ReferenceUnit::FullScale), f64::NEG_INFINITY);
    }

    #[test]
    fn test_level_db_named_unknown() {
        let err = Level::new(1.0, Field::Voltage).db_named("dBm").unwrap_err();
        assert_eq!(err.error_code(), "UNKNOWN_REFERENCE");
    }

    #[test]
    fn test_equality_ignores_zone() {
        let a = Level::zoned(1.0, Field::Voltage, 0);
        let b = Level::zoned(1.0, Field::Voltage, 3);
        assert_eq!(a, b);
        assert_ne!(a, Level::new(1.0, Field::Digital));
    }

    #[test]
    fn test_level_needs_unit() {
        let err = "12".parse::<Level>().unwrap_err();
        assert_eq!(err.error_code(), "MISSING_UNIT");
    }

    #[test]
    fn test_parse_at() {
        let level = Level::parse_at("-20dBFS", 1).unwrap();
        assert_eq!(level.zone(), Some(1));
        assert_relative_eq!(level.value(), 0.1, epsilon = 1e-12);
        assert_eq!(level.without_zone().zone(), None);
    }

    #[test]
    fn test_level_serde() {
        let level = Level::zoned(0.775, Field::Voltage, 1);
        let json = serde_json::to_value(level).unwrap();
        assert_eq!(json["field"], "Voltage");
        let back: Level = serde_json::from_value(json).unwrap();
        assert_eq!(back.zone(), Some(1));
    }
}
