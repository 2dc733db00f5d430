//! Zone propagation
//!
//! A chain is a sequence of gains; `gains[i]` connects zone `i` to zone
//! `i + 1`, so a chain of `n` gains has zones `0..=n`. These functions move
//! zoned levels between zones and aggregate them.

use std::collections::BTreeMap;

use crate::error::{GainStageError, Result};
use crate::gain::Gain;
use crate::level::Level;
use crate::units::{amplitude_to_power, power_to_amplitude};

/// Levels competing for "what clips first"
#[derive(Debug, Clone, PartialEq)]
pub enum ClipCandidates {
    Sequence(Vec<Level>),
    Labeled(BTreeMap<String, Level>),
}

impl From<Vec<Level>> for ClipCandidates {
    fn from(levels: Vec<Level>) -> Self {
        ClipCandidates::Sequence(levels)
    }
}

impl From<BTreeMap<String, Level>> for ClipCandidates {
    fn from(levels: BTreeMap<String, Level>) -> Self {
        ClipCandidates::Labeled(levels)
    }
}

/// The candidate with the least headroom, as it was given
#[derive(Debug, Clone, PartialEq)]
pub enum ClipPoint {
    Level(Level),
    Labeled { label: String, level: Level },
}

impl ClipPoint {
    pub fn level(&self) -> &Level {
        match self {
            ClipPoint::Level(level) => level,
            ClipPoint::Labeled { level, .. } => level,
        }
    }

    pub fn label(&self) -> Option<&str> {
        match self {
            ClipPoint::Level(_) => None,
            ClipPoint::Labeled { label, .. } => Some(label),
        }
    }
}

/// Move a zoned level to `target` through `gains`.
///
/// Moving forward applies `gains[zone..target]` in order; moving back
/// removes `gains[target..zone]` in reverse order.
pub fn level_at_zone(gains: &[Gain], level: &Level, target: i32) -> Result<Level> {
    let zone = level.zone().ok_or_else(|| GainStageError::UnzonedLevel {
        level: level.to_string(),
    })?;
    let from = zone_index(gains, zone)?;
    let to = zone_index(gains, target)?;

    let mut current = *level;
    if from < to {
        for gain in &gains[from..to] {
            current = gain.apply(&current)?;
            log::trace!("forward through {}: {}", gain, current);
        }
    } else if from > to {
        for gain in gains[to..from].iter().rev() {
            current = gain.remove(&current)?;
            log::trace!("back through {}: {}", gain, current);
        }
    }
    Ok(current)
}

/// Incoherent sum of `levels` after moving each one to `target`.
///
/// All levels must land in the same field.
pub fn powersum(gains: &[Gain], levels: &[Level], target: i32) -> Result<Level> {
    let mut field = None;
    let mut power = 0.0;
    for level in levels {
        let moved = level_at_zone(gains, level, target)?;
        match field {
            None => field = Some(moved.field()),
            Some(expected) if expected != moved.field() => {
                return Err(GainStageError::DomainMismatch {
                    expected,
                    found: moved.field(),
                    context: "power sum",
                });
            }
            Some(_) => {}
        }
        power += amplitude_to_power(moved.value());
    }
    let field = field.ok_or(GainStageError::EmptyLevels)?;
    Ok(Level::zoned(power_to_amplitude(power), field, target))
}

/// Find the candidate that clips first.
///
/// Every candidate is moved back to zone 0; the smallest one there has
/// the least headroom and is returned unchanged.
pub fn find_clip(gains: &[Gain], candidates: &ClipCandidates) -> Result<ClipPoint> {
    match candidates {
        ClipCandidates::Sequence(levels) => find_clip_level(gains, levels).map(ClipPoint::Level),
        ClipCandidates::Labeled(levels) => {
            let (label, level) = find_clip_labeled(gains, levels)?;
            Ok(ClipPoint::Labeled { label, level })
        }
    }
}

/// `find_clip` over a plain sequence of levels
pub fn find_clip_level(gains: &[Gain], levels: &[Level]) -> Result<Level> {
    let (_, level) = lowest_at_input(gains, levels.iter().enumerate())?;
    Ok(*level)
}

/// `find_clip` over labelled levels, returning the winning label too
pub fn find_clip_labeled(
    gains: &[Gain],
    levels: &BTreeMap<String, Level>,
) -> Result<(String, Level)> {
    let (label, level) = lowest_at_input(gains, levels.iter())?;
    Ok((label.clone(), *level))
}

fn lowest_at_input<'a, K>(
    gains: &[Gain],
    entries: impl IntoIterator<Item = (K, &'a Level)>,
) -> Result<(K, &'a Level)> {
    let mut lowest: Option<(f64, K, &'a Level)> = None;
    for (key, level) in entries {
        let at_input = level_at_zone(gains, level, 0)?.value();
        if lowest.as_ref().map_or(true, |(value, _, _)| at_input < *value) {
            lowest = Some((at_input, key, level));
        }
    }
    lowest
        .map(|(_, key, level)| (key, level))
        .ok_or(GainStageError::EmptyLevels)
}

fn zone_index(gains: &[Gain], zone: i32) -> Result<usize> {
    match usize::try_from(zone) {
        Ok(index) if index <= gains.len() => Ok(index),
        _ => Err(GainStageError::ZoneOutOfRange {
            zone,
            zones: gains.len() + 1,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::Field;
    use approx::assert_relative_eq;

    fn chain() -> Vec<Gain> {
        vec![
            "40mV/Pa".parse().unwrap(),
            "+30dB(V/V)".parse().unwrap(),
            Gain::between_str("+18dBu", "0dBFS").unwrap(),
        ]
    }

    #[test]
    fn test_level_at_same_zone() {
        let level = Level::zoned(1.0, Field::Pressure, 0);
        let out = level_at_zone(&chain(), &level, 0).unwrap();
        assert_eq!(out, level);
        assert_eq!(out.zone(), Some(0));
    }

    #[test]
    fn test_level_forward() {
        let level = Level::parse_at("94 dB SPL", 0).unwrap();
        let out = level_at_zone(&chain(), &level, 2).unwrap();
        assert_eq!(out.field(), Field::Voltage);
        assert_eq!(out.zone(), Some(2));
        assert_relative_eq!(out.db(1.0), 94.0 - 93.9794 - 27.9588 + 30.0, epsilon = 1e-3);
    }

    #[test]
    fn test_level_backward() {
        let level = Level::parse_at("0dBFS", 3).unwrap();
        let out = level_at_zone(&chain(), &level, 1).unwrap();
        assert_eq!(out.field(), Field::Voltage);
        assert_eq!(out.zone(), Some(1));
        assert_relative_eq!(out.db_named("u").unwrap(), 18.0 - 30.0, epsilon = 1e-9);
    }

    #[test]
    fn test_direction_symmetry() {
        let gains = chain();
        let start = Level::parse_at("-40dBV", 1).unwrap();
        for target in 0..=3 {
            let there = level_at_zone(&gains, &start, target).unwrap();
            let back = level_at_zone(&gains, &there, 1).unwrap();
            assert_eq!(back.field(), start.field());
            assert_relative_eq!(back.value(), start.value(), max_relative = 1e-12);
        }
    }

    #[test]
    fn test_level_at_zone_errors() {
        let gains = chain();
        let unzoned = Level::new(1.0, Field::Pressure);
        assert_eq!(
            level_at_zone(&gains, &unzoned, 1).unwrap_err().error_code(),
            "UNZONED_LEVEL"
        );

        let level = Level::zoned(1.0, Field::Pressure, 0);
        assert_eq!(
            level_at_zone(&gains, &level, 4).unwrap_err().error_code(),
            "ZONE_OUT_OF_RANGE"
        );
        assert_eq!(
            level_at_zone(&gains, &level, -1).unwrap_err().error_code(),
            "ZONE_OUT_OF_RANGE"
        );

        let wrong_field = Level::zoned(1.0, Field::Voltage, 0);
        assert_eq!(
            level_at_zone(&gains, &wrong_field, 1).unwrap_err().error_code(),
            "DOMAIN_MISMATCH"
        );
    }

    #[test]
    fn test_powersum() {
        let gains: Vec<Gain> = vec!["1 FS/V".parse().unwrap()];
        let levels = [
            Level::parse_at("-20dBV", 0).unwrap(),
            Level::parse_at("-20dBFS", 1).unwrap(),
        ];
        let sum = powersum(&gains, &levels, 1).unwrap();
        assert_eq!(sum.field(), Field::Digital);
        assert_eq!(sum.zone(), Some(1));
        assert_relative_eq!(sum.value(), 0.141421, epsilon = 1e-6);
    }

    #[test]
    fn test_powersum_equal_sources_add_3db() {
        let gains = chain();
        let source = Level::parse_at("-90dBu", 2).unwrap();
        let sum = powersum(&gains, &[source, source], 2).unwrap();
        assert_relative_eq!(sum.db(1.0) - source.db(1.0), 3.0103, epsilon = 1e-4);
    }

    #[test]
    fn test_powersum_errors() {
        assert_eq!(
            powersum(&chain(), &[], 0).unwrap_err().error_code(),
            "EMPTY_LEVELS"
        );

        // Without gains nothing moves, so two fields stay two fields
        let levels = [
            Level::zoned(1.0, Field::Voltage, 0),
            Level::zoned(1.0, Field::Digital, 0),
        ];
        assert_eq!(
            powersum(&[], &levels, 0).unwrap_err().error_code(),
            "DOMAIN_MISMATCH"
        );
    }

    #[test]
    fn test_find_clip_sequence() {
        let gains = vec![Gain::between_str("+18dBu", "0dBFS").unwrap()];
        let candidates = ClipCandidates::from(vec![
            Level::parse_at("0dBu", 0).unwrap(),
            Level::parse_at("0dBFS", 1).unwrap(),
        ]);
        let clip = find_clip(&gains, &candidates).unwrap();
        assert_eq!(clip.label(), None);
        assert_eq!(clip.level().to_string(), "0.775 V zone: 0");
    }

    #[test]
    fn test_find_clip_labeled() {
        let gains = vec![Gain::between_str("+18dBu", "0dBFS").unwrap()];
        let mut levels = BTreeMap::new();
        levels.insert("preamp".to_string(), Level::parse_at("+24dBu", 0).unwrap());
        levels.insert("adc".to_string(), Level::parse_at("0dBFS", 1).unwrap());

        let clip = find_clip(&gains, &levels.into()).unwrap();
        assert_eq!(clip.label(), Some("adc"));
        assert_eq!(clip.level().zone(), Some(1));
        assert_eq!(clip.level().field(), Field::Digital);
    }

    #[test]
    fn test_find_clip_empty() {
        let err = find_clip_level(&chain(), &[]).unwrap_err();
        assert_eq!(err.error_code(), "EMPTY_LEVELS");
    }
}
