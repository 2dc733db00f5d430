//! Gain - a ratio between two domains
//!
//! A gain converts a level in its input field into a level in its output
//! field, and counts the elementary stages it was composed from so that
//! applying it moves a zoned level the right number of zones along the
//! chain.

use std::fmt;
use std::ops::{Div, Mul, Neg};
use std::str::FromStr;

use crate::error::{GainStageError, Result};
use crate::level::Level;
use crate::units::{amplitude_to_db, parse_measurement, Field};

/// Gain between an input and an output domain
///
/// The ratio is always finite and non-zero, and the stage count never
/// reaches `i32::MIN`, so every gain has an inverse.
///
/// # Example
/// ```
/// use gainstage::{Field, Gain, Level};
///
/// let mic: Gain = "40mV/Pa".parse().unwrap();
/// let out = mic.apply(&"94 dB SPL".parse::<Level>().unwrap()).unwrap();
/// assert_eq!(out.field(), Field::Voltage);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gain {
    ratio: f64,
    infield: Field,
    outfield: Field,
    stages: i32,
}

impl Gain {
    /// Create a single-stage gain
    pub fn new(ratio: f64, infield: Field, outfield: Field) -> Result<Self> {
        Self::checked(ratio, infield, outfield, 1)
    }

    /// Gain that turns `input` into `output`.
    ///
    /// Fails when `input` is zero, since no finite ratio reaches `output`.
    pub fn between(input: &Level, output: &Level) -> Result<Self> {
        Self::new(output.value() / input.value(), input.field(), output.field())
    }

    /// Gain between two levels given as text, e.g. `("+18dBu", "0dBFS")`
    pub fn between_str(input: &str, output: &str) -> Result<Self> {
        Self::between(&input.parse()?, &output.parse()?)
    }

    fn checked(ratio: f64, infield: Field, outfield: Field, stages: i32) -> Result<Self> {
        if !ratio.is_normal() {
            return Err(GainStageError::InvalidRatio { ratio });
        }
        Ok(Self {
            ratio,
            infield,
            outfield,
            stages,
        })
    }

    /// Output value divided by input value
    pub fn ratio(&self) -> f64 {
        self.ratio
    }

    pub fn infield(&self) -> Field {
        self.infield
    }

    pub fn outfield(&self) -> Field {
        self.outfield
    }

    /// Signed number of elementary stages in this gain
    pub fn stages(&self) -> i32 {
        self.stages
    }

    /// Gain in dB
    pub fn db(&self) -> f64 {
        amplitude_to_db(self.ratio)
    }

    /// Gain in dB with its domains, e.g. `"20 dB(V/Pa)"`
    pub fn db_label(&self) -> String {
        format!(
            "{} dB({}/{})",
            self.db(),
            self.outfield.si_unit(),
            self.infield.si_unit()
        )
    }

    /// Apply this gain to a level.
    ///
    /// A zoned level advances by the gain's stage count.
    pub fn apply(&self, level: &Level) -> Result<Level> {
        if level.field() != self.infield {
            return Err(GainStageError::DomainMismatch {
                expected: self.infield,
                found: level.field(),
                context: "gain application",
            });
        }
        let value = level.value() * self.ratio;
        Ok(match level.zone() {
            Some(zone) => Level::zoned(value, self.outfield, advance(zone, self.stages)?),
            None => Level::new(value, self.outfield),
        })
    }

    /// Undo this gain on a level (the level must be in the output field).
    pub fn remove(&self, level: &Level) -> Result<Level> {
        self.inverse().apply(level)
    }

    /// Chain `next` after this gain
    pub fn compose(&self, next: &Gain) -> Result<Gain> {
        if next.infield != self.outfield {
            return Err(GainStageError::DomainMismatch {
                expected: self.outfield,
                found: next.infield,
                context: "gain composition",
            });
        }
        Self::checked(
            self.ratio * next.ratio,
            self.infield,
            next.outfield,
            advance(self.stages, next.stages)?,
        )
    }

    /// Scale the ratio, keeping the stage count (scalar × gain)
    pub fn scaled(&self, factor: f64) -> Result<Gain> {
        Self::checked(self.ratio * factor, self.infield, self.outfield, self.stages)
    }

    /// Follow this gain with a plain factor, counted as one more stage
    /// (gain × scalar)
    pub fn then_scalar(&self, factor: f64) -> Result<Gain> {
        Self::checked(
            self.ratio * factor,
            self.infield,
            self.outfield,
            advance(self.stages, 1)?,
        )
    }

    /// Gain that undoes this one
    pub fn inverse(&self) -> Gain {
        Gain {
            ratio: 1.0 / self.ratio,
            infield: self.outfield,
            outfield: self.infield,
            stages: -self.stages,
        }
    }
}

impl FromStr for Gain {
    type Err = GainStageError;

    /// Parse a compact `OUT/IN` descriptor such as `"40mV/Pa"`,
    /// `"-18dB(FS/u)"` or `"+40 dB(V/V)"`.
    fn from_str(s: &str) -> Result<Self> {
        let (out_text, in_text) =
            s.rsplit_once('/')
                .ok_or_else(|| GainStageError::MalformedGain {
                    input: s.to_string(),
                })?;

        let output = parse_measurement(out_text)?;
        let outfield = output.field.ok_or_else(|| GainStageError::MissingUnit {
            input: s.to_string(),
        })?;

        let in_unit = in_text.trim().trim_matches(|c: char| c == '(' || c == ')');
        let input = parse_measurement(&format!("1{}", in_unit))?;
        let infield = input.field.ok_or_else(|| GainStageError::MissingUnit {
            input: s.to_string(),
        })?;

        Gain::new(output.value / input.value, infield, outfield)
    }
}

/// `from + stages`, kept above `i32::MIN` so the result always negates
fn advance(from: i32, stages: i32) -> Result<i32> {
    from.checked_add(stages)
        .filter(|&to| to != i32::MIN)
        .ok_or(GainStageError::StageOverflow { from, stages })
}

impl fmt::Display for Gain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}/{}",
            self.ratio,
            self.outfield.si_unit(),
            self.infield.si_unit()
        )
    }
}

// ============================================================================
// Operators
// ============================================================================

impl Mul<&Gain> for &Level {
    type Output = Result<Level>;

    fn mul(self, gain: &Gain) -> Result<Level> {
        gain.apply(self)
    }
}

impl Mul<&Level> for &Gain {
    type Output = Result<Level>;

    fn mul(self, level: &Level) -> Result<Level> {
        self.apply(level)
    }
}

impl Div<&Gain> for &Level {
    type Output = Result<Level>;

    fn div(self, gain: &Gain) -> Result<Level> {
        gain.remove(self)
    }
}

impl Mul<&Gain> for &Gain {
    type Output = Result<Gain>;

    fn mul(self, next: &Gain) -> Result<Gain> {
        self.compose(next)
    }
}

impl Mul<f64> for Gain {
    type Output = Result<Gain>;

    fn mul(self, factor: f64) -> Result<Gain> {
        self.then_scalar(factor)
    }
}

impl Mul<Gain> for f64 {
    type Output = Result<Gain>;

    fn mul(self, gain: Gain) -> Result<Gain> {
        gain.scaled(self)
    }
}

impl Neg for Gain {
    type Output = Gain;

    fn neg(self) -> Gain {
        self.inverse()
    }
}

impl Neg for &Gain {
    type Output = Gain;

    fn neg(self) -> Gain {
        self.inverse()
    }
}
