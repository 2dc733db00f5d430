//! Operand - the level/gain/scalar algebra as one sum type
//!
//! Useful where the kind of each value is only known at runtime, e.g.
//! when evaluating user-supplied expressions. Typed code can call the
//! methods on `Level` and `Gain` directly.

use std::fmt;

use crate::error::{GainStageError, Result};
use crate::gain::Gain;
use crate::level::Level;

/// Any value that takes part in gain-staging arithmetic
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Operand {
    Level(Level),
    Gain(Gain),
    Scalar(f64),
}

impl Operand {
    /// Short name of the operand kind, used in error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Operand::Level(_) => "level",
            Operand::Gain(_) => "gain",
            Operand::Scalar(_) => "scalar",
        }
    }

    /// Product of two operands
    ///
    /// | lhs    | rhs    | result                                  |
    /// |--------|--------|-----------------------------------------|
    /// | level  | gain   | level (gain applied)                    |
    /// | gain   | level  | level (gain applied)                    |
    /// | gain   | gain   | gain (composed)                         |
    /// | scalar | gain   | gain (ratio scaled, same stage count)   |
    /// | gain   | scalar | gain (ratio scaled, one more stage)     |
    /// | scalar | scalar | scalar                                  |
    pub fn checked_mul(self, rhs: Operand) -> Result<Operand> {
        match (self, rhs) {
            (Operand::Level(level), Operand::Gain(gain))
            | (Operand::Gain(gain), Operand::Level(level)) => gain.apply(&level).map(Operand::Level),
            (Operand::Gain(first), Operand::Gain(next)) => first.compose(&next).map(Operand::Gain),
            (Operand::Scalar(factor), Operand::Gain(gain)) => {
                gain.scaled(factor).map(Operand::Gain)
            }
            (Operand::Gain(gain), Operand::Scalar(factor)) => {
                gain.then_scalar(factor).map(Operand::Gain)
            }
            (Operand::Scalar(a), Operand::Scalar(b)) => Ok(Operand::Scalar(a * b)),
            (lhs, rhs) => Err(unsupported("multiplication", lhs, rhs)),
        }
    }

    /// Quotient of two operands
    ///
    /// Dividing a level by a gain removes that gain from it. A gain has
    /// no quotient by a scalar; scale it by the reciprocal instead.
    pub fn checked_div(self, rhs: Operand) -> Result<Operand> {
        match (self, rhs) {
            (Operand::Level(level), Operand::Gain(gain)) => gain.remove(&level).map(Operand::Level),
            (Operand::Scalar(a), Operand::Scalar(b)) => Ok(Operand::Scalar(a / b)),
            (lhs, rhs) => Err(unsupported("division", lhs, rhs)),
        }
    }

    /// Negation: a gain becomes its inverse
    pub fn checked_neg(self) -> Result<Operand> {
        match self {
            Operand::Gain(gain) => Ok(Operand::Gain(gain.inverse())),
            Operand::Scalar(value) => Ok(Operand::Scalar(-value)),
            Operand::Level(_) => Err(GainStageError::UnsupportedOperand {
                operation: "negation",
                lhs: self.kind(),
                rhs: "nothing",
            }),
        }
    }

    pub fn as_level(&self) -> Option<&Level> {
        match self {
            Operand::Level(level) => Some(level),
            _ => None,
        }
    }

    pub fn as_gain(&self) -> Option<&Gain> {
        match self {
            Operand::Gain(gain) => Some(gain),
            _ => None,
        }
    }

    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Operand::Scalar(value) => Some(*value),
            _ => None,
        }
    }
}

fn unsupported(operation: &'static str, lhs: Operand, rhs: Operand) -> GainStageError {
    GainStageError::UnsupportedOperand {
        operation,
        lhs: lhs.kind(),
        rhs: rhs.kind(),
    }
}

impl From<Level> for Operand {
    fn from(level: Level) -> Self {
        Operand::Level(level)
    }
}

impl From<Gain> for Operand {
    fn from(gain: Gain) -> Self {
        Operand::Gain(gain)
    }
}

impl From<f64> for Operand {
    fn from(value: f64) -> Self {
        Operand::Scalar(value)
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Level(level) => fmt::Display::fmt(level, f),
            Operand::Gain(gain) => fmt::Display::fmt(gain, f),
            Operand::Scalar(value) => fmt::Display::fmt(value, f),
        }
    }
}
