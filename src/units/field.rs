//! Physical domains, dB references and SI prefixes
//!
//! Lookup tables for everything the measurement grammar can name.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{GainStageError, Result};

// ============================================================================
// Field
// ============================================================================

/// Physical domain a level lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Field {
    /// Sound pressure, stored in pascals
    Pressure,
    /// Electrical signal, stored in volts
    Voltage,
    /// Digital signal, stored relative to a full-scale sine
    Digital,
}

impl Field {
    /// All fields, in signal-chain order
    pub const ALL: [Field; 3] = [Field::Pressure, Field::Voltage, Field::Digital];

    /// SI unit symbol used in canonical representations
    pub fn si_unit(self) -> &'static str {
        match self {
            Field::Pressure => "Pa",
            Field::Voltage => "V",
            Field::Digital => "FS",
        }
    }

    /// Long human-readable form, e.g. "Voltage (Volts)"
    pub fn description(self) -> &'static str {
        match self {
            Field::Pressure => "Pressure (Pascals)",
            Field::Voltage => "Voltage (Volts)",
            Field::Digital => "Digital (w.r.t. FSS)",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.si_unit())
    }
}

// ============================================================================
// Reference Units
// ============================================================================

/// Named reference a measurement can be expressed against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReferenceUnit {
    /// `SPL`: 20 µPa
    Spl,
    /// `Pa`
    Pascal,
    /// `V`
    Volt,
    /// `u`: 0.775 V, the dBu reference
    Dbu,
    /// `FS`: a full-scale sine
    FullScale,
}

impl ReferenceUnit {
    pub const ALL: [ReferenceUnit; 5] = [
        ReferenceUnit::Spl,
        ReferenceUnit::Pascal,
        ReferenceUnit::Volt,
        ReferenceUnit::Dbu,
        ReferenceUnit::FullScale,
    ];

    /// Token as written after a number
    pub fn token(self) -> &'static str {
        match self {
            ReferenceUnit::Spl => "SPL",
            ReferenceUnit::Pascal => "Pa",
            ReferenceUnit::Volt => "V",
            ReferenceUnit::Dbu => "u",
            ReferenceUnit::FullScale => "FS",
        }
    }

    /// Value of one reference unit in the SI unit of its field
    pub fn scale(self) -> f64 {
        match self {
            ReferenceUnit::Spl => 2e-5,
            ReferenceUnit::Pascal => 1.0,
            ReferenceUnit::Volt => 1.0,
            ReferenceUnit::Dbu => 0.775,
            ReferenceUnit::FullScale => 1.0,
        }
    }

    pub fn field(self) -> Field {
        match self {
            ReferenceUnit::Spl | ReferenceUnit::Pascal => Field::Pressure,
            ReferenceUnit::Volt | ReferenceUnit::Dbu => Field::Voltage,
            ReferenceUnit::FullScale => Field::Digital,
        }
    }

    /// Longest reference token that `text` ends with.
    ///
    /// Returns the reference and the text preceding the token.
    pub fn match_suffix(text: &str) -> Option<(ReferenceUnit, &str)> {
        Self::ALL
            .iter()
            .filter_map(|r| text.strip_suffix(r.token()).map(|rest| (*r, rest)))
            .max_by_key(|(r, _)| r.token().len())
    }
}

impl FromStr for ReferenceUnit {
    type Err = GainStageError;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|r| r.token() == name)
            .ok_or_else(|| GainStageError::UnknownReference {
                name: name.to_string(),
            })
    }
}

// ============================================================================
// SI Prefixes
// ============================================================================

/// SI magnitude prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SiPrefix {
    Giga,
    Mega,
    Kilo,
    Milli,
    Micro,
    Nano,
}

impl SiPrefix {
    pub const ALL: [SiPrefix; 6] = [
        SiPrefix::Giga,
        SiPrefix::Mega,
        SiPrefix::Kilo,
        SiPrefix::Milli,
        SiPrefix::Micro,
        SiPrefix::Nano,
    ];

    /// Accepted spellings; micro takes both the micro sign and Greek mu
    pub fn symbols(self) -> &'static [&'static str] {
        match self {
            SiPrefix::Giga => &["G"],
            SiPrefix::Mega => &["M"],
            SiPrefix::Kilo => &["k"],
            SiPrefix::Milli => &["m"],
            SiPrefix::Micro => &["\u{b5}", "\u{3bc}"],
            SiPrefix::Nano => &["n"],
        }
    }

    pub fn factor(self) -> f64 {
        match self {
            SiPrefix::Giga => 1e9,
            SiPrefix::Mega => 1e6,
            SiPrefix::Kilo => 1e3,
            SiPrefix::Milli => 1e-3,
            SiPrefix::Micro => 1e-6,
            SiPrefix::Nano => 1e-9,
        }
    }

    /// Longest prefix symbol that `text` ends with.
    pub fn match_suffix(text: &str) -> Option<(SiPrefix, &str)> {
        Self::ALL
            .iter()
            .flat_map(|p| p.symbols().iter().map(move |s| (*p, *s)))
            .filter_map(|(p, sym)| text.strip_suffix(sym).map(|rest| (p, rest, sym.len())))
            .max_by_key(|(_, _, len)| *len)
            .map(|(p, rest, _)| (p, rest))
    }
}
