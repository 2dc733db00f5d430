//! Units, references and the measurement grammar
//!
//! Leaf module: turns text into (value, field) pairs and provides the
//! decibel helpers the rest of the crate builds on.

pub mod decibel;
mod field;
mod parser;

pub use decibel::{
    amplitude_to_db, amplitude_to_power, db_to_amplitude, db_to_power, power_to_amplitude,
    power_to_db,
};
pub use field::{Field, ReferenceUnit, SiPrefix};
pub use parser::{parse_measurement, Measurement};
