//! Gainstage - Audio Gain-Structure Calculator
//!
//! Models audio levels and the gains that connect them across a signal
//! chain (e.g. microphone → preamp → ADC), so clipping margins and noise
//! floors can be worked out at any point of the chain from measurements
//! taken at different points, in mixed units (Pa, V, dBu, dBFS, dB SPL).
//!
//! # Architecture
//!
//! Data flows one way:
//! - `units`: measurement text → (value, field)
//! - `level` / `gain`: immutable value objects with a domain-checked algebra
//! - `zone`: stateless propagation and aggregation over a sequence of gains
//! - `structure`: the accumulator that records noise and clip contributions

pub mod cli;
pub mod config;
pub mod error;
pub mod gain;
pub mod level;
pub mod operand;
pub mod structure;
pub mod units;
pub mod zone;

pub use config::ChainConfig;
pub use error::{GainStageError, Result};
pub use gain::Gain;
pub use level::{DbReference, Level};
pub use operand::Operand;
pub use structure::GainStructure;
pub use units::{Field, ReferenceUnit};
pub use zone::{find_clip, level_at_zone, powersum, ClipCandidates, ClipPoint};
