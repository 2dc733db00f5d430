//! Error handling for gainstage
//!
//! Every failure is an input or programming error surfaced straight to the
//! caller. Nothing here is retried: parsing and the level/gain algebra are
//! deterministic.

use thiserror::Error;

use crate::units::Field;

/// Result type alias for gainstage operations
pub type Result<T> = std::result::Result<T, GainStageError>;

/// Main error type for gainstage operations
#[derive(Error, Debug)]
pub enum GainStageError {
    // Parse Errors
    #[error("Could not parse '{input}' into a level: no numeric value")]
    NoNumericValue { input: String },

    #[error("Could not parse the units '{remainder}' in '{input}'")]
    UnresolvedUnit { input: String, remainder: String },

    #[error("'{input}' does not name a domain (expected Pa, SPL, V, u or FS)")]
    MissingUnit { input: String },

    #[error("Malformed gain '{input}': expected OUT/IN, e.g. '40mV/Pa'")]
    MalformedGain { input: String },

    #[error("Unknown dB reference: {name}")]
    UnknownReference { name: String },

    // Algebra Errors
    #[error("Domain mismatch in {context}: expected {expected}, found {found}")]
    DomainMismatch {
        expected: Field,
        found: Field,
        context: &'static str,
    },

    #[error("Unsupported operands for {operation}: {lhs} and {rhs}")]
    UnsupportedOperand {
        operation: &'static str,
        lhs: &'static str,
        rhs: &'static str,
    },

    #[error("Gain ratio {ratio} is not a finite, non-zero number")]
    InvalidRatio { ratio: f64 },

    #[error("Cannot move {from} by {stages} stages without overflowing")]
    StageOverflow { from: i32, stages: i32 },

    // Propagation Errors
    #[error("Level {level} is not attached to a zone")]
    UnzonedLevel { level: String },

    #[error("Zone {zone} is outside the chain (zones 0..={})", .zones.saturating_sub(1))]
    ZoneOutOfRange { zone: i32, zones: usize },

    #[error("No levels to combine")]
    EmptyLevels,

    #[error("Label '{label}' is used by more than one clip")]
    DuplicateLabel { label: String },

    // I/O Errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization Errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl GainStageError {
    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            GainStageError::NoNumericValue { .. } => "NO_NUMERIC_VALUE",
            GainStageError::UnresolvedUnit { .. } => "UNRESOLVED_UNIT",
            GainStageError::MissingUnit { .. } => "MISSING_UNIT",
            GainStageError::MalformedGain { .. } => "MALFORMED_GAIN",
            GainStageError::UnknownReference { .. } => "UNKNOWN_REFERENCE",
            GainStageError::DomainMismatch { .. } => "DOMAIN_MISMATCH",
            GainStageError::UnsupportedOperand { .. } => "UNSUPPORTED_OPERAND",
            GainStageError::InvalidRatio { .. } => "INVALID_RATIO",
            GainStageError::StageOverflow { .. } => "STAGE_OVERFLOW",
            GainStageError::UnzonedLevel { .. } => "UNZONED_LEVEL",
            GainStageError::ZoneOutOfRange { .. } => "ZONE_OUT_OF_RANGE",
            GainStageError::EmptyLevels => "EMPTY_LEVELS",
            GainStageError::DuplicateLabel { .. } => "DUPLICATE_LABEL",
            GainStageError::Io(_) => "IO_ERROR",
            GainStageError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Returns true if the error came from reading measurement text.
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            GainStageError::NoNumericValue { .. }
                | GainStageError::UnresolvedUnit { .. }
                | GainStageError::MissingUnit { .. }
                | GainStageError::MalformedGain { .. }
                | GainStageError::UnknownReference { .. }
        )
    }

    /// Returns a user-friendly recovery suggestion.
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            GainStageError::NoNumericValue { .. } => {
                Some("Start the measurement with a number, e.g. '-10 dBV' or '40 mV'.")
            }
            GainStageError::UnresolvedUnit { .. } | GainStageError::MissingUnit { .. } => {
                Some("Use one of Pa, dB SPL, V, dBu or FS, optionally with a G/M/k/m/µ/n prefix.")
            }
            GainStageError::MalformedGain { .. } => {
                Some("Write gains as OUT/IN, e.g. '40mV/Pa' or '-18dB(FS/u)'.")
            }
            GainStageError::DomainMismatch { .. } => {
                Some("Check that each gain's input domain matches the level or gain before it.")
            }
            GainStageError::InvalidRatio { .. } => {
                Some("Measure the gain between two non-zero levels.")
            }
            GainStageError::DuplicateLabel { .. } => {
                Some("Give every clip point its own label, or leave it unlabelled.")
            }
            GainStageError::ZoneOutOfRange { .. } => {
                Some("Add the missing gain stages before referring to later zones.")
            }
            _ => None,
        }
    }
}
