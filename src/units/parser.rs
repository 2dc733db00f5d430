//! Measurement parser
//!
//! Reads free-form measurement text into a value in the SI unit of its
//! field. The grammar, informally:
//!
//! ```text
//! measurement := number [ws] [unit-expr]
//! unit-expr   := "dB" [ws] ["(" ref-unit ")" | ref-unit]
//!              | [si-prefix] ref-unit
//! ref-unit    := "SPL" | "Pa" | "V" | "u" | "FS"
//! si-prefix   := "G" | "M" | "k" | "m" | "µ" | "n"
//! ```
//!
//! Resolution runs in a fixed order: numeric literal, `dB` token,
//! reference suffix, SI prefix suffix. A prefix is also accepted inside a
//! dB reference, so `60dB(mV)` reads as one volt.

use super::decibel::db_to_amplitude;
use super::field::{Field, ReferenceUnit, SiPrefix};
use crate::error::{GainStageError, Result};

/// Result of parsing one measurement string
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    /// Linear value in the SI unit of `field` (or unitless if no field)
    pub value: f64,
    /// Domain named by the unit text, if any
    pub field: Option<Field>,
}

/// Parse a measurement such as `"-10 dBV"`, `"40 mV"` or `"94 dB SPL"`.
pub fn parse_measurement(input: &str) -> Result<Measurement> {
    let text = input.trim_start();
    let end = scan_number(text).ok_or_else(|| GainStageError::NoNumericValue {
        input: input.to_string(),
    })?;
    let mut value: f64 = text[..end]
        .parse()
        .map_err(|_| GainStageError::NoNumericValue {
            input: input.to_string(),
        })?;
    let mut descriptor = text[end..].trim();
    let mut field = None;

    if let Some(rest) = descriptor.strip_prefix("dB") {
        value = db_to_amplitude(value);
        // `dB(1V)` names its reference explicitly; the 1 carries no information
        descriptor = rest.trim_matches(|c: char| c.is_whitespace() || matches!(c, '1' | '(' | ')'));
    }

    if let Some((reference, rest)) = ReferenceUnit::match_suffix(descriptor) {
        value *= reference.scale();
        field = Some(reference.field());
        descriptor = rest.trim();
    }

    if let Some((prefix, rest)) = SiPrefix::match_suffix(descriptor) {
        value *= prefix.factor();
        descriptor = rest.trim();
    }

    if !descriptor.is_empty() {
        return Err(GainStageError::UnresolvedUnit {
            input: input.to_string(),
            remainder: descriptor.to_string(),
        });
    }

    log::debug!("parsed '{}' as {} {:?}", input, value, field);
    Ok(Measurement { value, field })
}

/// Length of the longest floating-point literal at the start of `text`.
///
/// Accepts an optional sign, digits with an optional fraction, and an
/// exponent only when digits follow it (so `1e` stops before the `e`).
fn scan_number(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    let digits_from = |mut i: usize| {
        while bytes.get(i).is_some_and(u8::is_ascii_digit) {
            i += 1;
        }
        i
    };

    let mut i = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        i += 1;
    }
    let int_end = digits_from(i);
    let mut digits = int_end - i;
    i = int_end;

    if bytes.get(i) == Some(&b'.') {
        let frac_end = digits_from(i + 1);
        digits += frac_end - (i + 1);
        if digits > 0 {
            i = frac_end;
        }
    }
    if digits == 0 {
        return None;
    }

    if matches!(bytes.get(i), Some(b'e' | b'E')) {
        let mut j = i + 1;
        if matches!(bytes.get(j), Some(b'+' | b'-')) {
            j += 1;
        }
        let exp_end = digits_from(j);
        if exp_end > j {
            i = exp_end;
        }
    }

    Some(i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use test_case::test_case;

    #[test_case("1Pa", 1.0, Field::Pressure ; "bare pascal")]
    #[test_case("1 Pa", 1.0, Field::Pressure ; "spaced pascal")]
    #[test_case("0dB Pa", 1.0, Field::Pressure ; "db pascal")]
    #[test_case("0 dB(Pa)", 1.0, Field::Pressure ; "db pascal in parens")]
    #[test_case("94 dB SPL", 1.0023, Field::Pressure ; "db spl")]
    #[test_case("1V", 1.0, Field::Voltage ; "volt")]
    #[test_case("1000 mV", 1.0, Field::Voltage ; "millivolt")]
    #[test_case("1µV", 1e-6, Field::Voltage ; "microvolt")]
    #[test_case("1nV", 1e-9, Field::Voltage ; "nanovolt")]
    #[test_case("1kV", 1e3, Field::Voltage ; "kilovolt")]
    #[test_case("1MV", 1e6, Field::Voltage ; "megavolt")]
    #[test_case("1GV", 1e9, Field::Voltage ; "gigavolt")]
    #[test_case("0dBV", 1.0, Field::Voltage ; "dbv")]
    #[test_case("0dB(1V)", 1.0, Field::Voltage ; "explicit one volt reference")]
    #[test_case("60dB(mV)", 1.0, Field::Voltage ; "db millivolt")]
    #[test_case("120dB(µV)", 1.0, Field::Voltage ; "db microvolt")]
    #[test_case("180dB(nV)", 1.0, Field::Voltage ; "db nanovolt")]
    #[test_case("-60dB(kV)", 1.0, Field::Voltage ; "db kilovolt")]
    #[test_case("-120dB(MV)", 1.0, Field::Voltage ; "db megavolt")]
    #[test_case("-180dB(GV)", 1.0, Field::Voltage ; "db gigavolt")]
    #[test_case("0 dBu", 0.775, Field::Voltage ; "dbu")]
    #[test_case("+4dBu", 1.2283, Field::Voltage ; "plus four dbu")]
    #[test_case("1 FS", 1.0, Field::Digital ; "full scale")]
    #[test_case("0dBFS", 1.0, Field::Digital ; "dbfs")]
    #[test_case("0 dB (FS)", 1.0, Field::Digital ; "dbfs spaced parens")]
    #[test_case("2e-5 Pa", 2e-5, Field::Pressure ; "exponent")]
    fn test_parse_measurement(input: &str, value: f64, field: Field) {
        let m = parse_measurement(input).unwrap();
        assert_relative_eq!(m.value, value, max_relative = 1e-4);
        assert_eq!(m.field, Some(field));
    }

    #[test]
    fn test_unitless_number() {
        let m = parse_measurement("2.5").unwrap();
        assert_relative_eq!(m.value, 2.5);
        assert_eq!(m.field, None);

        let m = parse_measurement("+6 dB").unwrap();
        assert_relative_eq!(m.value, 1.995262, epsilon = 1e-6);
        assert_eq!(m.field, None);
    }

    #[test]
    fn test_no_number() {
        let err = parse_measurement("dBu").unwrap_err();
        assert_eq!(err.error_code(), "NO_NUMERIC_VALUE");
        assert!(parse_measurement("").is_err());
        assert!(parse_measurement("-.V").is_err());
    }

    #[test]
    fn test_unresolved_unit() {
        let err = parse_measurement("3 furlongs").unwrap_err();
        match err {
            GainStageError::UnresolvedUnit { remainder, .. } => assert_eq!(remainder, "furlongs"),
            other => panic!("unexpected error: {other}"),
        }
        // `e` without exponent digits is unit text, not part of the number
        assert!(parse_measurement("1eV").is_err());
    }

    #[test]
    fn test_scan_number() {
        assert_eq!(scan_number("-18dB"), Some(3));
        assert_eq!(scan_number("1.5e3V"), Some(5));
        assert_eq!(scan_number("1.V"), Some(2));
        assert_eq!(scan_number(".5"), Some(2));
        assert_eq!(scan_number("1e"), Some(1));
        assert_eq!(scan_number("+"), None);
        assert_eq!(scan_number("."), None);
    }
}
