//! Decibel conversions
//!
//! Amplitude quantities (pressure, voltage, full scale) use 20·log10,
//! power quantities use 10·log10.

/// Convert decibels to linear amplitude
#[inline]
pub fn db_to_amplitude(db: f64) -> f64 {
    10.0_f64.powf(db / 20.0)
}

/// Convert linear amplitude to decibels
#[inline]
pub fn amplitude_to_db(amplitude: f64) -> f64 {
    20.0 * amplitude.log10()
}

/// Convert decibels to linear power
#[inline]
pub fn db_to_power(db: f64) -> f64 {
    10.0_f64.powf(db / 10.0)
}

/// Convert linear power to decibels
#[inline]
pub fn power_to_db(power: f64) -> f64 {
    10.0 * power.log10()
}

#[inline]
pub fn amplitude_to_power(amplitude: f64) -> f64 {
    amplitude * amplitude
}

#[inline]
pub fn power_to_amplitude(power: f64) -> f64 {
    power.sqrt()
}
