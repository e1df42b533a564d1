//! DHT22 air temperature / humidity plausibility checks.
//!
//! The driver reports a failed transaction (timeout, checksum mismatch) as
//! NaN.  A corrupted frame that happens to pass the checksum can still decode
//! to nonsense, so values outside the sensor's rated range are faults too.

use crate::error::SensorFault;

use super::Measurement;

/// DHT22 rated temperature range (°C).
const TEMP_RANGE_C: (f32, f32) = (-40.0, 80.0);
/// DHT22 rated humidity range (%RH).
const HUMIDITY_RANGE_PCT: (f32, f32) = (0.0, 100.0);

pub fn temperature(celsius: f32) -> Measurement {
    checked(celsius, TEMP_RANGE_C)
}

pub fn humidity(percent: f32) -> Measurement {
    checked(percent, HUMIDITY_RANGE_PCT)
}

fn checked(value: f32, (lo, hi): (f32, f32)) -> Measurement {
    if value.is_nan() {
        return Err(SensorFault::NotANumber);
    }
    if !(lo..=hi).contains(&value) {
        return Err(SensorFault::OutOfRange);
    }
    Ok(value)
}
