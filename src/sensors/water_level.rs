//! Reservoir water level from an HC-SR04 ultrasonic ranger.
//!
//! The ranger is mounted at the top of the tank looking down, so the water
//! column is the tank height minus the measured distance to the surface.
//! A distance larger than the tank (ranger saw the floor or a ripple
//! scattered the echo) reads as empty.

use crate::error::SensorFault;

use super::Measurement;

/// Convert a measured distance into fill height.
///
/// Negative or non-finite distances are what the ranger reports when no
/// echo arrives; they are faults, not a full tank.
pub fn fill_height_cm(distance_cm: f32, tank_height_cm: f32) -> Measurement {
    if !distance_cm.is_finite() || distance_cm < 0.0 {
        return Err(SensorFault::NoEcho);
    }
    Ok((tank_height_cm - distance_cm).max(0.0))
}
