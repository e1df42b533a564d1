//! Threshold-based actuation policy.
//!
//! Maps the active [`ThresholdSet`] and one [`SensorReading`] to an
//! [`ActuatorCommand`].  Commands are recomputed from scratch every cycle:
//!
//! | Actuator        | ON when                                            |
//! |-----------------|----------------------------------------------------|
//! | fan             | `temp > temp_max`                                  |
//! | irrigation pump | `soil < soil_moisture_min && water >= water_level_min` |
//! | refill pump     | `water < water_level_min`                          |
//!
//! A faulty reading switches off every actuator that depends on it.
//!
//! Readings that hover on a threshold make the pure policy toggle the relay
//! every cycle.  [`evaluate_with_hysteresis`] keeps an actuator that is
//! already ON running until its condition clears by a configurable band;
//! with a zero band it is identical to [`evaluate`].

use core::fmt;

use crate::sensors::SensorReading;
use crate::sync::ThresholdSet;

/// Binary actuator state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Switch {
    On,
    #[default]
    Off,
}

impl Switch {
    pub fn from_bool(on: bool) -> Self {
        if on { Self::On } else { Self::Off }
    }

    pub fn is_on(self) -> bool {
        self == Self::On
    }
}

impl fmt::Display for Switch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::On => write!(f, "ON"),
            Self::Off => write!(f, "OFF"),
        }
    }
}

/// The commanded state of every actuator for one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ActuatorCommand {
    pub fan: Switch,
    pub irrigation_pump: Switch,
    pub refill_pump: Switch,
}

impl ActuatorCommand {
    /// All actuators off — safe default.
    pub fn all_off() -> Self {
        Self::default()
    }
}

/// Derive actuator commands from thresholds and one reading.
pub fn evaluate(thresholds: &ThresholdSet, reading: &SensorReading) -> ActuatorCommand {
    ActuatorCommand {
        fan: fan(thresholds, reading),
        irrigation_pump: irrigation_pump(thresholds, reading),
        refill_pump: refill_pump(thresholds, reading),
    }
}

/// [`evaluate`] with a hold band for actuators that are already running.
///
/// An actuator that was ON in `previous` stays ON while its reading is within
/// `band` of the switch-off point.  Hard limits are never relaxed: the fan
/// always stops below `temp_min` and the irrigation pump below
/// `water_level_min`.
pub fn evaluate_with_hysteresis(
    thresholds: &ThresholdSet,
    reading: &SensorReading,
    previous: &ActuatorCommand,
    band: f32,
) -> ActuatorCommand {
    let fresh = evaluate(thresholds, reading);
    if band <= 0.0 {
        return fresh;
    }

    let temp = reading.temperature_c.ok();
    let soil = reading.soil_moisture_pct.ok();
    let water = reading.water_level_cm.ok();

    let fan_hold = temp.is_some_and(|c| c >= thresholds.temp_min && c > upper_temp(thresholds) - band);
    let irrigation_hold = match (soil, water) {
        (Some(s), Some(w)) => s < thresholds.soil_moisture_min + band && w >= thresholds.water_level_min,
        _ => false,
    };
    let refill_hold = water.is_some_and(|w| w < thresholds.water_level_min + band);

    ActuatorCommand {
        fan: hold(previous.fan, fresh.fan, fan_hold),
        irrigation_pump: hold(previous.irrigation_pump, fresh.irrigation_pump, irrigation_hold),
        refill_pump: hold(previous.refill_pump, fresh.refill_pump, refill_hold),
    }
}

// ── Per-actuator rules ────────────────────────────────────────

fn fan(t: &ThresholdSet, reading: &SensorReading) -> Switch {
    match reading.temperature_c {
        Ok(c) if c < t.temp_min => Switch::Off,
        Ok(c) if c > upper_temp(t) => Switch::On,
        // In band, or sensor fault.
        _ => Switch::Off,
    }
}

fn irrigation_pump(t: &ThresholdSet, reading: &SensorReading) -> Switch {
    match (reading.soil_moisture_pct, reading.water_level_cm) {
        (Ok(soil), Ok(water)) => {
            Switch::from_bool(soil < t.soil_moisture_min && water >= t.water_level_min)
        }
        _ => Switch::Off,
    }
}

fn refill_pump(t: &ThresholdSet, reading: &SensorReading) -> Switch {
    match reading.water_level_cm {
        Ok(water) => Switch::from_bool(water < t.water_level_min),
        Err(_) => Switch::Off,
    }
}

/// Upper edge of the fan band.  An inverted band (only constructible by
/// bypassing [`ThresholdSet::validate`]) switches on above the larger bound.
fn upper_temp(t: &ThresholdSet) -> f32 {
    t.temp_max.max(t.temp_min)
}

fn hold(previous: Switch, fresh: Switch, keep_on: bool) -> Switch {
    if previous.is_on() && keep_on {
        Switch::On
    } else {
        fresh
    }
}
