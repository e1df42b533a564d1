//! GPIO / peripheral pin assignments for the greenhouse controller board
//! (classic ESP32 DevKit).
//!
//! Single source of truth — every driver references this module rather than
//! hard-coding pin numbers.

// ---------------------------------------------------------------------------
// Sensors
// ---------------------------------------------------------------------------

/// DHT22 temperature / humidity sensor — single-wire bidirectional data line.
pub const DHT_DATA_GPIO: i32 = 33;

/// Capacitive soil-moisture probe — analog output on GPIO 32, which is
/// ADC1 channel 4 on the ESP32.
pub const SOIL_ADC_CHANNEL: u32 = 4;

/// HC-SR04 ultrasonic ranger — trigger output.
pub const ULTRASONIC_TRIG_GPIO: i32 = 14;
/// HC-SR04 ultrasonic ranger — echo input.
pub const ULTRASONIC_ECHO_GPIO: i32 = 12;

// ---------------------------------------------------------------------------
// Actuators (relay board, active LOW)
// ---------------------------------------------------------------------------

/// Ventilation fan relay.
pub const FAN_RELAY_GPIO: i32 = 2;
/// Reservoir refill pump relay.
pub const REFILL_PUMP_RELAY_GPIO: i32 = 4;
/// Irrigation pump relay.
pub const IRRIGATION_PUMP_RELAY_GPIO: i32 = 0;
