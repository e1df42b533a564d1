//! Sensor and relay drivers, hardware initialisation, and pin helpers.

pub mod board;
pub mod dht22;
pub mod hw_init;
pub mod relay;
pub mod ultrasonic;
