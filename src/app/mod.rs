//! Application core — pure domain logic, zero I/O.
//!
//! This module wires the three domain components (config sync, sensor
//! reading, actuation policy) into one control cycle.  All interaction with
//! hardware and the network happens through **port traits** defined in
//! [`ports`], keeping this layer fully testable without real peripherals.

pub mod events;
pub mod ports;
pub mod service;
