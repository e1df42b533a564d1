//! On-board sensor wiring.
//!
//! [`BoardSensors`] is the [`SensorDriver`] for the real PCB: DHT22 on the
//! climate pin, capacitive probe on ADC1, HC-SR04 above the reservoir.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: reads hardware through the sibling drivers.
//! On host/test: returns values from static atomics settable through the
//! `sim_set_*` helpers, so the binary's wiring can be exercised without a
//! board.

use crate::error::SensorFault;
use crate::sensors::SensorDriver;

#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicU16, AtomicU32, Ordering};

#[cfg(not(target_os = "espidf"))]
static SIM_TEMP_BITS: AtomicU32 = AtomicU32::new(0x41C8_0000); // 25.0
#[cfg(not(target_os = "espidf"))]
static SIM_HUMIDITY_BITS: AtomicU32 = AtomicU32::new(0x4248_0000); // 50.0
#[cfg(not(target_os = "espidf"))]
static SIM_SOIL_RAW: AtomicU16 = AtomicU16::new(1_600);
#[cfg(not(target_os = "espidf"))]
static SIM_DISTANCE_BITS: AtomicU32 = AtomicU32::new(0x4120_0000); // 10.0

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_climate(celsius: f32, humidity_pct: f32) {
    SIM_TEMP_BITS.store(celsius.to_bits(), Ordering::Relaxed);
    SIM_HUMIDITY_BITS.store(humidity_pct.to_bits(), Ordering::Relaxed);
}

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_soil_raw(raw: u16) {
    SIM_SOIL_RAW.store(raw, Ordering::Relaxed);
}

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_distance_cm(cm: f32) {
    SIM_DISTANCE_BITS.store(cm.to_bits(), Ordering::Relaxed);
}

#[derive(Debug, Default)]
pub struct BoardSensors;

impl BoardSensors {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(target_os = "espidf")]
impl SensorDriver for BoardSensors {
    fn read_climate(&mut self) -> (f32, f32) {
        super::dht22::read()
    }

    fn read_soil_raw(&mut self) -> Result<u16, SensorFault> {
        super::hw_init::adc1_read(crate::pins::SOIL_ADC_CHANNEL)
    }

    fn measure_distance_cm(&mut self) -> f32 {
        super::ultrasonic::measure_cm()
    }
}

#[cfg(not(target_os = "espidf"))]
impl SensorDriver for BoardSensors {
    fn read_climate(&mut self) -> (f32, f32) {
        (
            f32::from_bits(SIM_TEMP_BITS.load(Ordering::Relaxed)),
            f32::from_bits(SIM_HUMIDITY_BITS.load(Ordering::Relaxed)),
        )
    }

    fn read_soil_raw(&mut self) -> Result<u16, SensorFault> {
        Ok(SIM_SOIL_RAW.load(Ordering::Relaxed))
    }

    fn measure_distance_cm(&mut self) -> f32 {
        f32::from_bits(SIM_DISTANCE_BITS.load(Ordering::Relaxed))
    }
}
