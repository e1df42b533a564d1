//! Sensor subsystem — calibration math and the aggregating [`SensorReader`].
//!
//! Raw transducer access lives behind the [`SensorDriver`] trait (real
//! peripherals on the device, simulation on the host).  The reader turns
//! those raw signals into a calibrated [`SensorReading`] each control cycle
//! and keeps no state between cycles.

pub mod climate;
pub mod soil;
pub mod water_level;

use crate::config::SystemConfig;
use crate::error::SensorFault;
use soil::SoilCalibration;

/// A calibrated value, or the reason the sensor could not provide one.
pub type Measurement = Result<f32, SensorFault>;

/// Raw signals from the sensor peripherals.
pub trait SensorDriver {
    /// Temperature (°C) and relative humidity (%).  NaN signals a fault.
    fn read_climate(&mut self) -> (f32, f32);

    /// Raw 12-bit ADC value of the capacitive soil probe, or the fault the
    /// converter reported.
    fn read_soil_raw(&mut self) -> Result<u16, SensorFault>;

    /// Distance from the ranger to the water surface (cm).  Negative or
    /// non-finite when no echo was received.
    fn measure_distance_cm(&mut self) -> f32;
}

/// A point-in-time snapshot of every sensor in the system.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorReading {
    /// Air temperature (°C).
    pub temperature_c: Measurement,
    /// Relative air humidity (%).
    pub relative_humidity_pct: Measurement,
    /// Soil moisture, 0 = dry reference, 100 = wet reference (%).
    pub soil_moisture_pct: Measurement,
    /// Water column height in the reservoir (cm).
    pub water_level_cm: Measurement,
}

/// Normalises raw driver signals into calibrated quantities.
pub struct SensorReader<D> {
    driver: D,
    soil: SoilCalibration,
    tank_height_cm: f32,
}

impl<D: SensorDriver> SensorReader<D> {
    pub fn new(driver: D, config: &SystemConfig) -> Self {
        Self {
            driver,
            soil: SoilCalibration::new(config.soil_dry_ref, config.soil_wet_ref),
            tank_height_cm: config.tank_height_cm,
        }
    }

    /// Air temperature and humidity, each checked independently.
    pub fn read_temperature_humidity(&mut self) -> (Measurement, Measurement) {
        let (celsius, humidity) = self.driver.read_climate();
        (climate::temperature(celsius), climate::humidity(humidity))
    }

    /// Soil moisture percentage.
    pub fn read_soil_moisture(&mut self) -> Measurement {
        self.driver
            .read_soil_raw()
            .and_then(|raw| self.soil.moisture_percent(raw))
    }

    /// Reservoir fill height.
    pub fn read_water_level(&mut self) -> Measurement {
        water_level::fill_height_cm(self.driver.measure_distance_cm(), self.tank_height_cm)
    }

    /// Read every sensor and return a unified snapshot.
    pub fn read_all(&mut self) -> SensorReading {
        let (temperature_c, relative_humidity_pct) = self.read_temperature_humidity();
        SensorReading {
            temperature_c,
            relative_humidity_pct,
            soil_moisture_pct: self.read_soil_moisture(),
            water_level_cm: self.read_water_level(),
        }
    }

    /// Mutable access to the underlying driver.
    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }
}
