//! Capacitive soil-moisture probe calibration.
//!
//! The probe's ADC output falls as moisture rises.  Two reference readings
//! taken at install time — probe in dry air and probe in water — define a
//! linear map onto 0–100 %:
//!
//! ```text
//! pct = (dry_ref - raw) * 100 / (dry_ref - wet_ref)
//! ```
//!
//! Readings drier than the dry reference clamp to 0 %, wetter than the wet
//! reference clamp to 100 %.

use crate::error::SensorFault;

use super::Measurement;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SoilCalibration {
    dry_ref: u16,
    wet_ref: u16,
}

impl SoilCalibration {
    pub fn new(dry_ref: u16, wet_ref: u16) -> Self {
        Self { dry_ref, wet_ref }
    }

    pub fn moisture_percent(&self, raw: u16) -> Measurement {
        let span = f32::from(self.dry_ref) - f32::from(self.wet_ref);
        if span == 0.0 {
            return Err(SensorFault::BadCalibration);
        }
        let pct = (f32::from(self.dry_ref) - f32::from(raw)) * 100.0 / span;
        Ok(pct.clamp(0.0, 100.0))
    }
}
