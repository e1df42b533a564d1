//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing application events to the ESP-IDF
//! logger (UART in production).  Each line starts with a fixed tag so the
//! serial console can be filtered with `grep`.

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;
use crate::sensors::Measurement;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

/// Render a measurement, or its fault, in a fixed-width-ish form.
struct Shown(Measurement);

impl core::fmt::Display for Shown {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.0 {
            Ok(v) => write!(f, "{:.1}", v),
            Err(fault) => write!(f, "ERR({})", fault),
        }
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started => {
                info!("START | actuators off");
            }
            AppEvent::ProfileSelected(id) => {
                info!("SYNC  | profile selected id={}", id);
            }
            AppEvent::NoProfilesAvailable => {
                warn!("SYNC  | discovery returned no profiles");
            }
            AppEvent::ThresholdsApplied(t) => {
                info!(
                    "SYNC  | thresholds temp={:.1}..{:.1}\u{00b0}C soil_min={:.1}% water_min={:.1}cm",
                    t.temp_min, t.temp_max, t.soil_moisture_min, t.water_level_min,
                );
            }
            AppEvent::SyncFailed { stage, error } => {
                warn!("SYNC  | {:?} failed: {}", stage, error);
            }
            AppEvent::AwaitingThresholds => {
                warn!("SYNC  | no thresholds yet, actuators held off");
            }
            AppEvent::Readings(r) => {
                info!(
                    "READ  | T={}\u{00b0}C RH={}% soil={}% water={}cm",
                    Shown(r.temperature_c),
                    Shown(r.relative_humidity_pct),
                    Shown(r.soil_moisture_pct),
                    Shown(r.water_level_cm),
                );
            }
            AppEvent::ActuatorsChanged { from, to } => {
                info!(
                    "ACT   | fan {}->{} irrigation {}->{} refill {}->{}",
                    from.fan, to.fan, from.irrigation_pump, to.irrigation_pump,
                    from.refill_pump, to.refill_pump,
                );
            }
        }
    }
}
