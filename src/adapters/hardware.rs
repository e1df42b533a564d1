//! Hardware adapter — bridges real peripherals to domain port traits.
//!
//! Owns the [`SensorReader`] and the three relay drivers, exposing them
//! through [`SensorPort`] and [`ActuatorPort`].  This is the only module in
//! the system that touches actual hardware.  On non-espidf targets the
//! sensor driver and relay pins are simulation stubs or mocks.

use embedded_hal::digital::OutputPin;

use crate::app::ports::{ActuatorPort, SensorPort};
use crate::control::policy::Switch;
use crate::drivers::relay::Relay;
use crate::sensors::{SensorDriver, SensorReader, SensorReading};

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter<D, P> {
    sensors: SensorReader<D>,
    fan: Relay<P>,
    irrigation_pump: Relay<P>,
    refill_pump: Relay<P>,
}

impl<D: SensorDriver, P: OutputPin> HardwareAdapter<D, P> {
    pub fn new(
        sensors: SensorReader<D>,
        fan: Relay<P>,
        irrigation_pump: Relay<P>,
        refill_pump: Relay<P>,
    ) -> Self {
        Self {
            sensors,
            fan,
            irrigation_pump,
            refill_pump,
        }
    }

    /// Current relay states as `(fan, irrigation, refill)`.
    pub fn relay_states(&self) -> (Switch, Switch, Switch) {
        (
            self.fan.state(),
            self.irrigation_pump.state(),
            self.refill_pump.state(),
        )
    }
}

// ── SensorPort implementation ─────────────────────────────────

impl<D: SensorDriver, P: OutputPin> SensorPort for HardwareAdapter<D, P> {
    fn read_all(&mut self) -> SensorReading {
        self.sensors.read_all()
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl<D: SensorDriver, P: OutputPin> ActuatorPort for HardwareAdapter<D, P> {
    fn set_fan(&mut self, state: Switch) {
        self.fan.set(state);
    }

    fn set_irrigation_pump(&mut self, state: Switch) {
        self.irrigation_pump.set(state);
    }

    fn set_refill_pump(&mut self, state: Switch) {
        self.refill_pump.set(state);
    }
}
