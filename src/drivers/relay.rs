//! Single-channel relay driver.
//!
//! Wraps any `embedded-hal` [`OutputPin`] and translates the logical
//! [`Switch`] state into a pin level.  Most hobby relay boards energise the
//! coil when the input is pulled LOW, so polarity is configurable.
//!
//! ## Dual-target design
//!
//! On ESP-IDF the pin is an `esp-idf-hal` `PinDriver<Output>`.
//! On host/test any mock implementing `OutputPin` will do.

use embedded_hal::digital::{Error as _, OutputPin};
use log::warn;

use crate::control::policy::Switch;

pub struct Relay<P> {
    pin: P,
    active_low: bool,
    state: Switch,
    label: &'static str,
}

impl<P: OutputPin> Relay<P> {
    /// Take ownership of `pin` and drive it to the OFF level immediately.
    pub fn new(pin: P, active_low: bool, label: &'static str) -> Self {
        let mut relay = Self {
            pin,
            active_low,
            state: Switch::Off,
            label,
        };
        relay.drive(Switch::Off);
        relay
    }

    pub fn set(&mut self, state: Switch) {
        self.drive(state);
        self.state = state;
    }

    /// Last commanded state.
    pub fn state(&self) -> Switch {
        self.state
    }

    fn drive(&mut self, state: Switch) {
        // Active-low: ON pulls the line low.
        let low = state.is_on() == self.active_low;
        let result = if low { self.pin.set_low() } else { self.pin.set_high() };
        if let Err(e) = result {
            warn!("relay {}: pin write failed ({:?})", self.label, e.kind());
        }
    }
}
