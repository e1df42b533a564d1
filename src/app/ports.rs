//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ Controller (domain)
//! ```
//!
//! Driven adapters (sensors, relays, HTTP client, event sinks) implement these
//! traits.  The [`Controller`](super::service::Controller) consumes them via
//! generics, so the domain core never touches hardware or sockets directly.

use crate::control::policy::Switch;
use crate::error::TransportError;
use crate::sensors::SensorReading;

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the domain calls this once per control cycle.
pub trait SensorPort {
    /// Read every sensor and return a calibrated snapshot.  Faulty sensors
    /// are reported inside the snapshot, never as a panic or a zero.
    fn read_all(&mut self) -> SensorReading;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the domain calls this to command the three relays.
pub trait ActuatorPort {
    /// Switch the ventilation fan.
    fn set_fan(&mut self, state: Switch);

    /// Switch the irrigation pump.
    fn set_irrigation_pump(&mut self, state: Switch);

    /// Switch the reservoir refill pump.
    fn set_refill_pump(&mut self, state: Switch);

    /// De-energise every actuator — safe state.
    fn all_off(&mut self) {
        self.set_fan(Switch::Off);
        self.set_irrigation_pump(Switch::Off);
        self.set_refill_pump(Switch::Off);
    }
}

// ───────────────────────────────────────────────────────────────
// HTTP port (driven adapter: domain → config service)
// ───────────────────────────────────────────────────────────────

/// Receive buffer size for one config-service response.
pub const MAX_RESPONSE_BYTES: usize = 2048;

/// Fixed-capacity response body.
pub type ResponseBody = heapless::Vec<u8, MAX_RESPONSE_BYTES>;

/// A completed HTTP exchange.  Any status code is returned as-is; deciding
/// what counts as success is the caller's business.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: ResponseBody,
}

/// Blocking HTTP GET client.
///
/// Implementations MUST bound every call by a timeout: the control loop is
/// starved of sensor reads and actuation while a request is in flight.
pub trait HttpPort {
    fn get(&mut self, url: &str) -> Result<HttpResponse, TransportError>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go (serial log today).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
