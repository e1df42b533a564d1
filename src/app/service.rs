//! Application service — the hexagonal core.
//!
//! [`Controller`] owns the config synchroniser and the last commanded
//! actuator state.  It exposes one operation per control cycle; all I/O
//! flows through port traits injected at call sites, making the whole cycle
//! testable with mock adapters.
//!
//! ```text
//!    HttpPort ──▶ ┌────────────────────────┐ ──▶ EventSink
//!  SensorPort ──▶ │       Controller        │
//! ActuatorPort ◀──│ ConfigSync · Policy     │
//!                 └────────────────────────┘
//! ```

use log::info;

use crate::config::SystemConfig;
use crate::control::policy::{self, ActuatorCommand};
use crate::sync::{ConfigProfileId, ConfigSync, ThresholdSet};

use super::events::AppEvent;
use super::ports::{ActuatorPort, EventSink, HttpPort, SensorPort};

// ───────────────────────────────────────────────────────────────
// Controller
// ───────────────────────────────────────────────────────────────

/// Runs the fetch → read → decide → actuate cycle.
pub struct Controller {
    sync: ConfigSync,
    hysteresis_band: f32,
    last_command: ActuatorCommand,
    tick_count: u64,
    /// `AwaitingThresholds` has been reported since the last start.
    awaiting_reported: bool,
}

impl Controller {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            sync: ConfigSync::new(config),
            hysteresis_band: config.hysteresis_band,
            last_command: ActuatorCommand::all_off(),
            tick_count: 0,
            awaiting_reported: false,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Drive every actuator to its safe state before the first cycle.
    pub fn start(&mut self, hw: &mut impl ActuatorPort, sink: &mut impl EventSink) {
        hw.all_off();
        self.last_command = ActuatorCommand::all_off();
        sink.emit(&AppEvent::Started);
        info!("Controller started, actuators off");
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one full control cycle: config refresh → sensors → policy → actuators.
    ///
    /// `now_ms` is monotonic uptime; `online` reports whether the network
    /// link is up.  The refresh step may block for the HTTP timeout.  The
    /// `hw` parameter satisfies **both** [`SensorPort`] and [`ActuatorPort`].
    pub fn tick(
        &mut self,
        now_ms: u64,
        online: bool,
        http: &mut impl HttpPort,
        hw: &mut (impl SensorPort + ActuatorPort),
        sink: &mut impl EventSink,
    ) -> ActuatorCommand {
        self.tick_count += 1;

        // 1. Config refresh (rate-limited inside ConfigSync)
        self.sync.poll(http, online, now_ms, sink);

        // 2. Read sensors via SensorPort
        let reading = hw.read_all();
        sink.emit(&AppEvent::Readings(reading));

        // 3. Policy, only with a fetched threshold set
        let command = if let Some(thresholds) = self.sync.thresholds() {
            self.awaiting_reported = false;
            policy::evaluate_with_hysteresis(
                thresholds,
                &reading,
                &self.last_command,
                self.hysteresis_band,
            )
        } else {
            if !self.awaiting_reported {
                self.awaiting_reported = true;
                sink.emit(&AppEvent::AwaitingThresholds);
            }
            ActuatorCommand::all_off()
        };

        // 4. Apply actuator commands via ActuatorPort
        apply_actuators(&command, hw);

        // 5. Report changes
        if command != self.last_command {
            sink.emit(&AppEvent::ActuatorsChanged {
                from: self.last_command,
                to: command,
            });
        }
        self.last_command = command;
        command
    }

    // ── Queries ───────────────────────────────────────────────

    /// The active threshold set, if one has been fetched.
    pub fn thresholds(&self) -> Option<&ThresholdSet> {
        self.sync.thresholds()
    }

    /// The selected config profile, if discovery has succeeded.
    pub fn profile(&self) -> Option<&ConfigProfileId> {
        self.sync.profile()
    }

    /// The command applied on the most recent cycle.
    pub fn last_command(&self) -> ActuatorCommand {
        self.last_command
    }

    /// Total control ticks executed since startup.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }
}

/// Translate a command into port calls.  Every relay is written every cycle
/// so a glitched output pin is corrected on the next tick.
fn apply_actuators(command: &ActuatorCommand, hw: &mut impl ActuatorPort) {
    hw.set_fan(command.fan);
    hw.set_irrigation_pump(command.irrigation_pump);
    hw.set_refill_pump(command.refill_pump);
}
