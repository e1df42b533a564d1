//! Outbound application events.
//!
//! The [`Controller`](super::service::Controller) and
//! [`ConfigSync`](crate::sync::ConfigSync) emit these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other side
//! decide what to do with them — today that is a line on the serial log.

use crate::control::policy::ActuatorCommand;
use crate::error::Error;
use crate::sensors::SensorReading;
use crate::sync::{ConfigProfileId, ThresholdSet};

/// Which config-service request an outcome belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStage {
    /// Profile list query.
    Discovery,
    /// Fetch-by-id query.
    Fetch,
}

/// Structured events emitted by the application core.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// The controller has started; all actuators are off.
    Started,

    /// A profile was selected from the discovery list.
    ProfileSelected(ConfigProfileId),

    /// The discovery list was empty; discovery will be retried.
    NoProfilesAvailable,

    /// A freshly fetched threshold set replaced the previous one.
    ThresholdsApplied(ThresholdSet),

    /// A config-service request failed; the held thresholds are unchanged.
    SyncFailed { stage: SyncStage, error: Error },

    /// No threshold set has been fetched yet; actuators are held off.
    AwaitingThresholds,

    /// The sensor snapshot taken this cycle.
    Readings(SensorReading),

    /// The commanded actuator state differs from the previous cycle.
    ActuatorsChanged {
        from: ActuatorCommand,
        to: ActuatorCommand,
    },
}
