//! Unified error types for the greenhouse firmware.
//!
//! Three failure families exist at runtime: the config service could not be
//! reached ([`TransportError`]), it answered with something unusable
//! ([`ParseError`]), or a sensor driver reported an invalid reading
//! ([`SensorFault`]).  None of them is fatal — the control loop logs and
//! carries on.  All variants are `Copy` so they can travel inside
//! [`AppEvent`](crate::app::events::AppEvent)s without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible domain operation funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The config service could not be reached or refused the request.
    Transport(TransportError),
    /// The config service answered with a malformed or incomplete body.
    Parse(ParseError),
    /// A sensor could not produce a valid reading.
    Sensor(SensorFault),
    /// Configuration is invalid.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(e) => write!(f, "transport: {e}"),
            Self::Parse(e) => write!(f, "parse: {e}"),
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Transport errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
    /// No network link is available.
    NotConnected,
    /// TCP connect or DNS resolution failed.
    ConnectFailed,
    /// The request did not complete within the configured timeout.
    Timeout,
    /// The server answered with a non-2xx status.
    Status(u16),
    /// The response body exceeds the receive buffer.
    ResponseTooLarge,
    /// The URL could not be built (too long for the buffer).
    InvalidUrl,
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotConnected => write!(f, "network not connected"),
            Self::ConnectFailed => write!(f, "connection failed"),
            Self::Timeout => write!(f, "request timed out"),
            Self::Status(code) => write!(f, "HTTP status {code}"),
            Self::ResponseTooLarge => write!(f, "response body too large"),
            Self::InvalidUrl => write!(f, "URL too long"),
        }
    }
}

impl From<TransportError> for Error {
    fn from(e: TransportError) -> Self {
        Self::Transport(e)
    }
}

// ---------------------------------------------------------------------------
// Parse errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    /// Body is not valid JSON or has the wrong top-level shape.
    MalformedBody,
    /// A required field is absent (carries the JSON field name).
    MissingField(&'static str),
    /// A field is present but not a finite number.
    NotNumeric(&'static str),
    /// A list entry carries an `id` that is neither an integer nor a string,
    /// or does not fit the identifier buffer.
    InvalidId,
    /// Values parsed but describe an impossible threshold set.
    InvalidRange(&'static str),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedBody => write!(f, "malformed response body"),
            Self::MissingField(name) => write!(f, "missing field '{name}'"),
            Self::NotNumeric(name) => write!(f, "field '{name}' is not numeric"),
            Self::InvalidId => write!(f, "invalid profile id"),
            Self::InvalidRange(why) => write!(f, "invalid thresholds: {why}"),
        }
    }
}

impl From<ParseError> for Error {
    fn from(e: ParseError) -> Self {
        Self::Parse(e)
    }
}

// ---------------------------------------------------------------------------
// Sensor faults
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorFault {
    /// The climate driver returned NaN (timeout or checksum failure).
    NotANumber,
    /// Reading is outside the physically plausible range.
    OutOfRange,
    /// The ultrasonic ranger received no echo.
    NoEcho,
    /// Dry and wet calibration references are equal.
    BadCalibration,
    /// The ADC driver reported an error instead of a conversion.
    AdcReadFailed,
}

impl fmt::Display for SensorFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotANumber => write!(f, "driver returned NaN"),
            Self::OutOfRange => write!(f, "reading out of range"),
            Self::NoEcho => write!(f, "no echo received"),
            Self::BadCalibration => write!(f, "degenerate calibration"),
            Self::AdcReadFailed => write!(f, "ADC read failed"),
        }
    }
}

impl From<SensorFault> for Error {
    fn from(e: SensorFault) -> Self {
        Self::Sensor(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
