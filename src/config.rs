//! System configuration parameters
//!
//! Static deployment settings for the greenhouse controller: network
//! credentials, config-service endpoints, sensor calibration and loop timing.
//! The control *thresholds* are not here — they come from the remote config
//! service at runtime (see [`crate::sync`]).

use heapless::String;
use serde::{Deserialize, Serialize};

/// Capacity of URL strings (discovery URL, fetch base URL, built fetch URL).
pub const URL_CAPACITY: usize = 128;

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Network ---
    /// WiFi station SSID
    pub wifi_ssid: String<32>,
    /// WiFi station password (empty = open network)
    pub wifi_password: String<64>,

    // --- Config service ---
    /// List endpoint returning every available threshold profile
    pub discovery_url: String<URL_CAPACITY>,
    /// Fetch-by-id endpoint; the profile id is appended verbatim
    pub fetch_base_url: String<URL_CAPACITY>,
    /// Upper bound on one blocking HTTP request (milliseconds)
    pub http_timeout_ms: u32,

    // --- Calibration ---
    /// Soil probe ADC reading in dry air
    pub soil_dry_ref: u16,
    /// Soil probe ADC reading submerged in water
    pub soil_wet_ref: u16,
    /// Distance from the ultrasonic ranger to the reservoir floor (cm)
    pub tank_height_cm: f32,

    // --- Actuation ---
    /// Relays energise on a LOW output
    pub relay_active_low: bool,
    /// Hysteresis band applied around every threshold (0 = disabled)
    pub hysteresis_band: f32,

    // --- Timing ---
    /// Control loop interval (milliseconds)
    pub control_loop_interval_ms: u32,
    /// Threshold refresh interval (milliseconds)
    pub config_refresh_interval_ms: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Network
            wifi_ssid: bounded("greenhouse"),
            wifi_password: String::new(),

            // Config service
            discovery_url: bounded("http://192.168.1.10:5501/api/GreenHouseConfig/GetAll"),
            fetch_base_url: bounded("http://192.168.1.10:5501/api/GreenHouseConfig/GetById/"),
            http_timeout_ms: 5_000,

            // Calibration
            soil_dry_ref: 2243,
            soil_wet_ref: 943,
            tank_height_cm: 20.0,

            // Actuation
            relay_active_low: true,
            hysteresis_band: 0.0,

            // Timing
            control_loop_interval_ms: 2_000,    // 0.5 Hz
            config_refresh_interval_ms: 20_000, // every 20 s
        }
    }
}

impl SystemConfig {
    /// Reject settings the controller cannot operate with.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.soil_dry_ref == self.soil_wet_ref {
            return Err("soil dry and wet references must differ");
        }
        if !(self.tank_height_cm.is_finite() && self.tank_height_cm > 0.0) {
            return Err("tank height must be positive");
        }
        if !(self.hysteresis_band.is_finite() && self.hysteresis_band >= 0.0) {
            return Err("hysteresis band must be non-negative");
        }
        if self.control_loop_interval_ms == 0 {
            return Err("control loop interval must be non-zero");
        }
        if self.config_refresh_interval_ms < self.control_loop_interval_ms {
            return Err("config refresh must not be faster than the control loop");
        }
        if self.discovery_url.is_empty() || self.fetch_base_url.is_empty() {
            return Err("config service URLs must be set");
        }
        Ok(())
    }
}

/// Build a bounded string from a literal that is known to fit.
fn bounded<const N: usize>(s: &str) -> String<N> {
    let mut out = String::new();
    // Every default literal is shorter than its capacity.
    let _ = out.push_str(s);
    out
}
