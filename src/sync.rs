//! Remote configuration synchronisation.
//!
//! [`ConfigSync`] owns the active [`ThresholdSet`].  It selects one profile
//! from the config service's list endpoint and then re-fetches that
//! profile's thresholds once per refresh interval.
//!
//! ## Lifecycle
//!
//! 1. Until a profile is selected, every refresh slot retries discovery.
//!    Selection takes the first entry of the returned list.
//! 2. Once selected, the profile id never changes.
//! 3. Each refresh slot fetches `fetch_base_url + id`.  A successful, valid
//!    response replaces the whole set in one assignment; any failure leaves
//!    the held set untouched.
//! 4. Until the first successful fetch, [`ConfigSync::thresholds`] is `None`
//!    and the controller must not actuate.
//!
//! ## Wire format
//!
//! ```text
//! GET <discovery_url>      → [{"id": 3, ...}, {"id": "b7", ...}]
//! GET <fetch_base_url><id> → {"minTemp": 18, "maxTemp": 28,
//!                             "minSoilMoisture": 30, "minWaterLevel": 5,
//!                             "soilMoistureThreshold": 35}   (last one optional)
//! ```

use core::fmt::{self, Write as _};

use log::{debug, info};
use serde_json::{Map, Value};

use crate::app::events::{AppEvent, SyncStage};
use crate::app::ports::{EventSink, HttpPort, ResponseBody};
use crate::config::{SystemConfig, URL_CAPACITY};
use crate::error::{ParseError, Result, TransportError};

/// Capacity of a profile identifier.
pub const PROFILE_ID_CAPACITY: usize = 40;

// JSON field names of the fetch-by-id payload.
const FIELD_MIN_TEMP: &str = "minTemp";
const FIELD_MAX_TEMP: &str = "maxTemp";
const FIELD_MIN_SOIL: &str = "minSoilMoisture";
const FIELD_MIN_WATER: &str = "minWaterLevel";
const FIELD_SOIL_THRESHOLD: &str = "soilMoistureThreshold";

// ───────────────────────────────────────────────────────────────
// ThresholdSet
// ───────────────────────────────────────────────────────────────

/// The control boundaries fetched from the config service.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdSet {
    /// Below this the fan stays off (°C).
    pub temp_min: f32,
    /// Above this the fan runs (°C).
    pub temp_max: f32,
    /// Irrigate while soil moisture is below this (%).
    pub soil_moisture_min: f32,
    /// Refill while the reservoir is below this; never irrigate below it (cm).
    pub water_level_min: f32,
    /// Informational soil target reported by the service (%).
    pub soil_moisture_threshold: f32,
}

impl ThresholdSet {
    /// Check that the set describes a usable control band.
    pub fn validate(&self) -> core::result::Result<(), ParseError> {
        let values = [
            self.temp_min,
            self.temp_max,
            self.soil_moisture_min,
            self.water_level_min,
            self.soil_moisture_threshold,
        ];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(ParseError::InvalidRange("non-finite value"));
        }
        if self.temp_min > self.temp_max {
            return Err(ParseError::InvalidRange("minTemp above maxTemp"));
        }
        Ok(())
    }
}

// ───────────────────────────────────────────────────────────────
// ConfigProfileId
// ───────────────────────────────────────────────────────────────

/// Opaque key of a remote threshold profile.
///
/// The service may send integer or string ids; both are kept as their
/// textual form so they can be appended to the fetch URL unchanged.  Only
/// URL-unreserved characters (ASCII letters, digits, `-._~`) are accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigProfileId(heapless::String<PROFILE_ID_CAPACITY>);

impl ConfigProfileId {
    /// Build an id from its textual form.
    pub fn new(id: &str) -> core::result::Result<Self, ParseError> {
        let unreserved = |c: char| c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_' | '~');
        let mut text = heapless::String::new();
        if id.is_empty() || !id.chars().all(unreserved) || text.push_str(id).is_err() {
            return Err(ParseError::InvalidId);
        }
        Ok(Self(text))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    fn from_json(value: &Value) -> core::result::Result<Self, ParseError> {
        match value {
            Value::String(s) => Self::new(s),
            Value::Number(n) if n.is_i64() || n.is_u64() => {
                let mut text = heapless::String::new();
                write!(text, "{n}").map_err(|_| ParseError::InvalidId)?;
                Ok(Self(text))
            }
            _ => Err(ParseError::InvalidId),
        }
    }
}

impl fmt::Display for ConfigProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ───────────────────────────────────────────────────────────────
// Payload parsing
// ───────────────────────────────────────────────────────────────

/// Parse the discovery list into profile ids, preserving service order.
pub fn parse_profile_list(body: &[u8]) -> core::result::Result<Vec<ConfigProfileId>, ParseError> {
    let value: Value = serde_json::from_slice(body).map_err(|_| ParseError::MalformedBody)?;
    let entries = value.as_array().ok_or(ParseError::MalformedBody)?;
    entries
        .iter()
        .map(|entry| {
            let object = entry.as_object().ok_or(ParseError::MalformedBody)?;
            let id = object.get("id").ok_or(ParseError::MissingField("id"))?;
            ConfigProfileId::from_json(id)
        })
        .collect()
}

/// Parse and validate a fetch-by-id payload.
///
/// `minTemp` maps to the lower fan bound and `maxTemp` to the upper one.
pub fn parse_thresholds(body: &[u8]) -> core::result::Result<ThresholdSet, ParseError> {
    let value: Value = serde_json::from_slice(body).map_err(|_| ParseError::MalformedBody)?;
    let object = value.as_object().ok_or(ParseError::MalformedBody)?;

    let soil_moisture_min = number(object, FIELD_MIN_SOIL)?;
    let soil_moisture_threshold = match object.get(FIELD_SOIL_THRESHOLD) {
        None | Some(Value::Null) => soil_moisture_min,
        Some(_) => number(object, FIELD_SOIL_THRESHOLD)?,
    };

    let set = ThresholdSet {
        temp_min: number(object, FIELD_MIN_TEMP)?,
        temp_max: number(object, FIELD_MAX_TEMP)?,
        soil_moisture_min,
        water_level_min: number(object, FIELD_MIN_WATER)?,
        soil_moisture_threshold,
    };
    set.validate()?;
    Ok(set)
}

fn number(object: &Map<std::string::String, Value>, field: &'static str) -> core::result::Result<f32, ParseError> {
    let value = object.get(field).ok_or(ParseError::MissingField(field))?;
    match value.as_f64() {
        Some(n) if n.is_finite() => Ok(n as f32),
        _ => Err(ParseError::NotNumeric(field)),
    }
}

// ───────────────────────────────────────────────────────────────
// ConfigSync
// ───────────────────────────────────────────────────────────────

/// Selects a remote profile and keeps its thresholds fresh.
pub struct ConfigSync {
    discovery_url: heapless::String<URL_CAPACITY>,
    fetch_base_url: heapless::String<URL_CAPACITY>,
    refresh_interval_ms: u64,
    profile: Option<ConfigProfileId>,
    thresholds: Option<ThresholdSet>,
    /// Uptime of the last refresh attempt; `None` until the first one.
    last_attempt_ms: Option<u64>,
    /// A skipped slot has been reported for the current offline stretch.
    offline_reported: bool,
}

impl ConfigSync {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            discovery_url: config.discovery_url.clone(),
            fetch_base_url: config.fetch_base_url.clone(),
            refresh_interval_ms: u64::from(config.config_refresh_interval_ms),
            profile: None,
            thresholds: None,
            last_attempt_ms: None,
            offline_reported: false,
        }
    }

    // ── Queries ───────────────────────────────────────────────

    /// The active threshold set, or `None` before the first successful fetch.
    pub fn thresholds(&self) -> Option<&ThresholdSet> {
        self.thresholds.as_ref()
    }

    /// The selected profile, or `None` while discovery is pending.
    pub fn profile(&self) -> Option<&ConfigProfileId> {
        self.profile.as_ref()
    }

    /// Whether a refresh attempt is due at uptime `now_ms`.
    pub fn refresh_due(&self, now_ms: u64) -> bool {
        self.last_attempt_ms
            .is_none_or(|last| now_ms.saturating_sub(last) >= self.refresh_interval_ms)
    }

    // ── Requests ──────────────────────────────────────────────

    /// Query the list endpoint for every available profile.
    pub fn discover_profiles(&self, http: &mut impl HttpPort) -> Result<Vec<ConfigProfileId>> {
        let body = get_success(http, &self.discovery_url)?;
        Ok(parse_profile_list(&body)?)
    }

    /// Fetch the threshold set of profile `id`.  Does not apply it.
    pub fn fetch_thresholds(&self, http: &mut impl HttpPort, id: &ConfigProfileId) -> Result<ThresholdSet> {
        let url = self.fetch_url(id)?;
        let body = get_success(http, &url)?;
        Ok(parse_thresholds(&body)?)
    }

    // ── Periodic refresh ──────────────────────────────────────

    /// Run one refresh slot if it is due.
    ///
    /// Blocks for at most the HTTP port's timeout per request (two requests
    /// while discovery is pending).  Skipped entirely while `online` is
    /// false; the slot stays due so the fetch happens as soon as the link
    /// returns.  The first skipped slot of each offline stretch is reported
    /// as a `NotConnected` failure.  Returns `true` if requests were
    /// attempted.
    pub fn poll(
        &mut self,
        http: &mut impl HttpPort,
        online: bool,
        now_ms: u64,
        sink: &mut impl EventSink,
    ) -> bool {
        if !self.refresh_due(now_ms) {
            return false;
        }
        if !online {
            debug!("sync: refresh due but network is down, skipping");
            if !self.offline_reported {
                self.offline_reported = true;
                let stage = if self.profile.is_none() { SyncStage::Discovery } else { SyncStage::Fetch };
                sink.emit(&AppEvent::SyncFailed {
                    stage,
                    error: TransportError::NotConnected.into(),
                });
            }
            return false;
        }
        self.offline_reported = false;
        self.last_attempt_ms = Some(now_ms);

        if self.profile.is_none() && !self.select_profile(http, sink) {
            return true;
        }
        let Some(id) = self.profile.clone() else {
            return true;
        };

        match self.fetch_thresholds(http, &id) {
            Ok(set) => {
                self.thresholds = Some(set);
                sink.emit(&AppEvent::ThresholdsApplied(set));
            }
            Err(error) => {
                sink.emit(&AppEvent::SyncFailed {
                    stage: SyncStage::Fetch,
                    error,
                });
            }
        }
        true
    }

    // ── Internal ──────────────────────────────────────────────

    /// Discover profiles and select the first one.  Returns `true` when a
    /// profile is selected.
    fn select_profile(&mut self, http: &mut impl HttpPort, sink: &mut impl EventSink) -> bool {
        match self.discover_profiles(http) {
            Ok(profiles) => match profiles.into_iter().next() {
                Some(id) => {
                    info!("sync: selected profile {}", id);
                    sink.emit(&AppEvent::ProfileSelected(id.clone()));
                    self.profile = Some(id);
                    true
                }
                None => {
                    sink.emit(&AppEvent::NoProfilesAvailable);
                    false
                }
            },
            Err(error) => {
                sink.emit(&AppEvent::SyncFailed {
                    stage: SyncStage::Discovery,
                    error,
                });
                false
            }
        }
    }

    fn fetch_url(&self, id: &ConfigProfileId) -> core::result::Result<heapless::String<URL_CAPACITY>, TransportError> {
        let mut url = self.fetch_base_url.clone();
        url.push_str(id.as_str()).map_err(|()| TransportError::InvalidUrl)?;
        Ok(url)
    }
}

/// GET `url` and return the body of a 2xx response.
fn get_success(http: &mut impl HttpPort, url: &str) -> core::result::Result<ResponseBody, TransportError> {
    let response = http.get(url)?;
    if !(200..300).contains(&response.status) {
        return Err(TransportError::Status(response.status));
    }
    Ok(response.body)
}

// ───────────────────────────────────────────────────────────────
// Tests
// ───────────────────────────────────────────────────────────────
