//! Mock adapters for integration tests.
//!
//! Records every actuator call so tests can assert on the full command
//! history without touching real GPIO registers, serves canned sensor
//! readings, and answers HTTP requests from a route table.

use greenhouse::app::events::AppEvent;
use greenhouse::app::ports::{ActuatorPort, EventSink, HttpPort, HttpResponse, ResponseBody, SensorPort};
use greenhouse::config::SystemConfig;
use greenhouse::control::policy::Switch;
use greenhouse::error::TransportError;
use greenhouse::sensors::SensorReading;

pub const DISCOVERY_URL: &str = "http://cfg.test/configs";
pub const FETCH_BASE_URL: &str = "http://cfg.test/configs/";

pub fn test_config() -> SystemConfig {
    let mut config = SystemConfig::default();
    config.discovery_url.clear();
    config.discovery_url.push_str(DISCOVERY_URL).unwrap();
    config.fetch_base_url.clear();
    config.fetch_base_url.push_str(FETCH_BASE_URL).unwrap();
    config
}

// ── Actuator call record ──────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorCall {
    Fan(Switch),
    IrrigationPump(Switch),
    RefillPump(Switch),
}

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware {
    pub reading: SensorReading,
    pub calls: Vec<ActuatorCall>,
    pub reads: usize,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new(temp: f32, soil: f32, water: f32) -> Self {
        Self {
            reading: reading(temp, soil, water),
            calls: Vec::new(),
            reads: 0,
        }
    }

    /// Latest state written to each relay as `(fan, irrigation, refill)`.
    pub fn relays(&self) -> (Switch, Switch, Switch) {
        let mut state = (Switch::Off, Switch::Off, Switch::Off);
        for call in &self.calls {
            match *call {
                ActuatorCall::Fan(s) => state.0 = s,
                ActuatorCall::IrrigationPump(s) => state.1 = s,
                ActuatorCall::RefillPump(s) => state.2 = s,
            }
        }
        state
    }
}

pub fn reading(temp: f32, soil: f32, water: f32) -> SensorReading {
    SensorReading {
        temperature_c: Ok(temp),
        relative_humidity_pct: Ok(60.0),
        soil_moisture_pct: Ok(soil),
        water_level_cm: Ok(water),
    }
}

impl SensorPort for MockHardware {
    fn read_all(&mut self) -> SensorReading {
        self.reads += 1;
        self.reading
    }
}

impl ActuatorPort for MockHardware {
    fn set_fan(&mut self, state: Switch) {
        self.calls.push(ActuatorCall::Fan(state));
    }

    fn set_irrigation_pump(&mut self, state: Switch) {
        self.calls.push(ActuatorCall::IrrigationPump(state));
    }

    fn set_refill_pump(&mut self, state: Switch) {
        self.calls.push(ActuatorCall::RefillPump(state));
    }
}

// ── MockHttp ──────────────────────────────────────────────────

pub struct MockHttp {
    routes: Vec<(String, Result<(u16, String), TransportError>)>,
    pub requests: Vec<String>,
}

#[allow(dead_code)]
impl MockHttp {
    pub fn new() -> Self {
        Self {
            routes: Vec::new(),
            requests: Vec::new(),
        }
    }

    /// Serve `body` with `status` for `url`, replacing any earlier route.
    pub fn route(&mut self, url: &str, status: u16, body: &str) {
        self.set(url, Ok((status, body.to_owned())));
    }

    /// Fail every request to `url` with `error`.
    pub fn fail(&mut self, url: &str, error: TransportError) {
        self.set(url, Err(error));
    }

    /// A standard service: one profile `7` with the given thresholds.
    pub fn serving(min_temp: f32, max_temp: f32, min_soil: f32, min_water: f32) -> Self {
        let mut http = Self::new();
        http.route(DISCOVERY_URL, 200, r#"[{"id":7,"name":"tomatoes"}]"#);
        http.route(
            &format!("{FETCH_BASE_URL}7"),
            200,
            &format!(
                r#"{{"id":7,"minTemp":{min_temp},"maxTemp":{max_temp},"minSoilMoisture":{min_soil},"minWaterLevel":{min_water}}}"#
            ),
        );
        http
    }

    fn set(&mut self, url: &str, response: Result<(u16, String), TransportError>) {
        self.routes.retain(|(u, _)| u != url);
        self.routes.push((url.to_owned(), response));
    }
}

impl HttpPort for MockHttp {
    fn get(&mut self, url: &str) -> Result<HttpResponse, TransportError> {
        self.requests.push(url.to_owned());
        let (_, response) = self
            .routes
            .iter()
            .find(|(u, _)| u == url)
            .ok_or(TransportError::ConnectFailed)?;
        let (status, body) = response.clone()?;
        Ok(HttpResponse {
            status,
            body: ResponseBody::from_slice(body.as_bytes()).map_err(|_| TransportError::ResponseTooLarge)?,
        })
    }
}

// ── RecordingSink ─────────────────────────────────────────────

pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
