//! Full-stack test: the production adapters wired exactly as in `main()`,
//! with the simulated board sensors, the in-memory HTTP route table and
//! relay pins that record their line level.

use std::cell::Cell;
use std::convert::Infallible;
use std::rc::Rc;

use embedded_hal::digital::{ErrorType, OutputPin};

use crate::mock_hw::{DISCOVERY_URL, FETCH_BASE_URL, test_config};

use greenhouse::adapters::hardware::HardwareAdapter;
use greenhouse::adapters::http::HttpAdapter;
use greenhouse::adapters::log_sink::LogEventSink;
use greenhouse::adapters::wifi::{ConnectivityPort, WifiAdapter};
use greenhouse::app::service::Controller;
use greenhouse::control::policy::Switch;
use greenhouse::drivers::board::{self, BoardSensors};
use greenhouse::drivers::relay::Relay;
use greenhouse::sensors::SensorReader;

/// Output pin whose level is observable after it has been moved into a relay.
#[derive(Clone, Default)]
struct LevelPin(Rc<Cell<Option<bool>>>);

impl ErrorType for LevelPin {
    type Error = Infallible;
}

impl OutputPin for LevelPin {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.0.set(Some(false));
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.0.set(Some(true));
        Ok(())
    }
}

#[test]
fn simulated_board_runs_a_full_cycle() {
    let config = test_config();

    // 31 °C, soil raw 1893 ≈ 26.9 %, ranger 10 cm below a 20 cm tank top.
    board::sim_set_climate(31.0, 55.0);
    board::sim_set_soil_raw(1_893);
    board::sim_set_distance_cm(10.0);

    let (fan_pin, irrigation_pin, refill_pin) =
        (LevelPin::default(), LevelPin::default(), LevelPin::default());
    let mut hw = HardwareAdapter::new(
        SensorReader::new(BoardSensors::new(), &config),
        Relay::new(fan_pin.clone(), config.relay_active_low, "fan"),
        Relay::new(irrigation_pin.clone(), config.relay_active_low, "irrigation"),
        Relay::new(refill_pin.clone(), config.relay_active_low, "refill"),
    );
    // Active-low relays idle HIGH.
    assert_eq!(fan_pin.0.get(), Some(true));

    let mut http = HttpAdapter::new(config.http_timeout_ms);
    http.sim_route(DISCOVERY_URL, 200, br#"[{"id":3}]"#).unwrap();
    http.sim_route(
        &format!("{FETCH_BASE_URL}3"),
        200,
        br#"{"minTemp":18,"maxTemp":28,"minSoilMoisture":30,"minWaterLevel":5,"soilMoistureThreshold":35}"#,
    )
    .unwrap();

    let mut wifi = WifiAdapter::new();
    wifi.set_credentials(&config.wifi_ssid, &config.wifi_password).unwrap();
    wifi.connect(0).unwrap();

    let mut sink = LogEventSink::new();
    let mut app = Controller::new(&config);
    app.start(&mut hw, &mut sink);

    wifi.poll(0);
    app.tick(0, wifi.is_connected(), &mut http, &mut hw, &mut sink);

    assert_eq!(hw.relay_states(), (Switch::On, Switch::On, Switch::Off));
    assert_eq!(fan_pin.0.get(), Some(false));
    assert_eq!(irrigation_pin.0.get(), Some(false));
    assert_eq!(refill_pin.0.get(), Some(true));
    assert_eq!(app.thresholds().map(|t| t.soil_moisture_threshold), Some(35.0));

    // Reservoir drained: ranger now reads past the tank floor.
    board::sim_set_distance_cm(19.0);
    app.tick(2_000, wifi.is_connected(), &mut http, &mut hw, &mut sink);
    assert_eq!(hw.relay_states(), (Switch::On, Switch::Off, Switch::On));
}
