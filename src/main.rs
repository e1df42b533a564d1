//! Greenhouse Controller Firmware — Main Entry Point
//!
//! Single-threaded control loop: config refresh → sensors → policy → relays.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    Adapters (outer ring)                     │
//! │                                                              │
//! │  HardwareAdapter    HttpAdapter   LogEventSink   WifiAdapter │
//! │  (Sensor+Actuator)  (HttpPort)    (EventSink)    (Connectivity)
//! │                                                              │
//! │  ─────────────── Port Trait Boundary ──────────────────      │
//! │                                                              │
//! │  ┌────────────────────────────────────────────────────────┐  │
//! │  │              Controller (pure logic)                   │  │
//! │  │  ConfigSync · ActuationPolicy                          │  │
//! │  └────────────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use std::thread;
use std::time::Duration;

use anyhow::{Result, anyhow};
use log::{error, info, warn};

use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::hal::gpio::{AnyOutputPin, PinDriver};
use esp_idf_svc::hal::prelude::Peripherals;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use esp_idf_svc::wifi::{BlockingWifi, EspWifi};

use greenhouse::adapters::hardware::HardwareAdapter;
use greenhouse::adapters::http::HttpAdapter;
use greenhouse::adapters::log_sink::LogEventSink;
use greenhouse::adapters::time::MonotonicClock;
use greenhouse::adapters::wifi::{ConnectivityPort, WifiAdapter};
use greenhouse::app::service::Controller;
use greenhouse::config::SystemConfig;
use greenhouse::error::Error;
use greenhouse::drivers::board::BoardSensors;
use greenhouse::drivers::relay::Relay;
use greenhouse::sensors::SensorReader;
use greenhouse::{drivers, pins};

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  Greenhouse v{}                      ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration ──────────────────────────────────────
    let config = SystemConfig::default();
    config
        .validate()
        .map_err(|reason| anyhow!("{}", Error::Config(reason)))?;

    // ── 3. Peripherals ────────────────────────────────────────
    drivers::hw_init::init_peripherals().map_err(|e| anyhow!("{}", e))?;

    let peripherals = Peripherals::take()?;
    let sys_loop = EspSystemEventLoop::take()?;
    let nvs = EspDefaultNvsPartition::take()?;

    // SAFETY: relay GPIOs are listed only in `pins` and are not claimed by
    // any other driver; each is wrapped exactly once here.
    let relay_pin = |gpio: i32| PinDriver::output(unsafe { AnyOutputPin::new(gpio) });
    let fan = Relay::new(relay_pin(pins::FAN_RELAY_GPIO)?, config.relay_active_low, "fan");
    let irrigation = Relay::new(
        relay_pin(pins::IRRIGATION_PUMP_RELAY_GPIO)?,
        config.relay_active_low,
        "irrigation",
    );
    let refill = Relay::new(
        relay_pin(pins::REFILL_PUMP_RELAY_GPIO)?,
        config.relay_active_low,
        "refill",
    );

    let mut hw = HardwareAdapter::new(
        SensorReader::new(BoardSensors::new(), &config),
        fan,
        irrigation,
        refill,
    );

    // ── 4. Network ────────────────────────────────────────────
    let esp_wifi = EspWifi::new(peripherals.modem, sys_loop.clone(), Some(nvs))?;
    let mut wifi = WifiAdapter::new().with_driver(BlockingWifi::wrap(esp_wifi, sys_loop)?);
    let clock = MonotonicClock::new();

    match wifi.set_credentials(&config.wifi_ssid, &config.wifi_password) {
        Ok(()) => {
            if let Err(e) = wifi.connect(clock.uptime_ms()) {
                warn!("WiFi: initial connect failed ({}), will retry", e);
            }
        }
        Err(e) => error!("WiFi: credentials rejected ({}), running offline", e),
    }

    let mut http = HttpAdapter::new(config.http_timeout_ms);
    let mut sink = LogEventSink::new();

    // ── 5. Controller ─────────────────────────────────────────
    let mut app = Controller::new(&config);
    app.start(&mut hw, &mut sink);

    info!("System ready. Entering control loop.");

    let interval = Duration::from_millis(u64::from(config.control_loop_interval_ms));
    loop {
        let now_ms = clock.uptime_ms();
        wifi.poll(now_ms);
        app.tick(now_ms, wifi.is_connected(), &mut http, &mut hw, &mut sink);
        thread::sleep(interval);
    }
}
