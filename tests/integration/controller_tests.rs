//! Integration tests for the Controller → ConfigSync → policy → actuators
//! pipeline.
//!
//! These run on the host (x86_64) and drive whole control cycles through
//! mock ports, checking what reaches the relays and the event sink.

use crate::mock_hw::{
    ActuatorCall, FETCH_BASE_URL, MockHardware, MockHttp, RecordingSink, reading, test_config,
};

use greenhouse::app::events::{AppEvent, SyncStage};
use greenhouse::app::service::Controller;
use greenhouse::control::policy::{ActuatorCommand, Switch};
use greenhouse::error::{Error, ParseError, SensorFault, TransportError};

const LOOP_MS: u64 = 2_000;
const REFRESH_MS: u64 = 20_000;

fn started(hw: &mut MockHardware) -> (Controller, RecordingSink) {
    let mut app = Controller::new(&test_config());
    let mut sink = RecordingSink::new();
    app.start(hw, &mut sink);
    (app, sink)
}

fn fetch_url() -> String {
    format!("{FETCH_BASE_URL}7")
}

// ── Startup ───────────────────────────────────────────────────

#[test]
fn start_switches_everything_off() {
    let mut hw = MockHardware::new(30.0, 20.0, 10.0);
    let (app, sink) = started(&mut hw);

    assert_eq!(hw.relays(), (Switch::Off, Switch::Off, Switch::Off));
    assert_eq!(hw.calls.len(), 3);
    assert!(matches!(sink.events[..], [AppEvent::Started]));
    assert_eq!(app.last_command(), ActuatorCommand::all_off());
    assert!(app.thresholds().is_none());
}

// ── End-to-end scenarios ──────────────────────────────────────

#[test]
fn hot_dry_soil_with_reserve_runs_fan_and_irrigation() {
    let mut hw = MockHardware::new(30.0, 20.0, 10.0);
    let mut http = MockHttp::serving(18.0, 28.0, 30.0, 5.0);
    let (mut app, mut sink) = started(&mut hw);

    let cmd = app.tick(0, true, &mut http, &mut hw, &mut sink);

    assert_eq!(
        cmd,
        ActuatorCommand {
            fan: Switch::On,
            irrigation_pump: Switch::On,
            refill_pump: Switch::Off,
        }
    );
    assert_eq!(hw.relays(), (Switch::On, Switch::On, Switch::Off));
    assert_eq!(app.profile().map(|id| id.as_str()), Some("7"));
    assert_eq!(app.thresholds().map(|t| t.temp_max), Some(28.0));
    assert_eq!(
        sink.count(|e| matches!(e, AppEvent::ActuatorsChanged { .. })),
        1
    );
}

#[test]
fn cold_moist_soil_low_reservoir_only_refills() {
    let mut hw = MockHardware::new(15.0, 40.0, 2.0);
    let mut http = MockHttp::serving(18.0, 28.0, 30.0, 5.0);
    let (mut app, mut sink) = started(&mut hw);

    let cmd = app.tick(0, true, &mut http, &mut hw, &mut sink);

    assert_eq!(
        cmd,
        ActuatorCommand {
            fan: Switch::Off,
            irrigation_pump: Switch::Off,
            refill_pump: Switch::On,
        }
    );
}

// ── Unset thresholds ──────────────────────────────────────────

#[test]
fn offline_boot_holds_actuators_off_and_reports_once() {
    let mut hw = MockHardware::new(35.0, 5.0, 1.0);
    let mut http = MockHttp::serving(18.0, 28.0, 30.0, 5.0);
    let (mut app, mut sink) = started(&mut hw);

    for i in 0..5 {
        let cmd = app.tick(i * LOOP_MS, false, &mut http, &mut hw, &mut sink);
        assert_eq!(cmd, ActuatorCommand::all_off());
    }

    assert!(http.requests.is_empty());
    assert_eq!(hw.reads, 5);
    assert_eq!(sink.count(|e| matches!(e, AppEvent::AwaitingThresholds)), 1);
    assert_eq!(sink.count(|e| matches!(e, AppEvent::Readings(_))), 5);
    assert_eq!(
        sink.count(|e| matches!(
            e,
            AppEvent::SyncFailed {
                stage: SyncStage::Discovery,
                error: Error::Transport(TransportError::NotConnected),
            }
        )),
        1
    );
}

#[test]
fn link_coming_up_triggers_immediate_fetch() {
    let mut hw = MockHardware::new(30.0, 50.0, 10.0);
    let mut http = MockHttp::serving(18.0, 28.0, 30.0, 5.0);
    let (mut app, mut sink) = started(&mut hw);

    app.tick(0, false, &mut http, &mut hw, &mut sink);
    app.tick(LOOP_MS, false, &mut http, &mut hw, &mut sink);
    let cmd = app.tick(2 * LOOP_MS, true, &mut http, &mut hw, &mut sink);

    assert_eq!(cmd.fan, Switch::On);
    assert_eq!(http.requests.len(), 2);
}

// ── Refresh cadence ───────────────────────────────────────────

#[test]
fn thresholds_refresh_every_twenty_seconds() {
    let mut hw = MockHardware::new(22.0, 50.0, 10.0);
    let mut http = MockHttp::serving(18.0, 28.0, 30.0, 5.0);
    let (mut app, mut sink) = started(&mut hw);

    let mut now = 0;
    while now <= 2 * REFRESH_MS {
        app.tick(now, true, &mut http, &mut hw, &mut sink);
        now += LOOP_MS;
    }

    let fetches = http.requests.iter().filter(|u| **u == fetch_url()).count();
    let discoveries = http.requests.len() - fetches;
    assert_eq!(fetches, 3, "fetches at 0 s, 20 s and 40 s");
    assert_eq!(discoveries, 1, "profile is selected only once");
    assert_eq!(app.tick_count(), 21);
}

#[test]
fn new_thresholds_take_effect_on_refresh() {
    let mut hw = MockHardware::new(25.0, 50.0, 10.0);
    let mut http = MockHttp::serving(18.0, 28.0, 30.0, 5.0);
    let (mut app, mut sink) = started(&mut hw);

    assert_eq!(app.tick(0, true, &mut http, &mut hw, &mut sink).fan, Switch::Off);

    http.route(
        &fetch_url(),
        200,
        r#"{"minTemp":15,"maxTemp":22,"minSoilMoisture":30,"minWaterLevel":5}"#,
    );
    assert_eq!(app.tick(LOOP_MS, true, &mut http, &mut hw, &mut sink).fan, Switch::Off);
    assert_eq!(app.tick(REFRESH_MS, true, &mut http, &mut hw, &mut sink).fan, Switch::On);
}

// ── Failure handling ──────────────────────────────────────────

#[test]
fn failed_fetch_keeps_previous_thresholds() {
    let mut hw = MockHardware::new(30.0, 50.0, 10.0);
    let mut http = MockHttp::serving(18.0, 28.0, 30.0, 5.0);
    let (mut app, mut sink) = started(&mut hw);

    app.tick(0, true, &mut http, &mut hw, &mut sink);
    let before = *app.thresholds().unwrap();

    http.fail(&fetch_url(), TransportError::Timeout);
    let cmd = app.tick(REFRESH_MS, true, &mut http, &mut hw, &mut sink);

    assert_eq!(*app.thresholds().unwrap(), before);
    assert_eq!(cmd.fan, Switch::On);
    assert!(sink.events.iter().any(|e| matches!(
        e,
        AppEvent::SyncFailed {
            stage: SyncStage::Fetch,
            error: Error::Transport(TransportError::Timeout),
        }
    )));
}

#[test]
fn server_error_status_keeps_previous_thresholds() {
    let mut hw = MockHardware::new(30.0, 50.0, 10.0);
    let mut http = MockHttp::serving(18.0, 28.0, 30.0, 5.0);
    let (mut app, mut sink) = started(&mut hw);

    app.tick(0, true, &mut http, &mut hw, &mut sink);
    http.route(&fetch_url(), 503, "unavailable");
    app.tick(REFRESH_MS, true, &mut http, &mut hw, &mut sink);

    assert_eq!(app.thresholds().map(|t| t.temp_max), Some(28.0));
    assert!(sink.events.iter().any(|e| matches!(
        e,
        AppEvent::SyncFailed {
            error: Error::Transport(TransportError::Status(503)),
            ..
        }
    )));
}

#[test]
fn inverted_band_from_service_is_rejected() {
    let mut hw = MockHardware::new(25.0, 50.0, 10.0);
    let mut http = MockHttp::serving(18.0, 28.0, 30.0, 5.0);
    let (mut app, mut sink) = started(&mut hw);

    app.tick(0, true, &mut http, &mut hw, &mut sink);
    http.route(
        &fetch_url(),
        200,
        r#"{"minTemp":30,"maxTemp":20,"minSoilMoisture":30,"minWaterLevel":5}"#,
    );
    app.tick(REFRESH_MS, true, &mut http, &mut hw, &mut sink);

    assert_eq!(app.thresholds().map(|t| t.temp_min), Some(18.0));
    assert!(sink.events.iter().any(|e| matches!(
        e,
        AppEvent::SyncFailed {
            error: Error::Parse(ParseError::InvalidRange(_)),
            ..
        }
    )));
}

#[test]
fn discovery_failure_is_retried_on_next_slot() {
    let mut hw = MockHardware::new(30.0, 50.0, 10.0);
    let mut http = MockHttp::serving(18.0, 28.0, 30.0, 5.0);
    http.fail(crate::mock_hw::DISCOVERY_URL, TransportError::ConnectFailed);
    let (mut app, mut sink) = started(&mut hw);

    assert_eq!(app.tick(0, true, &mut http, &mut hw, &mut sink), ActuatorCommand::all_off());
    assert!(app.profile().is_none());

    http.route(crate::mock_hw::DISCOVERY_URL, 200, r#"[{"id":"7"}]"#);
    assert_eq!(app.tick(LOOP_MS, true, &mut http, &mut hw, &mut sink).fan, Switch::Off);
    assert_eq!(app.tick(REFRESH_MS, true, &mut http, &mut hw, &mut sink).fan, Switch::On);
    assert_eq!(app.profile().map(|id| id.as_str()), Some("7"));
}

#[test]
fn sensor_faults_switch_dependent_actuators_off() {
    let mut hw = MockHardware::new(35.0, 10.0, 10.0);
    let mut http = MockHttp::serving(18.0, 28.0, 30.0, 5.0);
    let (mut app, mut sink) = started(&mut hw);

    assert_eq!(app.tick(0, true, &mut http, &mut hw, &mut sink).fan, Switch::On);

    hw.reading.temperature_c = Err(SensorFault::NotANumber);
    hw.reading.water_level_cm = Err(SensorFault::NoEcho);
    let cmd = app.tick(LOOP_MS, true, &mut http, &mut hw, &mut sink);

    assert_eq!(cmd, ActuatorCommand::all_off());
    assert_eq!(hw.relays(), (Switch::Off, Switch::Off, Switch::Off));
}

// ── Actuation reporting ───────────────────────────────────────

#[test]
fn relays_rewritten_every_cycle_but_changes_reported_once() {
    let mut hw = MockHardware::new(30.0, 50.0, 10.0);
    let mut http = MockHttp::serving(18.0, 28.0, 30.0, 5.0);
    let (mut app, mut sink) = started(&mut hw);

    for i in 0..4 {
        app.tick(i * LOOP_MS, true, &mut http, &mut hw, &mut sink);
    }

    let fan_writes = hw
        .calls
        .iter()
        .filter(|c| matches!(c, ActuatorCall::Fan(_)))
        .count();
    assert_eq!(fan_writes, 1 + 4);
    assert_eq!(
        sink.count(|e| matches!(e, AppEvent::ActuatorsChanged { .. })),
        1
    );

    hw.reading = reading(20.0, 50.0, 10.0);
    app.tick(4 * LOOP_MS, true, &mut http, &mut hw, &mut sink);
    assert_eq!(
        sink.count(|e| matches!(e, AppEvent::ActuatorsChanged { .. })),
        2
    );
}

#[test]
fn configured_hysteresis_holds_running_fan() {
    let mut config = test_config();
    config.hysteresis_band = 1.0;
    let mut app = Controller::new(&config);
    let mut hw = MockHardware::new(29.0, 50.0, 10.0);
    let mut http = MockHttp::serving(18.0, 28.0, 30.0, 5.0);
    let mut sink = RecordingSink::new();
    app.start(&mut hw, &mut sink);

    assert_eq!(app.tick(0, true, &mut http, &mut hw, &mut sink).fan, Switch::On);
    hw.reading = reading(27.5, 50.0, 10.0);
    assert_eq!(app.tick(LOOP_MS, true, &mut http, &mut hw, &mut sink).fan, Switch::On);
    hw.reading = reading(26.5, 50.0, 10.0);
    assert_eq!(app.tick(2 * LOOP_MS, true, &mut http, &mut hw, &mut sink).fan, Switch::Off);
}
