//! One-shot hardware peripheral initialization and raw pin helpers.
//!
//! Configures the soil-probe ADC channel and the sensor GPIOs using raw
//! ESP-IDF sys calls.  Called once from `main()` before the control loop
//! starts.  Relay outputs are not configured here; they are owned by
//! `esp-idf-hal` pin drivers (see [`crate::drivers::relay`]).

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

#[cfg(target_os = "espidf")]
use crate::error::SensorFault;
#[cfg(target_os = "espidf")]
use crate::pins;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    AdcInitFailed(i32),
    GpioConfigFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::AdcInitFailed(rc) => write!(f, "ADC1 init failed (rc={})", rc),
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={})", rc),
        }
    }
}

#[cfg(target_os = "espidf")]
pub fn init_peripherals() -> Result<(), HwInitError> {
    // SAFETY: Called once from main() before the control loop; single-threaded.
    unsafe {
        init_adc()?;
        init_sensor_gpio()?;
    }
    info!("hw_init: all peripherals configured");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): peripheral init skipped");
    Ok(())
}

// ── ADC (oneshot) ─────────────────────────────────────────────

#[cfg(target_os = "espidf")]
static mut ADC1_HANDLE: adc_oneshot_unit_handle_t = core::ptr::null_mut();

/// SAFETY: Must be called only from the single-threaded init path or the
/// main-loop ADC read path.  `init_adc()` completes before the loop starts.
#[cfg(target_os = "espidf")]
unsafe fn adc1_handle() -> adc_oneshot_unit_handle_t {
    unsafe { ADC1_HANDLE }
}

#[cfg(target_os = "espidf")]
unsafe fn init_adc() -> Result<(), HwInitError> {
    let init_cfg = adc_oneshot_unit_init_cfg_t {
        unit_id: adc_unit_t_ADC_UNIT_1,
        ulp_mode: adc_ulp_mode_t_ADC_ULP_MODE_DISABLE,
        ..Default::default()
    };
    // SAFETY: ADC1_HANDLE is only written here, once at boot.
    let ret = unsafe { adc_oneshot_new_unit(&init_cfg, &raw mut ADC1_HANDLE) };
    if ret != ESP_OK as i32 { return Err(HwInitError::AdcInitFailed(ret)); }

    // 12 dB attenuation covers the probe's 0 – 3.1 V output swing.
    let chan_cfg = adc_oneshot_chan_cfg_t {
        atten: adc_atten_t_ADC_ATTEN_DB_12,
        bitwidth: adc_bitwidth_t_ADC_BITWIDTH_12,
    };

    let ret = unsafe { adc_oneshot_config_channel(adc1_handle(), pins::SOIL_ADC_CHANNEL, &chan_cfg) };
    if ret != ESP_OK as i32 { return Err(HwInitError::AdcInitFailed(ret)); }

    info!("hw_init: ADC1 configured (CH{}=soil)", pins::SOIL_ADC_CHANNEL);
    Ok(())
}

/// Oneshot ADC1 read.
#[cfg(target_os = "espidf")]
pub fn adc1_read(channel: u32) -> Result<u16, SensorFault> {
    let mut raw: i32 = 0;
    // SAFETY: adc1_handle() contract; single-threaded main-loop access only.
    let ret = unsafe { adc_oneshot_read(adc1_handle(), channel, &mut raw) };
    if ret != ESP_OK as i32 {
        log::warn!("hw_init: ADC1 CH{} read failed (rc={})", channel, ret);
        return Err(SensorFault::AdcReadFailed);
    }
    Ok(raw.max(0) as u16)
}

// ── Sensor GPIOs ──────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_sensor_gpio() -> Result<(), HwInitError> {
    let configs = [
        // DHT22 data: open-drain so the sensor can pull the line low.
        (pins::DHT_DATA_GPIO, gpio_mode_t_GPIO_MODE_INPUT_OUTPUT_OD, gpio_pullup_t_GPIO_PULLUP_ENABLE),
        (pins::ULTRASONIC_TRIG_GPIO, gpio_mode_t_GPIO_MODE_OUTPUT, gpio_pullup_t_GPIO_PULLUP_DISABLE),
        (pins::ULTRASONIC_ECHO_GPIO, gpio_mode_t_GPIO_MODE_INPUT, gpio_pullup_t_GPIO_PULLUP_DISABLE),
    ];

    for &(pin, mode, pull_up_en) in &configs {
        let cfg = gpio_config_t {
            pin_bit_mask: 1u64 << pin,
            mode,
            pull_up_en,
            pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
            intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
        };
        let ret = unsafe { gpio_config(&cfg) };
        if ret != ESP_OK as i32 { return Err(HwInitError::GpioConfigFailed(ret)); }
    }

    // Idle levels: DHT line released (high), trigger low.
    unsafe {
        gpio_set_level(pins::DHT_DATA_GPIO, 1);
        gpio_set_level(pins::ULTRASONIC_TRIG_GPIO, 0);
    }

    info!("hw_init: sensor GPIOs configured");
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_read(pin: i32) -> bool {
    // SAFETY: gpio_get_level is a read-only register access on an
    // already-configured input pin; safe to call from main context.
    (unsafe { gpio_get_level(pin) }) != 0
}

#[cfg(target_os = "espidf")]
pub fn gpio_write(pin: i32, high: bool) {
    // SAFETY: gpio_set_level writes to a pin configured in init_sensor_gpio().
    unsafe { gpio_set_level(pin, u32::from(high)); }
}

/// Microseconds since boot.
#[cfg(target_os = "espidf")]
pub fn now_us() -> i64 {
    // SAFETY: esp_timer_get_time is a monotonic counter read.
    unsafe { esp_timer_get_time() }
}

/// Busy-wait until `pin` reads `level`.  Returns the elapsed microseconds,
/// or `None` once `timeout_us` has passed.
#[cfg(target_os = "espidf")]
pub fn wait_for_level(pin: i32, level: bool, timeout_us: u32) -> Option<u32> {
    let start = now_us();
    loop {
        let elapsed = now_us() - start;
        if gpio_read(pin) == level {
            return Some(elapsed as u32);
        }
        if elapsed > i64::from(timeout_us) {
            return None;
        }
    }
}
