//! HC-SR04 ultrasonic range finder.
//!
//! A 10 µs trigger pulse starts a ping; the echo pin stays high for the
//! round-trip time of the sound burst.

/// Returned when no echo arrives within the timeout.
pub const NO_ECHO: f32 = -1.0;

/// Speed of sound at ~20 °C in cm/µs.
const SOUND_CM_PER_US: f32 = 0.0343;

/// Echo windows longer than this (~4 m round trip) are treated as lost.
#[cfg(target_os = "espidf")]
const ECHO_TIMEOUT_US: u32 = 25_000;

/// Convert a round-trip echo time to a one-way distance.
pub fn echo_to_cm(echo_us: u32) -> f32 {
    echo_us as f32 * SOUND_CM_PER_US / 2.0
}

/// Fire one ping and return the distance in cm, or [`NO_ECHO`].
#[cfg(target_os = "espidf")]
pub fn measure_cm() -> f32 {
    use esp_idf_hal::delay::Ets;

    use crate::drivers::hw_init::{gpio_write, wait_for_level};
    use crate::pins::{ULTRASONIC_ECHO_GPIO as ECHO, ULTRASONIC_TRIG_GPIO as TRIG};

    gpio_write(TRIG, false);
    Ets::delay_us(2);
    gpio_write(TRIG, true);
    Ets::delay_us(10);
    gpio_write(TRIG, false);

    if wait_for_level(ECHO, true, ECHO_TIMEOUT_US).is_none() {
        return NO_ECHO;
    }
    match wait_for_level(ECHO, false, ECHO_TIMEOUT_US) {
        Some(us) => echo_to_cm(us),
        None => NO_ECHO,
    }
}
