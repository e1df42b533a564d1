//! DHT22 (AM2302) single-wire temperature / humidity driver.
//!
//! ## Frame format
//!
//! 40 bits, MSB first: humidity ×10 (16 bit), temperature ×10 (15 bit +
//! sign bit), checksum (low byte of the sum of the first four bytes).
//!
//! ## Dual-target design
//!
//! On ESP-IDF: bit-bangs the data line via hw_init helpers.  Any timeout or
//! checksum mismatch is reported as NaN, matching the usual driver contract.
//! On host/test: only the frame decoder is compiled.

/// High pulses longer than this encode a `1` bit (0 ≈ 26 µs, 1 ≈ 70 µs).
#[cfg(target_os = "espidf")]
const BIT_ONE_THRESHOLD_US: u32 = 48;

/// Decode a raw frame into `(celsius, humidity_pct)`.
/// Returns `None` when the checksum does not match.
pub fn decode(frame: [u8; 5]) -> Option<(f32, f32)> {
    let sum = frame[..4].iter().fold(0u8, |acc, b| acc.wrapping_add(*b));
    if sum != frame[4] {
        return None;
    }
    let humidity = f32::from(u16::from_be_bytes([frame[0], frame[1]])) / 10.0;
    let magnitude = f32::from(u16::from_be_bytes([frame[2] & 0x7F, frame[3]])) / 10.0;
    let celsius = if frame[2] & 0x80 != 0 { -magnitude } else { magnitude };
    Some((celsius, humidity))
}

/// Run one transaction.  Returns `(NaN, NaN)` on any failure.
#[cfg(target_os = "espidf")]
pub fn read() -> (f32, f32) {
    read_frame()
        .and_then(decode)
        .unwrap_or((f32::NAN, f32::NAN))
}

#[cfg(target_os = "espidf")]
fn read_frame() -> Option<[u8; 5]> {
    use esp_idf_hal::delay::Ets;

    use crate::drivers::hw_init::{gpio_write, wait_for_level};
    use crate::pins::DHT_DATA_GPIO as PIN;

    // Start signal: hold the line low for > 1 ms, then release it.
    gpio_write(PIN, false);
    Ets::delay_us(1_100);
    gpio_write(PIN, true);

    // Sensor response: ~80 µs low, ~80 µs high, then the first bit's preamble.
    wait_for_level(PIN, false, 100)?;
    wait_for_level(PIN, true, 100)?;
    wait_for_level(PIN, false, 100)?;

    let mut frame = [0u8; 5];
    for bit in 0..40 {
        wait_for_level(PIN, true, 80)?;
        let high_us = wait_for_level(PIN, false, 100)?;
        if high_us > BIT_ONE_THRESHOLD_US {
            frame[bit / 8] |= 0x80 >> (bit % 8);
        }
    }
    Some(frame)
}
