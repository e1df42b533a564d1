//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements         | Connects to                 |
//! |------------|--------------------|-----------------------------|
//! | `hardware` | SensorPort         | DHT22, soil ADC, HC-SR04    |
//! |            | ActuatorPort       | Relay board GPIOs           |
//! | `http`     | HttpPort           | ESP-IDF HTTP client         |
//! | `log_sink` | EventSink          | Serial log output           |
//! | `time`     | —                  | ESP32 system timer          |
//! | `wifi`     | ConnectivityPort   | ESP-IDF WiFi STA            |

pub mod hardware;
pub mod http;
pub mod log_sink;
pub mod time;
pub mod wifi;
