//! Adapters: concrete implementations of the port traits.
//!
//! | Adapter    | Implements             | Connects to              |
//! |------------|------------------------|--------------------------|
//! | `hardware` | InputPin, SetDutyCycle | ESP32 GPIO, LEDC PWM     |
//! | `log_sink` | EventSink              | Serial log output        |
//! | `time`     | Clock                  | ESP32 system timer       |

pub mod hardware;
pub mod log_sink;
pub mod time;
