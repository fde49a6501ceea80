//! GPIO / peripheral pin assignments for the dimmer board.
//!
//! Single source of truth for the default wiring.  Each button/LED pair
//! becomes one [`ChannelPair`](crate::config::ChannelPair) in the default
//! configuration; change a pin here and it propagates everywhere.

/// GPIO numbers on the ESP32-S3 run 0..=48.
pub const GPIO_COUNT: u8 = 49;

// ---------------------------------------------------------------------------
// Dimmer 0
// ---------------------------------------------------------------------------

/// Momentary push-button, active-low with the internal pull-up enabled.
pub const DIMMER0_BUTTON_GPIO: u8 = 1;
/// LEDC PWM output driving the LED (active HIGH).
pub const DIMMER0_LED_GPIO: u8 = 2;

// ---------------------------------------------------------------------------
// PWM configuration
// ---------------------------------------------------------------------------

/// LEDC timer resolution (bits).  8-bit gives 0 – 255 duty levels, which
/// maps one-to-one onto dimmer brightness.
pub const PWM_RESOLUTION_BITS: u32 = 8;
/// LEDC base frequency for the LED outputs (1 kHz, flicker-free).
pub const LED_PWM_FREQ_HZ: u32 = 1_000;
