//! Hardware adapter: exposes raw ESP-IDF GPIO / LEDC as `embedded-hal` pins.
//!
//! [`GpioButton`] implements `InputPin` over [`hw_init::gpio_read`] and
//! [`LedcOutput`] implements `SetDutyCycle` over [`hw_init::ledc_set`], so
//! the generic [`DimmerController`](crate::drivers::dimmer::DimmerController)
//! runs unchanged on the board.  Pins must have been configured with
//! [`hw_init::init_dimmer_pins`] first.  On non-espidf targets the
//! underlying calls are simulation stubs.

use embedded_hal::{digital, pwm};

use crate::config::ChannelPair;
use crate::drivers::hw_init;
use crate::error::Result;

/// ESP-IDF error code from a failed pin operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EspPinError(pub i32);

impl digital::Error for EspPinError {
    fn kind(&self) -> digital::ErrorKind {
        digital::ErrorKind::Other
    }
}

impl pwm::Error for EspPinError {
    fn kind(&self) -> pwm::ErrorKind {
        pwm::ErrorKind::Other
    }
}

// ── Button input ──────────────────────────────────────────────

/// Pull-up button input; pressed reads LOW.
pub struct GpioButton {
    gpio: i32,
}

impl GpioButton {
    pub fn new(gpio: u8) -> Self {
        Self {
            gpio: i32::from(gpio),
        }
    }
}

impl digital::ErrorType for GpioButton {
    type Error = EspPinError;
}

impl digital::InputPin for GpioButton {
    fn is_high(&mut self) -> core::result::Result<bool, Self::Error> {
        Ok(hw_init::gpio_read(self.gpio))
    }

    fn is_low(&mut self) -> core::result::Result<bool, Self::Error> {
        Ok(!hw_init::gpio_read(self.gpio))
    }
}

// ── PWM output ────────────────────────────────────────────────

/// 8-bit LEDC channel.
pub struct LedcOutput {
    channel: u32,
}

impl LedcOutput {
    pub fn new(channel: u32) -> Self {
        Self { channel }
    }
}

impl pwm::ErrorType for LedcOutput {
    type Error = EspPinError;
}

impl pwm::SetDutyCycle for LedcOutput {
    fn max_duty_cycle(&self) -> u16 {
        u16::from(u8::MAX)
    }

    fn set_duty_cycle(&mut self, duty: u16) -> core::result::Result<(), Self::Error> {
        let duty = duty.min(u16::from(u8::MAX)) as u8;
        hw_init::ledc_set(self.channel, duty).map_err(EspPinError)
    }
}

/// Pin factory for [`DimmerBank::from_config`](crate::app::service::DimmerBank::from_config):
/// hands out LEDC channels in configuration order.
pub fn board_pins() -> impl FnMut(ChannelPair) -> Result<(GpioButton, LedcOutput)> {
    let mut next = 0usize;
    move |pair| {
        let channel = hw_init::ledc_channel_for(next);
        next += 1;
        Ok((GpioButton::new(pair.button_gpio), LedcOutput::new(channel)))
    }
}
