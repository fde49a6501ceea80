//! Unified error type for the dimmer firmware.
//!
//! The fade state machine itself has no error states: every combination of
//! phase, button level and elapsed time has a defined successor.  What can
//! fail is the plumbing around it (a HAL pin read or duty write, a bad
//! configuration, a controller driven before `begin()`).  All variants are
//! `Copy` so they pass through the bank without allocation.

use core::fmt;

use embedded_hal::{digital, pwm};

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Reading the button input failed.
    Input(digital::ErrorKind),
    /// Writing the PWM duty cycle failed.
    Output(pwm::ErrorKind),
    /// `update()` was called on a controller that never ran `begin()`.
    NotStarted { channel: u8 },
    /// Configuration is invalid.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Input(kind) => write!(f, "button input: {kind}"),
            Self::Output(kind) => write!(f, "pwm output: {kind}"),
            Self::NotStarted { channel } => {
                write!(f, "dimmer on channel {channel} used before begin()")
            }
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl core::error::Error for Error {}

impl From<digital::ErrorKind> for Error {
    fn from(kind: digital::ErrorKind) -> Self {
        Self::Input(kind)
    }
}

impl From<pwm::ErrorKind> for Error {
    fn from(kind: pwm::ErrorKind) -> Self {
        Self::Output(kind)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
