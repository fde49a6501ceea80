//! System configuration parameters
//!
//! Fade timing, the release policy, and the list of button/LED pairs
//! driven by the bank.  Defaults reproduce the classic single-button
//! dimmer behaviour.

use heapless::Vec;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::fsm::{FadeTiming, ReleasePolicy};
use crate::pins;

/// Upper bound on simultaneously driven button/LED pairs.
pub const MAX_DIMMERS: usize = 8;

/// One button input paired with one PWM output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelPair {
    /// GPIO of the active-low push-button.
    pub button_gpio: u8,
    /// GPIO of the PWM-capable LED output.  Doubles as the channel id in
    /// diagnostics.
    pub output_gpio: u8,
}

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimmerConfig {
    // --- Fade ---
    /// Step intervals for fading up and down.
    pub timing: FadeTiming,
    /// What happens when a fade-down reaches zero with the button held.
    pub release_policy: ReleasePolicy,

    // --- Timing ---
    /// Delay between polling passes over all dimmers (milliseconds).
    /// Zero means poll as fast as possible; the fade self-throttles.
    pub poll_interval_ms: u32,

    // --- Wiring ---
    /// Button/LED pairs, driven in this order.
    pub channels: Vec<ChannelPair, MAX_DIMMERS>,
}

impl Default for DimmerConfig {
    fn default() -> Self {
        let mut channels = Vec::new();
        // Capacity is MAX_DIMMERS, a single push cannot overflow.
        let _ = channels.push(ChannelPair {
            button_gpio: pins::DIMMER0_BUTTON_GPIO,
            output_gpio: pins::DIMMER0_LED_GPIO,
        });

        Self {
            timing: FadeTiming::default(),
            release_policy: ReleasePolicy::default(),
            poll_interval_ms: 1,
            channels,
        }
    }
}

impl DimmerConfig {
    /// Poll period the loop actually gets from a tick-based delay of
    /// `poll_interval_ms` on a scheduler running at `tick_rate_hz`.
    ///
    /// The delay rounds up to whole ticks, so at 100 Hz a 1 ms request
    /// sleeps 10 ms.
    pub fn effective_poll_ms(&self, tick_rate_hz: u32) -> u32 {
        if self.poll_interval_ms == 0 || tick_rate_hz == 0 {
            return self.poll_interval_ms;
        }
        let ticks = (u64::from(self.poll_interval_ms) * u64::from(tick_rate_hz)).div_ceil(1_000);
        u32::try_from(ticks * 1_000 / u64::from(tick_rate_hz)).unwrap_or(u32::MAX)
    }

    /// Reject wiring that names a missing pin or lets two controllers
    /// share one.
    pub fn validate(&self) -> Result<()> {
        if self.channels.is_empty() {
            return Err(Error::Config("no dimmer channels configured"));
        }
        if self.timing.up_interval_ms == 0 || self.timing.down_interval_ms == 0 {
            return Err(Error::Config("fade intervals must be non-zero"));
        }

        for (i, pair) in self.channels.iter().enumerate() {
            if pair.button_gpio >= pins::GPIO_COUNT || pair.output_gpio >= pins::GPIO_COUNT {
                return Err(Error::Config("GPIO number out of range"));
            }
            if pair.button_gpio == pair.output_gpio {
                return Err(Error::Config("button and output share a GPIO"));
            }
            for other in &self.channels[i + 1..] {
                let a = [pair.button_gpio, pair.output_gpio];
                if a.contains(&other.button_gpio) || a.contains(&other.output_gpio) {
                    return Err(Error::Config("GPIO used by more than one dimmer"));
                }
            }
        }
        Ok(())
    }
}
