//! One-button fade dimmer: one button input, one PWM output.
//!
//! ## Hardware
//!
//! Active-low momentary switch with the pull-up enabled, so a released
//! button reads HIGH.  The output is any PWM channel; 8-bit brightness is
//! scaled onto the channel's `max_duty_cycle()`.
//!
//! ## Dual-target design
//!
//! The controller is generic over the `embedded-hal` 1.0 traits.  On
//! ESP-IDF it wraps `GpioButton` + `LedcOutput`; on host tests it wraps
//! mock pins.  All fade decisions come from [`fsm::step`].

use embedded_hal::digital::{Error as _, InputPin};
use embedded_hal::pwm::{Error as _, SetDutyCycle};
use log::info;

use crate::error::{Error, Result};
use crate::fsm::{self, FadeState, FadeTiming, Phase, ReleasePolicy};

/// Outcome of one [`DimmerController::update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub channel: u8,
    pub from: Phase,
    pub phase: Phase,
    pub brightness: u8,
}

impl Tick {
    pub fn phase_changed(&self) -> bool {
        self.from != self.phase
    }
}

pub struct DimmerController<B, O> {
    channel: u8,
    button: B,
    output: O,
    state: FadeState,
    timing: FadeTiming,
    policy: ReleasePolicy,
    started: bool,
}

impl<B, O> DimmerController<B, O>
where
    B: InputPin,
    O: SetDutyCycle,
{
    /// `channel` identifies this dimmer in diagnostics (the output GPIO
    /// by convention).  The pins are owned for the controller's lifetime.
    pub fn new(
        channel: u8,
        button: B,
        output: O,
        timing: FadeTiming,
        policy: ReleasePolicy,
    ) -> Self {
        Self {
            channel,
            button,
            output,
            state: FadeState::default(),
            timing,
            policy,
            started: false,
        }
    }

    /// Controller with the stock 50 ms / 10 ms timing.
    pub fn with_defaults(channel: u8, button: B, output: O) -> Self {
        Self::new(
            channel,
            button,
            output,
            FadeTiming::default(),
            ReleasePolicy::default(),
        )
    }

    /// One-time setup: drive the output fully off and arm the controller.
    /// Pin modes (input + pull-up, PWM) are fixed by the HAL types handed
    /// to [`new`](Self::new).
    pub fn begin(&mut self) -> Result<()> {
        self.output
            .set_duty_cycle_fully_off()
            .map_err(|e| e.kind())?;
        self.state = FadeState::default();
        self.started = true;
        info!("dimmer[{}]: ready", self.channel);
        Ok(())
    }

    /// Advance the fade by one tick at `now_ms`.
    ///
    /// Reads the button exactly once and writes the output only when the
    /// brightness step produced a new duty.  Safe to call as often as the
    /// caller likes; stepping is throttled by the configured intervals.
    pub fn update(&mut self, now_ms: u32) -> Result<Tick> {
        if !self.started {
            return Err(Error::NotStarted {
                channel: self.channel,
            });
        }

        let pressed = self.button.is_low().map_err(|e| e.kind())?;
        let from = self.state.phase;
        let transition = fsm::step(self.state, pressed, now_ms, self.timing, self.policy);

        if let Some(duty) = transition.write {
            self.write_duty(duty)?;
        }
        self.state = transition.next;

        Ok(Tick {
            channel: self.channel,
            from,
            phase: self.state.phase,
            brightness: self.state.brightness,
        })
    }

    fn write_duty(&mut self, brightness: u8) -> Result<()> {
        self.output
            .set_duty_cycle_fraction(u16::from(brightness), u16::from(u8::MAX))
            .map_err(|e| e.kind())?;
        Ok(())
    }

    pub fn channel(&self) -> u8 {
        self.channel
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn brightness(&self) -> u8 {
        self.state.brightness
    }

    pub fn is_started(&self) -> bool {
        self.started
    }
}
