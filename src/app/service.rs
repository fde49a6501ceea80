//! Dimmer bank: the ordered set of controllers the main loop drives.
//!
//! [`DimmerBank`] is built once from [`DimmerConfig`] and owned by the
//! caller; there is no global instance table.  Each pass hands every
//! controller the same timestamp, in configuration order.
//!
//! ```text
//!  Clock ──▶ ┌──────────────────────────────┐ ──▶ EventSink
//!            │ DimmerBank                   │
//!            │  [ctrl 0] [ctrl 1] … [ctrl n]│ ──▶ PWM outputs
//!            └──────────────────────────────┘
//! ```

use embedded_hal::digital::InputPin;
use embedded_hal::pwm::SetDutyCycle;
use heapless::Vec;
use log::{info, warn};

use crate::config::{ChannelPair, DimmerConfig, MAX_DIMMERS};
use crate::drivers::dimmer::DimmerController;
use crate::error::{Error, Result};
use crate::fsm::{FadeTiming, ReleasePolicy};

use super::events::DimmerEvent;
use super::ports::{Clock, EventSink};

// ───────────────────────────────────────────────────────────────
// DimmerBank
// ───────────────────────────────────────────────────────────────

pub struct DimmerBank<B, O> {
    dimmers: Vec<DimmerController<B, O>, MAX_DIMMERS>,
    timing: FadeTiming,
    policy: ReleasePolicy,
    tick_count: u64,
}

impl<B, O> DimmerBank<B, O>
where
    B: InputPin,
    O: SetDutyCycle,
{
    /// Empty bank sharing `config`'s timing and release policy.
    pub fn new(config: &DimmerConfig) -> Self {
        Self {
            dimmers: Vec::new(),
            timing: config.timing,
            policy: config.release_policy,
            tick_count: 0,
        }
    }

    /// Validate `config` and create one controller per channel pair.
    ///
    /// `make_pins` turns a [`ChannelPair`] into the concrete HAL pins.
    pub fn from_config<F>(config: &DimmerConfig, mut make_pins: F) -> Result<Self>
    where
        F: FnMut(ChannelPair) -> Result<(B, O)>,
    {
        config.validate()?;
        let mut bank = Self::new(config);
        for &pair in &config.channels {
            let (button, output) = make_pins(pair)?;
            bank.add(pair.output_gpio, button, output)?;
        }
        info!("DimmerBank: {} dimmer(s) configured", bank.len());
        Ok(bank)
    }

    /// Append a controller.  Channels must be unique.
    pub fn add(&mut self, channel: u8, button: B, output: O) -> Result<()> {
        if self.dimmers.iter().any(|d| d.channel() == channel) {
            return Err(Error::Config("duplicate dimmer channel"));
        }
        let dimmer = DimmerController::new(channel, button, output, self.timing, self.policy);
        self.dimmers
            .push(dimmer)
            .map_err(|_| Error::Config("too many dimmers"))
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Run `begin()` on every controller, in order.  Stops at the first
    /// failure: a dimmer that cannot be set up is a wiring fault.
    pub fn begin_all(&mut self, sink: &mut impl EventSink) -> Result<()> {
        for dimmer in &mut self.dimmers {
            dimmer.begin()?;
            sink.emit(&DimmerEvent::Started {
                channel: dimmer.channel(),
            });
        }
        Ok(())
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Update every controller with the same `now_ms`.
    ///
    /// A pin error on one dimmer does not starve the others; the first
    /// error seen is returned once the whole pass is done.
    pub fn tick(&mut self, now_ms: u32, sink: &mut impl EventSink) -> Result<()> {
        self.tick_count = self.tick_count.wrapping_add(1);
        let mut first_err = None;

        for dimmer in &mut self.dimmers {
            match dimmer.update(now_ms) {
                Ok(tick) => {
                    sink.emit(&DimmerEvent::Tick {
                        channel: tick.channel,
                        phase: tick.phase,
                        brightness: tick.brightness,
                    });
                    if tick.phase_changed() {
                        sink.emit(&DimmerEvent::PhaseChanged {
                            channel: tick.channel,
                            from: tick.from,
                            to: tick.phase,
                        });
                    }
                }
                Err(e) => {
                    warn!("dimmer[{}]: update failed: {}", dimmer.channel(), e);
                    first_err.get_or_insert(e);
                }
            }
        }

        first_err.map_or(Ok(()), Err)
    }

    /// Read `clock` once and run [`tick`](Self::tick) with that value.
    pub fn tick_now(&mut self, clock: &impl Clock, sink: &mut impl EventSink) -> Result<()> {
        let now_ms = clock.now_ms();
        self.tick(now_ms, sink)
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn len(&self) -> usize {
        self.dimmers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dimmers.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&DimmerController<B, O>> {
        self.dimmers.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &DimmerController<B, O>> {
        self.dimmers.iter()
    }

    /// Number of completed [`tick`](Self::tick) passes (wraps).
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }
}
