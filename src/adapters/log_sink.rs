//! Log-based event sink adapters.
//!
//! [`LogEventSink`] writes dimmer events through the `log` facade (which
//! goes to UART / USB-CDC via the ESP-IDF logger in production).
//! [`NullSink`] drops everything.

use log::{debug, info};

use crate::app::events::DimmerEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`DimmerEvent`] to the serial console.
///
/// Per-tick lines go out at `debug` level as
/// `<channel>\t<phase number>\t<brightness>` so they stay quiet unless
/// asked for.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &DimmerEvent) {
        match event {
            DimmerEvent::Tick {
                channel,
                phase,
                brightness,
            } => {
                debug!("{}\t{}\t{}", channel, phase.as_u8(), brightness);
            }
            DimmerEvent::PhaseChanged { channel, from, to } => {
                info!("PHASE | ch={} | {} -> {}", channel, from.name(), to.name());
            }
            DimmerEvent::Started { channel } => {
                info!("START | ch={}", channel);
            }
        }
    }
}

/// Sink that discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: &DimmerEvent) {}
}
