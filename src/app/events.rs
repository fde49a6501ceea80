//! Outbound dimmer events.
//!
//! The [`DimmerBank`](super::service::DimmerBank) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them.

use crate::fsm::Phase;

/// Structured events emitted by the dimmer core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DimmerEvent {
    /// A controller finished `begin()`.
    Started { channel: u8 },

    /// Per-tick diagnostic snapshot of one controller.
    Tick {
        channel: u8,
        phase: Phase,
        brightness: u8,
    },

    /// A controller moved between phases.
    PhaseChanged { channel: u8, from: Phase, to: Phase },
}
