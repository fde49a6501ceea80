//! Port traits: the boundary between the dimmer core and the outside world.
//!
//! ```text
//!   Clock ──▶ DimmerBank (domain) ──▶ EventSink
//! ```
//!
//! Button and PWM channels are not ports of their own: the controllers
//! consume the `embedded-hal` 1.0 `InputPin` / `SetDutyCycle` traits
//! directly, so any HAL (or a mock) plugs in unchanged.

use super::events::DimmerEvent;

// ───────────────────────────────────────────────────────────────
// Clock port (driven adapter: hardware timer → domain)
// ───────────────────────────────────────────────────────────────

/// Monotonic millisecond clock.  Wraps at `u32::MAX`; consumers compare
/// timestamps with `wrapping_sub` only.
pub trait Clock {
    fn now_ms(&self) -> u32;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The bank emits structured [`DimmerEvent`]s through this port.
/// Emitting has no feedback into the fade state; a sink may drop
/// everything.
pub trait EventSink {
    fn emit(&mut self, event: &DimmerEvent);
}
