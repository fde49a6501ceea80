//! Fade state machine as a pure transition function.
//!
//! ```text
//!            press                 release (after up interval)
//!   ┌──────┐ ─────▶ ┌──────────┐ ───────────────────────────▶ ┌─────────┐
//!   │ Idle │        │ FadingUp │  +1 every up interval        │ Holding │
//!   └──────┘ ◀─┐    └──────────┘  while held (max 255)        └─────────┘
//!              │                                                   │ press (after
//!              │    ┌────────────┐                                 │ down interval)
//!              └────│ FadingDown │ ◀───────────────────────────────┘
//!     0 + released  └────────────┘  −1 every down interval
//! ```
//!
//! [`step`] maps `(state, button level, now)` to the next state plus an
//! optional duty write.  It touches no hardware, so the whole cycle is
//! testable on the host.
//!
//! Elapsed time is `now.wrapping_sub(last)` on `u32` milliseconds, which
//! stays correct across the ~49.7 day counter wrap as long as the true gap
//! is below `u32::MAX`.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Phase
// ---------------------------------------------------------------------------

/// Position within one press/fade cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum Phase {
    /// Output off, waiting for a press.
    #[default]
    Idle = 0,
    /// Button held, brightness climbing.
    FadingUp = 1,
    /// Level latched until the next press.
    Holding = 2,
    /// Brightness falling towards zero.
    FadingDown = 3,
}

impl Phase {
    /// Numeric form used in the per-tick diagnostic line.
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::FadingUp => "FadingUp",
            Self::Holding => "Holding",
            Self::FadingDown => "FadingDown",
        }
    }
}

// ---------------------------------------------------------------------------
// Tunables
// ---------------------------------------------------------------------------

/// Minimum gaps between brightness steps.  A step fires only once the
/// elapsed time is strictly greater than the interval, so the effective
/// period is `interval + 1` ms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FadeTiming {
    /// Step interval while fading up.  Also debounces the release.
    pub up_interval_ms: u32,
    /// Step interval while fading down, and the re-press guard in Holding.
    pub down_interval_ms: u32,
}

impl Default for FadeTiming {
    fn default() -> Self {
        Self {
            up_interval_ms: 50,
            down_interval_ms: 10,
        }
    }
}

/// Behaviour when a fade-down reaches zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ReleasePolicy {
    /// Stay in FadingDown at zero until the button is released, so the
    /// same press cannot start a new fade-up.
    #[default]
    WaitForRelease,
    /// Return to Idle as soon as brightness hits zero.  A button still
    /// held will restart the fade-up on the next tick.
    ImmediateIdle,
}

// ---------------------------------------------------------------------------
// State + transition
// ---------------------------------------------------------------------------

/// Everything the fade cycle remembers between ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FadeState {
    pub phase: Phase,
    /// Current duty, 0–255.
    pub brightness: u8,
    /// Time of the last step or press-driven transition.
    pub last_transition_ms: u32,
}

/// Result of one [`step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub next: FadeState,
    /// Duty to write to the output, if this tick produced one.
    pub write: Option<u8>,
}

impl Transition {
    fn stay(state: FadeState) -> Self {
        Self {
            next: state,
            write: None,
        }
    }
}

/// Advance the fade cycle by one tick.
///
/// `pressed` is the already-decoded button level (active-low handled by
/// the caller).  Every `(phase, pressed, elapsed)` combination has a
/// defined successor.
pub fn step(
    state: FadeState,
    pressed: bool,
    now_ms: u32,
    timing: FadeTiming,
    policy: ReleasePolicy,
) -> Transition {
    let elapsed = now_ms.wrapping_sub(state.last_transition_ms);

    match state.phase {
        Phase::Idle => {
            if !pressed {
                return Transition::stay(state);
            }
            let next = FadeState {
                phase: Phase::FadingUp,
                brightness: 1,
                last_transition_ms: now_ms,
            };
            Transition {
                next,
                write: Some(next.brightness),
            }
        }

        Phase::FadingUp => {
            if elapsed <= timing.up_interval_ms {
                return Transition::stay(state);
            }
            if pressed {
                let next = FadeState {
                    phase: Phase::FadingUp,
                    brightness: state.brightness.saturating_add(1),
                    last_transition_ms: now_ms,
                };
                Transition {
                    next,
                    write: Some(next.brightness),
                }
            } else {
                // Timestamp deliberately carried over into Holding.
                Transition::stay(FadeState {
                    phase: Phase::Holding,
                    ..state
                })
            }
        }

        Phase::Holding => {
            if !pressed || elapsed <= timing.down_interval_ms {
                return Transition::stay(state);
            }
            let next = FadeState {
                phase: Phase::FadingDown,
                brightness: state.brightness.saturating_sub(1),
                last_transition_ms: now_ms,
            };
            Transition {
                next,
                write: Some(next.brightness),
            }
        }

        Phase::FadingDown => {
            if elapsed <= timing.down_interval_ms {
                return Transition::stay(state);
            }
            let brightness = state.brightness.saturating_sub(1);
            let back_to_idle = brightness == 0
                && match policy {
                    ReleasePolicy::WaitForRelease => !pressed,
                    ReleasePolicy::ImmediateIdle => true,
                };
            let next = FadeState {
                phase: if back_to_idle {
                    Phase::Idle
                } else {
                    Phase::FadingDown
                },
                brightness,
                last_transition_ms: now_ms,
            };
            Transition {
                next,
                write: Some(brightness),
            }
        }
    }
}
