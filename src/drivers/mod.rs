//! Per-channel drivers and one-shot hardware initialisation.

pub mod dimmer;
pub mod hw_init;
