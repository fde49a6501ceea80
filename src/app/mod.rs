//! Application core: the dimmer bank and its ports.
//!
//! The bank owns every configured controller and drives them in order.
//! Time comes in through [`ports::Clock`], diagnostics go out through
//! [`ports::EventSink`]; nothing here touches a concrete HAL.

pub mod events;
pub mod ports;
pub mod service;
