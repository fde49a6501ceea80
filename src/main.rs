//! Dimmer firmware entry point.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                  Adapters (outer ring)                   │
//! │                                                          │
//! │  GpioButton / LedcOutput   LogEventSink    SystemClock   │
//! │  (InputPin / SetDutyCycle) (EventSink)     (Clock)       │
//! │                                                          │
//! │  ───────────────── Port / HAL trait boundary ──────────  │
//! │                                                          │
//! │  ┌────────────────────────────────────────────────────┐  │
//! │  │  DimmerBank → DimmerController × n → fsm::step     │  │
//! │  └────────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

// ── Imports ───────────────────────────────────────────────────
use anyhow::Result;
use log::{error, info, warn};

use dimmer::adapters::hardware::board_pins;
use dimmer::adapters::log_sink::LogEventSink;
use dimmer::adapters::time::SystemClock;
use dimmer::app::ports::Clock;
use dimmer::app::service::DimmerBank;
use dimmer::config::DimmerConfig;
use dimmer::drivers::hw_init;

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  Dimmer v{}                          ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration ──────────────────────────────────────
    // Validated by DimmerBank::from_config below.
    let config = DimmerConfig::default();

    // ── 3. Configure pins ─────────────────────────────────────
    if let Err(e) = hw_init::init_dimmer_pins(&config.channels) {
        error!("HAL init failed: {}, halting", e);
        #[allow(clippy::empty_loop)]
        loop {}
    }

    // ── 4. Build and start the dimmers ────────────────────────
    let mut bank = DimmerBank::from_config(&config, board_pins())?;
    let mut log_sink = LogEventSink::new();
    bank.begin_all(&mut log_sink)?;

    let clock = SystemClock::new();
    let tick_hz = esp_idf_svc::sys::configTICK_RATE_HZ;
    let poll_ms = config.effective_poll_ms(tick_hz);
    if poll_ms != config.poll_interval_ms {
        warn!(
            "poll interval {} ms runs at {} ms on a {} Hz tick; fade steps will lag",
            config.poll_interval_ms, poll_ms, tick_hz
        );
    }
    info!("System ready. Entering poll loop.");

    // ── 5. Poll loop ──────────────────────────────────────────
    loop {
        // One timestamp per pass, shared by every dimmer.
        let now_ms = clock.now_ms();
        if let Err(e) = bank.tick(now_ms, &mut log_sink) {
            warn!("tick {}: {}", bank.tick_count(), e);
        }

        if config.poll_interval_ms > 0 {
            esp_idf_svc::hal::delay::FreeRtos::delay_ms(config.poll_interval_ms);
        }
    }
}
