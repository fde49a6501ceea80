//! One-shot hardware peripheral initialization.
//!
//! Configures every configured button GPIO as an input with the pull-up
//! enabled, and every LED GPIO as an 8-bit LEDC PWM channel, using raw
//! ESP-IDF sys calls.  Called once from `main()` before the dimmers are
//! started.  On host builds every function is an in-memory stub.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

use crate::config::ChannelPair;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    GpioConfigFailed(i32),
    LedcTimerFailed(i32),
    LedcChannelFailed(i32),
    TooManyChannels,
    InvalidGpio(u8),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::GpioConfigFailed(rc)  => write!(f, "GPIO config failed (rc={})", rc),
            Self::LedcTimerFailed(rc)   => write!(f, "LEDC timer config failed (rc={})", rc),
            Self::LedcChannelFailed(rc) => write!(f, "LEDC channel config failed (rc={})", rc),
            Self::TooManyChannels       => write!(f, "more dimmers than LEDC channels"),
            Self::InvalidGpio(pin)      => write!(f, "GPIO{} does not exist on this chip", pin),
        }
    }
}

impl core::error::Error for HwInitError {}

/// Number of LEDC channels available in low-speed mode.
pub const LEDC_CHANNEL_COUNT: usize = 8;

/// LEDC channel assigned to the `index`-th dimmer.
pub const fn ledc_channel_for(index: usize) -> u32 {
    index as u32
}

#[cfg(target_os = "espidf")]
use log::info;

use crate::pins;

/// Checks that hold on every target: the pairs fit the LEDC channels and
/// every pin exists, so the pin bit masks below cannot overflow.
fn check_channels(channels: &[ChannelPair]) -> Result<(), HwInitError> {
    if channels.len() > LEDC_CHANNEL_COUNT {
        return Err(HwInitError::TooManyChannels);
    }
    for pair in channels {
        for pin in [pair.button_gpio, pair.output_gpio] {
            if pin >= pins::GPIO_COUNT {
                return Err(HwInitError::InvalidGpio(pin));
            }
        }
    }
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn init_dimmer_pins(channels: &[ChannelPair]) -> Result<(), HwInitError> {
    check_channels(channels)?;
    // SAFETY: Called once from main() before the dimmers run; single-threaded.
    unsafe {
        init_button_inputs(channels)?;
        init_ledc(channels)?;
    }
    info!("hw_init: {} dimmer(s) configured", channels.len());
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_dimmer_pins(channels: &[ChannelPair]) -> Result<(), HwInitError> {
    check_channels(channels)?;
    log::info!("hw_init(sim): pin init skipped for {} dimmer(s)", channels.len());
    Ok(())
}

// ── GPIO Inputs ───────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_button_inputs(channels: &[ChannelPair]) -> Result<(), HwInitError> {
    for pair in channels {
        let cfg = gpio_config_t {
            pin_bit_mask: 1u64 << pair.button_gpio,
            mode: gpio_mode_t_GPIO_MODE_INPUT,
            pull_up_en: gpio_pullup_t_GPIO_PULLUP_ENABLE,
            pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
            intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
        };
        let ret = unsafe { gpio_config(&cfg) };
        if ret != ESP_OK as i32 { return Err(HwInitError::GpioConfigFailed(ret)); }
    }

    info!("hw_init: button inputs configured (pull-up)");
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_read(pin: i32) -> bool {
    // SAFETY: gpio_get_level is a read-only register access on an
    // already-configured input pin; safe to call from main context.
    (unsafe { gpio_get_level(pin) }) != 0
}

/// Host stub: buttons read released (HIGH with pull-up).
#[cfg(not(target_os = "espidf"))]
pub fn gpio_read(_pin: i32) -> bool {
    true
}

// ── LEDC PWM ─────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_ledc(channels: &[ChannelPair]) -> Result<(), HwInitError> {
    // Timer 0: all LED outputs (1 kHz, 8-bit)
    let timer0 = ledc_timer_config_t {
        speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
        timer_num: ledc_timer_t_LEDC_TIMER_0,
        duty_resolution: pins::PWM_RESOLUTION_BITS,
        freq_hz: pins::LED_PWM_FREQ_HZ,
        clk_cfg: soc_periph_ledc_clk_src_legacy_t_LEDC_AUTO_CLK,
        ..Default::default()
    };
    let ret = unsafe { ledc_timer_config(&timer0) };
    if ret != ESP_OK as i32 { return Err(HwInitError::LedcTimerFailed(ret)); }

    for (i, pair) in channels.iter().enumerate() {
        let ret = unsafe { ledc_channel_config(&ledc_channel_config_t {
            speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
            channel: ledc_channel_t_LEDC_CHANNEL_0 + ledc_channel_for(i),
            timer_sel: ledc_timer_t_LEDC_TIMER_0,
            gpio_num: i32::from(pair.output_gpio),
            duty: 0,
            hpoint: 0,
            ..Default::default()
        }) };
        if ret != ESP_OK as i32 { return Err(HwInitError::LedcChannelFailed(ret)); }
    }

    info!("hw_init: LEDC configured (CH0-CH{})", channels.len().saturating_sub(1));
    Ok(())
}

/// Write an 8-bit duty to an LEDC channel.  Returns the ESP-IDF error
/// code on failure.
#[cfg(target_os = "espidf")]
pub fn ledc_set(channel: u32, duty: u8) -> Result<(), i32> {
    // SAFETY: LEDC channels were configured in init_ledc(); duty register
    // writes are race-free since only the main loop calls this function.
    let ret = unsafe {
        ledc_set_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, channel, u32::from(duty))
    };
    if ret != ESP_OK as i32 { return Err(ret); }
    let ret = unsafe { ledc_update_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, channel) };
    if ret != ESP_OK as i32 { return Err(ret); }
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn ledc_set(_channel: u32, _duty: u8) -> Result<(), i32> {
    Ok(())
}
