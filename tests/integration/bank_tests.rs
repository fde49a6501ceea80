//! Integration tests for the DimmerBank → controllers → event sink pipeline.

use crate::mock_hw::{ManualClock, MockButton, MockPwm, RecordingSink};

use dimmer::Error;
use dimmer::adapters::log_sink::NullSink;
use dimmer::app::events::DimmerEvent;
use dimmer::app::service::DimmerBank;
use dimmer::config::{ChannelPair, DimmerConfig, MAX_DIMMERS};
use dimmer::fsm::{FadeTiming, Phase, ReleasePolicy};

type Bank = DimmerBank<MockButton, MockPwm>;

struct Rig {
    bank: Bank,
    buttons: Vec<MockButton>,
    pwms: Vec<MockPwm>,
}

fn two_channel_config() -> DimmerConfig {
    let mut config = DimmerConfig::default();
    config.channels.clear();
    config
        .channels
        .push(ChannelPair { button_gpio: 1, output_gpio: 2 })
        .unwrap();
    config
        .channels
        .push(ChannelPair { button_gpio: 3, output_gpio: 4 })
        .unwrap();
    config
}

fn set_pressed(button: &MockButton, pressed: bool) {
    if pressed {
        button.press();
    } else {
        button.release();
    }
}

fn make_rig(config: &DimmerConfig) -> Rig {
    let mut buttons = Vec::new();
    let mut pwms = Vec::new();
    let bank = DimmerBank::from_config(config, |_pair| {
        let button = MockButton::new();
        let pwm = MockPwm::new();
        buttons.push(button.clone());
        pwms.push(pwm.clone());
        Ok((button, pwm))
    })
    .unwrap();
    Rig { bank, buttons, pwms }
}

#[test]
fn from_config_builds_one_controller_per_pair_in_order() {
    let rig = make_rig(&two_channel_config());
    assert_eq!(rig.bank.len(), 2);
    let channels: Vec<u8> = rig.bank.iter().map(|d| d.channel()).collect();
    assert_eq!(channels, vec![2, 4]);
    assert!(rig.bank.iter().all(|d| !d.is_started()));
}

#[test]
fn from_config_rejects_invalid_wiring() {
    let mut config = two_channel_config();
    config.channels[1].button_gpio = 2;
    let result = Bank::from_config(&config, |_| Ok((MockButton::new(), MockPwm::new())));
    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
fn tick_before_begin_reports_not_started() {
    let mut rig = make_rig(&two_channel_config());
    let mut sink = RecordingSink::new();
    assert_eq!(
        rig.bank.tick(0, &mut sink),
        Err(Error::NotStarted { channel: 2 })
    );
}

#[test]
fn begin_all_starts_every_dimmer_and_turns_outputs_off() {
    let mut rig = make_rig(&two_channel_config());
    let mut sink = RecordingSink::new();
    rig.bank.begin_all(&mut sink).unwrap();

    assert_eq!(
        sink.events,
        vec![
            DimmerEvent::Started { channel: 2 },
            DimmerEvent::Started { channel: 4 },
        ]
    );
    for pwm in &rig.pwms {
        assert_eq!(pwm.writes(), vec![0]);
    }
}

#[test]
fn tick_emits_snapshot_per_dimmer_and_phase_changes() {
    let mut rig = make_rig(&two_channel_config());
    let mut sink = RecordingSink::new();
    rig.bank.begin_all(&mut sink).unwrap();
    sink.events.clear();

    rig.buttons[1].press();
    rig.bank.tick(10, &mut sink).unwrap();

    assert_eq!(
        sink.events,
        vec![
            DimmerEvent::Tick { channel: 2, phase: Phase::Idle, brightness: 0 },
            DimmerEvent::Tick { channel: 4, phase: Phase::FadingUp, brightness: 1 },
            DimmerEvent::PhaseChanged { channel: 4, from: Phase::Idle, to: Phase::FadingUp },
        ]
    );
    assert_eq!(rig.bank.tick_count(), 1);
}

#[test]
fn dimmers_are_independent() {
    let mut rig = make_rig(&two_channel_config());
    let mut sink = RecordingSink::new();
    rig.bank.begin_all(&mut sink).unwrap();

    rig.buttons[0].press();
    for now in 0..=1_000 {
        rig.bank.tick(now, &mut sink).unwrap();
    }

    let a = rig.bank.get(0).unwrap();
    let b = rig.bank.get(1).unwrap();
    assert_eq!(a.phase(), Phase::FadingUp);
    // Lit at t=0, then one step per 51 ms.
    assert_eq!(a.brightness(), 20);
    assert_eq!((b.phase(), b.brightness()), (Phase::Idle, 0));
    assert_eq!(rig.pwms[1].writes(), vec![0]);
}

#[test]
fn order_of_dimmers_does_not_change_outcomes() {
    let forward = two_channel_config();
    let mut reversed = forward.clone();
    reversed.channels.reverse();

    let mut a = make_rig(&forward);
    let mut b = make_rig(&reversed);
    let mut sink = RecordingSink::new();
    a.bank.begin_all(&mut sink).unwrap();
    b.bank.begin_all(&mut sink).unwrap();

    // Same press pattern on the same physical channel in both rigs.
    let script = |now: u32| (now / 700) % 2 == 0;
    for now in 0..5_000 {
        for (rig, ch2_index) in [(&mut a, 0usize), (&mut b, 1usize)] {
            let ch4_index = 1 - ch2_index;
            set_pressed(&rig.buttons[ch2_index], script(now));
            set_pressed(&rig.buttons[ch4_index], script(now + 300));
            rig.bank.tick(now, &mut sink).unwrap();
        }
    }

    for channel in [2u8, 4u8] {
        let da = a.bank.iter().find(|d| d.channel() == channel).unwrap();
        let db = b.bank.iter().find(|d| d.channel() == channel).unwrap();
        assert_eq!((da.phase(), da.brightness()), (db.phase(), db.brightness()));
    }
}

#[test]
fn failing_output_does_not_block_other_dimmers() {
    let mut rig = make_rig(&two_channel_config());
    let mut sink = RecordingSink::new();
    rig.bank.begin_all(&mut sink).unwrap();

    rig.pwms[0].set_failing(true);
    rig.buttons[0].press();
    rig.buttons[1].press();

    let result = rig.bank.tick(0, &mut sink);
    assert!(matches!(result, Err(Error::Output(_))));

    // Failed write leaves the first dimmer where it was; the second moved on.
    assert_eq!(rig.bank.get(0).unwrap().phase(), Phase::Idle);
    assert_eq!(rig.bank.get(1).unwrap().phase(), Phase::FadingUp);

    // Recovery: the retry on the next tick succeeds.
    rig.pwms[0].set_failing(false);
    rig.bank.tick(1, &mut sink).unwrap();
    assert_eq!(rig.bank.get(0).unwrap().brightness(), 1);
}

#[test]
fn tick_now_reads_clock_once_per_pass() {
    let mut rig = make_rig(&two_channel_config());
    let mut sink = RecordingSink::new();
    rig.bank.begin_all(&mut sink).unwrap();

    let clock = ManualClock::at(500);
    rig.buttons[0].press();
    rig.bank.tick_now(&clock, &mut sink).unwrap();
    assert_eq!(clock.reads(), 1);

    clock.set(551);
    rig.bank.tick_now(&clock, &mut sink).unwrap();
    assert_eq!(clock.reads(), 2);
    assert_eq!(rig.bank.get(0).unwrap().brightness(), 2);
}

#[test]
fn add_rejects_duplicates_and_overflow() {
    let config = DimmerConfig::default();
    let mut bank = Bank::new(&config);
    bank.add(2, MockButton::new(), MockPwm::new()).unwrap();
    assert_eq!(
        bank.add(2, MockButton::new(), MockPwm::new()),
        Err(Error::Config("duplicate dimmer channel"))
    );

    for ch in 10..(10 + MAX_DIMMERS as u8 - 1) {
        bank.add(ch, MockButton::new(), MockPwm::new()).unwrap();
    }
    assert_eq!(bank.len(), MAX_DIMMERS);
    assert_eq!(
        bank.add(100, MockButton::new(), MockPwm::new()),
        Err(Error::Config("too many dimmers"))
    );
}

#[test]
fn bank_uses_configured_timing_and_policy() {
    let mut config = two_channel_config();
    config.timing = FadeTiming { up_interval_ms: 5, down_interval_ms: 2 };
    config.release_policy = ReleasePolicy::ImmediateIdle;
    let mut rig = make_rig(&config);
    let mut sink = RecordingSink::new();
    rig.bank.begin_all(&mut sink).unwrap();

    rig.buttons[0].press();
    rig.bank.tick(0, &mut sink).unwrap();
    rig.bank.tick(6, &mut sink).unwrap();
    assert_eq!(rig.bank.get(0).unwrap().brightness(), 2);
}

#[test]
fn bank_runs_without_observer() {
    let mut rig = make_rig(&two_channel_config());
    let mut sink = NullSink;
    rig.bank.begin_all(&mut sink).unwrap();
    rig.buttons[0].press();
    for now in 0..=51 {
        rig.bank.tick(now, &mut sink).unwrap();
    }
    assert_eq!(rig.bank.get(0).unwrap().brightness(), 2);
    assert_eq!(rig.bank.tick_count(), 52);
}

#[test]
fn each_phase_change_is_reported_once() {
    let mut rig = make_rig(&two_channel_config());
    let mut sink = RecordingSink::new();
    rig.bank.begin_all(&mut sink).unwrap();

    // Tap: Idle -> FadingUp, then Holding once the up interval passes.
    rig.buttons[0].press();
    rig.bank.tick(0, &mut sink).unwrap();
    rig.buttons[0].release();
    for now in 1..=100 {
        rig.bank.tick(now, &mut sink).unwrap();
    }

    assert_eq!(
        sink.phase_changes(),
        vec![
            DimmerEvent::PhaseChanged { channel: 2, from: Phase::Idle, to: Phase::FadingUp },
            DimmerEvent::PhaseChanged { channel: 2, from: Phase::FadingUp, to: Phase::Holding },
        ]
    );
}

/// Times at which dimmer 0's brightness changed while polling every
/// `poll_ms` over `from..=to`.
fn change_times(rig: &mut Rig, from: u32, to: u32, poll_ms: u32) -> Vec<u32> {
    let mut sink = NullSink;
    let mut last = rig.bank.get(0).unwrap().brightness();
    let mut times = Vec::new();
    for now in (from..=to).step_by(poll_ms as usize) {
        rig.bank.tick(now, &mut sink).unwrap();
        let level = rig.bank.get(0).unwrap().brightness();
        if level != last {
            times.push(now);
            last = level;
        }
    }
    times
}

#[test]
fn step_periods_hold_at_the_configured_poll_rate() {
    let config = DimmerConfig::default();
    // 1 kHz scheduler tick, as shipped in sdkconfig.defaults.
    let poll_ms = config.effective_poll_ms(1_000);
    assert_eq!(poll_ms, config.poll_interval_ms);

    let mut rig = make_rig(&config);
    rig.bank.begin_all(&mut NullSink).unwrap();

    rig.buttons[0].press();
    let up = change_times(&mut rig, 0, 600, poll_ms);
    assert_eq!(up.first(), Some(&0));
    assert!(up.len() > 5);
    assert!(up.windows(2).all(|w| w[1] - w[0] == 51), "up steps at {up:?}");

    rig.buttons[0].release();
    change_times(&mut rig, 601, 1_000, poll_ms);
    assert_eq!(rig.bank.get(0).unwrap().phase(), Phase::Holding);

    rig.buttons[0].press();
    let down = change_times(&mut rig, 1_001, 1_500, poll_ms);
    assert_eq!(down.first(), Some(&1_001));
    assert_eq!(rig.bank.get(0).unwrap().brightness(), 0);
    assert!(down.windows(2).all(|w| w[1] - w[0] == 11), "down steps at {down:?}");
}
