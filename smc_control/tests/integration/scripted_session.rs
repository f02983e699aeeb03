//! Full sessions: scripted console, simulated motor, paced loop.

use smc_common::config::ConfigLoader;
use smc_common::driver::{MotionDefaults, MotorLimits};
use smc_common::mode::{DriveMode, OperatingMode};
use smc_control::bounds::SoftBounds;
use smc_control::config::StartupConfig;
use smc_control::console::scripted::{OperatorScript, ScriptedConsole};
use smc_control::cycle::{FrameRunner, startup_exercise};
use smc_control::link::MotorLink;
use smc_hal::SimulatedMotor;

use super::{Call, Recorder};

const SCRIPT: &str = r#"
frames = 25

[[step]]
frame = 3
action = "set_position"
value = 500.0

[[step]]
frame = 12
action = "select_mode"
index = 1

[[step]]
frame = 14
action = "set_velocity"
value = 4.0
"#;

fn frozen_motor() -> SimulatedMotor {
    SimulatedMotor::frozen(MotorLimits::default(), MotionDefaults::default())
}

#[test]
fn scripted_session_drives_simulated_motor() {
    let link = MotorLink::new(frozen_motor());
    let mut runner = FrameRunner::start(link, SoftBounds::default()).unwrap();
    let mut console = ScriptedConsole::new(OperatorScript::parse(SCRIPT).unwrap());

    runner.run(&mut console);

    assert_eq!(runner.stats().frame_count, 25);
    assert_eq!(runner.state().frame, 25);
    assert_eq!(console.pending(), 0);
    assert_eq!(runner.state().mode.active(), OperatingMode::Velocity);

    let sp = runner.state().setpoints;
    assert_eq!(sp.position.position.shadow(), 500.0);
    assert_eq!(sp.velocity.velocity.shadow(), 4.0);

    let sim = runner.link().driver().simulator();
    assert_eq!(sim.mode(), DriveMode::Velocity);
    assert!(sim.is_moving());
    assert_eq!(runner.link().stats().commands_rejected, 0);
}

#[test]
fn shutdown_handle_stops_loop_before_first_frame() {
    let link = MotorLink::new(frozen_motor());
    let mut runner = FrameRunner::start(link, SoftBounds::default()).unwrap();
    let mut console = ScriptedConsole::new(OperatorScript::default());
    console
        .shutdown_handle()
        .store(true, std::sync::atomic::Ordering::SeqCst);

    runner.run(&mut console);
    assert_eq!(runner.stats().frame_count, 0);
}

#[test]
fn paced_loop_respects_frame_budget() {
    let link = MotorLink::new(frozen_motor());
    let mut runner = FrameRunner::start(link, SoftBounds::default())
        .unwrap()
        .with_frame_rate(200);
    let mut console = ScriptedConsole::new(OperatorScript::default()).with_frame_limit(Some(10));

    let start = std::time::Instant::now();
    runner.run(&mut console);
    assert!(start.elapsed() >= std::time::Duration::from_millis(45));
    assert_eq!(runner.stats().frame_count, 10);
}

#[test]
fn startup_exercise_moves_out_and_back() {
    let mut link = MotorLink::new(Recorder::at(0.0));
    let config = StartupConfig {
        exercise: true,
        travel: 1000.0,
        settle_ms: 0,
    };
    startup_exercise(&mut link, &config);
    assert_eq!(
        link.driver().calls,
        vec![Call::Position(1000.0), Call::Position(0.0)]
    );
}

#[test]
fn startup_exercise_disabled_is_silent() {
    let mut link = MotorLink::new(Recorder::at(0.0));
    startup_exercise(&mut link, &StartupConfig::default());
    assert!(link.driver().calls.is_empty());
}
