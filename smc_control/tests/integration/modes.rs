//! Mode switching and per-panel event routing.

use smc_common::mode::{DriveMode, OperatingMode};
use smc_control::console::OperatorEvent;

use super::{Call, Recorder, frame, idle_until, runner};

const VELOCITY: OperatorEvent = OperatorEvent::SelectMode { index: 1 };
const POSITION: OperatorEvent = OperatorEvent::SelectMode { index: 0 };
const SYSTEM: OperatorEvent = OperatorEvent::SelectMode { index: 2 };

#[test]
fn entering_velocity_zeroes_command_first() {
    let mut r = runner(Recorder::at(0.0));
    let calls = frame(&mut r, &[VELOCITY]);
    assert_eq!(
        calls,
        vec![
            Call::Mode(DriveMode::Velocity),
            Call::Velocity(0.0),
            Call::Acceleration(10.0)
        ]
    );
    assert_eq!(r.state().mode.active(), OperatingMode::Velocity);
    assert!(idle_until(&mut r, 30).is_empty());
}

#[test]
fn velocity_edit_engaged_with_go() {
    let mut r = runner(Recorder::at(0.0));
    frame(&mut r, &[VELOCITY]);
    frame(&mut r, &[OperatorEvent::SetVelocity { value: -12.0 }]);
    assert_eq!(
        idle_until(&mut r, 10),
        vec![Call::Velocity(-12.0), Call::Go]
    );
    assert_eq!(r.state().setpoints.velocity.velocity.shadow(), -12.0);
}

#[test]
fn stop_is_immediate_and_cancels_pending_velocity() {
    let mut r = runner(Recorder::at(0.0));
    frame(&mut r, &[VELOCITY]);
    frame(&mut r, &[OperatorEvent::SetVelocity { value: 5.0 }]);
    assert_eq!(frame(&mut r, &[OperatorEvent::Stop]), vec![Call::Stop]);
    assert!(idle_until(&mut r, 20).is_empty());
    let v = r.state().setpoints.velocity.velocity;
    assert_eq!((v.target(), v.shadow()), (0.0, 0.0));
}

#[test]
fn entering_position_retargets_to_last_sample() {
    let mut r = runner(Recorder::at(0.0));
    frame(&mut r, &[VELOCITY]);
    r.link_mut().driver_mut().position = 250.0;
    idle_until(&mut r, 10);
    assert_eq!(r.state().telemetry.position(), 250.0);

    assert_eq!(
        frame(&mut r, &[POSITION]),
        vec![
            Call::Mode(DriveMode::Position),
            Call::Velocity(10.0),
            Call::Acceleration(10.0),
            Call::Stop
        ]
    );
    assert_eq!(r.state().setpoints.position.position.target(), 250.0);
    assert_eq!(idle_until(&mut r, 20), vec![Call::Position(250.0)]);
}

#[test]
fn selection_switches_before_edits_of_same_frame() {
    let mut r = runner(Recorder::at(0.0));
    let calls = frame(&mut r, &[OperatorEvent::Stop, VELOCITY]);
    // Entry actions first, then the Stop button of the new panel.
    assert_eq!(calls.first(), Some(&Call::Mode(DriveMode::Velocity)));
    assert_eq!(calls.last(), Some(&Call::Stop));
}

#[test]
fn last_selection_in_frame_wins() {
    let mut r = runner(Recorder::at(0.0));
    assert!(frame(&mut r, &[VELOCITY, SYSTEM]).is_empty());
    assert_eq!(r.state().mode.active(), OperatingMode::System);
}

#[test]
fn invalid_selector_index_ignored() {
    let mut r = runner(Recorder::at(0.0));
    assert!(frame(&mut r, &[OperatorEvent::SelectMode { index: 7 }]).is_empty());
    assert_eq!(r.state().mode.active(), OperatingMode::Position);
}

#[test]
fn system_mode_never_commands() {
    let mut r = runner(Recorder::at(0.0));
    frame(&mut r, &[SYSTEM]);
    let before = r.state().setpoints;
    let bounds = r.state().bounds;

    let mut calls = frame(
        &mut r,
        &[
            OperatorEvent::SetPosition { value: 100.0 },
            OperatorEvent::SetVelocity { value: 3.0 },
            OperatorEvent::Stop,
            OperatorEvent::SetOrigin,
            OperatorEvent::GoToOrigin,
            OperatorEvent::SetVelocityExtent { value: 1.0 },
        ],
    );
    calls.extend(idle_until(&mut r, 40));
    assert!(calls.is_empty());
    assert_eq!(r.state().setpoints, before);
    assert_eq!(r.state().bounds, bounds);
}

#[test]
fn widgets_of_other_panel_ignored() {
    let mut r = runner(Recorder::at(0.0));
    assert!(frame(&mut r, &[OperatorEvent::Stop]).is_empty());
    frame(&mut r, &[OperatorEvent::SetVelocityExtent { value: 5.0 }]);
    assert_eq!(r.state().bounds.velocity_extent, 20.0);

    frame(&mut r, &[VELOCITY]);
    assert!(frame(&mut r, &[OperatorEvent::GoToOrigin, OperatorEvent::SetOrigin]).is_empty());
    frame(&mut r, &[OperatorEvent::SetPosition { value: 75.0 }]);
    assert_eq!(r.state().setpoints.position.position.target(), 0.0);
}

#[test]
fn inactive_mode_targets_are_not_flushed() {
    let mut r = runner(Recorder::at(0.0));
    frame(&mut r, &[OperatorEvent::SetPosition { value: 900.0 }]);
    frame(&mut r, &[VELOCITY]);
    let calls = idle_until(&mut r, 30);
    assert!(!calls.iter().any(|c| matches!(c, Call::Position(_))));
}

#[test]
fn velocity_panel_uses_symmetric_extent() {
    let mut r = runner(Recorder::at(0.0));
    frame(&mut r, &[VELOCITY]);
    frame(
        &mut r,
        &[
            OperatorEvent::SetVelocityExtent { value: 8.0 },
            OperatorEvent::SetVelocity { value: -30.0 },
        ],
    );
    assert_eq!(idle_until(&mut r, 10), vec![Call::Velocity(-8.0), Call::Go]);

    let view = r.view();
    let (position_plot, velocity_plot) = view.plot_ranges();
    assert_eq!(position_plot, None);
    assert_eq!((velocity_plot.min, velocity_plot.max), (-8.0, 8.0));
    assert_eq!(view.selector_index(), 1);
}
