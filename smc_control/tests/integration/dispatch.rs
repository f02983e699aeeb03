//! Change detection and flush-phase dispatch.

use proptest::prelude::*;
use smc_common::driver::{MotorLimits, Quantity};
use smc_control::console::OperatorEvent;
use smc_control::error::ControlError;
use smc_control::link::MotorLink;

use super::{Call, Recorder, frame, idle_until, runner};

#[test]
fn position_edit_dispatched_once_on_flush() {
    let mut r = runner(Recorder::at(1000.0));

    assert!(idle_until(&mut r, 2).is_empty());
    assert!(frame(&mut r, &[OperatorEvent::SetPosition { value: 500.0 }]).is_empty());
    assert!(idle_until(&mut r, 9).is_empty());

    assert_eq!(frame(&mut r, &[]), vec![Call::Position(500.0)]);
    assert_eq!(r.state().frame, 10);
    assert_eq!(r.state().setpoints.position.position.shadow(), 500.0);

    assert!(idle_until(&mut r, 40).is_empty());
}

#[test]
fn unchanged_targets_are_never_sent() {
    let mut r = runner(Recorder::at(0.0));
    assert!(idle_until(&mut r, 100).is_empty());
    assert_eq!(r.link().stats().commands_sent, 0);
}

#[test]
fn edits_within_a_period_coalesce_to_last_value() {
    let mut r = runner(Recorder::at(0.0));
    frame(&mut r, &[OperatorEvent::SetVelocity { value: 4.0 }]);
    frame(&mut r, &[OperatorEvent::SetVelocity { value: 6.0 }]);
    frame(&mut r, &[OperatorEvent::SetAcceleration { value: 2.0 }]);
    assert_eq!(
        idle_until(&mut r, 10),
        vec![Call::Velocity(6.0), Call::Acceleration(2.0)]
    );
}

#[test]
fn flush_order_is_position_velocity_acceleration() {
    let mut r = runner(Recorder::at(0.0));
    frame(
        &mut r,
        &[
            OperatorEvent::SetAcceleration { value: 3.0 },
            OperatorEvent::SetVelocity { value: 7.0 },
            OperatorEvent::SetPosition { value: -250.0 },
        ],
    );
    assert_eq!(
        idle_until(&mut r, 10),
        vec![
            Call::Position(-250.0),
            Call::Velocity(7.0),
            Call::Acceleration(3.0)
        ]
    );
}

#[test]
fn edit_reverted_before_flush_sends_nothing() {
    let mut r = runner(Recorder::at(1000.0));
    frame(&mut r, &[OperatorEvent::SetPosition { value: 500.0 }]);
    frame(&mut r, &[OperatorEvent::SetPosition { value: 1000.0 }]);
    assert!(idle_until(&mut r, 20).is_empty());
}

#[test]
fn slider_edits_clamped_into_soft_bounds() {
    let mut r = runner(Recorder::at(0.0));
    frame(
        &mut r,
        &[
            OperatorEvent::SetPosition { value: 50_000.0 },
            OperatorEvent::SetVelocity { value: -5.0 },
            OperatorEvent::SetAcceleration { value: 99.0 },
        ],
    );
    assert_eq!(
        idle_until(&mut r, 10),
        vec![
            Call::Position(10_000.0),
            Call::Velocity(0.0),
            Call::Acceleration(20.0)
        ]
    );
}

#[test]
fn narrowed_bound_applies_to_following_edits() {
    let mut r = runner(Recorder::at(0.0));
    frame(
        &mut r,
        &[
            OperatorEvent::SetPositionExtent { value: 300.0 },
            OperatorEvent::SetPosition { value: 800.0 },
        ],
    );
    assert_eq!(r.state().bounds.position_extent, 300.0);
    assert_eq!(idle_until(&mut r, 10), vec![Call::Position(300.0)]);
}

#[test]
fn bound_edits_cannot_exceed_hard_limits() {
    let mut r = runner(Recorder::at(0.0));
    frame(
        &mut r,
        &[
            OperatorEvent::SetPositionExtent { value: 1e9 },
            OperatorEvent::SetVelocityRange { min: 0.0, max: 500.0 },
        ],
    );
    let limits = MotorLimits::default();
    assert_eq!(r.state().bounds.position_extent, limits.pt_limit);
    assert_eq!(r.state().bounds.velocity.max, limits.v_limit);
}

#[test]
fn out_of_range_command_never_reaches_driver() {
    let mut link = MotorLink::new(Recorder::at(0.0));
    let err = link.go_absolute_position(200_000.0).unwrap_err();
    assert_eq!(
        err,
        ControlError::Range {
            quantity: Quantity::Position,
            value: 200_000.0,
            limit: 100_000.0,
        }
    );
    assert!(link.set_velocity(f64::NAN).is_err());
    assert!(link.set_acceleration(-51.0).is_err());
    assert!(link.driver().calls.is_empty());
    assert_eq!(link.stats().commands_rejected, 3);
}

#[test]
fn origin_buttons_act_immediately() {
    let mut r = runner(Recorder::at(400.0));
    idle_until(&mut r, 1);
    assert_eq!(frame(&mut r, &[OperatorEvent::SetOrigin]), vec![Call::Origin]);
    let p = r.state().setpoints.position.position;
    assert_eq!((p.target(), p.shadow()), (0.0, 0.0));

    frame(&mut r, &[OperatorEvent::SetPosition { value: 50.0 }]);
    assert_eq!(
        frame(&mut r, &[OperatorEvent::GoToOrigin]),
        vec![Call::Position(0.0)]
    );
    // The pending 50 was discarded by the reset.
    assert!(idle_until(&mut r, 20).is_empty());
}

#[test]
fn failed_flush_keeps_shadow_and_retries_next_period() {
    let mut r = runner(Recorder::at(1000.0));
    idle_until(&mut r, 2);
    frame(&mut r, &[OperatorEvent::SetPosition { value: 500.0 }]);
    idle_until(&mut r, 9);

    r.link_mut().driver_mut().fail_writes = true;
    assert_eq!(frame(&mut r, &[]), vec![Call::Position(500.0)]);
    let p = r.state().setpoints.position.position;
    assert_eq!((p.target(), p.shadow()), (500.0, 1000.0));
    assert_eq!(r.link().stats().commands_failed, 1);

    r.link_mut().driver_mut().fail_writes = false;
    assert!(idle_until(&mut r, 19).is_empty());
    assert_eq!(frame(&mut r, &[]), vec![Call::Position(500.0)]);
    assert_eq!(r.state().setpoints.position.position.shadow(), 500.0);
    assert!(idle_until(&mut r, 40).is_empty());
}

#[test]
fn failed_go_leaves_velocity_unapplied() {
    let mut r = runner(Recorder::at(0.0));
    frame(&mut r, &[OperatorEvent::SelectMode { index: 1 }]);
    frame(&mut r, &[OperatorEvent::SetVelocity { value: 5.0 }]);

    r.link_mut().driver_mut().fail_go = true;
    assert_eq!(idle_until(&mut r, 10), vec![Call::Velocity(5.0), Call::Go]);
    let v = r.state().setpoints.velocity.velocity;
    assert_eq!((v.target(), v.shadow()), (5.0, 0.0));

    r.link_mut().driver_mut().fail_go = false;
    assert_eq!(idle_until(&mut r, 20), vec![Call::Velocity(5.0), Call::Go]);
    assert_eq!(r.state().setpoints.velocity.velocity.shadow(), 5.0);
}

#[test]
fn one_failed_quantity_does_not_block_the_others() {
    let mut r = runner(Recorder::at(0.0));
    frame(
        &mut r,
        &[
            OperatorEvent::SetPosition { value: 10.0 },
            OperatorEvent::SetAcceleration { value: 4.0 },
        ],
    );
    r.link_mut().driver_mut().fail_writes = true;
    assert_eq!(
        idle_until(&mut r, 10),
        vec![Call::Position(10.0), Call::Acceleration(4.0)]
    );
    assert_eq!(r.link().stats().commands_failed, 2);
    assert!(r.state().setpoints.position.position.is_dirty());
    assert!(r.state().setpoints.position.acceleration.is_dirty());
}

fn edit() -> impl Strategy<Value = OperatorEvent> {
    prop_oneof![
        (-20_000.0..20_000.0f64).prop_map(|value| OperatorEvent::SetPosition { value }),
        (-30.0..30.0f64).prop_map(|value| OperatorEvent::SetVelocity { value }),
        (-30.0..30.0f64).prop_map(|value| OperatorEvent::SetAcceleration { value }),
    ]
}

proptest! {
    #[test]
    fn each_quantity_sent_at_most_once_per_period(
        frames in prop::collection::vec(prop::collection::vec(edit(), 0..3), 1..60)
    ) {
        let mut r = runner(Recorder::at(0.0));
        for events in &frames {
            let calls = frame(&mut r, events);
            let flush = r.state().frame % 10 == 0;
            if !flush {
                prop_assert!(calls.is_empty());
            }
            let positions = calls.iter().filter(|c| matches!(c, Call::Position(_))).count();
            let velocities = calls.iter().filter(|c| matches!(c, Call::Velocity(_))).count();
            let accelerations = calls.iter().filter(|c| matches!(c, Call::Acceleration(_))).count();
            prop_assert!(positions <= 1 && velocities <= 1 && accelerations <= 1);
        }
        let sp = r.state().setpoints.position;
        if r.state().frame % 10 == 0 {
            prop_assert!(!sp.position.is_dirty());
            prop_assert!(!sp.velocity.is_dirty());
            prop_assert!(!sp.acceleration.is_dirty());
        }
    }
}
