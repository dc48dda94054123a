use approx::assert_abs_diff_eq;
use vwrap::prelude::*;
use vwrap_emulator::Emulator;

#[test]
fn commands_a_jaco_joint_offset() {
    let emulator = Emulator::new();
    emulator.add_joint("Jaco_joint2", 0.0, true);

    let mut session = Session::open_with(&emulator, DEFAULT_HOST, DEFAULT_PORT).unwrap();
    session.start().unwrap();

    let mut scene = Scene::new(&session).unwrap();
    let joint = scene.joint("Jaco_joint2").unwrap();
    assert!(joint.position_controlled());

    joint.position = joint.initial_position() + (-10.0_f32).to_radians();
    joint.update();

    assert_abs_diff_eq!(
        -0.174_532_92,
        emulator.joint_target_position("Jaco_joint2").unwrap(),
        epsilon = 1e-6
    );

    session.close().unwrap();
    assert!(!emulator.is_connected());
}

#[test]
fn signal_mailbox_round_trip() {
    let emulator = Emulator::new();
    let session = Session::open_with(&emulator, DEFAULT_HOST, DEFAULT_PORT).unwrap();

    let mut signal = FloatSignal::new(&session, "controller_gain");
    assert_eq!(None, signal.read());

    signal.write(&0.25);
    assert_eq!(Some(0.25), signal.read());
    assert_eq!(None, signal.read());
}

#[test]
fn session_cleanup_runs_on_error_paths() {
    let emulator = Emulator::new();

    let run = || -> Result<(), Error> {
        let mut session = Session::open_with(&emulator, DEFAULT_HOST, DEFAULT_PORT)?;
        emulator.fail_next(vwrap::remote::ReturnCode::REMOTE_ERROR);
        session.start()?;
        unreachable!("start must fail");
    };

    assert!(run().is_err());
    assert!(!emulator.is_connected());
}
