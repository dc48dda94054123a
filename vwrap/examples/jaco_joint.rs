use vwrap::prelude::*;
use vwrap_emulator::Emulator;

fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    // Stands in for a simulator listening on the default port with a Jaco
    // arm loaded. Run against a real installation by replacing `open_with`
    // with `Session::open(DEFAULT_HOST, DEFAULT_PORT)`.
    let emulator = Emulator::new();
    emulator.add_joint("Jaco_joint2", 0.0, true);

    let mut session = Session::open_with(&emulator, DEFAULT_HOST, DEFAULT_PORT)?;
    session.start()?;

    let mut scene = Scene::new(&session)?;
    let joint = scene.joint("Jaco_joint2")?;
    joint.position = joint.initial_position() + (-10.0_f32).to_radians();
    joint.update();

    println!(
        "pushed target {:.4} rad for {}",
        emulator
            .joint_target_position("Jaco_joint2")
            .unwrap_or_default(),
        joint.name()
    );

    session.close()
}
