use getset::CopyGetters;

use vwrap_remote::{OpMode, RemoteApi, ReturnCode, JOINT_PARAM_CTRL_ENABLED};

use crate::error::{Error, RemoteError};

/// A single joint of the scene.
///
/// A joint is either position-controlled or velocity-controlled; which
/// target [`update`](Joint::update) pushes depends on the mode. `position`
/// and `velocity` are plain fields: set them, then push with `update`.
#[derive(CopyGetters)]
pub struct Joint<A: RemoteApi> {
    api: A,
    client_id: i32,
    name: String,
    /// Scene object handle assigned by the simulator.
    #[getset(get_copy = "pub")]
    handle: i32,
    /// Target position in radians, pushed while position-controlled.
    pub position: f32,
    /// Target velocity, pushed while velocity-controlled.
    pub velocity: f32,
    /// Intrinsic position at construction time, in radians.
    #[getset(get_copy = "pub")]
    initial_position: f32,
    /// Whether the joint is position-controlled rather than
    /// velocity-controlled.
    #[getset(get_copy = "pub")]
    position_controlled: bool,
}

impl<A: RemoteApi> Joint<A> {
    pub(crate) fn new(api: A, client_id: i32, name: String, handle: i32) -> Result<Self, Error> {
        let (code, ctrl) =
            api.object_int_parameter(client_id, handle, JOINT_PARAM_CTRL_ENABLED, OpMode::Blocking);
        RemoteError::check(code)?;

        let (code, initial_position) = api.joint_position(client_id, handle, OpMode::Blocking);
        RemoteError::check(code)?;

        // Prime the streaming channel so later position reads stay local.
        api.joint_position(client_id, handle, OpMode::Streaming);

        tracing::debug!(
            "Joint \"{}\" ready (handle {}, position-controlled: {})",
            name,
            handle,
            ctrl != 0
        );

        Ok(Self {
            api,
            client_id,
            name,
            handle,
            position: 0.0,
            velocity: 0.0,
            initial_position,
            position_controlled: ctrl != 0,
        })
    }

    /// Scene name of the joint.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Pushes the current target without waiting for the server.
    ///
    /// In velocity mode the simulation determines the position, so
    /// `position` is refreshed from the streaming buffer after the push.
    pub fn update(&mut self) {
        let _ = self.update_with(OpMode::Oneshot);
    }

    /// Pushes the current target with an explicit operation mode.
    ///
    /// Only a blocking push surfaces a failure; any other mode is
    /// fire-and-forget like the underlying library.
    pub fn update_with(&mut self, opmode: OpMode) -> Result<(), Error> {
        let code = if self.position_controlled {
            self.api
                .set_joint_target_position(self.client_id, self.handle, self.position, opmode)
        } else {
            self.api
                .set_joint_target_velocity(self.client_id, self.handle, self.velocity, opmode)
        };
        if opmode == OpMode::Blocking {
            RemoteError::check(code)?;
        } else if !(code.is_ok() || code == ReturnCode::NOVALUE) {
            tracing::warn!("Target push for joint \"{}\" reported {:?}", self.name, code);
        }

        if !self.position_controlled {
            let (code, position) =
                self.api
                    .joint_position(self.client_id, self.handle, OpMode::Buffer);
            if code.is_ok() {
                self.position = position;
            }
        }

        Ok(())
    }

    /// Switches between position control and velocity control.
    ///
    /// The mode is pushed to the simulator as the control-loop-enabled joint
    /// parameter, without waiting for the reply.
    pub fn set_position_controlled(&mut self, position_controlled: bool) {
        self.position_controlled = position_controlled;
        self.api.set_object_int_parameter(
            self.client_id,
            self.handle,
            JOINT_PARAM_CTRL_ENABLED,
            i32::from(position_controlled),
            OpMode::Oneshot,
        );
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use vwrap_emulator::Emulator;

    use super::*;
    use crate::{tests::connect, Scene};

    #[test]
    fn construction_reads_mode_and_initial_position() {
        let emulator = Emulator::new();
        emulator.add_joint("arm", 0.5, true);

        let session = connect(&emulator);
        let mut scene = Scene::new(&session).unwrap();
        let joint = scene.joint("arm").unwrap();

        assert!(joint.position_controlled());
        assert_abs_diff_eq!(0.5, joint.initial_position());
        assert_abs_diff_eq!(0.0, joint.position);
        assert_abs_diff_eq!(0.0, joint.velocity);
    }

    #[test]
    fn position_mode_pushes_the_target_and_never_rereads() {
        let emulator = Emulator::new();
        emulator.add_joint("arm", 0.0, true);

        let session = connect(&emulator);
        let mut scene = Scene::new(&session).unwrap();
        let joint = scene.joint("arm").unwrap();

        joint.position = 1.25;
        joint.update();

        assert_abs_diff_eq!(1.25, emulator.joint_target_position("arm").unwrap());

        // The simulation moving the joint must not leak into the target.
        emulator.set_joint_position("arm", 5.0);
        joint.update();
        assert_abs_diff_eq!(1.25, joint.position);
    }

    #[test]
    fn velocity_mode_pushes_and_refreshes_the_position() {
        let emulator = Emulator::new();
        emulator.add_joint("arm", 0.0, false);

        let session = connect(&emulator);
        let mut scene = Scene::new(&session).unwrap();
        let joint = scene.joint("arm").unwrap();

        assert!(!joint.position_controlled());
        joint.velocity = 0.3;
        emulator.set_joint_position("arm", 0.7);
        joint.update();

        assert_abs_diff_eq!(0.3, emulator.joint_target_velocity("arm").unwrap());
        assert_abs_diff_eq!(0.7, joint.position);
    }

    #[test]
    fn velocity_mode_keeps_the_position_when_no_value_streamed_yet() {
        let emulator = Emulator::new();
        emulator.add_joint("arm", 0.0, false);

        let session = connect(&emulator);
        let mut scene = Scene::new(&session).unwrap();
        let joint = scene.joint("arm").unwrap();

        joint.position = 0.9;
        emulator.set_joint_position("arm", 0.1);
        emulator.reset_streams();
        joint.update();

        assert_abs_diff_eq!(0.9, joint.position);
    }

    #[test]
    fn mode_switch_is_pushed_to_the_simulator() {
        let emulator = Emulator::new();
        emulator.add_joint("arm", 0.0, true);

        let session = connect(&emulator);
        let mut scene = Scene::new(&session).unwrap();
        let joint = scene.joint("arm").unwrap();

        joint.set_position_controlled(false);
        assert_eq!(Some(false), emulator.joint_control_enabled("arm"));

        joint.set_position_controlled(true);
        assert_eq!(Some(true), emulator.joint_control_enabled("arm"));
    }

    #[test]
    fn blocking_update_surfaces_failures() {
        let emulator = Emulator::new();
        emulator.add_joint("arm", 0.0, true);

        let session = connect(&emulator);
        let mut scene = Scene::new(&session).unwrap();
        let joint = scene.joint("arm").unwrap();

        emulator.fail_next(ReturnCode::REMOTE_ERROR);
        assert!(matches!(
            joint.update_with(OpMode::Blocking),
            Err(Error::Remote(RemoteError::ServerError))
        ));

        // The oneshot path swallows the same failure.
        emulator.fail_next(ReturnCode::REMOTE_ERROR);
        joint.update();
    }

    #[test]
    fn commands_a_relative_target_like_the_shipped_scene() {
        let emulator = Emulator::new();
        emulator.add_joint("Jaco_joint2", 0.0, true);

        let session = connect(&emulator);
        let mut scene = Scene::new(&session).unwrap();
        let joint = scene.joint("Jaco_joint2").unwrap();

        joint.position = joint.initial_position() + (-10.0_f32).to_radians();
        joint.update();

        assert_abs_diff_eq!(
            -0.174_532_92,
            emulator.joint_target_position("Jaco_joint2").unwrap(),
            epsilon = 1e-6
        );
        assert_abs_diff_eq!(-0.174_532_92, joint.position, epsilon = 1e-6);
    }
}
