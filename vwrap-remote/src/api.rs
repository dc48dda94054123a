use crate::constants::{ObjectType, OpMode, ReturnCode};

/// The remote API surface consumed by the wrapper.
///
/// Implemented by [`RemoteApiLib`](crate::RemoteApiLib) over the loaded
/// vendor library, and by in-process test doubles such as the emulator
/// crate. Every method is one remote call; status words are handed back
/// raw, the caller decides what is fatal.
pub trait RemoteApi {
    /// Opens a connection to a remote API server. Returns the client id
    /// assigned by the server, or -1 if no connection could be established.
    fn start(
        &self,
        host: &str,
        port: u16,
        wait_until_connected: bool,
        do_not_reconnect: bool,
        timeout_ms: i32,
        comm_cycle_ms: i32,
    ) -> i32;

    /// Releases a connection. A client id of -1 releases every connection
    /// held by the client library.
    fn finish(&self, client_id: i32);

    /// Requests the simulation to start.
    fn start_simulation(&self, client_id: i32, opmode: OpMode) -> ReturnCode;

    /// Requests the simulation to stop.
    fn stop_simulation(&self, client_id: i32, opmode: OpMode) -> ReturnCode;

    /// Enumerates all scene objects of one category as `(name, handle)`
    /// pairs.
    fn object_group_data(
        &self,
        client_id: i32,
        object_type: ObjectType,
        opmode: OpMode,
    ) -> (ReturnCode, Vec<(String, i32)>);

    /// Reads an integer parameter of a scene object.
    fn object_int_parameter(
        &self,
        client_id: i32,
        handle: i32,
        param: i32,
        opmode: OpMode,
    ) -> (ReturnCode, i32);

    /// Writes an integer parameter of a scene object.
    fn set_object_int_parameter(
        &self,
        client_id: i32,
        handle: i32,
        param: i32,
        value: i32,
        opmode: OpMode,
    ) -> ReturnCode;

    /// Reads the intrinsic position of a joint, in radians for revolute
    /// joints.
    fn joint_position(&self, client_id: i32, handle: i32, opmode: OpMode) -> (ReturnCode, f32);

    /// Sets the target position of a joint.
    fn set_joint_target_position(
        &self,
        client_id: i32,
        handle: i32,
        position: f32,
        opmode: OpMode,
    ) -> ReturnCode;

    /// Sets the target velocity of a joint.
    fn set_joint_target_velocity(
        &self,
        client_id: i32,
        handle: i32,
        velocity: f32,
        opmode: OpMode,
    ) -> ReturnCode;

    /// Reads a named string signal.
    fn string_signal(&self, client_id: i32, name: &str, opmode: OpMode) -> (ReturnCode, Vec<u8>);

    /// Writes a named string signal.
    fn set_string_signal(
        &self,
        client_id: i32,
        name: &str,
        value: &[u8],
        opmode: OpMode,
    ) -> ReturnCode;

    /// Clears a named string signal.
    fn clear_string_signal(&self, client_id: i32, name: &str, opmode: OpMode) -> ReturnCode;

    /// Reads a named float signal.
    fn float_signal(&self, client_id: i32, name: &str, opmode: OpMode) -> (ReturnCode, f32);

    /// Writes a named float signal.
    fn set_float_signal(&self, client_id: i32, name: &str, value: f32, opmode: OpMode)
        -> ReturnCode;

    /// Clears a named float signal.
    fn clear_float_signal(&self, client_id: i32, name: &str, opmode: OpMode) -> ReturnCode;

    /// Reads a named integer signal.
    fn integer_signal(&self, client_id: i32, name: &str, opmode: OpMode) -> (ReturnCode, i32);

    /// Writes a named integer signal.
    fn set_integer_signal(
        &self,
        client_id: i32,
        name: &str,
        value: i32,
        opmode: OpMode,
    ) -> ReturnCode;

    /// Clears a named integer signal.
    fn clear_integer_signal(&self, client_id: i32, name: &str, opmode: OpMode) -> ReturnCode;
}

impl<T: RemoteApi + ?Sized> RemoteApi for &T {
    fn start(
        &self,
        host: &str,
        port: u16,
        wait_until_connected: bool,
        do_not_reconnect: bool,
        timeout_ms: i32,
        comm_cycle_ms: i32,
    ) -> i32 {
        (**self).start(
            host,
            port,
            wait_until_connected,
            do_not_reconnect,
            timeout_ms,
            comm_cycle_ms,
        )
    }

    fn finish(&self, client_id: i32) {
        (**self).finish(client_id)
    }

    fn start_simulation(&self, client_id: i32, opmode: OpMode) -> ReturnCode {
        (**self).start_simulation(client_id, opmode)
    }

    fn stop_simulation(&self, client_id: i32, opmode: OpMode) -> ReturnCode {
        (**self).stop_simulation(client_id, opmode)
    }

    fn object_group_data(
        &self,
        client_id: i32,
        object_type: ObjectType,
        opmode: OpMode,
    ) -> (ReturnCode, Vec<(String, i32)>) {
        (**self).object_group_data(client_id, object_type, opmode)
    }

    fn object_int_parameter(
        &self,
        client_id: i32,
        handle: i32,
        param: i32,
        opmode: OpMode,
    ) -> (ReturnCode, i32) {
        (**self).object_int_parameter(client_id, handle, param, opmode)
    }

    fn set_object_int_parameter(
        &self,
        client_id: i32,
        handle: i32,
        param: i32,
        value: i32,
        opmode: OpMode,
    ) -> ReturnCode {
        (**self).set_object_int_parameter(client_id, handle, param, value, opmode)
    }

    fn joint_position(&self, client_id: i32, handle: i32, opmode: OpMode) -> (ReturnCode, f32) {
        (**self).joint_position(client_id, handle, opmode)
    }

    fn set_joint_target_position(
        &self,
        client_id: i32,
        handle: i32,
        position: f32,
        opmode: OpMode,
    ) -> ReturnCode {
        (**self).set_joint_target_position(client_id, handle, position, opmode)
    }

    fn set_joint_target_velocity(
        &self,
        client_id: i32,
        handle: i32,
        velocity: f32,
        opmode: OpMode,
    ) -> ReturnCode {
        (**self).set_joint_target_velocity(client_id, handle, velocity, opmode)
    }

    fn string_signal(&self, client_id: i32, name: &str, opmode: OpMode) -> (ReturnCode, Vec<u8>) {
        (**self).string_signal(client_id, name, opmode)
    }

    fn set_string_signal(
        &self,
        client_id: i32,
        name: &str,
        value: &[u8],
        opmode: OpMode,
    ) -> ReturnCode {
        (**self).set_string_signal(client_id, name, value, opmode)
    }

    fn clear_string_signal(&self, client_id: i32, name: &str, opmode: OpMode) -> ReturnCode {
        (**self).clear_string_signal(client_id, name, opmode)
    }

    fn float_signal(&self, client_id: i32, name: &str, opmode: OpMode) -> (ReturnCode, f32) {
        (**self).float_signal(client_id, name, opmode)
    }

    fn set_float_signal(
        &self,
        client_id: i32,
        name: &str,
        value: f32,
        opmode: OpMode,
    ) -> ReturnCode {
        (**self).set_float_signal(client_id, name, value, opmode)
    }

    fn clear_float_signal(&self, client_id: i32, name: &str, opmode: OpMode) -> ReturnCode {
        (**self).clear_float_signal(client_id, name, opmode)
    }

    fn integer_signal(&self, client_id: i32, name: &str, opmode: OpMode) -> (ReturnCode, i32) {
        (**self).integer_signal(client_id, name, opmode)
    }

    fn set_integer_signal(
        &self,
        client_id: i32,
        name: &str,
        value: i32,
        opmode: OpMode,
    ) -> ReturnCode {
        (**self).set_integer_signal(client_id, name, value, opmode)
    }

    fn clear_integer_signal(&self, client_id: i32, name: &str, opmode: OpMode) -> ReturnCode {
        (**self).clear_integer_signal(client_id, name, opmode)
    }
}
