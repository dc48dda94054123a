//! In-process emulation of a V-REP remote API server.
//!
//! [`Emulator`] implements [`RemoteApi`] over plain in-memory state so the
//! wrapper types can be exercised without a simulator installation. It
//! models exactly the parts of the server the wrapper relies on: the
//! streaming/buffer read contract, the signal mailboxes, and the joint
//! parameter and target calls. It is test tooling, not a server; nothing
//! crosses a process boundary.

use std::{
    cell::RefCell,
    collections::{HashMap, HashSet},
};

use vwrap_remote::{ObjectType, OpMode, RemoteApi, ReturnCode, JOINT_PARAM_CTRL_ENABLED};

#[derive(Debug, Clone)]
struct EmulatedJoint {
    name: String,
    handle: i32,
    position: f32,
    target_position: Option<f32>,
    target_velocity: Option<f32>,
    ctrl_enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum StreamKey {
    JointPosition(i32),
    StringSignal(String),
    FloatSignal(String),
    IntegerSignal(String),
}

#[derive(Debug, Default)]
struct State {
    joints: Vec<EmulatedJoint>,
    string_signals: HashMap<String, Vec<u8>>,
    float_signals: HashMap<String, f32>,
    integer_signals: HashMap<String, i32>,
    streams: HashSet<StreamKey>,
    next_client_id: i32,
    connected: bool,
    running: bool,
    refuse_connections: bool,
    fail_next: Option<ReturnCode>,
}

impl State {
    fn take_failure(&mut self) -> Option<ReturnCode> {
        self.fail_next.take()
    }

    fn joint(&self, handle: i32) -> Option<&EmulatedJoint> {
        self.joints.iter().find(|j| j.handle == handle)
    }

    fn joint_mut(&mut self, handle: i32) -> Option<&mut EmulatedJoint> {
        self.joints.iter_mut().find(|j| j.handle == handle)
    }

    fn joint_by_name_mut(&mut self, name: &str) -> Option<&mut EmulatedJoint> {
        self.joints.iter_mut().find(|j| j.name == name)
    }
}

/// An in-memory stand-in for a running simulator.
#[derive(Debug, Default)]
pub struct Emulator {
    state: RefCell<State>,
}

impl Emulator {
    /// Creates an emulator with an empty scene.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a joint to the scene and returns its handle. Handles are
    /// assigned consecutively starting at 10.
    pub fn add_joint(&self, name: &str, position: f32, position_controlled: bool) -> i32 {
        let mut state = self.state.borrow_mut();
        let handle = 10 + state.joints.len() as i32;
        state.joints.push(EmulatedJoint {
            name: name.to_string(),
            handle,
            position,
            target_position: None,
            target_velocity: None,
            ctrl_enabled: position_controlled,
        });
        handle
    }

    /// Makes every subsequent connection attempt fail.
    pub fn refuse_connections(&self) {
        self.state.borrow_mut().refuse_connections = true;
    }

    /// Makes the next remote command report `code` instead of executing.
    pub fn fail_next(&self, code: ReturnCode) {
        self.state.borrow_mut().fail_next = Some(code);
    }

    /// Forgets all streaming subscriptions, as if the server had not
    /// serviced any streaming request yet.
    pub fn reset_streams(&self) {
        self.state.borrow_mut().streams.clear();
    }

    /// Moves a joint on the server side, as the physics engine would.
    pub fn set_joint_position(&self, name: &str, position: f32) {
        if let Some(joint) = self.state.borrow_mut().joint_by_name_mut(name) {
            joint.position = position;
        }
    }

    /// Whether a client is connected.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.state.borrow().connected
    }

    /// Whether the simulation is running.
    #[must_use]
    pub fn is_simulation_running(&self) -> bool {
        self.state.borrow().running
    }

    /// The last target position pushed for the joint, if any.
    #[must_use]
    pub fn joint_target_position(&self, name: &str) -> Option<f32> {
        let state = self.state.borrow();
        state
            .joints
            .iter()
            .find(|j| j.name == name)
            .and_then(|j| j.target_position)
    }

    /// The last target velocity pushed for the joint, if any.
    #[must_use]
    pub fn joint_target_velocity(&self, name: &str) -> Option<f32> {
        let state = self.state.borrow();
        state
            .joints
            .iter()
            .find(|j| j.name == name)
            .and_then(|j| j.target_velocity)
    }

    /// The control-loop-enabled flag of the joint, if it exists.
    #[must_use]
    pub fn joint_control_enabled(&self, name: &str) -> Option<bool> {
        let state = self.state.borrow();
        state
            .joints
            .iter()
            .find(|j| j.name == name)
            .map(|j| j.ctrl_enabled)
    }
}

// A streaming request subscribes and reports the current value right away;
// buffer reads only see values for subscribed channels. The real client
// library may need a few cycles before the first streamed value lands, so
// callers must tolerate both.
fn read_channel<T: Clone>(
    streams: &mut HashSet<StreamKey>,
    key: StreamKey,
    value: Option<&T>,
    default: T,
    opmode: OpMode,
) -> (ReturnCode, T) {
    let subscribed = match opmode {
        OpMode::Streaming => {
            streams.insert(key);
            true
        }
        OpMode::Buffer => streams.contains(&key),
        _ => true,
    };
    match value {
        Some(value) if subscribed => (ReturnCode::OK, value.clone()),
        _ => (ReturnCode::NOVALUE, default),
    }
}

impl RemoteApi for Emulator {
    fn start(
        &self,
        _host: &str,
        _port: u16,
        _wait_until_connected: bool,
        _do_not_reconnect: bool,
        _timeout_ms: i32,
        _comm_cycle_ms: i32,
    ) -> i32 {
        let mut state = self.state.borrow_mut();
        if state.refuse_connections {
            return -1;
        }
        state.connected = true;
        let client_id = state.next_client_id;
        state.next_client_id += 1;
        client_id
    }

    fn finish(&self, _client_id: i32) {
        self.state.borrow_mut().connected = false;
    }

    fn start_simulation(&self, _client_id: i32, _opmode: OpMode) -> ReturnCode {
        let mut state = self.state.borrow_mut();
        if let Some(code) = state.take_failure() {
            return code;
        }
        state.running = true;
        ReturnCode::OK
    }

    fn stop_simulation(&self, _client_id: i32, _opmode: OpMode) -> ReturnCode {
        let mut state = self.state.borrow_mut();
        if let Some(code) = state.take_failure() {
            return code;
        }
        state.running = false;
        ReturnCode::OK
    }

    fn object_group_data(
        &self,
        _client_id: i32,
        object_type: ObjectType,
        _opmode: OpMode,
    ) -> (ReturnCode, Vec<(String, i32)>) {
        let mut state = self.state.borrow_mut();
        if let Some(code) = state.take_failure() {
            return (code, Vec::new());
        }
        if object_type != ObjectType::Joint {
            return (ReturnCode::OK, Vec::new());
        }
        (
            ReturnCode::OK,
            state
                .joints
                .iter()
                .map(|j| (j.name.clone(), j.handle))
                .collect(),
        )
    }

    fn object_int_parameter(
        &self,
        _client_id: i32,
        handle: i32,
        param: i32,
        _opmode: OpMode,
    ) -> (ReturnCode, i32) {
        let mut state = self.state.borrow_mut();
        if let Some(code) = state.take_failure() {
            return (code, 0);
        }
        match state.joint(handle) {
            Some(joint) if param == JOINT_PARAM_CTRL_ENABLED => {
                (ReturnCode::OK, i32::from(joint.ctrl_enabled))
            }
            _ => (ReturnCode::REMOTE_ERROR, 0),
        }
    }

    fn set_object_int_parameter(
        &self,
        _client_id: i32,
        handle: i32,
        param: i32,
        value: i32,
        _opmode: OpMode,
    ) -> ReturnCode {
        let mut state = self.state.borrow_mut();
        if let Some(code) = state.take_failure() {
            return code;
        }
        match state.joint_mut(handle) {
            Some(joint) if param == JOINT_PARAM_CTRL_ENABLED => {
                joint.ctrl_enabled = value != 0;
                ReturnCode::OK
            }
            _ => ReturnCode::REMOTE_ERROR,
        }
    }

    fn joint_position(&self, _client_id: i32, handle: i32, opmode: OpMode) -> (ReturnCode, f32) {
        let mut state = self.state.borrow_mut();
        if let Some(code) = state.take_failure() {
            return (code, 0.0);
        }
        let Some(position) = state.joint(handle).map(|j| j.position) else {
            return (ReturnCode::REMOTE_ERROR, 0.0);
        };
        read_channel(
            &mut state.streams,
            StreamKey::JointPosition(handle),
            Some(&position),
            0.0,
            opmode,
        )
    }

    fn set_joint_target_position(
        &self,
        _client_id: i32,
        handle: i32,
        position: f32,
        _opmode: OpMode,
    ) -> ReturnCode {
        let mut state = self.state.borrow_mut();
        if let Some(code) = state.take_failure() {
            return code;
        }
        match state.joint_mut(handle) {
            Some(joint) => {
                joint.target_position = Some(position);
                ReturnCode::OK
            }
            None => ReturnCode::REMOTE_ERROR,
        }
    }

    fn set_joint_target_velocity(
        &self,
        _client_id: i32,
        handle: i32,
        velocity: f32,
        _opmode: OpMode,
    ) -> ReturnCode {
        let mut state = self.state.borrow_mut();
        if let Some(code) = state.take_failure() {
            return code;
        }
        match state.joint_mut(handle) {
            Some(joint) => {
                joint.target_velocity = Some(velocity);
                ReturnCode::OK
            }
            None => ReturnCode::REMOTE_ERROR,
        }
    }

    fn string_signal(&self, _client_id: i32, name: &str, opmode: OpMode) -> (ReturnCode, Vec<u8>) {
        let mut state = self.state.borrow_mut();
        if let Some(code) = state.take_failure() {
            return (code, Vec::new());
        }
        let value = state.string_signals.get(name).cloned();
        read_channel(
            &mut state.streams,
            StreamKey::StringSignal(name.to_string()),
            value.as_ref(),
            Vec::new(),
            opmode,
        )
    }

    fn set_string_signal(
        &self,
        _client_id: i32,
        name: &str,
        value: &[u8],
        _opmode: OpMode,
    ) -> ReturnCode {
        let mut state = self.state.borrow_mut();
        if let Some(code) = state.take_failure() {
            return code;
        }
        state.string_signals.insert(name.to_string(), value.to_vec());
        ReturnCode::OK
    }

    fn clear_string_signal(&self, _client_id: i32, name: &str, _opmode: OpMode) -> ReturnCode {
        let mut state = self.state.borrow_mut();
        if let Some(code) = state.take_failure() {
            return code;
        }
        state.string_signals.remove(name);
        ReturnCode::OK
    }

    fn float_signal(&self, _client_id: i32, name: &str, opmode: OpMode) -> (ReturnCode, f32) {
        let mut state = self.state.borrow_mut();
        if let Some(code) = state.take_failure() {
            return (code, 0.0);
        }
        let value = state.float_signals.get(name).copied();
        read_channel(
            &mut state.streams,
            StreamKey::FloatSignal(name.to_string()),
            value.as_ref(),
            0.0,
            opmode,
        )
    }

    fn set_float_signal(
        &self,
        _client_id: i32,
        name: &str,
        value: f32,
        _opmode: OpMode,
    ) -> ReturnCode {
        let mut state = self.state.borrow_mut();
        if let Some(code) = state.take_failure() {
            return code;
        }
        state.float_signals.insert(name.to_string(), value);
        ReturnCode::OK
    }

    fn clear_float_signal(&self, _client_id: i32, name: &str, _opmode: OpMode) -> ReturnCode {
        let mut state = self.state.borrow_mut();
        if let Some(code) = state.take_failure() {
            return code;
        }
        state.float_signals.remove(name);
        ReturnCode::OK
    }

    fn integer_signal(&self, _client_id: i32, name: &str, opmode: OpMode) -> (ReturnCode, i32) {
        let mut state = self.state.borrow_mut();
        if let Some(code) = state.take_failure() {
            return (code, 0);
        }
        let value = state.integer_signals.get(name).copied();
        read_channel(
            &mut state.streams,
            StreamKey::IntegerSignal(name.to_string()),
            value.as_ref(),
            0,
            opmode,
        )
    }

    fn set_integer_signal(
        &self,
        _client_id: i32,
        name: &str,
        value: i32,
        _opmode: OpMode,
    ) -> ReturnCode {
        let mut state = self.state.borrow_mut();
        if let Some(code) = state.take_failure() {
            return code;
        }
        state.integer_signals.insert(name.to_string(), value);
        ReturnCode::OK
    }

    fn clear_integer_signal(&self, _client_id: i32, name: &str, _opmode: OpMode) -> ReturnCode {
        let mut state = self.state.borrow_mut();
        if let Some(code) = state.take_failure() {
            return code;
        }
        state.integer_signals.remove(name);
        ReturnCode::OK
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connects_until_refused() {
        let emulator = Emulator::new();
        assert_eq!(0, emulator.start("127.0.0.1", 19997, true, true, 1000, 5));
        assert!(emulator.is_connected());

        emulator.refuse_connections();
        assert_eq!(-1, emulator.start("127.0.0.1", 19997, true, true, 1000, 5));
    }

    #[test]
    fn buffer_reads_need_a_streaming_request_first() {
        let emulator = Emulator::new();
        let handle = emulator.add_joint("arm", 0.25, true);

        let (code, _) = emulator.joint_position(0, handle, OpMode::Buffer);
        assert_eq!(ReturnCode::NOVALUE, code);

        let (code, position) = emulator.joint_position(0, handle, OpMode::Streaming);
        assert_eq!(ReturnCode::OK, code);
        assert_eq!(0.25, position);

        let (code, position) = emulator.joint_position(0, handle, OpMode::Buffer);
        assert_eq!(ReturnCode::OK, code);
        assert_eq!(0.25, position);
    }

    #[test]
    fn fail_next_applies_to_exactly_one_command() {
        let emulator = Emulator::new();
        emulator.fail_next(ReturnCode::TIMEOUT);

        assert_eq!(ReturnCode::TIMEOUT, emulator.start_simulation(0, OpMode::Blocking));
        assert_eq!(ReturnCode::OK, emulator.start_simulation(0, OpMode::Blocking));
    }

    #[test]
    fn signals_are_cleared_explicitly() {
        let emulator = Emulator::new();
        emulator.set_float_signal(0, "gain", 0.5, OpMode::Oneshot);

        let (code, value) = emulator.float_signal(0, "gain", OpMode::Streaming);
        assert_eq!(ReturnCode::OK, code);
        assert_eq!(0.5, value);

        emulator.clear_float_signal(0, "gain", OpMode::Oneshot);
        let (code, _) = emulator.float_signal(0, "gain", OpMode::Buffer);
        assert_eq!(ReturnCode::NOVALUE, code);
    }
}
