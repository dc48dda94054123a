use bitflags::bitflags;

/// Operation mode of a remote API call.
///
/// The mode selects how the client library schedules the command: as a
/// fire-and-forget message, as a blocking round trip, or against the local
/// buffer that the server fills once streaming has been requested.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpMode {
    /// Send the command and return immediately.
    Oneshot = 0x00_0000,
    /// Send the command and wait for the server reply.
    Blocking = 0x01_0000,
    /// Ask the server to start streaming the value continuously.
    Streaming = 0x02_0000,
    /// Ask the server to stop streaming the value.
    Discontinue = 0x05_0000,
    /// Read the most recently streamed value from the local buffer.
    Buffer = 0x06_0000,
    /// Drop locally buffered data for the command.
    Remove = 0x07_0000,
}

impl OpMode {
    /// The raw mode value passed over the foreign interface.
    #[must_use]
    pub const fn raw(self) -> i32 {
        self as i32
    }
}

bitflags! {
    /// Status word returned by every remote API call.
    ///
    /// An empty word is success; each bit is one failure category. Several
    /// bits can be set at once.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ReturnCode: i32 {
        /// The input buffer does not hold a reply for this command yet.
        const NOVALUE = 1;
        /// The reply did not arrive within the timeout of a blocking call.
        const TIMEOUT = 1 << 1;
        /// The command does not support the requested operation mode.
        const ILLEGAL_OPMODE = 1 << 2;
        /// The command failed on the server side.
        const REMOTE_ERROR = 1 << 3;
        /// A previous identical command is still being processed.
        const SPLIT_PROGRESS = 1 << 4;
        /// The command failed on the client side.
        const LOCAL_ERROR = 1 << 5;
        /// No connection was established before issuing the command.
        const INITIALIZE_ERROR = 1 << 6;
    }
}

impl ReturnCode {
    /// Success.
    pub const OK: Self = Self::empty();

    /// Whether the call succeeded.
    #[must_use]
    pub const fn is_ok(self) -> bool {
        self.bits() == 0
    }
}

/// Scene object categories understood by the enumeration call.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectType {
    /// Shapes (meshes and primitives).
    Shape = 0,
    /// Joints.
    Joint = 1,
    /// Graph objects.
    Graph = 2,
    /// Cameras.
    Camera = 3,
    /// Dummy objects.
    Dummy = 4,
    /// Proximity sensors.
    ProximitySensor = 5,
}

/// Joint int-parameter id: motor enabled.
pub const JOINT_PARAM_MOTOR_ENABLED: i32 = 2000;

/// Joint int-parameter id: control loop enabled. Non-zero means the joint is
/// position-controlled, zero means velocity-controlled.
pub const JOINT_PARAM_CTRL_ENABLED: i32 = 2001;

/// Data selector for the object enumeration call: object names.
pub(crate) const GROUP_DATA_NAMES: i32 = 0;

/// Connection timeout handed to the client library, in milliseconds.
pub const CONNECT_TIMEOUT_MS: i32 = 1000;

/// Communication thread cycle handed to the client library, in milliseconds.
pub const COMM_CYCLE_MS: i32 = 5;

#[cfg(test)]
mod tests {
    use super::*;

    #[rstest::rstest]
    #[case(0x00_0000, OpMode::Oneshot)]
    #[case(0x01_0000, OpMode::Blocking)]
    #[case(0x02_0000, OpMode::Streaming)]
    #[case(0x05_0000, OpMode::Discontinue)]
    #[case(0x06_0000, OpMode::Buffer)]
    #[case(0x07_0000, OpMode::Remove)]
    fn opmode_raw_values(#[case] expected: i32, #[case] opmode: OpMode) {
        assert_eq!(expected, opmode.raw());
    }

    #[rstest::rstest]
    #[case(1, ReturnCode::NOVALUE)]
    #[case(2, ReturnCode::TIMEOUT)]
    #[case(4, ReturnCode::ILLEGAL_OPMODE)]
    #[case(8, ReturnCode::REMOTE_ERROR)]
    #[case(16, ReturnCode::SPLIT_PROGRESS)]
    #[case(32, ReturnCode::LOCAL_ERROR)]
    #[case(64, ReturnCode::INITIALIZE_ERROR)]
    fn return_code_bits(#[case] expected: i32, #[case] code: ReturnCode) {
        assert_eq!(expected, code.bits());
    }

    #[test]
    fn ok_is_the_empty_word() {
        assert!(ReturnCode::OK.is_ok());
        assert_eq!(0, ReturnCode::OK.bits());
        assert!(!ReturnCode::NOVALUE.is_ok());
        assert!(!(ReturnCode::TIMEOUT | ReturnCode::LOCAL_ERROR).is_ok());
    }

    #[test]
    fn joint_object_type_matches_the_vendor_header() {
        assert_eq!(1, ObjectType::Joint as i32);
        assert_eq!(2001, JOINT_PARAM_CTRL_ENABLED);
    }
}
