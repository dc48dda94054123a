use std::{
    ffi::{c_char, c_float, c_int, c_uchar, CStr, CString},
    path::Path,
    ptr,
};

use libloading::Library;

use crate::{
    api::RemoteApi,
    constants::{ObjectType, OpMode, ReturnCode, GROUP_DATA_NAMES},
};

// simxInt is c_int, simxFloat is c_float, simxChar is c_char, simxUChar is
// c_uchar; simxBool is an unsigned char carrying 0 or 1.
type SimxStart =
    unsafe extern "C" fn(*const c_char, c_int, c_uchar, c_uchar, c_int, c_int) -> c_int;
type SimxFinish = unsafe extern "C" fn(c_int);
type SimxSimulationCtrl = unsafe extern "C" fn(c_int, c_int) -> c_int;
type SimxGetObjectGroupData = unsafe extern "C" fn(
    c_int,
    c_int,
    c_int,
    *mut c_int,
    *mut *mut c_int,
    *mut c_int,
    *mut *mut c_int,
    *mut c_int,
    *mut *mut c_float,
    *mut c_int,
    *mut *mut c_char,
    c_int,
) -> c_int;
type SimxGetObjectIntParameter =
    unsafe extern "C" fn(c_int, c_int, c_int, *mut c_int, c_int) -> c_int;
type SimxSetObjectIntParameter = unsafe extern "C" fn(c_int, c_int, c_int, c_int, c_int) -> c_int;
type SimxGetJointPosition = unsafe extern "C" fn(c_int, c_int, *mut c_float, c_int) -> c_int;
type SimxSetJointTarget = unsafe extern "C" fn(c_int, c_int, c_float, c_int) -> c_int;
type SimxGetStringSignal =
    unsafe extern "C" fn(c_int, *const c_char, *mut *mut c_uchar, *mut c_int, c_int) -> c_int;
type SimxSetStringSignal =
    unsafe extern "C" fn(c_int, *const c_char, *const c_uchar, c_int, c_int) -> c_int;
type SimxGetFloatSignal =
    unsafe extern "C" fn(c_int, *const c_char, *mut c_float, c_int) -> c_int;
type SimxSetFloatSignal = unsafe extern "C" fn(c_int, *const c_char, c_float, c_int) -> c_int;
type SimxGetIntegerSignal =
    unsafe extern "C" fn(c_int, *const c_char, *mut c_int, c_int) -> c_int;
type SimxSetIntegerSignal = unsafe extern "C" fn(c_int, *const c_char, c_int, c_int) -> c_int;
type SimxClearSignal = unsafe extern "C" fn(c_int, *const c_char, c_int) -> c_int;

/// The loaded remote API client library.
///
/// Every consumed export is resolved at load time, so a stripped or
/// mismatched library build fails when it is loaded instead of mid-session.
pub struct RemoteApiLib {
    start: SimxStart,
    finish: SimxFinish,
    start_simulation: SimxSimulationCtrl,
    stop_simulation: SimxSimulationCtrl,
    get_object_group_data: SimxGetObjectGroupData,
    get_object_int_parameter: SimxGetObjectIntParameter,
    set_object_int_parameter: SimxSetObjectIntParameter,
    get_joint_position: SimxGetJointPosition,
    set_joint_target_position: SimxSetJointTarget,
    set_joint_target_velocity: SimxSetJointTarget,
    get_string_signal: SimxGetStringSignal,
    set_string_signal: SimxSetStringSignal,
    clear_string_signal: SimxClearSignal,
    get_float_signal: SimxGetFloatSignal,
    set_float_signal: SimxSetFloatSignal,
    clear_float_signal: SimxClearSignal,
    get_integer_signal: SimxGetIntegerSignal,
    set_integer_signal: SimxSetIntegerSignal,
    clear_integer_signal: SimxClearSignal,
    _lib: Library,
}

impl RemoteApiLib {
    /// Loads the client library from `path` and resolves its exports.
    pub(crate) fn load(path: &Path) -> Result<Self, libloading::Error> {
        let lib = unsafe { Library::new(path) }?;
        unsafe {
            let start = *lib.get::<SimxStart>(b"simxStart\0")?;
            let finish = *lib.get::<SimxFinish>(b"simxFinish\0")?;
            let start_simulation = *lib.get::<SimxSimulationCtrl>(b"simxStartSimulation\0")?;
            let stop_simulation = *lib.get::<SimxSimulationCtrl>(b"simxStopSimulation\0")?;
            let get_object_group_data =
                *lib.get::<SimxGetObjectGroupData>(b"simxGetObjectGroupData\0")?;
            let get_object_int_parameter =
                *lib.get::<SimxGetObjectIntParameter>(b"simxGetObjectIntParameter\0")?;
            let set_object_int_parameter =
                *lib.get::<SimxSetObjectIntParameter>(b"simxSetObjectIntParameter\0")?;
            let get_joint_position = *lib.get::<SimxGetJointPosition>(b"simxGetJointPosition\0")?;
            let set_joint_target_position =
                *lib.get::<SimxSetJointTarget>(b"simxSetJointTargetPosition\0")?;
            let set_joint_target_velocity =
                *lib.get::<SimxSetJointTarget>(b"simxSetJointTargetVelocity\0")?;
            let get_string_signal = *lib.get::<SimxGetStringSignal>(b"simxGetStringSignal\0")?;
            let set_string_signal = *lib.get::<SimxSetStringSignal>(b"simxSetStringSignal\0")?;
            let clear_string_signal = *lib.get::<SimxClearSignal>(b"simxClearStringSignal\0")?;
            let get_float_signal = *lib.get::<SimxGetFloatSignal>(b"simxGetFloatSignal\0")?;
            let set_float_signal = *lib.get::<SimxSetFloatSignal>(b"simxSetFloatSignal\0")?;
            let clear_float_signal = *lib.get::<SimxClearSignal>(b"simxClearFloatSignal\0")?;
            let get_integer_signal =
                *lib.get::<SimxGetIntegerSignal>(b"simxGetIntegerSignal\0")?;
            let set_integer_signal =
                *lib.get::<SimxSetIntegerSignal>(b"simxSetIntegerSignal\0")?;
            let clear_integer_signal = *lib.get::<SimxClearSignal>(b"simxClearIntegerSignal\0")?;
            Ok(Self {
                start,
                finish,
                start_simulation,
                stop_simulation,
                get_object_group_data,
                get_object_int_parameter,
                set_object_int_parameter,
                get_joint_position,
                set_joint_target_position,
                set_joint_target_velocity,
                get_string_signal,
                set_string_signal,
                clear_string_signal,
                get_float_signal,
                set_float_signal,
                clear_float_signal,
                get_integer_signal,
                set_integer_signal,
                clear_integer_signal,
                _lib: lib,
            })
        }
    }
}

// A NUL inside a name cannot cross the C boundary; report it the way the
// client library reports its own local failures.
fn c_name(name: &str) -> Result<CString, ReturnCode> {
    CString::new(name).map_err(|_| ReturnCode::LOCAL_ERROR)
}

fn code(raw: c_int) -> ReturnCode {
    ReturnCode::from_bits_retain(raw)
}

impl RemoteApi for RemoteApiLib {
    fn start(
        &self,
        host: &str,
        port: u16,
        wait_until_connected: bool,
        do_not_reconnect: bool,
        timeout_ms: i32,
        comm_cycle_ms: i32,
    ) -> i32 {
        let Ok(host) = CString::new(host) else {
            return -1;
        };
        unsafe {
            (self.start)(
                host.as_ptr(),
                c_int::from(port),
                c_uchar::from(wait_until_connected),
                c_uchar::from(do_not_reconnect),
                timeout_ms,
                comm_cycle_ms,
            )
        }
    }

    fn finish(&self, client_id: i32) {
        unsafe { (self.finish)(client_id) }
    }

    fn start_simulation(&self, client_id: i32, opmode: OpMode) -> ReturnCode {
        code(unsafe { (self.start_simulation)(client_id, opmode.raw()) })
    }

    fn stop_simulation(&self, client_id: i32, opmode: OpMode) -> ReturnCode {
        code(unsafe { (self.stop_simulation)(client_id, opmode.raw()) })
    }

    fn object_group_data(
        &self,
        client_id: i32,
        object_type: ObjectType,
        opmode: OpMode,
    ) -> (ReturnCode, Vec<(String, i32)>) {
        let mut handle_count: c_int = 0;
        let mut handles: *mut c_int = ptr::null_mut();
        let mut int_count: c_int = 0;
        let mut ints: *mut c_int = ptr::null_mut();
        let mut float_count: c_int = 0;
        let mut floats: *mut c_float = ptr::null_mut();
        let mut string_count: c_int = 0;
        let mut strings: *mut c_char = ptr::null_mut();
        let ret = code(unsafe {
            (self.get_object_group_data)(
                client_id,
                object_type as i32,
                GROUP_DATA_NAMES,
                &mut handle_count,
                &mut handles,
                &mut int_count,
                &mut ints,
                &mut float_count,
                &mut floats,
                &mut string_count,
                &mut strings,
                opmode.raw(),
            )
        });
        if !ret.is_ok() || handles.is_null() || strings.is_null() {
            return (ret, Vec::new());
        }

        // The string block is `string_count` consecutive NUL-terminated
        // names. Both blocks are owned by the client library and stay valid
        // only until its next call, so copy everything out right away.
        let count = handle_count.min(string_count).max(0) as usize;
        let mut objects = Vec::with_capacity(count);
        let mut cursor = strings;
        for i in 0..count {
            let name = unsafe { CStr::from_ptr(cursor) };
            let handle = unsafe { *handles.add(i) };
            objects.push((name.to_string_lossy().into_owned(), handle));
            cursor = unsafe { cursor.add(name.to_bytes_with_nul().len()) };
        }
        (ret, objects)
    }

    fn object_int_parameter(
        &self,
        client_id: i32,
        handle: i32,
        param: i32,
        opmode: OpMode,
    ) -> (ReturnCode, i32) {
        let mut value: c_int = 0;
        let ret = code(unsafe {
            (self.get_object_int_parameter)(client_id, handle, param, &mut value, opmode.raw())
        });
        (ret, value)
    }

    fn set_object_int_parameter(
        &self,
        client_id: i32,
        handle: i32,
        param: i32,
        value: i32,
        opmode: OpMode,
    ) -> ReturnCode {
        code(unsafe {
            (self.set_object_int_parameter)(client_id, handle, param, value, opmode.raw())
        })
    }

    fn joint_position(&self, client_id: i32, handle: i32, opmode: OpMode) -> (ReturnCode, f32) {
        let mut position: c_float = 0.0;
        let ret = code(unsafe {
            (self.get_joint_position)(client_id, handle, &mut position, opmode.raw())
        });
        (ret, position)
    }

    fn set_joint_target_position(
        &self,
        client_id: i32,
        handle: i32,
        position: f32,
        opmode: OpMode,
    ) -> ReturnCode {
        code(unsafe {
            (self.set_joint_target_position)(client_id, handle, position, opmode.raw())
        })
    }

    fn set_joint_target_velocity(
        &self,
        client_id: i32,
        handle: i32,
        velocity: f32,
        opmode: OpMode,
    ) -> ReturnCode {
        code(unsafe {
            (self.set_joint_target_velocity)(client_id, handle, velocity, opmode.raw())
        })
    }

    fn string_signal(&self, client_id: i32, name: &str, opmode: OpMode) -> (ReturnCode, Vec<u8>) {
        let name = match c_name(name) {
            Ok(name) => name,
            Err(err) => return (err, Vec::new()),
        };
        let mut data: *mut c_uchar = ptr::null_mut();
        let mut len: c_int = 0;
        let ret = code(unsafe {
            (self.get_string_signal)(client_id, name.as_ptr(), &mut data, &mut len, opmode.raw())
        });
        if !ret.is_ok() || data.is_null() || len < 0 {
            return (ret, Vec::new());
        }
        // Library-owned buffer, valid until the next call.
        let value = unsafe { std::slice::from_raw_parts(data, len as usize) }.to_vec();
        (ret, value)
    }

    fn set_string_signal(
        &self,
        client_id: i32,
        name: &str,
        value: &[u8],
        opmode: OpMode,
    ) -> ReturnCode {
        let name = match c_name(name) {
            Ok(name) => name,
            Err(err) => return err,
        };
        code(unsafe {
            (self.set_string_signal)(
                client_id,
                name.as_ptr(),
                value.as_ptr(),
                value.len() as c_int,
                opmode.raw(),
            )
        })
    }

    fn clear_string_signal(&self, client_id: i32, name: &str, opmode: OpMode) -> ReturnCode {
        let name = match c_name(name) {
            Ok(name) => name,
            Err(err) => return err,
        };
        code(unsafe { (self.clear_string_signal)(client_id, name.as_ptr(), opmode.raw()) })
    }

    fn float_signal(&self, client_id: i32, name: &str, opmode: OpMode) -> (ReturnCode, f32) {
        let name = match c_name(name) {
            Ok(name) => name,
            Err(err) => return (err, 0.0),
        };
        let mut value: c_float = 0.0;
        let ret = code(unsafe {
            (self.get_float_signal)(client_id, name.as_ptr(), &mut value, opmode.raw())
        });
        (ret, value)
    }

    fn set_float_signal(
        &self,
        client_id: i32,
        name: &str,
        value: f32,
        opmode: OpMode,
    ) -> ReturnCode {
        let name = match c_name(name) {
            Ok(name) => name,
            Err(err) => return err,
        };
        code(unsafe { (self.set_float_signal)(client_id, name.as_ptr(), value, opmode.raw()) })
    }

    fn clear_float_signal(&self, client_id: i32, name: &str, opmode: OpMode) -> ReturnCode {
        let name = match c_name(name) {
            Ok(name) => name,
            Err(err) => return err,
        };
        code(unsafe { (self.clear_float_signal)(client_id, name.as_ptr(), opmode.raw()) })
    }

    fn integer_signal(&self, client_id: i32, name: &str, opmode: OpMode) -> (ReturnCode, i32) {
        let name = match c_name(name) {
            Ok(name) => name,
            Err(err) => return (err, 0),
        };
        let mut value: c_int = 0;
        let ret = code(unsafe {
            (self.get_integer_signal)(client_id, name.as_ptr(), &mut value, opmode.raw())
        });
        (ret, value)
    }

    fn set_integer_signal(
        &self,
        client_id: i32,
        name: &str,
        value: i32,
        opmode: OpMode,
    ) -> ReturnCode {
        let name = match c_name(name) {
            Ok(name) => name,
            Err(err) => return err,
        };
        code(unsafe { (self.set_integer_signal)(client_id, name.as_ptr(), value, opmode.raw()) })
    }

    fn clear_integer_signal(&self, client_id: i32, name: &str, opmode: OpMode) -> ReturnCode {
        let name = match c_name(name) {
            Ok(name) => name,
            Err(err) => return err,
        };
        code(unsafe { (self.clear_integer_signal)(client_id, name.as_ptr(), opmode.raw()) })
    }
}
