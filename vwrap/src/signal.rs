use std::marker::PhantomData;

use vwrap_remote::{OpMode, RemoteApi, ReturnCode};

use crate::session::Session;

mod sealed {
    pub trait Sealed {}
    impl Sealed for String {}
    impl Sealed for f32 {}
    impl Sealed for i32 {}
}

/// A value kind that can travel over a named signal.
///
/// The set is closed (string, float and integer signals) and each kind
/// binds its own get/set/clear triple of the remote API.
pub trait SignalValue: sealed::Sealed + Sized {
    #[doc(hidden)]
    fn get<A: RemoteApi>(api: &A, client_id: i32, name: &str, opmode: OpMode)
        -> (ReturnCode, Self);
    #[doc(hidden)]
    fn set<A: RemoteApi>(
        api: &A,
        client_id: i32,
        name: &str,
        value: &Self,
        opmode: OpMode,
    ) -> ReturnCode;
    #[doc(hidden)]
    fn clear<A: RemoteApi>(api: &A, client_id: i32, name: &str, opmode: OpMode) -> ReturnCode;
}

impl SignalValue for String {
    fn get<A: RemoteApi>(
        api: &A,
        client_id: i32,
        name: &str,
        opmode: OpMode,
    ) -> (ReturnCode, Self) {
        let (code, bytes) = api.string_signal(client_id, name, opmode);
        (code, String::from_utf8_lossy(&bytes).into_owned())
    }

    fn set<A: RemoteApi>(
        api: &A,
        client_id: i32,
        name: &str,
        value: &Self,
        opmode: OpMode,
    ) -> ReturnCode {
        api.set_string_signal(client_id, name, value.as_bytes(), opmode)
    }

    fn clear<A: RemoteApi>(api: &A, client_id: i32, name: &str, opmode: OpMode) -> ReturnCode {
        api.clear_string_signal(client_id, name, opmode)
    }
}

impl SignalValue for f32 {
    fn get<A: RemoteApi>(
        api: &A,
        client_id: i32,
        name: &str,
        opmode: OpMode,
    ) -> (ReturnCode, Self) {
        api.float_signal(client_id, name, opmode)
    }

    fn set<A: RemoteApi>(
        api: &A,
        client_id: i32,
        name: &str,
        value: &Self,
        opmode: OpMode,
    ) -> ReturnCode {
        api.set_float_signal(client_id, name, *value, opmode)
    }

    fn clear<A: RemoteApi>(api: &A, client_id: i32, name: &str, opmode: OpMode) -> ReturnCode {
        api.clear_float_signal(client_id, name, opmode)
    }
}

impl SignalValue for i32 {
    fn get<A: RemoteApi>(
        api: &A,
        client_id: i32,
        name: &str,
        opmode: OpMode,
    ) -> (ReturnCode, Self) {
        api.integer_signal(client_id, name, opmode)
    }

    fn set<A: RemoteApi>(
        api: &A,
        client_id: i32,
        name: &str,
        value: &Self,
        opmode: OpMode,
    ) -> ReturnCode {
        api.set_integer_signal(client_id, name, *value, opmode)
    }

    fn clear<A: RemoteApi>(api: &A, client_id: i32, name: &str, opmode: OpMode) -> ReturnCode {
        api.clear_integer_signal(client_id, name, opmode)
    }
}

/// A named value exchanged with the simulator's child scripts.
///
/// Reads are one-shot: a successfully read value is cleared on the server,
/// so the next read observes only a newer write. The first read starts the
/// server-side streaming of the signal and may well observe nothing yet.
pub struct Signal<A: RemoteApi, T: SignalValue> {
    api: A,
    client_id: i32,
    name: String,
    first_read: bool,
    _kind: PhantomData<fn() -> T>,
}

/// A [`Signal`] carrying a string.
pub type StringSignal<A> = Signal<A, String>;

/// A [`Signal`] carrying a float.
pub type FloatSignal<A> = Signal<A, f32>;

/// A [`Signal`] carrying an integer.
pub type IntegerSignal<A> = Signal<A, i32>;

impl<A: RemoteApi + Clone, T: SignalValue> Signal<A, T> {
    /// Creates a handle to the signal `name` on the session's server.
    #[must_use]
    pub fn new(session: &Session<A>, name: impl Into<String>) -> Self {
        Self {
            api: session.api().clone(),
            client_id: session.client_id(),
            name: name.into(),
            first_read: true,
            _kind: PhantomData,
        }
    }
}

impl<A: RemoteApi, T: SignalValue> Signal<A, T> {
    /// Name of the signal on the simulator side.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Reads the signal, `None` if no value has arrived since the last read.
    pub fn read(&mut self) -> Option<T> {
        let opmode = if std::mem::take(&mut self.first_read) {
            OpMode::Streaming
        } else {
            OpMode::Buffer
        };

        let (code, value) = T::get(&self.api, self.client_id, &self.name, opmode);
        if code.is_ok() {
            T::clear(&self.api, self.client_id, &self.name, OpMode::Oneshot);
            Some(value)
        } else {
            None
        }
    }

    /// Writes a value to the signal without waiting for the server.
    pub fn write(&self, value: &T) {
        T::set(&self.api, self.client_id, &self.name, value, OpMode::Oneshot);
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use vwrap_emulator::Emulator;

    use super::*;
    use crate::tests::connect;

    #[test]
    fn first_read_of_an_unset_signal_is_absent() {
        let emulator = Emulator::new();
        let session = connect(&emulator);

        let mut signal = FloatSignal::new(&session, "gain");
        assert_eq!(None, signal.read());
        assert_eq!(None, signal.read());
    }

    #[test]
    fn read_consumes_the_value() {
        let emulator = Emulator::new();
        let session = connect(&emulator);

        let mut signal = FloatSignal::new(&session, "gain");
        signal.write(&0.25);

        let value = signal.read().unwrap();
        assert_abs_diff_eq!(0.25, value);

        // Mailbox semantics: no new write, nothing to observe.
        assert_eq!(None, signal.read());
    }

    #[test]
    fn each_kind_uses_its_own_channel() {
        let emulator = Emulator::new();
        let session = connect(&emulator);

        let mut text = StringSignal::new(&session, "command");
        let mut count = IntegerSignal::new(&session, "command");

        text.write(&"grasp".to_string());
        count.write(&3);

        assert_eq!(Some("grasp".to_string()), text.read());
        assert_eq!(Some(3), count.read());
        assert_eq!(None, text.read());
        assert_eq!(None, count.read());
    }

    #[test]
    fn writes_are_fire_and_forget() {
        let emulator = Emulator::new();
        let session = connect(&emulator);

        let signal = IntegerSignal::new(&session, "step");
        emulator.fail_next(vwrap_remote::ReturnCode::REMOTE_ERROR);
        signal.write(&7);
    }
}
