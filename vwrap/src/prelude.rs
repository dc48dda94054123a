//! Commonly used items.

pub use crate::{
    Error, FloatSignal, IntegerSignal, Joint, OpMode, RemoteApi, RemoteError, Scene, Session,
    Signal, StringSignal, DEFAULT_HOST, DEFAULT_PORT,
};
