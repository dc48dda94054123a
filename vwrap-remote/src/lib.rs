//! Loader and raw bindings for the V-REP remote API client library.
//!
//! This crate does not talk to the simulator itself. It locates the
//! vendor-provided `remoteApi` shared library under a `VREP` installation
//! root, loads it once per process, and exposes the exported functions
//! behind the [`RemoteApi`] trait. Everything above it (sessions, scenes,
//! joints, signals) lives in the `vwrap` crate.

mod api;
mod bindings;
mod constants;
mod library;

pub use api::RemoteApi;
pub use bindings::RemoteApiLib;
pub use constants::{
    ObjectType, OpMode, ReturnCode, COMM_CYCLE_MS, CONNECT_TIMEOUT_MS, JOINT_PARAM_CTRL_ENABLED,
    JOINT_PARAM_MOTOR_ENABLED,
};
pub use library::{library_path, remote_api, resolve_library_path, LoadError, VREP_ENV};
