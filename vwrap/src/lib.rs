//! Object-oriented wrapper around the V-REP remote API.
//!
//! [`Session`] owns a connection to a running simulator, [`Scene`]
//! enumerates the joints of the loaded scene, [`Joint`] reads and commands a
//! single joint, and [`Signal`] exchanges named values with the simulator's
//! child scripts. All network communication is done by the vendor client
//! library loaded through [`vwrap_remote`]; this crate only records handles
//! and translates status words.
//!
//! # Example
//!
//! ```no_run
//! use vwrap::{Scene, Session};
//!
//! # fn main() -> Result<(), vwrap::Error> {
//! let mut session = Session::open("127.0.0.1", 19997)?;
//! session.start()?;
//!
//! let mut scene = Scene::new(&session)?;
//! let joint = scene.joint("Jaco_joint2")?;
//! joint.position = joint.initial_position() + (-10.0_f32).to_radians();
//! joint.update();
//!
//! session.close()?;
//! # Ok(())
//! # }
//! ```

mod error;
mod joint;
pub mod prelude;
mod scene;
mod session;
mod signal;

pub use error::{Error, RemoteError};
pub use joint::Joint;
pub use scene::Scene;
pub use session::{Session, DEFAULT_HOST, DEFAULT_PORT};
pub use signal::{FloatSignal, IntegerSignal, Signal, SignalValue, StringSignal};

pub use vwrap_remote as remote;
pub use vwrap_remote::{OpMode, RemoteApi};

#[cfg(test)]
pub(crate) mod tests {
    use vwrap_emulator::Emulator;

    use crate::{Session, DEFAULT_HOST, DEFAULT_PORT};

    pub fn connect(emulator: &Emulator) -> Session<&Emulator> {
        Session::open_with(emulator, DEFAULT_HOST, DEFAULT_PORT).unwrap()
    }
}
