use getset::CopyGetters;

use vwrap_remote::{
    remote_api, OpMode, RemoteApi, RemoteApiLib, COMM_CYCLE_MS, CONNECT_TIMEOUT_MS,
};

use crate::error::{Error, RemoteError};

/// Default remote API server host.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default remote API server port.
pub const DEFAULT_PORT: u16 = 19997;

/// A connection to a running simulator instance.
///
/// Opening a session connects to the remote API server; the simulation
/// itself is started and stopped explicitly. Dropping the session stops the
/// simulation if it is running and releases the connection, so early returns
/// and error paths cannot leak a running simulation.
#[derive(CopyGetters)]
pub struct Session<A: RemoteApi> {
    api: A,
    host: String,
    /// Port of the remote API server.
    #[getset(get_copy = "pub")]
    port: u16,
    /// Client id assigned by the server, -1 while disconnected.
    #[getset(get_copy = "pub")]
    client_id: i32,
    connected: bool,
    running: bool,
}

impl Session<&'static RemoteApiLib> {
    /// Connects to a remote API server through the process-wide client
    /// library, loading it first if necessary.
    pub fn open(host: &str, port: u16) -> Result<Self, Error> {
        Self::open_with(remote_api()?, host, port)
    }
}

impl<A: RemoteApi> Session<A> {
    /// Connects to a remote API server through an explicit api handle.
    pub fn open_with(api: A, host: &str, port: u16) -> Result<Self, Error> {
        // Release connections a previous run may have left behind.
        api.finish(-1);

        let client_id = api.start(host, port, true, true, CONNECT_TIMEOUT_MS, COMM_CYCLE_MS);
        if client_id == -1 {
            return Err(Error::ConnectionFailed {
                host: host.to_string(),
                port,
            });
        }
        tracing::info!(
            "Connected to remote API server at {}:{} as client {}",
            host,
            port,
            client_id
        );

        Ok(Self {
            api,
            host: host.to_string(),
            port,
            client_id,
            connected: true,
            running: false,
        })
    }

    /// Starts the simulation. Use [`stop`](Session::stop) to stop it again,
    /// or [`close`](Session::close) to stop it and release the connection.
    pub fn start(&mut self) -> Result<(), Error> {
        RemoteError::check(self.api.start_simulation(self.client_id, OpMode::Blocking))?;
        self.running = true;
        tracing::debug!("Simulation started");
        Ok(())
    }

    /// Stops the simulation. It can be started again.
    pub fn stop(&mut self) -> Result<(), Error> {
        RemoteError::check(self.api.stop_simulation(self.client_id, OpMode::Blocking))?;
        self.running = false;
        tracing::debug!("Simulation stopped");
        Ok(())
    }

    /// Host of the remote API server.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Whether this session has started the simulation and not yet stopped
    /// it.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// Whether this session holds a connection.
    #[must_use]
    pub const fn is_connected(&self) -> bool {
        self.connected
    }

    /// Stops the simulation if it is running and releases the connection.
    ///
    /// The connection is released even when stopping fails; the stop failure
    /// is reported afterwards.
    pub fn close(mut self) -> Result<(), Error> {
        self.close_impl()
    }

    pub(crate) fn api(&self) -> &A {
        &self.api
    }

    fn close_impl(&mut self) -> Result<(), Error> {
        let stopped = if self.running {
            self.running = false;
            RemoteError::check(self.api.stop_simulation(self.client_id, OpMode::Blocking))
                .map_err(Error::from)
        } else {
            Ok(())
        };

        if self.connected {
            self.api.finish(self.client_id);
            self.connected = false;
            self.client_id = -1;
            tracing::info!("Disconnected from {}:{}", self.host, self.port);
        }

        stopped
    }
}

impl<A: RemoteApi> Drop for Session<A> {
    fn drop(&mut self) {
        let _ = self.close_impl();
    }
}
