use thiserror::Error;

use vwrap_remote::{LoadError, ReturnCode};

/// Failure category reported by a remote API call.
///
/// Mirrors the status word of the remote protocol. Blocking calls translate
/// any non-ok word into one of these; non-blocking calls never do.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum RemoteError {
    /// The input buffer does not contain a reply for this command yet.
    #[error("input buffer does not contain a reply for this command yet")]
    NoValue,
    /// The reply was not received within the blocking-call timeout.
    #[error("command reply not received in time")]
    Timeout,
    /// The command does not support the requested operation mode.
    #[error("command does not support the requested operation mode")]
    IllegalOpMode,
    /// The command caused an error on the server side.
    #[error("command caused an error on the server side")]
    ServerError,
    /// A previous similar command is still being processed.
    #[error("previous similar command not processed yet")]
    SplitInProgress,
    /// The command caused an error on the client side.
    #[error("command caused an error on the client side")]
    ClientError,
    /// No connection was established before issuing the command.
    #[error("connection to the remote API server was never started")]
    NotInitialized,
    /// A status word with no documented failure bit.
    #[error("unknown remote API status word {0:#x}")]
    Unknown(i32),
}

impl RemoteError {
    /// Translates a status word, `Ok(())` for success.
    pub fn check(code: ReturnCode) -> Result<(), Self> {
        if code.is_ok() {
            Ok(())
        } else {
            Err(Self::from(code))
        }
    }
}

impl From<ReturnCode> for RemoteError {
    fn from(code: ReturnCode) -> Self {
        // Flag precedence follows the order the protocol documents them in.
        if code.contains(ReturnCode::NOVALUE) {
            Self::NoValue
        } else if code.contains(ReturnCode::TIMEOUT) {
            Self::Timeout
        } else if code.contains(ReturnCode::ILLEGAL_OPMODE) {
            Self::IllegalOpMode
        } else if code.contains(ReturnCode::REMOTE_ERROR) {
            Self::ServerError
        } else if code.contains(ReturnCode::SPLIT_PROGRESS) {
            Self::SplitInProgress
        } else if code.contains(ReturnCode::LOCAL_ERROR) {
            Self::ClientError
        } else if code.contains(ReturnCode::INITIALIZE_ERROR) {
            Self::NotInitialized
        } else {
            Self::Unknown(code.bits())
        }
    }
}

/// An error produced by this crate.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// The client library could not be located or loaded.
    #[error(transparent)]
    Load(#[from] LoadError),
    /// The remote API server refused the connection or was unreachable.
    #[error("failed to connect to the remote API server at {host}:{port}")]
    ConnectionFailed {
        /// Host the connection was attempted against.
        host: String,
        /// Port the connection was attempted against.
        port: u16,
    },
    /// No joint with the requested name in the scene.
    #[error("no joint named \"{0}\" in the scene")]
    UnknownJoint(String),
    /// A blocking remote call reported a failure status.
    #[error(transparent)]
    Remote(#[from] RemoteError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[rstest::rstest]
    #[case(ReturnCode::NOVALUE, RemoteError::NoValue)]
    #[case(ReturnCode::TIMEOUT, RemoteError::Timeout)]
    #[case(ReturnCode::ILLEGAL_OPMODE, RemoteError::IllegalOpMode)]
    #[case(ReturnCode::REMOTE_ERROR, RemoteError::ServerError)]
    #[case(ReturnCode::SPLIT_PROGRESS, RemoteError::SplitInProgress)]
    #[case(ReturnCode::LOCAL_ERROR, RemoteError::ClientError)]
    #[case(ReturnCode::INITIALIZE_ERROR, RemoteError::NotInitialized)]
    fn translates_each_failure_flag(#[case] code: ReturnCode, #[case] expected: RemoteError) {
        assert_eq!(expected, RemoteError::from(code));
        assert_eq!(Err(expected), RemoteError::check(code));
    }

    #[test]
    fn ok_passes_check() {
        assert_eq!(Ok(()), RemoteError::check(ReturnCode::OK));
    }

    #[test]
    fn combined_word_keeps_the_documented_precedence() {
        let code = ReturnCode::TIMEOUT | ReturnCode::LOCAL_ERROR;
        assert_eq!(RemoteError::Timeout, RemoteError::from(code));
    }

    #[test]
    fn undocumented_bits_are_preserved() {
        let code = ReturnCode::from_bits_retain(1 << 9);
        assert_eq!(RemoteError::Unknown(1 << 9), RemoteError::from(code));
    }
}
