use std::{
    env,
    path::{Path, PathBuf},
    sync::OnceLock,
};

use thiserror::Error;

use crate::bindings::RemoteApiLib;

/// Environment variable naming the simulator installation root.
pub const VREP_ENV: &str = "VREP";

/// Failure to locate or load the remote API client library.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum LoadError {
    /// The installation root environment variable is not set.
    #[error("{VREP_ENV} environment variable is not set")]
    EnvNotSet,
    /// No client library at the resolved path.
    #[error("remote API library not found at {}", .0.display())]
    NotFound(PathBuf),
    /// The library exists but could not be loaded, or lacks an export.
    #[error("failed to load remote API library: {0}")]
    Library(#[from] libloading::Error),
}

#[cfg(target_pointer_width = "64")]
const ARCH_DIR: &str = "64Bit";
#[cfg(target_pointer_width = "32")]
const ARCH_DIR: &str = "32Bit";

#[cfg(target_os = "windows")]
const LIB_NAME: &str = "remoteApi.dll";
#[cfg(target_os = "macos")]
const LIB_NAME: &str = "remoteApi.dylib";
#[cfg(not(any(target_os = "windows", target_os = "macos")))]
const LIB_NAME: &str = "remoteApi.so";

/// Resolves the client library path under an installation root.
#[must_use]
pub fn library_path(root: &Path) -> PathBuf {
    root.join("programming")
        .join("remoteApiBindings")
        .join("lib")
        .join("lib")
        .join(ARCH_DIR)
        .join(LIB_NAME)
}

/// Resolves the client library path from the [`VREP_ENV`] environment
/// variable.
pub fn resolve_library_path() -> Result<PathBuf, LoadError> {
    let root = env::var_os(VREP_ENV).ok_or(LoadError::EnvNotSet)?;
    Ok(library_path(Path::new(&root)))
}

static LIBRARY: OnceLock<RemoteApiLib> = OnceLock::new();

/// Returns the process-wide client library, loading it on first use.
///
/// The handle is assigned once per process and never released; process exit
/// unloads it.
pub fn remote_api() -> Result<&'static RemoteApiLib, LoadError> {
    if let Some(lib) = LIBRARY.get() {
        return Ok(lib);
    }
    let path = resolve_library_path()?;
    if !path.exists() {
        return Err(LoadError::NotFound(path));
    }
    tracing::info!("Loading remote API client library from {}", path.display());
    let lib = RemoteApiLib::load(&path)?;
    Ok(LIBRARY.get_or_init(|| lib))
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;

    #[test]
    fn path_has_the_documented_shape() {
        let root = Path::new("/opt/vrep");
        let path = library_path(root);

        assert!(path.starts_with(root));
        let mut components = path.iter().map(|c| c.to_string_lossy());
        assert!(components.any(|c| c == "remoteApiBindings"));

        let arch = path.parent().and_then(Path::file_name);
        assert!(arch == Some("64Bit".as_ref()) || arch == Some("32Bit".as_ref()));

        let name = path.file_name().map(|n| n.to_string_lossy());
        assert!(name.is_some_and(|n| n.starts_with("remoteApi.")));
    }

    #[test]
    #[serial]
    fn unset_env_is_a_configuration_error() {
        env::remove_var(VREP_ENV);
        assert!(matches!(resolve_library_path(), Err(LoadError::EnvNotSet)));
        assert!(matches!(remote_api(), Err(LoadError::EnvNotSet)));
    }

    #[test]
    #[serial]
    fn missing_library_reports_the_resolved_path() {
        let root = tempfile::tempdir().unwrap();
        env::set_var(VREP_ENV, root.path());

        let expected = library_path(root.path());
        match remote_api() {
            Err(LoadError::NotFound(path)) => assert_eq!(expected, path),
            Err(other) => panic!("expected NotFound, got {other}"),
            Ok(_) => panic!("no library should be loadable from an empty root"),
        }

        env::remove_var(VREP_ENV);
    }
}
