use std::{
    ffi::OsString,
    os::unix::ffi::OsStrExt,
    path::{Path, PathBuf},
};

use crate::error::{Error, Result};

/// Socket name used when `WAYLAND_DISPLAY` is unset.
pub const DEFAULT_DISPLAY: &str = "wayland-0";

/// Capacity of `sockaddr_un.sun_path`, terminating NUL included.
pub const SUN_PATH_MAX: usize = 108;

/// Where to find the compositor and how to present the window to it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientConfig {
    /// Value of `XDG_RUNTIME_DIR`.
    pub runtime_dir: Option<PathBuf>,
    /// Value of `WAYLAND_DISPLAY`, relative to `runtime_dir` unless absolute.
    pub display: Option<OsString>,
    /// Application id sent to the shell. Falls back to the window title.
    pub app_id: Option<String>,
}

impl ClientConfig {
    /// Reads the endpoint from the process environment.
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var_os(key))
    }

    /// Reads the endpoint through an arbitrary variable lookup.
    ///
    /// Empty values are treated as unset.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<OsString>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.is_empty());

        Self {
            runtime_dir: non_empty("XDG_RUNTIME_DIR").map(PathBuf::from),
            display: non_empty("WAYLAND_DISPLAY"),
            app_id: None,
        }
    }

    pub fn with_app_id(mut self, app_id: impl Into<String>) -> Self {
        self.app_id = Some(app_id.into());
        self
    }

    /// Resolves the compositor socket path without touching the filesystem.
    ///
    /// # Errors
    /// - [`Error::MissingRuntimeDirectory`] when no runtime directory is known
    ///   and the display name is not an absolute path
    /// - [`Error::PathTooLong`] when the result does not fit `sun_path`
    pub fn socket_path(&self) -> Result<PathBuf> {
        let display = self
            .display
            .as_deref()
            .unwrap_or_else(|| DEFAULT_DISPLAY.as_ref());

        let path = if Path::new(display).is_absolute() {
            PathBuf::from(display)
        } else {
            let runtime_dir = self
                .runtime_dir
                .as_ref()
                .ok_or(Error::MissingRuntimeDirectory)?;
            runtime_dir.join(display)
        };

        let len = path.as_os_str().as_bytes().len();
        if len + 1 > SUN_PATH_MAX {
            return Err(Error::PathTooLong {
                path,
                len,
                max: SUN_PATH_MAX - 1,
            });
        }

        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::error::ErrorKind;

    fn config(vars: &[(&str, &str)]) -> ClientConfig {
        let vars: HashMap<String, OsString> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), OsString::from(v)))
            .collect();
        ClientConfig::from_vars(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_to_wayland_0() {
        let config = config(&[("XDG_RUNTIME_DIR", "/run/user/1000")]);
        assert_eq!(
            config.socket_path().unwrap(),
            PathBuf::from("/run/user/1000/wayland-0")
        );
    }

    #[test]
    fn honours_display_name() {
        let config = config(&[
            ("XDG_RUNTIME_DIR", "/run/user/1000"),
            ("WAYLAND_DISPLAY", "wayland-1"),
        ]);
        assert_eq!(
            config.socket_path().unwrap(),
            PathBuf::from("/run/user/1000/wayland-1")
        );
    }

    #[test]
    fn absolute_display_ignores_runtime_dir() {
        let config = config(&[("WAYLAND_DISPLAY", "/tmp/compositor.sock")]);
        assert_eq!(
            config.socket_path().unwrap(),
            PathBuf::from("/tmp/compositor.sock")
        );
    }

    #[test]
    fn missing_runtime_dir_is_an_environment_error() {
        let err = config(&[]).socket_path().unwrap_err();
        assert!(matches!(err, Error::MissingRuntimeDirectory));
        assert_eq!(err.kind(), ErrorKind::Environment);
    }

    #[test]
    fn empty_runtime_dir_counts_as_unset() {
        let err = config(&[("XDG_RUNTIME_DIR", "")]).socket_path().unwrap_err();
        assert!(matches!(err, Error::MissingRuntimeDirectory));
    }

    #[test]
    fn rejects_paths_longer_than_sun_path() {
        let long_dir = format!("/{}", "d".repeat(120));
        let err = config(&[("XDG_RUNTIME_DIR", &long_dir)])
            .socket_path()
            .unwrap_err();
        assert!(matches!(err, Error::PathTooLong { max: 107, .. }));
    }

    #[test]
    fn accepts_path_of_exactly_107_bytes() {
        // "/" + dir + "/wayland-0" == 107 bytes
        let dir = format!("/{}", "d".repeat(107 - 1 - "/wayland-0".len()));
        let path = config(&[("XDG_RUNTIME_DIR", &dir)]).socket_path().unwrap();
        assert_eq!(path.as_os_str().len(), 107);
    }
}
