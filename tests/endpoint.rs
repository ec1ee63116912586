mod common;

use std::{ffi::OsString, os::unix::net::UnixListener, path::Path, thread};

use common::{FakeCompositor, Script};
use wlwindow::{ClientConfig, Error, ErrorKind, Phase, Window};

fn config_for(runtime_dir: &Path, display: &str) -> ClientConfig {
    let runtime_dir = runtime_dir.as_os_str().to_owned();
    let display = OsString::from(display);
    ClientConfig::from_vars(move |key| match key {
        "XDG_RUNTIME_DIR" => Some(runtime_dir.clone()),
        "WAYLAND_DISPLAY" => Some(display.clone()),
        _ => None,
    })
}

#[test]
fn connects_through_the_runtime_directory() {
    let dir = tempfile::tempdir().unwrap();
    let listener = UnixListener::bind(dir.path().join("wayland-test")).unwrap();
    let server = thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        FakeCompositor::spawn(stream, Script::default()).join().unwrap()
    });

    let mut window = Window::with_config("Endpoint", config_for(dir.path(), "wayland-test"));
    assert!(window.connect(), "{:?}", window.last_error());
    server.join().unwrap();
    assert_eq!(window.phase(), Phase::Running);
}

#[test]
fn absent_socket_is_a_connect_failure() {
    let dir = tempfile::tempdir().unwrap();

    let mut window = Window::with_config("Endpoint", config_for(dir.path(), "wayland-9"));
    assert!(!window.connect());
    assert!(matches!(window.last_error(), Some(Error::ConnectFailed { .. })));
    assert_eq!(window.last_error().map(Error::kind), Some(ErrorKind::Transport));
}

#[test]
fn oversized_path_fails_before_any_io() {
    let dir = tempfile::tempdir().unwrap();
    let display = "w".repeat(120);

    let mut window = Window::with_config("Endpoint", config_for(dir.path(), &display));
    assert!(!window.connect());
    assert!(matches!(window.last_error(), Some(Error::PathTooLong { .. })));
    assert_eq!(window.last_error().map(Error::kind), Some(ErrorKind::Environment));
}

#[test]
fn unset_runtime_directory_is_an_environment_error() {
    let mut window = Window::with_config(
        "Test",
        ClientConfig::from_vars(|key| (key == "WAYLAND_DISPLAY").then(|| "wayland-0".into())),
    );
    assert!(!window.connect());
    assert!(matches!(window.last_error(), Some(Error::MissingRuntimeDirectory)));
    assert!(window.native_handles().is_empty());
}
