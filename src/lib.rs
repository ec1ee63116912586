//! A hand-rolled Wayland client that opens one fullscreen xdg-shell window.
//!
//! The crate speaks the wire protocol itself: [`transport`] moves bytes and
//! file descriptors, [`protocol`] describes interfaces and marshals
//! messages, [`connection`] owns the proxies and dispatches events, and
//! [`window`] drives the bootstrap up to a configured, committed toplevel.

pub mod config;
pub mod connection;
pub mod error;
pub mod protocol;
pub mod transport;
pub mod window;

pub use config::ClientConfig;
pub use error::{Error, ErrorKind, Result};
pub use window::{NativeHandle, Phase, Window};
