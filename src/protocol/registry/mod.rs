//! `wl_registry`: advertises the compositor's globals and binds them.

pub mod event;
pub mod request;

pub use event::{Event, Global};
pub use request::{Request, bind};

use crate::protocol::{Interface, MessageDesc};

pub static INTERFACE: Interface = Interface {
    name: "wl_registry",
    version: 1,
    requests: &[MessageDesc::new("bind", "usun")],
    events: &[
        MessageDesc::new("global", "usu"),
        MessageDesc::new("global_remove", "u"),
    ],
};
