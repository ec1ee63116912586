//! `wl_display`: the core singleton, always object 1.
//!
//! The display is used for internal protocol features: requesting the
//! registry, round trips, fatal error reports and id release.

pub mod event;
pub mod request;

pub use event::{ErrorId, Event};
pub use request::{Request, get_registry, sync};

use crate::protocol::{Interface, MessageDesc, ObjectId};

/// The display object exists before any request is sent.
pub const DISPLAY_ID: ObjectId = 1;

pub static INTERFACE: Interface = Interface {
    name: "wl_display",
    version: 1,
    requests: &[
        MessageDesc::new("sync", "n"),
        MessageDesc::new("get_registry", "n"),
    ],
    events: &[
        MessageDesc::new("error", "ous"),
        MessageDesc::new("delete_id", "u"),
    ],
};
