use super::{DISPLAY_ID, INTERFACE};
use crate::{
    connection::Connection,
    error::Result,
    protocol::{ObjectId, callback, registry, types::Argument},
};

/// Represents the request types that can be sent to the Wayland display object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    /// Creates a synchronization point with the compositor.
    /// Returns a callback object that fires when all previous requests have been processed.
    Sync = 0,

    /// Retrieves the global registry object for interface discovery.
    /// This is typically the first request clients make after connecting.
    GetRegistry = 1,
}

impl From<Request> for u16 {
    fn from(request: Request) -> u16 {
        request as u16
    }
}

/// Sends `wl_display.sync`.
///
/// The compositor emits `done` on the returned `wl_callback` once every
/// earlier request has been handled, then destroys the callback.
pub fn sync<D>(conn: &mut Connection<D>) -> Result<ObjectId> {
    conn.new_object(
        DISPLAY_ID,
        &INTERFACE,
        Request::Sync.into(),
        &callback::INTERFACE,
        1,
        |id| vec![Argument::NewId(id)],
    )
}

/// Sends `wl_display.get_registry`.
///
/// The server side resources of a registry are only released on disconnect,
/// so this is issued once per connection.
pub fn get_registry<D>(conn: &mut Connection<D>) -> Result<ObjectId> {
    conn.new_object(
        DISPLAY_ID,
        &INTERFACE,
        Request::GetRegistry.into(),
        &registry::INTERFACE,
        1,
        |id| vec![Argument::NewId(id)],
    )
}
