use super::INTERFACE;
use crate::{
    connection::Connection,
    error::Result,
    protocol::{Interface, ObjectId, types::Argument},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    /// Binds a new, client-created object to the global with the given name.
    Bind = 0,
}

impl From<Request> for u16 {
    fn from(request: Request) -> u16 {
        request as u16
    }
}

/// Sends `wl_registry.bind` for global `name`, creating a proxy that speaks
/// `interface` at `version`.
///
/// The new id is untyped on the wire, so the interface name and version
/// travel with it.
pub fn bind<D>(
    conn: &mut Connection<D>,
    registry: ObjectId,
    name: u32,
    interface: &'static Interface,
    version: u32,
) -> Result<ObjectId> {
    conn.new_object(
        registry,
        &INTERFACE,
        Request::Bind.into(),
        interface,
        version,
        |id| {
            vec![
                Argument::Uint(name),
                Argument::String(interface.name.to_owned()),
                Argument::Uint(version),
                Argument::NewId(id),
            ]
        },
    )
}
