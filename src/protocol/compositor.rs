//! `wl_compositor`: factory for surfaces. Has no events.

use crate::{
    connection::Connection,
    error::Result,
    protocol::{Interface, MessageDesc, ObjectId, surface, types::Argument},
};

pub static INTERFACE: Interface = Interface {
    name: "wl_compositor",
    version: 6,
    requests: &[
        MessageDesc::new("create_surface", "n"),
        MessageDesc::new("create_region", "n"),
    ],
    events: &[],
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    CreateSurface = 0,
    CreateRegion = 1,
}

impl From<Request> for u16 {
    fn from(request: Request) -> u16 {
        request as u16
    }
}

/// Creates a `wl_surface`. The surface inherits the compositor's version.
pub fn create_surface<D>(conn: &mut Connection<D>, compositor: ObjectId) -> Result<ObjectId> {
    let version = conn.objects().version(compositor)?;
    conn.new_object(
        compositor,
        &INTERFACE,
        Request::CreateSurface.into(),
        &surface::INTERFACE,
        version,
        |id| vec![Argument::NewId(id)],
    )
}
