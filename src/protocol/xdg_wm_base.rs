//! `xdg_wm_base`: entry point of the xdg-shell extension.
//!
//! The compositor pings the client periodically; a client that does not
//! answer with a matching pong may be considered unresponsive and killed.

use crate::{
    connection::Connection,
    error::Result,
    protocol::{
        Interface, MessageDesc, ObjectId, xdg_surface,
        types::{Argument, Arguments},
        unknown_event,
    },
};

pub static INTERFACE: Interface = Interface {
    name: "xdg_wm_base",
    version: 6,
    requests: &[
        MessageDesc::destructor("destroy", ""),
        MessageDesc::new("create_positioner", "n"),
        MessageDesc::new("get_xdg_surface", "no"),
        MessageDesc::new("pong", "u"),
    ],
    events: &[MessageDesc::new("ping", "u")],
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    Destroy = 0,
    CreatePositioner = 1,
    GetXdgSurface = 2,
    Pong = 3,
}

impl From<Request> for u16 {
    fn from(request: Request) -> u16 {
        request as u16
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Ping { serial: u32 },
}

impl Event {
    pub fn from_args(opcode: u16, args: Vec<Argument>) -> Result<Event> {
        match opcode {
            0 => {
                let mut args = Arguments::new("xdg_wm_base.ping", args);
                Ok(Event::Ping {
                    serial: args.uint()?,
                })
            }
            _ => Err(unknown_event(&INTERFACE, opcode)),
        }
    }
}

/// Wraps `surface` in an `xdg_surface`.
pub fn get_xdg_surface<D>(
    conn: &mut Connection<D>,
    wm_base: ObjectId,
    surface: ObjectId,
) -> Result<ObjectId> {
    let version = conn.objects().version(wm_base)?;
    conn.new_object(
        wm_base,
        &INTERFACE,
        Request::GetXdgSurface.into(),
        &xdg_surface::INTERFACE,
        version,
        |id| vec![Argument::NewId(id), Argument::Object(surface)],
    )
}

/// Answers a ping with the serial it carried.
pub fn pong<D>(conn: &mut Connection<D>, wm_base: ObjectId, serial: u32) -> Result<()> {
    conn.send_request(
        wm_base,
        &INTERFACE,
        Request::Pong.into(),
        vec![Argument::Uint(serial)],
    )
}
