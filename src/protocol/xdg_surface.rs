//! `xdg_surface`: shell wrapper around a `wl_surface`.
//!
//! Each `configure` ends a batch of role-specific configure events and must
//! be acknowledged before the state it describes is committed.

use crate::{
    connection::Connection,
    error::Result,
    protocol::{
        Interface, MessageDesc, ObjectId, xdg_toplevel,
        types::{Argument, Arguments},
        unknown_event,
    },
};

pub static INTERFACE: Interface = Interface {
    name: "xdg_surface",
    version: 6,
    requests: &[
        MessageDesc::destructor("destroy", ""),
        MessageDesc::new("get_toplevel", "n"),
        MessageDesc::new("get_popup", "n?oo"),
        MessageDesc::new("set_window_geometry", "iiii"),
        MessageDesc::new("ack_configure", "u"),
    ],
    events: &[MessageDesc::new("configure", "u")],
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    Destroy = 0,
    GetToplevel = 1,
    GetPopup = 2,
    SetWindowGeometry = 3,
    AckConfigure = 4,
}

impl From<Request> for u16 {
    fn from(request: Request) -> u16 {
        request as u16
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Configure { serial: u32 },
}

impl Event {
    pub fn from_args(opcode: u16, args: Vec<Argument>) -> Result<Event> {
        match opcode {
            0 => {
                let mut args = Arguments::new("xdg_surface.configure", args);
                Ok(Event::Configure {
                    serial: args.uint()?,
                })
            }
            _ => Err(unknown_event(&INTERFACE, opcode)),
        }
    }
}

/// Assigns the toplevel role to the surface.
pub fn get_toplevel<D>(conn: &mut Connection<D>, xdg_surface: ObjectId) -> Result<ObjectId> {
    let version = conn.objects().version(xdg_surface)?;
    conn.new_object(
        xdg_surface,
        &INTERFACE,
        Request::GetToplevel.into(),
        &xdg_toplevel::INTERFACE,
        version,
        |id| vec![Argument::NewId(id)],
    )
}

pub fn ack_configure<D>(conn: &mut Connection<D>, xdg_surface: ObjectId, serial: u32) -> Result<()> {
    conn.send_request(
        xdg_surface,
        &INTERFACE,
        Request::AckConfigure.into(),
        vec![Argument::Uint(serial)],
    )
}
