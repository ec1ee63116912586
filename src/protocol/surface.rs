//! `wl_surface`: the base drawable that the shell gives a role.

use crate::{
    connection::Connection,
    error::Result,
    protocol::{Interface, MessageDesc, ObjectId, types::{Argument, Arguments}, unknown_event},
};

pub static INTERFACE: Interface = Interface {
    name: "wl_surface",
    version: 6,
    requests: &[
        MessageDesc::destructor("destroy", ""),
        MessageDesc::new("attach", "?oii"),
        MessageDesc::new("damage", "iiii"),
        MessageDesc::new("frame", "n"),
        MessageDesc::new("set_opaque_region", "?o"),
        MessageDesc::new("set_input_region", "?o"),
        MessageDesc::new("commit", ""),
        MessageDesc::new("set_buffer_transform", "2i"),
        MessageDesc::new("set_buffer_scale", "3i"),
        MessageDesc::new("damage_buffer", "4iiii"),
        MessageDesc::new("offset", "5ii"),
    ],
    events: &[
        MessageDesc::new("enter", "o"),
        MessageDesc::new("leave", "o"),
        MessageDesc::new("preferred_buffer_scale", "6i"),
        MessageDesc::new("preferred_buffer_transform", "6u"),
    ],
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    Destroy = 0,
    Attach = 1,
    Damage = 2,
    Frame = 3,
    SetOpaqueRegion = 4,
    SetInputRegion = 5,
    Commit = 6,
    SetBufferTransform = 7,
    SetBufferScale = 8,
    DamageBuffer = 9,
    Offset = 10,
}

impl From<Request> for u16 {
    fn from(request: Request) -> u16 {
        request as u16
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The surface now overlaps `output`.
    Enter { output: ObjectId },
    /// The surface no longer overlaps `output`.
    Leave { output: ObjectId },
    PreferredBufferScale { factor: i32 },
    PreferredBufferTransform { transform: u32 },
}

impl Event {
    pub fn from_args(opcode: u16, args: Vec<Argument>) -> Result<Event> {
        let mut args = Arguments::new("wl_surface event", args);
        match opcode {
            0 => Ok(Event::Enter {
                output: args.object()?,
            }),
            1 => Ok(Event::Leave {
                output: args.object()?,
            }),
            2 => Ok(Event::PreferredBufferScale {
                factor: args.int()?,
            }),
            3 => Ok(Event::PreferredBufferTransform {
                transform: args.uint()?,
            }),
            _ => Err(unknown_event(&INTERFACE, opcode)),
        }
    }
}

/// Atomically applies the pending surface state.
pub fn commit<D>(conn: &mut Connection<D>, surface: ObjectId) -> Result<()> {
    conn.send_request(surface, &INTERFACE, Request::Commit.into(), Vec::new())
}
