//! `wl_output`: a monitor. Only its scale feeds the window size; the rest is
//! kept for diagnostics.

use crate::{
    error::Result,
    protocol::{Interface, MessageDesc, types::{Argument, Arguments}, unknown_event},
};

pub static INTERFACE: Interface = Interface {
    name: "wl_output",
    version: 4,
    requests: &[MessageDesc::destructor("release", "3")],
    events: &[
        MessageDesc::new("geometry", "iiiiissi"),
        MessageDesc::new("mode", "uiii"),
        MessageDesc::new("done", "2"),
        MessageDesc::new("scale", "2i"),
        MessageDesc::new("name", "4s"),
        MessageDesc::new("description", "4s"),
    ],
};

/// Bit set in `Mode::flags` for the output's current mode.
pub const MODE_CURRENT: u32 = 0x1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Geometry {
        x: i32,
        y: i32,
        physical_width: i32,
        physical_height: i32,
        subpixel: i32,
        make: String,
        model: String,
        transform: i32,
    },
    Mode {
        flags: u32,
        width: i32,
        height: i32,
        refresh: i32,
    },
    /// Marks the end of an atomic batch of output property changes.
    Done,
    /// Integer ratio between logical and physical pixels.
    Scale { factor: i32 },
    Name { name: String },
    Description { description: String },
}

impl Event {
    pub fn from_args(opcode: u16, args: Vec<Argument>) -> Result<Event> {
        let mut args = Arguments::new("wl_output event", args);
        match opcode {
            0 => Ok(Event::Geometry {
                x: args.int()?,
                y: args.int()?,
                physical_width: args.int()?,
                physical_height: args.int()?,
                subpixel: args.int()?,
                make: args.string()?,
                model: args.string()?,
                transform: args.int()?,
            }),
            1 => Ok(Event::Mode {
                flags: args.uint()?,
                width: args.int()?,
                height: args.int()?,
                refresh: args.int()?,
            }),
            2 => Ok(Event::Done),
            3 => Ok(Event::Scale {
                factor: args.int()?,
            }),
            4 => Ok(Event::Name {
                name: args.string()?,
            }),
            5 => Ok(Event::Description {
                description: args.string()?,
            }),
            _ => Err(unknown_event(&INTERFACE, opcode)),
        }
    }
}
