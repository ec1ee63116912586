//! `wl_callback`: one-shot notification, used here for round trips.

use crate::{
    error::Result,
    protocol::{Interface, MessageDesc, types::{Argument, Arguments}, unknown_event},
};

pub static INTERFACE: Interface = Interface {
    name: "wl_callback",
    version: 1,
    requests: &[],
    events: &[MessageDesc::destructor("done", "u")],
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The callback fired. The compositor destroys the object right after.
    Done { callback_data: u32 },
}

impl Event {
    pub fn from_args(opcode: u16, args: Vec<Argument>) -> Result<Event> {
        match opcode {
            0 => {
                let mut args = Arguments::new("wl_callback.done", args);
                Ok(Event::Done {
                    callback_data: args.uint()?,
                })
            }
            _ => Err(unknown_event(&INTERFACE, opcode)),
        }
    }
}
