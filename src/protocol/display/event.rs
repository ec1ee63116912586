use crate::{
    error::Result,
    protocol::{ObjectId, types::{Argument, Arguments}, unknown_event},
    wl_enum,
};

wl_enum! {
    /// Global error codes the display reports against itself.
    ///
    /// Errors raised against other objects carry that interface's own codes.
    ErrorId {
        /// The server couldn't find the specified object.
        InvalidObject = 0,

        /// The requested method doesn't exist on the specified interface or the request was malformed.
        InvalidMethod = 1,

        /// The server is out of memory and cannot fulfill the request.
        NoMemory = 2,

        /// An implementation error occurred in the compositor.
        Implementation = 3,
    }
}

/// Events emitted by the Wayland display object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A fatal (non-recoverable) error has occurred.
    ///
    /// `object_id` is the object the error was raised against, `code` is
    /// defined by that object's interface.
    Error {
        object_id: ObjectId,
        code: u32,
        message: String,
    },

    /// The server has seen the destruction of a client object and the id
    /// may be released.
    DeleteId { id: u32 },
}

impl Event {
    pub fn from_args(opcode: u16, args: Vec<Argument>) -> Result<Event> {
        match opcode {
            0 => {
                let mut args = Arguments::new("wl_display.error", args);
                Ok(Event::Error {
                    object_id: args.object()?,
                    code: args.uint()?,
                    message: args.string()?,
                })
            }
            1 => {
                let mut args = Arguments::new("wl_display.delete_id", args);
                Ok(Event::DeleteId { id: args.uint()? })
            }
            _ => Err(unknown_event(&super::INTERFACE, opcode)),
        }
    }
}
