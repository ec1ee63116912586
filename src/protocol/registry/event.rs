use std::fmt::Display;

use crate::{
    error::Result,
    protocol::{types::{Argument, Arguments}, unknown_event},
};

/// Represents a global object advertisement from the Wayland registry.
///
/// # Protocol XML
/// ```xml
/// <event name="global">
///   <arg name="name" type="uint" summary="numeric name of the global object"/>
///   <arg name="interface" type="string" summary="interface implemented by the object"/>
///   <arg name="version" type="uint" summary="interface version"/>
/// </event>
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Global {
    /// The unique numeric identifier used when binding the global.
    pub name: u32,

    /// The interface type implemented by this global object, e.g. "wl_compositor".
    pub interface: String,

    /// The highest interface version the compositor supports for this global.
    pub version: u32,
}

impl Display for Global {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "WlRegistryGlobal {{ name: {}, interface: {}, version: {} }}",
            self.name, self.interface, self.version
        )
    }
}

/// Events emitted by the registry.
///
/// A fresh registry first emits `Global` for every current global; later
/// events track hotplug and reconfiguration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Announces the availability of a global object.
    Global(Global),

    /// Announces the removal of a previously advertised global object.
    ///
    /// A bound proxy stays valid, but its requests are ignored until the
    /// client destroys it.
    GlobalRemove { name: u32 },
}

impl Event {
    pub fn from_args(opcode: u16, args: Vec<Argument>) -> Result<Event> {
        match opcode {
            0 => {
                let mut args = Arguments::new("wl_registry.global", args);
                Ok(Event::Global(Global {
                    name: args.uint()?,
                    interface: args.string()?,
                    version: args.uint()?,
                }))
            }
            1 => {
                let mut args = Arguments::new("wl_registry.global_remove", args);
                Ok(Event::GlobalRemove { name: args.uint()? })
            }
            _ => Err(unknown_event(&super::INTERFACE, opcode)),
        }
    }
}
