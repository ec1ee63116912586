pub mod callback;
pub mod codec;
pub mod compositor;
pub mod display;
pub mod interface;
pub mod macros;
pub mod message;
pub mod output;
pub mod registry;
pub mod surface;
pub mod types;
pub mod xdg_surface;
pub mod xdg_toplevel;
pub mod xdg_wm_base;

pub use interface::{Interface, MessageDesc, Signature};

use crate::error::{Error, Result};
use types::Argument;

/// Numeric id of a protocol object, unique among live objects.
pub type ObjectId = u32;

/// Every interface this client can speak.
pub static INTERFACES: &[&Interface] = &[
    &display::INTERFACE,
    &registry::INTERFACE,
    &callback::INTERFACE,
    &compositor::INTERFACE,
    &surface::INTERFACE,
    &output::INTERFACE,
    &xdg_wm_base::INTERFACE,
    &xdg_surface::INTERFACE,
    &xdg_toplevel::INTERFACE,
];

pub fn interface_by_name(name: &str) -> Option<&'static Interface> {
    INTERFACES.iter().copied().find(|interface| interface.name == name)
}

/// The kind of a proxy, recovered from its interface descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProxyKind {
    Display,
    Registry,
    Callback,
    Compositor,
    Surface,
    Output,
    WmBase,
    XdgSurface,
    Toplevel,
}

impl ProxyKind {
    pub fn of(interface: &Interface) -> Result<ProxyKind> {
        let kind = match interface.name {
            "wl_display" => ProxyKind::Display,
            "wl_registry" => ProxyKind::Registry,
            "wl_callback" => ProxyKind::Callback,
            "wl_compositor" => ProxyKind::Compositor,
            "wl_surface" => ProxyKind::Surface,
            "wl_output" => ProxyKind::Output,
            "xdg_wm_base" => ProxyKind::WmBase,
            "xdg_surface" => ProxyKind::XdgSurface,
            "xdg_toplevel" => ProxyKind::Toplevel,
            other => {
                return Err(Error::codec(format!("no proxy kind for interface {other}")));
            }
        };
        Ok(kind)
    }

    pub fn interface(self) -> &'static Interface {
        match self {
            ProxyKind::Display => &display::INTERFACE,
            ProxyKind::Registry => &registry::INTERFACE,
            ProxyKind::Callback => &callback::INTERFACE,
            ProxyKind::Compositor => &compositor::INTERFACE,
            ProxyKind::Surface => &surface::INTERFACE,
            ProxyKind::Output => &output::INTERFACE,
            ProxyKind::WmBase => &xdg_wm_base::INTERFACE,
            ProxyKind::XdgSurface => &xdg_surface::INTERFACE,
            ProxyKind::Toplevel => &xdg_toplevel::INTERFACE,
        }
    }

    pub fn name(self) -> &'static str {
        self.interface().name
    }
}

/// A decoded event, tagged with the kind of object that received it.
#[derive(Debug, PartialEq)]
pub enum Event {
    Display(display::Event),
    Registry(registry::Event),
    Callback(callback::Event),
    Surface(surface::Event),
    Output(output::Event),
    WmBase(xdg_wm_base::Event),
    XdgSurface(xdg_surface::Event),
    Toplevel(xdg_toplevel::Event),
}

impl Event {
    /// Builds the typed event for an object of `kind` from decoded arguments.
    pub fn parse(kind: ProxyKind, opcode: u16, args: Vec<Argument>) -> Result<Event> {
        match kind {
            ProxyKind::Display => display::Event::from_args(opcode, args).map(Event::Display),
            ProxyKind::Registry => registry::Event::from_args(opcode, args).map(Event::Registry),
            ProxyKind::Callback => callback::Event::from_args(opcode, args).map(Event::Callback),
            ProxyKind::Surface => surface::Event::from_args(opcode, args).map(Event::Surface),
            ProxyKind::Output => output::Event::from_args(opcode, args).map(Event::Output),
            ProxyKind::WmBase => xdg_wm_base::Event::from_args(opcode, args).map(Event::WmBase),
            ProxyKind::XdgSurface => {
                xdg_surface::Event::from_args(opcode, args).map(Event::XdgSurface)
            }
            ProxyKind::Toplevel => xdg_toplevel::Event::from_args(opcode, args).map(Event::Toplevel),
            ProxyKind::Compositor => Err(unknown_event(&compositor::INTERFACE, opcode)),
        }
    }

    pub fn kind(&self) -> ProxyKind {
        match self {
            Event::Display(_) => ProxyKind::Display,
            Event::Registry(_) => ProxyKind::Registry,
            Event::Callback(_) => ProxyKind::Callback,
            Event::Surface(_) => ProxyKind::Surface,
            Event::Output(_) => ProxyKind::Output,
            Event::WmBase(_) => ProxyKind::WmBase,
            Event::XdgSurface(_) => ProxyKind::XdgSurface,
            Event::Toplevel(_) => ProxyKind::Toplevel,
        }
    }
}

pub(crate) fn unknown_event(interface: &Interface, opcode: u16) -> Error {
    Error::UnknownOpcode {
        interface: interface.name,
        opcode,
        direction: crate::error::Direction::Event,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_interface_maps_to_a_kind_and_back() {
        for interface in INTERFACES {
            let kind = ProxyKind::of(interface).unwrap();
            assert_eq!(kind.interface(), *interface);
        }
    }

    #[test]
    fn every_signature_parses() {
        for interface in INTERFACES {
            for desc in interface.requests.iter().chain(interface.events) {
                assert!(
                    desc.signature.arguments().is_ok(),
                    "{}.{}",
                    interface.name,
                    desc.name
                );
            }
        }
    }

    #[test]
    fn compositor_has_no_events() {
        assert!(Event::parse(ProxyKind::Compositor, 0, vec![]).is_err());
    }

    #[test]
    fn lookup_by_name() {
        assert_eq!(interface_by_name("xdg_wm_base").unwrap().version, 6);
        assert!(interface_by_name("wl_seat").is_none());
    }
}
