//! `xdg_toplevel`: the window role.

use tracing::debug;

use crate::{
    connection::Connection,
    error::Result,
    protocol::{
        Interface, MessageDesc, ObjectId,
        types::{Argument, Arguments},
        unknown_event,
    },
    wl_enum,
};

pub static INTERFACE: Interface = Interface {
    name: "xdg_toplevel",
    version: 6,
    requests: &[
        MessageDesc::destructor("destroy", ""),
        MessageDesc::new("set_parent", "?o"),
        MessageDesc::new("set_title", "s"),
        MessageDesc::new("set_app_id", "s"),
        MessageDesc::new("show_window_menu", "ouii"),
        MessageDesc::new("move", "ou"),
        MessageDesc::new("resize", "ouu"),
        MessageDesc::new("set_max_size", "ii"),
        MessageDesc::new("set_min_size", "ii"),
        MessageDesc::new("set_maximized", ""),
        MessageDesc::new("unset_maximized", ""),
        MessageDesc::new("set_fullscreen", "?o"),
        MessageDesc::new("unset_fullscreen", ""),
        MessageDesc::new("set_minimized", ""),
    ],
    events: &[
        MessageDesc::new("configure", "iia"),
        MessageDesc::new("close", ""),
        MessageDesc::new("configure_bounds", "4ii"),
        MessageDesc::new("wm_capabilities", "5a"),
    ],
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    Destroy = 0,
    SetParent = 1,
    SetTitle = 2,
    SetAppId = 3,
    ShowWindowMenu = 4,
    Move = 5,
    Resize = 6,
    SetMaxSize = 7,
    SetMinSize = 8,
    SetMaximized = 9,
    UnsetMaximized = 10,
    SetFullscreen = 11,
    UnsetFullscreen = 12,
    SetMinimized = 13,
}

impl From<Request> for u16 {
    fn from(request: Request) -> u16 {
        request as u16
    }
}

wl_enum! {
    /// Window states reported in `configure`.
    State {
        Maximized = 1,
        Fullscreen = 2,
        Resizing = 3,
        Activated = 4,
        TiledLeft = 5,
        TiledRight = 6,
        TiledTop = 7,
        TiledBottom = 8,
        Suspended = 9,
    }
}

wl_enum! {
    /// Features the compositor supports for toplevels.
    Capability {
        WindowMenu = 1,
        Maximize = 2,
        Fullscreen = 3,
        Minimize = 4,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Suggested logical size and current states. A zero dimension leaves
    /// that dimension to the client.
    Configure {
        width: i32,
        height: i32,
        states: Vec<State>,
    },
    /// The user or compositor asks the window to close.
    Close,
    ConfigureBounds { width: i32, height: i32 },
    WmCapabilities { capabilities: Vec<Capability> },
}

/// Converts a word list to typed values, skipping values newer than this
/// client knows about.
fn known<T: TryFrom<u32>>(what: &str, words: Vec<u32>) -> Vec<T> {
    words
        .into_iter()
        .filter_map(|word| match T::try_from(word) {
            Ok(value) => Some(value),
            Err(_) => {
                debug!("ignoring unknown xdg_toplevel {what} {word}");
                None
            }
        })
        .collect()
}

impl Event {
    pub fn from_args(opcode: u16, args: Vec<Argument>) -> Result<Event> {
        let mut args = Arguments::new("xdg_toplevel event", args);
        match opcode {
            0 => Ok(Event::Configure {
                width: args.int()?,
                height: args.int()?,
                states: known("state", args.words()?),
            }),
            1 => Ok(Event::Close),
            2 => Ok(Event::ConfigureBounds {
                width: args.int()?,
                height: args.int()?,
            }),
            3 => Ok(Event::WmCapabilities {
                capabilities: known("capability", args.words()?),
            }),
            _ => Err(unknown_event(&INTERFACE, opcode)),
        }
    }
}

pub fn set_title<D>(conn: &mut Connection<D>, toplevel: ObjectId, title: &str) -> Result<()> {
    conn.send_request(
        toplevel,
        &INTERFACE,
        Request::SetTitle.into(),
        vec![Argument::String(title.to_owned())],
    )
}

pub fn set_app_id<D>(conn: &mut Connection<D>, toplevel: ObjectId, app_id: &str) -> Result<()> {
    conn.send_request(
        toplevel,
        &INTERFACE,
        Request::SetAppId.into(),
        vec![Argument::String(app_id.to_owned())],
    )
}

/// Asks for fullscreen on `output`, or on an output of the compositor's
/// choosing when `None`.
pub fn set_fullscreen<D>(
    conn: &mut Connection<D>,
    toplevel: ObjectId,
    output: Option<ObjectId>,
) -> Result<()> {
    conn.send_request(
        toplevel,
        &INTERFACE,
        Request::SetFullscreen.into(),
        vec![Argument::OptionalObject(output)],
    )
}
