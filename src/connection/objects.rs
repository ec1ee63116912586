use std::{any::Any, collections::HashMap};

use crate::{
    connection::Connection,
    error::{Error, Result},
    protocol::{
        Event, Interface, ObjectId, ProxyKind, callback, display, output, registry, surface,
        xdg_surface, xdg_toplevel, xdg_wm_base,
    },
};

/// What a listener sees of the proxy an event arrived on.
pub struct ProxyContext<'a> {
    pub id: ObjectId,
    pub version: u32,
    pub interface: &'static Interface,
    pub user_data: Option<&'a dyn Any>,
}

impl ProxyContext<'_> {
    pub fn user_data<T: 'static>(&self) -> Option<&T> {
        self.user_data.and_then(|data| data.downcast_ref())
    }
}

/// Typed event handler for proxies of one interface.
///
/// Handlers receive the connection so they can answer events with requests
/// (pong, ack_configure, bind) and the caller's state `D`.
pub type Handler<D, E> = Box<dyn FnMut(&mut Connection<D>, &mut D, &ProxyContext<'_>, E) -> Result<()>>;

/// Event handler table for one proxy, one variant per interface that emits
/// events.
pub enum Listener<D> {
    Registry(Handler<D, registry::Event>),
    Callback(Handler<D, callback::Event>),
    Surface(Handler<D, surface::Event>),
    Output(Handler<D, output::Event>),
    WmBase(Handler<D, xdg_wm_base::Event>),
    XdgSurface(Handler<D, xdg_surface::Event>),
    Toplevel(Handler<D, xdg_toplevel::Event>),
}

macro_rules! listener_constructor {
    ($fn_name:ident, $variant:ident, $event:ty) => {
        pub fn $fn_name(
            handler: impl FnMut(&mut Connection<D>, &mut D, &ProxyContext<'_>, $event) -> Result<()>
            + 'static,
        ) -> Self {
            Listener::$variant(Box::new(handler))
        }
    };
}

impl<D> Listener<D> {
    listener_constructor!(registry, Registry, registry::Event);
    listener_constructor!(callback, Callback, callback::Event);
    listener_constructor!(surface, Surface, surface::Event);
    listener_constructor!(output, Output, output::Event);
    listener_constructor!(wm_base, WmBase, xdg_wm_base::Event);
    listener_constructor!(xdg_surface, XdgSurface, xdg_surface::Event);
    listener_constructor!(toplevel, Toplevel, xdg_toplevel::Event);

    /// Kind of proxy this listener can be installed on.
    pub fn kind(&self) -> ProxyKind {
        match self {
            Listener::Registry(_) => ProxyKind::Registry,
            Listener::Callback(_) => ProxyKind::Callback,
            Listener::Surface(_) => ProxyKind::Surface,
            Listener::Output(_) => ProxyKind::Output,
            Listener::WmBase(_) => ProxyKind::WmBase,
            Listener::XdgSurface(_) => ProxyKind::XdgSurface,
            Listener::Toplevel(_) => ProxyKind::Toplevel,
        }
    }

    pub(crate) fn invoke(
        &mut self,
        conn: &mut Connection<D>,
        data: &mut D,
        ctx: &ProxyContext<'_>,
        event: Event,
    ) -> Result<()> {
        match (self, event) {
            (Listener::Registry(handler), Event::Registry(event)) => handler(conn, data, ctx, event),
            (Listener::Callback(handler), Event::Callback(event)) => handler(conn, data, ctx, event),
            (Listener::Surface(handler), Event::Surface(event)) => handler(conn, data, ctx, event),
            (Listener::Output(handler), Event::Output(event)) => handler(conn, data, ctx, event),
            (Listener::WmBase(handler), Event::WmBase(event)) => handler(conn, data, ctx, event),
            (Listener::XdgSurface(handler), Event::XdgSurface(event)) => {
                handler(conn, data, ctx, event)
            }
            (Listener::Toplevel(handler), Event::Toplevel(event)) => handler(conn, data, ctx, event),
            (listener, event) => Err(Error::InterfaceMismatch {
                id: ctx.id,
                expected: listener.kind().name(),
                actual: event.kind().name(),
            }),
        }
    }
}

/// One live remote object.
pub struct ProxyEntry<D> {
    pub(crate) interface: &'static Interface,
    pub(crate) version: u32,
    pub(crate) listener: Option<Listener<D>>,
    pub(crate) user_data: Option<Box<dyn Any>>,
}

impl<D> ProxyEntry<D> {
    pub fn interface(&self) -> &'static Interface {
        self.interface
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn has_listener(&self) -> bool {
        self.listener.is_some()
    }
}

/// Arena of live proxies indexed by object id.
///
/// Ids are handed out in increasing order and never reused, so any id below
/// the allocation cursor that is not live belonged to a destroyed proxy.
pub struct ObjectMap<D> {
    entries: HashMap<ObjectId, ProxyEntry<D>>,
    next_id: ObjectId,
}

impl<D> ObjectMap<D> {
    /// A map holding only the display singleton.
    pub fn new() -> Self {
        let mut entries = HashMap::new();
        entries.insert(
            display::DISPLAY_ID,
            ProxyEntry {
                interface: &display::INTERFACE,
                version: 1,
                listener: None,
                user_data: None,
            },
        );

        Self {
            entries,
            next_id: display::DISPLAY_ID + 1,
        }
    }

    pub fn register(&mut self, interface: &'static Interface, version: u32) -> ObjectId {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.insert(
            id,
            ProxyEntry {
                interface,
                version,
                listener: None,
                user_data: None,
            },
        );
        id
    }

    fn missing(&self, id: ObjectId) -> Error {
        if id != 0 && id < self.next_id {
            Error::UseAfterDestroy(id)
        } else {
            Error::UnknownObject(id)
        }
    }

    /// Looks up a live proxy.
    ///
    /// # Errors
    /// [`Error::UseAfterDestroy`] for an id that was live once,
    /// [`Error::UnknownObject`] for one that never was.
    pub fn get(&self, id: ObjectId) -> Result<&ProxyEntry<D>> {
        self.entries.get(&id).ok_or_else(|| self.missing(id))
    }

    pub(crate) fn get_mut(&mut self, id: ObjectId) -> Result<&mut ProxyEntry<D>> {
        let missing = self.missing(id);
        self.entries.get_mut(&id).ok_or(missing)
    }

    /// Looks up a live proxy and checks it implements `interface`.
    pub fn expect(&self, id: ObjectId, interface: &'static Interface) -> Result<&ProxyEntry<D>> {
        let entry = self.get(id)?;
        if entry.interface != interface {
            return Err(Error::InterfaceMismatch {
                id,
                expected: interface.name,
                actual: entry.interface.name,
            });
        }
        Ok(entry)
    }

    pub fn version(&self, id: ObjectId) -> Result<u32> {
        self.get(id).map(|entry| entry.version)
    }

    pub fn is_live(&self, id: ObjectId) -> bool {
        self.entries.contains_key(&id)
    }

    pub(crate) fn remove(&mut self, id: ObjectId) -> Option<ProxyEntry<D>> {
        self.entries.remove(&id)
    }

    pub fn user_data<T: 'static>(&self, id: ObjectId) -> Option<&T> {
        self.entries
            .get(&id)?
            .user_data
            .as_ref()?
            .downcast_ref()
    }

    /// Finds a live proxy of `interface` whose user data equals `value`.
    pub fn find_by_user_data<T: PartialEq + 'static>(
        &self,
        interface: &'static Interface,
        value: &T,
    ) -> Option<ObjectId> {
        self.entries
            .iter()
            .filter(|(_, entry)| entry.interface == interface)
            .find(|(id, _)| self.user_data::<T>(**id) == Some(value))
            .map(|(id, _)| *id)
    }

    /// Number of live proxies, the display included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<D> Default for ObjectMap<D> {
    fn default() -> Self {
        Self::new()
    }
}
