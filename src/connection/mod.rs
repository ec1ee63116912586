//! Client side of one compositor connection: the proxy arena, request
//! marshalling and event dispatch.

pub mod objects;

use std::{any::Any, os::fd::{BorrowedFd, RawFd}};

use tracing::{debug, error, trace, warn};

pub use objects::{Handler, Listener, ObjectMap, ProxyContext, ProxyEntry};

use crate::{
    config::ClientConfig,
    error::{Error, Result},
    protocol::{
        Event, Interface, ObjectId, ProxyKind, codec,
        display::{self, DISPLAY_ID},
        message::WlMessage,
        types::Argument,
    },
    transport::Transport,
};

/// A connection to the compositor together with every proxy created on it.
///
/// `D` is the state listeners are handed during dispatch.
pub struct Connection<D> {
    transport: Transport,
    objects: ObjectMap<D>,
    failed: bool,
}

impl<D> Connection<D> {
    pub fn new(transport: Transport) -> Self {
        Self {
            transport,
            objects: ObjectMap::new(),
            failed: false,
        }
    }

    /// Opens the socket `config` resolves to.
    pub fn connect(config: &ClientConfig) -> Result<Self> {
        Transport::open(config).map(Self::new)
    }

    pub fn objects(&self) -> &ObjectMap<D> {
        &self.objects
    }

    /// `false` once a fatal error was seen or the socket was closed.
    pub fn is_usable(&self) -> bool {
        !self.failed && self.transport.is_open()
    }

    /// Socket descriptor, used as the native display handle.
    pub fn display_fd(&self) -> Option<RawFd> {
        self.transport.as_raw_fd()
    }

    fn ensure_usable(&self) -> Result<()> {
        if self.is_usable() {
            Ok(())
        } else {
            Err(Error::NotConnected)
        }
    }

    /// Marks the connection unusable and hands the error back.
    fn fail(&mut self, err: Error) -> Error {
        if !self.failed {
            error!("connection failed: {err}");
        }
        self.failed = true;
        err
    }

    pub fn register(&mut self, interface: &'static Interface, version: u32) -> ObjectId {
        self.objects.register(interface, version)
    }

    /// Installs the event handlers and user data for a live proxy.
    ///
    /// # Errors
    /// [`Error::InterfaceMismatch`] when `listener` was built for another
    /// interface than the proxy's.
    pub fn set_listener(
        &mut self,
        id: ObjectId,
        listener: Listener<D>,
        user_data: Option<Box<dyn Any>>,
    ) -> Result<()> {
        let entry = self.objects.get_mut(id)?;
        let kind = ProxyKind::of(entry.interface)?;
        if kind != listener.kind() {
            return Err(Error::InterfaceMismatch {
                id,
                expected: entry.interface.name,
                actual: listener.kind().name(),
            });
        }
        entry.listener = Some(listener);
        entry.user_data = user_data;
        Ok(())
    }

    /// Marshals and sends one request on proxy `id`.
    ///
    /// Every object the arguments reference must be live. Sending a
    /// destructor request retires the proxy.
    pub fn send_request(
        &mut self,
        id: ObjectId,
        interface: &'static Interface,
        opcode: u16,
        args: Vec<Argument>,
    ) -> Result<()> {
        self.ensure_usable()?;

        let version = self.objects.expect(id, interface)?.version;
        let desc = interface.request(opcode)?;
        if desc.signature.since() > version {
            return Err(Error::codec(format!(
                "{}.{} needs version {}, proxy {id} is version {version}",
                interface.name,
                desc.name,
                desc.signature.since()
            )));
        }
        for target in args.iter().filter_map(Argument::referenced_object) {
            self.objects.get(target)?;
        }

        let bytes = codec::encode(id, opcode, desc.signature, &args)?;
        let fds: Vec<BorrowedFd<'_>> = args.iter().filter_map(Argument::as_fd).collect();

        trace!("-> {}@{id}.{} {:?}", interface.name, desc.name, args);
        if let Err(err) = self.transport.send(&bytes, &fds) {
            return Err(self.fail(err));
        }

        if desc.destructor {
            self.objects.remove(id);
        }
        Ok(())
    }

    /// Sends a request whose new id argument creates a proxy of `interface`.
    ///
    /// `build` receives the freshly allocated id and returns the request
    /// arguments.
    pub fn new_object(
        &mut self,
        parent: ObjectId,
        parent_interface: &'static Interface,
        opcode: u16,
        interface: &'static Interface,
        version: u32,
        build: impl FnOnce(ObjectId) -> Vec<Argument>,
    ) -> Result<ObjectId> {
        self.objects.expect(parent, parent_interface)?;

        let id = self.objects.register(interface, version);
        if let Err(err) = self.send_request(parent, parent_interface, opcode, build(id)) {
            self.objects.remove(id);
            return Err(err);
        }

        debug!("created {}@{id} (version {version})", interface.name);
        Ok(id)
    }

    /// Destroys proxy `id`: sends the interface's destructor when it has one
    /// at the bound version, then drops the table entry.
    pub fn destroy(&mut self, id: ObjectId) -> Result<()> {
        let entry = self.objects.get(id)?;
        let (interface, version) = (entry.interface, entry.version);

        match interface.destructor(version) {
            Some(opcode) => self.send_request(id, interface, opcode, Vec::new())?,
            None => {
                self.objects.remove(id);
            }
        }

        debug!("destroyed {}@{id}", interface.name);
        Ok(())
    }

    /// Blocks for one message and dispatches it.
    pub fn pump_once(&mut self, data: &mut D) -> Result<()> {
        self.ensure_usable()?;

        let message = match self.transport.receive() {
            Ok(message) => message,
            Err(err) => return Err(self.fail(err)),
        };
        match self.dispatch_message(data, message) {
            Ok(()) => Ok(()),
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Dispatches every message that can be read without blocking.
    ///
    /// Returns the number of messages handled.
    pub fn dispatch_pending(&mut self, data: &mut D) -> Result<usize> {
        self.ensure_usable()?;

        let mut handled = 0;
        loop {
            let message = match self.transport.try_receive() {
                Ok(Some(message)) => message,
                Ok(None) => return Ok(handled),
                Err(err) => return Err(self.fail(err)),
            };
            if let Err(err) = self.dispatch_message(data, message) {
                return Err(self.fail(err));
            }
            handled += 1;
        }
    }

    /// Waits until the compositor has processed every request sent so far.
    ///
    /// Events arriving in the meantime are dispatched.
    pub fn roundtrip(&mut self, data: &mut D) -> Result<()> {
        let callback = display::sync(self)?;
        self.set_listener(callback, Listener::callback(|_, _, _, _| Ok(())), None)?;

        while self.objects.is_live(callback) {
            self.pump_once(data)?;
        }
        Ok(())
    }

    fn dispatch_message(&mut self, data: &mut D, message: WlMessage) -> Result<()> {
        let id = message.header.object_id;
        if id == DISPLAY_ID {
            return self.handle_display(message);
        }

        let (interface, version) = match self.objects.get(id) {
            Ok(entry) => (entry.interface, entry.version),
            Err(err) => {
                debug!(
                    "dropping opcode {} for {id}: {err}",
                    message.header.opcode
                );
                return Ok(());
            }
        };

        let decoded = codec::decode_event(&message, interface, self.transport.fds_mut())?;
        let desc = interface.event(decoded.opcode)?;
        let event = Event::parse(ProxyKind::of(interface)?, decoded.opcode, decoded.args)?;
        trace!("<- {}@{id}.{} {:?}", interface.name, desc.name, event);

        let entry = self.objects.get_mut(id)?;
        let Some(mut listener) = entry.listener.take() else {
            warn!("no listener on {}@{id}, dropping {}", interface.name, desc.name);
            if desc.destructor {
                self.objects.remove(id);
            }
            return Ok(());
        };
        let user_data = entry.user_data.take();

        let ctx = ProxyContext {
            id,
            version,
            interface,
            user_data: user_data.as_deref(),
        };
        let result = listener.invoke(self, data, &ctx, event);

        if desc.destructor {
            self.objects.remove(id);
        } else if let Ok(entry) = self.objects.get_mut(id) {
            // The handler may have installed replacements.
            if entry.listener.is_none() {
                entry.listener = Some(listener);
            }
            if entry.user_data.is_none() {
                entry.user_data = user_data;
            }
        }

        result
    }

    fn handle_display(&mut self, message: WlMessage) -> Result<()> {
        let decoded = codec::decode_event(&message, &display::INTERFACE, self.transport.fds_mut())?;

        match display::Event::from_args(decoded.opcode, decoded.args)? {
            display::Event::Error {
                object_id,
                code,
                message,
            } => {
                let interface = self
                    .objects
                    .get(object_id)
                    .map(|entry| entry.interface.name)
                    .unwrap_or("unknown");
                let err = Error::Server {
                    object_id,
                    interface,
                    code,
                    message,
                };
                if let Some(id) = err.display_error() {
                    error!("compositor reported {id} against the display");
                }
                Err(err)
            }
            display::Event::DeleteId { id } => {
                debug!("compositor released id {id}");
                Ok(())
            }
        }
    }

    /// Closes the socket. Proxies left in the table become unusable.
    pub fn close(&mut self) {
        self.transport.close();
    }
}

impl<D> Drop for Connection<D> {
    fn drop(&mut self) {
        self.transport.close();
    }
}

