//! Scripted compositor for driving the client over a real socket.

#![allow(dead_code)]

use std::{
    collections::HashMap,
    os::unix::net::UnixStream,
    thread::{self, JoinHandle},
};

use wlwindow::{
    Error,
    protocol::{Interface, ObjectId, codec, interface_by_name, types::Argument, xdg_toplevel::State},
    transport::Transport,
};

/// Which globals the fake advertises and how it configures the window.
#[derive(Debug, Clone)]
pub struct Script {
    pub compositor: bool,
    pub wm_base: bool,
    /// Scale factor of the single advertised output, if any.
    pub output_scale: Option<i32>,
    pub configure: (i32, i32),
}

impl Default for Script {
    fn default() -> Self {
        Self {
            compositor: true,
            wm_base: true,
            output_scale: Some(1),
            configure: (1920, 1080),
        }
    }
}

pub const COMPOSITOR_NAME: u32 = 1;
pub const WM_BASE_NAME: u32 = 2;
pub const OUTPUT_NAME: u32 = 3;

/// One request the client sent.
#[derive(Debug, PartialEq)]
pub struct Request {
    pub object_id: ObjectId,
    pub interface: &'static str,
    pub name: &'static str,
    pub args: Vec<Argument>,
}

impl Request {
    pub fn is(&self, interface: &str, name: &str) -> bool {
        self.interface == interface && self.name == name
    }
}

pub struct FakeCompositor {
    pub transport: Transport,
    pub script: Script,
    /// Live client objects by id.
    pub objects: HashMap<ObjectId, &'static Interface>,
    pub requests: Vec<Request>,
    pub serial: u32,
    configured: bool,
    acked: bool,
}

/// Interface of the object a request's untyped-by-signature new id creates.
fn created_interface(interface: &str, request: &str, args: &[Argument]) -> Option<&'static Interface> {
    let name = match (interface, request) {
        ("wl_display", "sync") | ("wl_surface", "frame") => "wl_callback",
        ("wl_display", "get_registry") => "wl_registry",
        ("wl_compositor", "create_surface") => "wl_surface",
        ("xdg_wm_base", "get_xdg_surface") => "xdg_surface",
        ("xdg_surface", "get_toplevel") => "xdg_toplevel",
        ("wl_registry", "bind") => match &args[1] {
            Argument::String(name) => name.as_str(),
            _ => return None,
        },
        _ => return None,
    };
    interface_by_name(name)
}

impl FakeCompositor {
    pub fn new(stream: UnixStream, script: Script) -> Self {
        let mut objects = HashMap::new();
        objects.insert(1, interface_by_name("wl_display").unwrap());
        Self {
            transport: Transport::from_stream(stream),
            script,
            objects,
            requests: Vec::new(),
            serial: 100,
            configured: false,
            acked: false,
        }
    }

    /// Runs the compositor side of the bootstrap on a thread.
    ///
    /// The thread hands the compositor back once the client has committed an
    /// acknowledged configure, or once the client hung up.
    pub fn spawn(stream: UnixStream, script: Script) -> JoinHandle<FakeCompositor> {
        thread::spawn(move || {
            let mut fake = FakeCompositor::new(stream, script);
            fake.serve_bootstrap();
            fake
        })
    }

    fn serve_bootstrap(&mut self) {
        loop {
            let request = match self.next_request() {
                Ok(request) => request,
                Err(Error::Disconnected) => return,
                Err(err) => panic!("fake compositor: {err}"),
            };
            let done = request.is("wl_surface", "commit") && self.acked;
            self.requests.push(request);
            if done {
                return;
            }
        }
    }

    /// Blocks for the next request, answers it, and returns it.
    pub fn next_request(&mut self) -> Result<Request, Error> {
        let message = self.transport.receive()?;
        let object_id = message.header.object_id;
        let interface = *self
            .objects
            .get(&object_id)
            .unwrap_or_else(|| panic!("request on unknown object {object_id}"));
        let desc = interface.request(message.header.opcode)?;
        let args = codec::decode_args(&message.data, desc.signature, self.transport.fds_mut())?;

        for arg in &args {
            if let Argument::NewId(id) = arg {
                if let Some(created) = created_interface(interface.name, desc.name, &args) {
                    self.objects.insert(*id, created);
                }
            }
        }
        if desc.destructor {
            self.objects.remove(&object_id);
        }

        let request = Request {
            object_id,
            interface: interface.name,
            name: desc.name,
            args,
        };
        self.react(&request)?;
        Ok(request)
    }

    /// Reads requests until the client hangs up.
    pub fn drain(&mut self) -> Vec<Request> {
        let mut seen = Vec::new();
        while let Ok(request) = self.next_request() {
            seen.push(request);
        }
        seen
    }

    fn new_id(request: &Request) -> ObjectId {
        request
            .args
            .iter()
            .find_map(|arg| match arg {
                Argument::NewId(id) => Some(*id),
                _ => None,
            })
            .expect("request creates an object")
    }

    fn react(&mut self, request: &Request) -> Result<(), Error> {
        match (request.interface, request.name) {
            ("wl_display", "get_registry") => {
                let registry = Self::new_id(request);
                let mut globals = Vec::new();
                if self.script.compositor {
                    globals.push((COMPOSITOR_NAME, "wl_compositor", 6));
                }
                if self.script.wm_base {
                    globals.push((WM_BASE_NAME, "xdg_wm_base", 6));
                }
                if self.script.output_scale.is_some() {
                    globals.push((OUTPUT_NAME, "wl_output", 4));
                }
                for (name, interface, version) in globals {
                    self.send(
                        registry,
                        0,
                        vec![
                            Argument::Uint(name),
                            Argument::String(interface.into()),
                            Argument::Uint(version),
                        ],
                    )?;
                }
            }
            ("wl_display", "sync") => {
                let callback = Self::new_id(request);
                self.send(callback, 0, vec![Argument::Uint(0)])?;
                self.objects.remove(&callback);
                self.send(1, 1, vec![Argument::Uint(callback)])?;
            }
            ("wl_registry", "bind") => {
                let id = Self::new_id(request);
                if self.objects.get(&id).map(|i| i.name) == Some("wl_output") {
                    let scale = self.script.output_scale.unwrap_or(1);
                    self.send(
                        id,
                        1,
                        vec![
                            Argument::Uint(1),
                            Argument::Int(3840),
                            Argument::Int(2160),
                            Argument::Int(60000),
                        ],
                    )?;
                    self.send(id, 3, vec![Argument::Int(scale)])?;
                    self.send(id, 4, vec![Argument::String("FAKE-1".into())])?;
                    self.send(id, 2, vec![])?;
                }
            }
            ("wl_surface", "commit") if !self.configured => {
                if let Some(toplevel) = self.find("xdg_toplevel") {
                    let (width, height) = self.script.configure;
                    self.configure(toplevel, width, height)?;
                    self.configured = true;
                }
            }
            ("xdg_surface", "ack_configure") => self.acked = true,
            _ => {}
        }
        Ok(())
    }

    /// Id of the live object implementing `interface`.
    pub fn find(&self, interface: &str) -> Option<ObjectId> {
        self.objects
            .iter()
            .find(|(_, i)| i.name == interface)
            .map(|(id, _)| *id)
    }

    /// Sends a toplevel configure followed by the xdg_surface configure
    /// that ends the batch.
    pub fn configure(&mut self, toplevel: ObjectId, width: i32, height: i32) -> Result<u32, Error> {
        let states: Vec<u8> = [State::Fullscreen, State::Activated]
            .into_iter()
            .flat_map(|state| u32::from(state).to_ne_bytes())
            .collect();
        self.send(
            toplevel,
            0,
            vec![Argument::Int(width), Argument::Int(height), Argument::Array(states)],
        )?;

        let xdg_surface = self.find("xdg_surface").expect("xdg_surface exists");
        self.serial += 1;
        let serial = self.serial;
        self.send(xdg_surface, 0, vec![Argument::Uint(serial)])?;
        Ok(serial)
    }

    /// Sends event `opcode` to client object `id`.
    pub fn send(&mut self, id: ObjectId, opcode: u16, args: Vec<Argument>) -> Result<(), Error> {
        let interface = *self
            .objects
            .get(&id)
            .unwrap_or_else(|| panic!("event for unknown object {id}"));
        self.send_as(id, interface, opcode, args)
    }

    /// Sends an event as if `id` implemented `interface`, live or not.
    pub fn send_as(
        &mut self,
        id: ObjectId,
        interface: &'static Interface,
        opcode: u16,
        args: Vec<Argument>,
    ) -> Result<(), Error> {
        let desc = interface.event(opcode)?;
        let bytes = codec::encode(id, opcode, desc.signature, &args)?;
        self.transport.send(&bytes, &[])
    }
}
