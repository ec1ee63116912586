//! One fullscreen xdg-shell toplevel and the state machine that brings it up.

mod handlers;
pub mod state;

use std::os::{fd::RawFd, unix::net::UnixStream};

use tracing::{debug, error, info, warn};

pub use state::{Globals, OutputInfo, Phase, SurfaceChain, WindowState};

use crate::{
    config::ClientConfig,
    connection::{Connection, Listener},
    error::{Error, Result},
    protocol::{ObjectId, compositor, display, surface, xdg_surface, xdg_toplevel, xdg_wm_base},
    transport::Transport,
};

/// Highest `wl_compositor` version this client binds.
pub const COMPOSITOR_VERSION: u32 = 4;
/// Highest `xdg_wm_base` version this client binds.
pub const WM_BASE_VERSION: u32 = 5;
/// Highest `wl_output` version this client binds.
pub const OUTPUT_VERSION: u32 = 4;

/// Opaque handles a renderer needs to draw into the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NativeHandle {
    /// The compositor socket.
    Display(RawFd),
    /// Object id of the base `wl_surface`.
    Surface(ObjectId),
}

/// A fullscreen, undecorated window on a Wayland compositor.
pub struct Window {
    config: ClientConfig,
    conn: Option<Connection<WindowState>>,
    state: WindowState,
    last_error: Option<Error>,
}

impl Window {
    /// A window that will locate the compositor through the environment.
    pub fn new(title: impl Into<String>) -> Self {
        Self::with_config(title, ClientConfig::from_env())
    }

    pub fn with_config(title: impl Into<String>, config: ClientConfig) -> Self {
        Self {
            config,
            conn: None,
            state: WindowState::new(title),
            last_error: None,
        }
    }

    /// Connects and runs the bootstrap sequence up to the first commit.
    ///
    /// Returns `false` on any failure; [`Window::last_error`] tells why.
    pub fn connect(&mut self) -> bool {
        if self.conn.is_some() {
            warn!("window {:?} is already connected", self.state.title);
            return self.is_connected();
        }
        let result = Connection::connect(&self.config).and_then(|conn| self.bootstrap(conn));
        self.finish_connect(result)
    }

    /// Like [`Window::connect`], over an already connected socket.
    pub fn connect_stream(&mut self, stream: UnixStream) -> bool {
        if self.conn.is_some() {
            warn!("window {:?} is already connected", self.state.title);
            return self.is_connected();
        }
        let result = self.bootstrap(Connection::new(Transport::from_stream(stream)));
        self.finish_connect(result)
    }

    fn finish_connect(&mut self, result: Result<()>) -> bool {
        match result {
            Ok(()) => true,
            Err(err) => {
                error!("could not open window {:?}: {err}", self.state.title);
                self.last_error = Some(err);
                self.disconnect();
                false
            }
        }
    }

    fn bootstrap(&mut self, conn: Connection<WindowState>) -> Result<()> {
        let app_id = self
            .config
            .app_id
            .clone()
            .unwrap_or_else(|| self.state.title.clone());

        let Self { conn: slot, state, .. } = self;
        let conn = slot.insert(conn);
        state.advance(Phase::Connected);

        let registry = display::get_registry(conn)?;
        conn.set_listener(registry, Listener::registry(handlers::on_registry), None)?;
        state.globals.registry = Some(registry);
        conn.roundtrip(state)?;
        state.advance(Phase::RegistrySynced);

        let compositor = state
            .globals
            .compositor
            .ok_or(Error::MissingGlobal("wl_compositor"))?;
        let wm_base = state
            .globals
            .wm_base
            .ok_or(Error::MissingGlobal("xdg_wm_base"))?;
        state.advance(Phase::ShellBound);

        let surface = compositor::create_surface(conn, compositor)?;
        conn.set_listener(surface, Listener::surface(handlers::on_surface), None)?;
        state.chain.surface = Some(surface);

        let xdg_surface = xdg_wm_base::get_xdg_surface(conn, wm_base, surface)?;
        conn.set_listener(
            xdg_surface,
            Listener::xdg_surface(handlers::on_xdg_surface),
            None,
        )?;
        state.chain.xdg_surface = Some(xdg_surface);

        let toplevel = xdg_surface::get_toplevel(conn, xdg_surface)?;
        conn.set_listener(toplevel, Listener::toplevel(handlers::on_toplevel), None)?;
        state.chain.toplevel = Some(toplevel);

        xdg_toplevel::set_title(conn, toplevel, &state.title)?;
        xdg_toplevel::set_app_id(conn, toplevel, &app_id)?;
        if state.globals.output.is_none() {
            warn!("no output advertised, the compositor picks where to go fullscreen");
        }
        xdg_toplevel::set_fullscreen(conn, toplevel, state.globals.output)?;
        state.advance(Phase::SurfaceCreated);

        // The first configure only arrives after a commit without a buffer.
        surface::commit(conn, surface)?;
        conn.roundtrip(state)?;
        settle(conn, state)
    }

    /// Dispatches every event already received, then acknowledges and
    /// commits the latest configure.
    ///
    /// Returns `false` once the connection is unusable. It stays `false`.
    pub fn dispatch_pending(&mut self) -> bool {
        let Some(conn) = self.conn.as_mut() else {
            return false;
        };
        if !conn.is_usable() {
            return false;
        }

        let result = match conn.dispatch_pending(&mut self.state) {
            Ok(_) => settle(conn, &mut self.state),
            Err(err) => Err(err),
        };
        match result {
            Ok(()) => true,
            Err(err) => {
                error!("window {:?} lost its connection: {err}", self.state.title);
                self.last_error = Some(err);
                false
            }
        }
    }

    /// Tears the surface chain down in reverse creation order, releases the
    /// bound globals and closes the socket.
    ///
    /// Size, scale and output details are forgotten; the title and the close
    /// flag survive.
    pub fn disconnect(&mut self) {
        let Some(mut conn) = self.conn.take() else {
            return;
        };

        let (chain, globals) = (self.state.chain, self.state.globals);
        self.state.reset_connection();
        let teardown = [
            chain.toplevel,
            chain.xdg_surface,
            chain.surface,
            globals.wm_base,
            globals.output,
            globals.compositor,
            globals.registry,
        ];

        for id in teardown.into_iter().flatten() {
            if !conn.is_usable() {
                break;
            }
            if let Err(err) = conn.destroy(id) {
                debug!("skipping teardown of object {id}: {err}");
            }
        }

        conn.close();
        info!("window {:?} disconnected", self.state.title);
    }

    /// Sets the close flag without talking to the compositor.
    pub fn request_close(&mut self) {
        self.state.close_requested = true;
    }

    pub fn close_requested(&self) -> bool {
        self.state.close_requested
    }

    /// Framebuffer size in pixels: last logical size times output scale.
    pub fn current_size(&self) -> (u32, u32) {
        self.state.size()
    }

    pub fn native_handles(&self) -> Vec<NativeHandle> {
        let mut handles = Vec::new();
        if let Some(fd) = self.conn.as_ref().and_then(Connection::display_fd) {
            handles.push(NativeHandle::Display(fd));
        }
        if let Some(surface) = self.state.chain.surface {
            handles.push(NativeHandle::Surface(surface));
        }
        handles
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn state(&self) -> &WindowState {
        &self.state
    }

    pub fn title(&self) -> &str {
        &self.state.title
    }

    pub fn is_connected(&self) -> bool {
        self.conn.as_ref().is_some_and(Connection::is_usable)
    }

    /// The error that last made an operation fail.
    pub fn last_error(&self) -> Option<&Error> {
        self.last_error.as_ref()
    }
}

impl Drop for Window {
    fn drop(&mut self) {
        self.disconnect();
    }
}

/// Acknowledges the newest configure and commits it.
fn settle(conn: &mut Connection<WindowState>, state: &mut WindowState) -> Result<()> {
    let (Some(surface), Some(xdg_surface)) = (state.chain.surface, state.chain.xdg_surface) else {
        return Ok(());
    };
    let Some(serial) = state.pending_ack.take() else {
        return Ok(());
    };

    xdg_surface::ack_configure(conn, xdg_surface, serial)?;
    state.advance(Phase::Configured);
    surface::commit(conn, surface)?;
    state.advance(Phase::Running);
    Ok(())
}
