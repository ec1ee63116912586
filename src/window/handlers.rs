//! Event handlers installed during bootstrap.
//!
//! Ping/pong and configure bookkeeping live here so they keep firing in
//! every phase after the relevant object is bound.

use tracing::{debug, info, trace, warn};

use super::{
    COMPOSITOR_VERSION, OUTPUT_VERSION, WM_BASE_VERSION,
    state::{Phase, WindowState},
};
use crate::{
    connection::{Connection, Listener, ProxyContext},
    error::Result,
    protocol::{
        compositor, output, registry, surface, xdg_surface,
        xdg_toplevel::{self, Capability},
        xdg_wm_base,
    },
};

type Conn = Connection<WindowState>;

pub(super) fn on_registry(
    conn: &mut Conn,
    state: &mut WindowState,
    ctx: &ProxyContext<'_>,
    event: registry::Event,
) -> Result<()> {
    match event {
        registry::Event::Global(global) => {
            trace!("global {global}");
            match global.interface.as_str() {
                "wl_compositor" if state.globals.compositor.is_none() => {
                    let version = global.version.min(COMPOSITOR_VERSION);
                    let id =
                        registry::bind(conn, ctx.id, global.name, &compositor::INTERFACE, version)?;
                    state.globals.compositor = Some(id);
                    state.globals.compositor_name = Some(global.name);
                }
                "xdg_wm_base" if state.globals.wm_base.is_none() => {
                    let version = global.version.min(WM_BASE_VERSION);
                    let id =
                        registry::bind(conn, ctx.id, global.name, &xdg_wm_base::INTERFACE, version)?;
                    conn.set_listener(id, Listener::wm_base(on_wm_base), None)?;
                    state.globals.wm_base = Some(id);
                    state.globals.wm_base_name = Some(global.name);
                }
                "wl_output" if state.globals.output.is_none() => {
                    let version = global.version.min(OUTPUT_VERSION);
                    let id = registry::bind(conn, ctx.id, global.name, &output::INTERFACE, version)?;
                    conn.set_listener(id, Listener::output(on_output), Some(Box::new(global.name)))?;
                    state.globals.output = Some(id);
                }
                _ => {}
            }
        }
        registry::Event::GlobalRemove { name } => {
            if let Some(id) = conn.objects().find_by_user_data(&output::INTERFACE, &name) {
                info!("output {id} was unplugged, releasing it");
                conn.destroy(id)?;
                if state.globals.output == Some(id) {
                    state.globals.output = None;
                    state.output = Default::default();
                    state.scale = 1;
                }
            } else if state.globals.compositor_name == Some(name) {
                warn!("compositor withdrew wl_compositor, keeping the bound proxy");
            } else if state.globals.wm_base_name == Some(name) {
                warn!("compositor withdrew xdg_wm_base, keeping the bound proxy");
            } else {
                debug!("global {name} removed");
            }
        }
    }
    Ok(())
}

fn on_wm_base(
    conn: &mut Conn,
    _state: &mut WindowState,
    ctx: &ProxyContext<'_>,
    event: xdg_wm_base::Event,
) -> Result<()> {
    match event {
        xdg_wm_base::Event::Ping { serial } => {
            trace!("ping {serial}");
            xdg_wm_base::pong(conn, ctx.id, serial)
        }
    }
}

fn on_output(
    _conn: &mut Conn,
    state: &mut WindowState,
    _ctx: &ProxyContext<'_>,
    event: output::Event,
) -> Result<()> {
    match event {
        output::Event::Scale { factor } => {
            debug!("output scale {factor}");
            state.set_scale(factor);
        }
        output::Event::Mode {
            flags,
            width,
            height,
            ..
        } if flags & output::MODE_CURRENT != 0 => state.output.mode = Some((width, height)),
        output::Event::Name { name } => state.output.name = Some(name),
        output::Event::Description { description } => state.output.description = Some(description),
        output::Event::Geometry { make, model, .. } => debug!("output is {make} {model}"),
        output::Event::Done => debug!(
            "output {} ready, mode {:?}, scale {}",
            state.output.name.as_deref().unwrap_or("?"),
            state.output.mode,
            state.scale
        ),
        output::Event::Mode { .. } => {}
    }
    Ok(())
}

pub(super) fn on_surface(
    _conn: &mut Conn,
    _state: &mut WindowState,
    ctx: &ProxyContext<'_>,
    event: surface::Event,
) -> Result<()> {
    match event {
        surface::Event::Enter { output } => debug!("surface {} entered output {output}", ctx.id),
        surface::Event::Leave { output } => debug!("surface {} left output {output}", ctx.id),
        other => trace!("surface {}: {other:?}", ctx.id),
    }
    Ok(())
}

pub(super) fn on_xdg_surface(
    _conn: &mut Conn,
    state: &mut WindowState,
    _ctx: &ProxyContext<'_>,
    event: xdg_surface::Event,
) -> Result<()> {
    match event {
        xdg_surface::Event::Configure { serial } => {
            if let Some(previous) = state.pending_ack.replace(serial) {
                trace!("configure {previous} superseded by {serial}");
            }
        }
    }
    Ok(())
}

pub(super) fn on_toplevel(
    _conn: &mut Conn,
    state: &mut WindowState,
    _ctx: &ProxyContext<'_>,
    event: xdg_toplevel::Event,
) -> Result<()> {
    match event {
        xdg_toplevel::Event::Configure {
            width,
            height,
            states,
        } => {
            debug!("toplevel configure {width}x{height} {states:?}");
            state.configure(width, height, states);
        }
        xdg_toplevel::Event::Close => {
            info!("compositor asked window {:?} to close", state.title);
            state.close_requested = true;
            state.advance(Phase::Closed);
        }
        xdg_toplevel::Event::ConfigureBounds { width, height } => {
            debug!("toplevel bounds {width}x{height}");
        }
        xdg_toplevel::Event::WmCapabilities { capabilities } => {
            if !capabilities.contains(&Capability::Fullscreen) {
                warn!("compositor does not advertise fullscreen support");
            }
        }
    }
    Ok(())
}
