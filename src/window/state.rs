use crate::protocol::{ObjectId, xdg_toplevel::State};

/// Bootstrap progress of a [`Window`](super::Window). Later phases compare
/// greater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Phase {
    #[default]
    Disconnected,
    Connected,
    RegistrySynced,
    ShellBound,
    SurfaceCreated,
    Configured,
    Running,
    Closed,
}

/// Globals bound from the registry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Globals {
    pub registry: Option<ObjectId>,
    pub compositor: Option<ObjectId>,
    pub wm_base: Option<ObjectId>,
    pub output: Option<ObjectId>,
    /// Registry names of the bound compositor and shell.
    pub compositor_name: Option<u32>,
    pub wm_base_name: Option<u32>,
}

/// Base surface, shell wrapper and toplevel role, in creation order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SurfaceChain {
    pub surface: Option<ObjectId>,
    pub xdg_surface: Option<ObjectId>,
    pub toplevel: Option<ObjectId>,
}

/// What the bound output has told us about itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputInfo {
    pub name: Option<String>,
    pub description: Option<String>,
    /// Current mode in physical pixels.
    pub mode: Option<(i32, i32)>,
}

/// Everything listeners mutate while events are dispatched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowState {
    pub title: String,
    pub phase: Phase,
    pub close_requested: bool,
    /// Last non-zero logical size from a toplevel configure.
    pub logical_size: (u32, u32),
    /// Last integer scale reported by the bound output.
    pub scale: u32,
    pub states: Vec<State>,
    /// Serial of the newest unacknowledged xdg_surface configure.
    pub pending_ack: Option<u32>,
    pub globals: Globals,
    pub chain: SurfaceChain,
    pub output: OutputInfo,
}

impl WindowState {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            phase: Phase::Disconnected,
            close_requested: false,
            logical_size: (0, 0),
            scale: 1,
            states: Vec::new(),
            pending_ack: None,
            globals: Globals::default(),
            chain: SurfaceChain::default(),
            output: OutputInfo::default(),
        }
    }

    /// Forgets everything learned from the previous connection. The title
    /// and the close flag survive.
    pub(crate) fn reset_connection(&mut self) {
        let title = std::mem::take(&mut self.title);
        let close_requested = self.close_requested;
        *self = Self {
            close_requested,
            ..Self::new(title)
        };
    }

    /// Moves to `phase` unless the state machine is already past it.
    pub(crate) fn advance(&mut self, phase: Phase) {
        if phase > self.phase {
            tracing::info!("window {:?}: {:?} -> {:?}", self.title, self.phase, phase);
            self.phase = phase;
        }
    }

    /// Framebuffer size: logical size times output scale.
    pub fn size(&self) -> (u32, u32) {
        let (width, height) = self.logical_size;
        (
            width.saturating_mul(self.scale),
            height.saturating_mul(self.scale),
        )
    }

    /// Records a toplevel configure. A zero dimension keeps the previous
    /// logical size.
    pub(crate) fn configure(&mut self, width: i32, height: i32, states: Vec<State>) {
        if width > 0 && height > 0 {
            self.logical_size = (width as u32, height as u32);
        }
        self.states = states;
    }

    /// Records an output scale. Non-positive factors are ignored.
    pub(crate) fn set_scale(&mut self, factor: i32) {
        if factor > 0 {
            self.scale = factor as u32;
        }
    }

    pub fn is_fullscreen(&self) -> bool {
        self.states.contains(&State::Fullscreen)
    }
}
