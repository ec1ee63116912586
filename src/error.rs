use std::{io, path::PathBuf};

use thiserror::Error;

use crate::protocol::{
    ObjectId,
    display::{DISPLAY_ID, ErrorId},
};

/// Which side of the wire a message travels on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Request,
    Event,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Request => write!(f, "request"),
            Direction::Event => write!(f, "event"),
        }
    }
}

/// Coarse classification of an [`Error`].
///
/// Every kind except advisory conditions (which never become an `Error`) is
/// fatal for the connection that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The socket endpoint could not be resolved. Raised before any I/O.
    Environment,
    /// Socket creation, connect, read or write failed.
    Transport,
    /// A message on the wire was malformed or truncated.
    Codec,
    /// The peer or the client broke the object protocol.
    Protocol,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("XDG_RUNTIME_DIR is not set, cannot locate the compositor socket")]
    MissingRuntimeDirectory,

    #[error("socket path {path:?} is {len} bytes, the limit is {max}")]
    PathTooLong { path: PathBuf, len: usize, max: usize },

    #[error("failed to connect to {path:?}: {source}")]
    ConnectFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("socket I/O failed: {0}")]
    Transport(#[from] io::Error),

    #[error("the compositor closed the connection")]
    Disconnected,

    #[error("no open connection")]
    NotConnected,

    #[error("malformed message: {0}")]
    Codec(String),

    #[error("unknown {direction} opcode {opcode} on {interface}")]
    UnknownOpcode {
        interface: &'static str,
        opcode: u16,
        direction: Direction,
    },

    #[error("the compositor does not advertise {0}")]
    MissingGlobal(&'static str),

    #[error("object {0} has already been destroyed")]
    UseAfterDestroy(ObjectId),

    #[error("object {0} was never created")]
    UnknownObject(ObjectId),

    #[error("object {id} is a {actual}, not a {expected}")]
    InterfaceMismatch {
        id: ObjectId,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("protocol error on {interface}@{object_id} (code {code}): {message}")]
    Server {
        object_id: ObjectId,
        interface: &'static str,
        code: u32,
        message: String,
    },
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::MissingRuntimeDirectory | Error::PathTooLong { .. } => ErrorKind::Environment,
            Error::ConnectFailed { .. }
            | Error::Transport(_)
            | Error::Disconnected
            | Error::NotConnected => ErrorKind::Transport,
            Error::Codec(_) => ErrorKind::Codec,
            Error::UnknownOpcode { .. }
            | Error::MissingGlobal(_)
            | Error::UseAfterDestroy(_)
            | Error::UnknownObject(_)
            | Error::InterfaceMismatch { .. }
            | Error::Server { .. } => ErrorKind::Protocol,
        }
    }

    /// The display's own error code, when the compositor raised the error
    /// against `wl_display` itself.
    pub fn display_error(&self) -> Option<ErrorId> {
        match self {
            Error::Server {
                object_id: DISPLAY_ID,
                code,
                ..
            } => ErrorId::try_from(*code).ok(),
            _ => None,
        }
    }

    pub(crate) fn codec(message: impl Into<String>) -> Self {
        Error::Codec(message.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_the_taxonomy() {
        assert_eq!(Error::MissingRuntimeDirectory.kind(), ErrorKind::Environment);
        assert_eq!(Error::Disconnected.kind(), ErrorKind::Transport);
        assert_eq!(Error::codec("short").kind(), ErrorKind::Codec);
        assert_eq!(Error::UseAfterDestroy(7).kind(), ErrorKind::Protocol);
        assert_eq!(Error::MissingGlobal("xdg_wm_base").kind(), ErrorKind::Protocol);
    }

    #[test]
    fn display_errors_are_named() {
        let server = |object_id, code| Error::Server {
            object_id,
            interface: "wl_display",
            code,
            message: String::new(),
        };
        assert_eq!(server(DISPLAY_ID, 1).display_error(), Some(ErrorId::InvalidMethod));
        assert_eq!(server(DISPLAY_ID, 42).display_error(), None);
        // Codes on other objects belong to their own interface.
        assert_eq!(server(5, 1).display_error(), None);
        assert_eq!(Error::Disconnected.display_error(), None);
    }

    #[test]
    fn unknown_opcode_names_the_interface() {
        let err = Error::UnknownOpcode {
            interface: "xdg_toplevel",
            opcode: 9,
            direction: Direction::Event,
        };
        assert_eq!(err.to_string(), "unknown event opcode 9 on xdg_toplevel");
    }
}
