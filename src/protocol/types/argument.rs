use std::os::fd::{AsFd, AsRawFd, BorrowedFd, OwnedFd};

use crate::{
    error::{Error, Result},
    protocol::ObjectId,
};

/// One typed slot of a message signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgKind {
    /// `i`: signed 32-bit integer
    Int,
    /// `u`: unsigned 32-bit integer
    Uint,
    /// `s`: length-prefixed, NUL-terminated UTF-8 string
    String,
    /// `n`: id of an object created by this message
    NewId,
    /// `o`: reference to a live object
    Object,
    /// `?o`: reference to a live object, or null
    OptionalObject,
    /// `a`: length-prefixed byte blob
    Array,
    /// `h`: file descriptor, carried out of band
    Fd,
}

impl ArgKind {
    pub fn name(self) -> &'static str {
        match self {
            ArgKind::Int => "int",
            ArgKind::Uint => "uint",
            ArgKind::String => "string",
            ArgKind::NewId => "new_id",
            ArgKind::Object => "object",
            ArgKind::OptionalObject => "optional object",
            ArgKind::Array => "array",
            ArgKind::Fd => "fd",
        }
    }
}

/// A decoded or to-be-encoded message argument.
#[derive(Debug)]
pub enum Argument {
    Int(i32),
    Uint(u32),
    String(String),
    NewId(ObjectId),
    Object(ObjectId),
    OptionalObject(Option<ObjectId>),
    Array(Vec<u8>),
    Fd(OwnedFd),
}

impl Argument {
    pub fn kind(&self) -> ArgKind {
        match self {
            Argument::Int(_) => ArgKind::Int,
            Argument::Uint(_) => ArgKind::Uint,
            Argument::String(_) => ArgKind::String,
            Argument::NewId(_) => ArgKind::NewId,
            Argument::Object(_) => ArgKind::Object,
            Argument::OptionalObject(_) => ArgKind::OptionalObject,
            Argument::Array(_) => ArgKind::Array,
            Argument::Fd(_) => ArgKind::Fd,
        }
    }

    /// The object this argument points at, if any.
    pub fn referenced_object(&self) -> Option<ObjectId> {
        match self {
            Argument::Object(id) | Argument::OptionalObject(Some(id)) => Some(*id),
            _ => None,
        }
    }

    pub fn as_fd(&self) -> Option<BorrowedFd<'_>> {
        match self {
            Argument::Fd(fd) => Some(fd.as_fd()),
            _ => None,
        }
    }
}

impl PartialEq for Argument {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Argument::Int(a), Argument::Int(b)) => a == b,
            (Argument::Uint(a), Argument::Uint(b)) => a == b,
            (Argument::String(a), Argument::String(b)) => a == b,
            (Argument::NewId(a), Argument::NewId(b)) => a == b,
            (Argument::Object(a), Argument::Object(b)) => a == b,
            (Argument::OptionalObject(a), Argument::OptionalObject(b)) => a == b,
            (Argument::Array(a), Argument::Array(b)) => a == b,
            (Argument::Fd(a), Argument::Fd(b)) => a.as_raw_fd() == b.as_raw_fd(),
            _ => false,
        }
    }
}

/// Cursor over decoded arguments used by the typed event parsers.
///
/// The codec already checked every argument against the signature, so a
/// mismatch here means the typed parser and the descriptor disagree.
pub struct Arguments {
    message: &'static str,
    inner: std::vec::IntoIter<Argument>,
}

impl Arguments {
    pub fn new(message: &'static str, args: Vec<Argument>) -> Self {
        Self {
            message,
            inner: args.into_iter(),
        }
    }

    fn next_arg(&mut self, expected: ArgKind) -> Result<Argument> {
        self.inner.next().ok_or_else(|| {
            Error::codec(format!(
                "{}: missing {} argument",
                self.message,
                expected.name()
            ))
        })
    }

    fn mismatch(&self, expected: ArgKind, got: &Argument) -> Error {
        Error::codec(format!(
            "{}: expected {} argument, got {}",
            self.message,
            expected.name(),
            got.kind().name()
        ))
    }

    pub fn int(&mut self) -> Result<i32> {
        match self.next_arg(ArgKind::Int)? {
            Argument::Int(value) => Ok(value),
            other => Err(self.mismatch(ArgKind::Int, &other)),
        }
    }

    pub fn uint(&mut self) -> Result<u32> {
        match self.next_arg(ArgKind::Uint)? {
            Argument::Uint(value) => Ok(value),
            other => Err(self.mismatch(ArgKind::Uint, &other)),
        }
    }

    pub fn string(&mut self) -> Result<String> {
        match self.next_arg(ArgKind::String)? {
            Argument::String(value) => Ok(value),
            other => Err(self.mismatch(ArgKind::String, &other)),
        }
    }

    pub fn object(&mut self) -> Result<ObjectId> {
        match self.next_arg(ArgKind::Object)? {
            Argument::Object(id) => Ok(id),
            other => Err(self.mismatch(ArgKind::Object, &other)),
        }
    }

    pub fn array(&mut self) -> Result<Vec<u8>> {
        match self.next_arg(ArgKind::Array)? {
            Argument::Array(bytes) => Ok(bytes),
            other => Err(self.mismatch(ArgKind::Array, &other)),
        }
    }

    /// Interprets an array argument as native-endian 32-bit words.
    pub fn words(&mut self) -> Result<Vec<u32>> {
        let bytes = self.array()?;
        if bytes.len() % 4 != 0 {
            return Err(Error::codec(format!(
                "{}: array of {} bytes is not a list of words",
                self.message,
                bytes.len()
            )));
        }
        Ok(bytes
            .chunks_exact(4)
            .map(|chunk| u32::from_ne_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_reads_in_order() {
        let mut args = Arguments::new(
            "test",
            vec![
                Argument::Int(-3),
                Argument::String("x".into()),
                Argument::Array([1u32, 3].iter().flat_map(|w| w.to_ne_bytes()).collect()),
            ],
        );
        assert_eq!(args.int().unwrap(), -3);
        assert_eq!(args.string().unwrap(), "x");
        assert_eq!(args.words().unwrap(), vec![1, 3]);
        assert!(args.uint().is_err());
    }

    #[test]
    fn cursor_reports_type_mismatch() {
        let mut args = Arguments::new("test", vec![Argument::Uint(1)]);
        let err = args.int().unwrap_err();
        assert!(err.to_string().contains("expected int argument, got uint"));
    }

    #[test]
    fn referenced_object_skips_null() {
        assert_eq!(Argument::Object(4).referenced_object(), Some(4));
        assert_eq!(Argument::OptionalObject(None).referenced_object(), None);
        assert_eq!(Argument::NewId(9).referenced_object(), None);
    }
}
