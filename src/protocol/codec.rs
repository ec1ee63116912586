//! Signature-driven marshalling between [`Argument`] lists and wire bytes.

use std::{collections::VecDeque, os::fd::OwnedFd};

use crate::{
    error::{Error, Result},
    protocol::{
        ObjectId,
        interface::{Interface, Signature},
        message::{WL_MESSAGE_HEADER_LEN, WlMessage},
        types::{ArgKind, Argument, WL_WORD_LEN, WlArray, WlString, read_word},
    },
};

/// Marshals one message: header followed by `args` laid out per `signature`.
///
/// File descriptor arguments occupy no bytes; the caller sends them as
/// ancillary data.
///
/// # Errors
/// Returns [`Error::Codec`] if the arguments do not match the signature, a
/// required object or new id is null, a string contains a NUL byte, or the
/// message outgrows the 16-bit size field.
pub fn encode(
    object_id: ObjectId,
    opcode: u16,
    signature: Signature,
    args: &[Argument],
) -> Result<Vec<u8>> {
    let kinds = signature.arguments()?;
    if kinds.len() != args.len() {
        return Err(Error::codec(format!(
            "signature {:?} takes {} arguments, got {}",
            signature.as_str(),
            kinds.len(),
            args.len()
        )));
    }

    let mut data = Vec::new();
    for (index, (kind, arg)) in kinds.iter().zip(args).enumerate() {
        match (kind, arg) {
            (ArgKind::Int, Argument::Int(value)) => data.extend_from_slice(&value.to_ne_bytes()),
            (ArgKind::Uint, Argument::Uint(value)) => data.extend_from_slice(&value.to_ne_bytes()),
            (ArgKind::String, Argument::String(value)) => {
                WlString::new(value)?.encode_into(&mut data)
            }
            (ArgKind::NewId, Argument::NewId(id)) | (ArgKind::Object, Argument::Object(id)) => {
                if *id == 0 {
                    return Err(Error::codec(format!(
                        "argument {index} ({}) may not be null",
                        kind.name()
                    )));
                }
                data.extend_from_slice(&id.to_ne_bytes());
            }
            (ArgKind::OptionalObject, Argument::OptionalObject(id)) => {
                data.extend_from_slice(&id.unwrap_or(0).to_ne_bytes())
            }
            (ArgKind::Array, Argument::Array(bytes)) => WlArray::new(bytes).encode_into(&mut data),
            (ArgKind::Fd, Argument::Fd(_)) => {}
            (expected, got) => {
                return Err(Error::codec(format!(
                    "argument {index}: expected {}, got {}",
                    expected.name(),
                    got.kind().name()
                )));
            }
        }
    }

    Ok(WlMessage::new(object_id, opcode, data)?.into())
}

/// Demarshals a message payload laid out per `signature`.
///
/// `fds` supplies file descriptors received alongside the byte stream, in
/// arrival order.
///
/// # Errors
/// Returns [`Error::Codec`] on truncation, trailing bytes, null required
/// objects, or a missing file descriptor.
pub fn decode_args(
    data: &[u8],
    signature: Signature,
    fds: &mut VecDeque<OwnedFd>,
) -> Result<Vec<Argument>> {
    let mut offset = 0;
    let mut args = Vec::new();

    for kind in signature.arguments()? {
        let rest = &data[offset..];
        let (arg, consumed) = match kind {
            ArgKind::Int => (Argument::Int(read_word(rest, "int")? as i32), WL_WORD_LEN),
            ArgKind::Uint => (Argument::Uint(read_word(rest, "uint")?), WL_WORD_LEN),
            ArgKind::String => {
                let (string, consumed) = WlString::decode_nullable(rest)?;
                let string = string.ok_or_else(|| Error::codec("null string for a required argument"))?;
                (Argument::String(string.into()), consumed)
            }
            ArgKind::NewId | ArgKind::Object => {
                let id = read_word(rest, kind.name())?;
                if id == 0 {
                    return Err(Error::codec(format!("null {} for a required argument", kind.name())));
                }
                let arg = if kind == ArgKind::NewId {
                    Argument::NewId(id)
                } else {
                    Argument::Object(id)
                };
                (arg, WL_WORD_LEN)
            }
            ArgKind::OptionalObject => {
                let id = read_word(rest, "object")?;
                (Argument::OptionalObject((id != 0).then_some(id)), WL_WORD_LEN)
            }
            ArgKind::Array => {
                let array = WlArray::try_from(rest)?;
                let consumed = array.buffer_size();
                (Argument::Array(array.into_vec()), consumed)
            }
            ArgKind::Fd => {
                let fd = fds
                    .pop_front()
                    .ok_or_else(|| Error::codec("message expects a file descriptor that was not received"))?;
                (Argument::Fd(fd), 0)
            }
        };
        args.push(arg);
        offset += consumed;
    }

    if offset != data.len() {
        return Err(Error::codec(format!(
            "{} trailing bytes after arguments {:?}",
            data.len() - offset,
            signature.as_str()
        )));
    }

    Ok(args)
}

/// An inbound event with its arguments decoded.
#[derive(Debug, PartialEq)]
pub struct DecodedEvent {
    pub object_id: ObjectId,
    pub opcode: u16,
    pub args: Vec<Argument>,
}

/// Decodes an event addressed to an object implementing `interface`.
///
/// # Errors
/// - [`Error::UnknownOpcode`] if the opcode is outside the event table
/// - [`Error::Codec`] if the payload does not match the event signature
pub fn decode_event(
    message: &WlMessage,
    interface: &Interface,
    fds: &mut VecDeque<OwnedFd>,
) -> Result<DecodedEvent> {
    let desc = interface.event(message.header.opcode)?;
    let args = decode_args(&message.data, desc.signature, fds)?;

    Ok(DecodedEvent {
        object_id: message.header.object_id,
        opcode: message.header.opcode,
        args,
    })
}

/// Decodes a complete serialized message against `signature`.
pub fn decode(
    bytes: &[u8],
    signature: Signature,
    fds: &mut VecDeque<OwnedFd>,
) -> Result<DecodedEvent> {
    if bytes.len() < WL_MESSAGE_HEADER_LEN {
        return Err(Error::codec("message shorter than its header"));
    }
    let message = WlMessage::try_from(bytes)?;
    let args = decode_args(&message.data, signature, fds)?;

    Ok(DecodedEvent {
        object_id: message.header.object_id,
        opcode: message.header.opcode,
        args,
    })
}
