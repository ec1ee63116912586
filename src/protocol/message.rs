use std::fmt::{self, Display, Formatter};

use crate::{
    error::{Error, Result},
    protocol::ObjectId,
};

/// The fixed size of a Wayland message header in bytes (8 bytes).
///
/// Wayland message headers consist of two 32-bit words:
/// - Object ID (32 bits)
/// - Combined size (upper 16 bits) and opcode (lower 16 bits)
pub const WL_MESSAGE_HEADER_LEN: usize = size_of::<u32>() + size_of::<u16>() + size_of::<u16>();

/// Largest message the 16-bit size field can describe.
pub const WL_MAX_MESSAGE_LEN: usize = u16::MAX as usize;

/// Represents the header of a Wayland protocol message.
///
/// Contains routing information and metadata for interpreting Wayland messages.
/// The header is always 8 bytes and precedes the variable-length message data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WlMessageHeader {
    /// The object ID that this message targets or originates from.
    pub object_id: ObjectId,
    /// The operation code defining the specific request or event type.
    pub opcode: u16,
    /// The total message size including header and data in bytes.
    pub size: u16,
}

impl WlMessageHeader {
    /// Returns the total length of the message including header and data.
    pub fn message_len(&self) -> usize {
        self.size as usize
    }

    fn size_opcode_word(&self) -> u32 {
        (u32::from(self.size) << 16) | u32::from(self.opcode)
    }

    pub fn encode_into(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.object_id.to_ne_bytes());
        buf.extend_from_slice(&self.size_opcode_word().to_ne_bytes());
    }
}

impl TryFrom<&[u8]> for WlMessageHeader {
    type Error = Error;

    /// Deserializes a header from the wire format.
    ///
    /// # Errors
    /// Returns an error if:
    /// - Buffer is shorter than 8 bytes
    /// - The declared size is smaller than the header or not word aligned
    fn try_from(buf: &[u8]) -> Result<Self> {
        if buf.len() < WL_MESSAGE_HEADER_LEN {
            return Err(Error::codec(format!(
                "buffer too short for a message header: expected {} bytes, got {}",
                WL_MESSAGE_HEADER_LEN,
                buf.len()
            )));
        }

        let object_id = u32::from_ne_bytes([buf[0], buf[1], buf[2], buf[3]]);
        let word = u32::from_ne_bytes([buf[4], buf[5], buf[6], buf[7]]);
        let header = WlMessageHeader {
            object_id,
            opcode: (word & 0xFFFF) as u16,
            size: (word >> 16) as u16,
        };

        if header.message_len() < WL_MESSAGE_HEADER_LEN || header.message_len() % 4 != 0 {
            return Err(Error::codec(format!("invalid message size in {header}")));
        }

        Ok(header)
    }
}

impl Display for WlMessageHeader {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "WlMessageHeader {{ object_id: {}, opcode: {}, size: {} }}",
            self.object_id, self.opcode, self.size
        )
    }
}

/// A complete Wayland protocol message containing header and data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WlMessage {
    /// The message header with routing and metadata.
    pub header: WlMessageHeader,
    /// The message payload data.
    pub data: Vec<u8>,
}

impl WlMessage {
    /// Creates a new Wayland message.
    ///
    /// The size field is calculated as header length plus data length.
    ///
    /// # Errors
    /// Returns [`Error::Codec`] if the message would not fit the 16-bit size field.
    pub fn new(object_id: ObjectId, opcode: u16, data: Vec<u8>) -> Result<WlMessage> {
        let size = data.len() + WL_MESSAGE_HEADER_LEN;
        if size > WL_MAX_MESSAGE_LEN {
            return Err(Error::codec(format!(
                "message of {size} bytes exceeds the {WL_MAX_MESSAGE_LEN} byte limit"
            )));
        }

        Ok(WlMessage {
            header: WlMessageHeader {
                object_id,
                opcode,
                size: size as u16,
            },
            data,
        })
    }
}

impl From<WlMessage> for Vec<u8> {
    /// Serializes the complete message into wire format.
    fn from(msg: WlMessage) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(msg.header.message_len());

        msg.header.encode_into(&mut bytes);
        bytes.extend_from_slice(&msg.data);

        bytes
    }
}

impl TryFrom<&[u8]> for WlMessage {
    type Error = Error;

    /// Deserializes exactly one message from wire format.
    ///
    /// # Errors
    /// Returns an error if the buffer length doesn't match the declared message size.
    fn try_from(buf: &[u8]) -> Result<WlMessage> {
        let header = WlMessageHeader::try_from(buf)?;

        if buf.len() != header.message_len() {
            return Err(Error::codec(format!(
                "buffer of {} bytes does not match declared message size {}",
                buf.len(),
                header.message_len()
            )));
        }

        Ok(WlMessage {
            header,
            data: buf[WL_MESSAGE_HEADER_LEN..].to_vec(),
        })
    }
}

impl Display for WlMessage {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let data_dump = self
            .data
            .iter()
            .map(|b| format!("0x{:02X}", b))
            .collect::<Vec<String>>()
            .join(", ");

        write!(
            f,
            "WlMessage {{ header: {}, data: [{}] }}",
            self.header, data_dump
        )
    }
}

/// Splits a byte stream into complete Wayland messages.
///
/// Bytes are appended as they arrive from the socket; complete messages are
/// removed from the front. A trailing partial message stays buffered until
/// the rest of it arrives.
#[derive(Debug, Default)]
pub struct WlMessageIter {
    buffer: Vec<u8>,
}

impl WlMessageIter {
    pub fn new() -> WlMessageIter {
        Self::default()
    }

    pub fn push(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    /// Number of buffered bytes not yet returned as a message.
    pub fn pending_len(&self) -> usize {
        self.buffer.len()
    }

    /// Attempts to take the next complete message from the buffer.
    ///
    /// Returns `Ok(None)` while the buffered bytes do not yet hold a whole
    /// message.
    ///
    /// # Errors
    /// A header declaring an impossible size poisons the stream: the buffer
    /// is cleared and a codec error returned.
    pub fn next(&mut self) -> Result<Option<WlMessage>> {
        if self.buffer.len() < WL_MESSAGE_HEADER_LEN {
            return Ok(None);
        }

        let header = match WlMessageHeader::try_from(&self.buffer[..WL_MESSAGE_HEADER_LEN]) {
            Ok(header) => header,
            Err(err) => {
                self.buffer.clear();
                return Err(err);
            }
        };

        if self.buffer.len() < header.message_len() {
            return Ok(None);
        }

        let message = WlMessage {
            header,
            data: self.buffer[WL_MESSAGE_HEADER_LEN..header.message_len()].to_vec(),
        };
        self.buffer.drain(..header.message_len());

        Ok(Some(message))
    }
}
