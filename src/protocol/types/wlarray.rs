use super::{WL_WORD_LEN, read_word, roundup_4};
use crate::error::{Error, Result};

/// Represents a Wayland protocol array type.
///
/// A blob of arbitrary data, prefixed with a 32-bit integer specifying its length
/// (in bytes), then the verbatim contents of the array, padded to 32 bits.
///
/// Unlike strings, arrays do not include a NUL terminator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WlArray {
    /// The actual array data bytes, excluding padding.
    data: Vec<u8>,
}

impl WlArray {
    pub fn new(buffer: &[u8]) -> Self {
        Self {
            data: buffer.to_vec(),
        }
    }

    /// Builds an array of native-endian 32-bit words, the shape used by
    /// `xdg_toplevel` states and capabilities.
    pub fn from_words(words: &[u32]) -> Self {
        Self {
            data: words.iter().flat_map(|w| w.to_ne_bytes()).collect(),
        }
    }

    /// Returns the total buffer size required for serialization.
    ///
    /// This includes both the 4-byte length prefix and the padded array content.
    pub fn buffer_size(&self) -> usize {
        WL_WORD_LEN + roundup_4(self.data.len())
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }

    /// Appends the wire representation to `buf`, zero padded.
    pub fn encode_into(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&(self.data.len() as u32).to_ne_bytes());
        buf.extend_from_slice(&self.data);

        let padded_len = roundup_4(buf.len());
        buf.resize(padded_len, 0);
    }
}

impl std::fmt::Display for WlArray {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let data_dump = self
            .data
            .iter()
            .map(|b| format!("0x{:02X}", b))
            .collect::<Vec<String>>()
            .join(", ");

        write!(
            f,
            "WlArray {{ size: {}, data: [ {} ] }}",
            self.data.len(),
            data_dump
        )
    }
}

impl TryFrom<&[u8]> for WlArray {
    type Error = Error;

    /// Deserializes a Wayland array from the wire format.
    ///
    /// # Errors
    /// Returns an error if:
    /// - Buffer is too short for the length prefix (less than 4 bytes)
    /// - Buffer is too short for the declared, padded array content
    fn try_from(buffer: &[u8]) -> Result<WlArray> {
        let content_len = read_word(buffer, "array length")? as usize;
        let total_buffer_len = WL_WORD_LEN + roundup_4(content_len);

        if buffer.len() < total_buffer_len {
            return Err(Error::codec(format!(
                "array needs {total_buffer_len} bytes, only {} left",
                buffer.len()
            )));
        }

        Ok(WlArray {
            data: buffer[WL_WORD_LEN..WL_WORD_LEN + content_len].to_vec(),
        })
    }
}
