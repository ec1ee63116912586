use std::fmt::{self, Display, Formatter};

use super::{WL_WORD_LEN, read_word, roundup_4};
use crate::error::{Error, Result};

const WL_NUL: u8 = 0;

/// Represents a Wayland protocol string.
///
/// Wayland strings are serialized with:
/// - 32-bit length prefix (in bytes, NUL terminator included)
/// - String content in UTF-8 encoding
/// - NUL terminator byte
/// - Padding to 32-bit alignment with zero bytes
///
/// A length prefix of zero denotes a null string, which only nullable
/// arguments may carry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WlString {
    /// The UTF-8 encoded string data, without terminator or padding
    data: Vec<u8>,
}

impl WlString {
    /// Wraps a Rust string for transmission.
    ///
    /// # Errors
    /// Returns [`Error::Codec`] if `s` contains an embedded NUL byte, which the
    /// wire format cannot represent.
    pub fn new(s: &str) -> Result<Self> {
        if s.as_bytes().contains(&WL_NUL) {
            return Err(Error::codec(format!("string {s:?} contains an embedded NUL")));
        }
        Ok(Self {
            data: s.as_bytes().to_vec(),
        })
    }

    /// Value of the 32-bit length prefix: content plus terminator.
    pub fn wire_len(&self) -> u32 {
        (self.data.len() + 1) as u32
    }

    /// Total number of bytes this string occupies on the wire.
    ///
    /// # Examples
    /// ```
    /// # use wlwindow::protocol::types::WlString;
    /// // "hi" -> 4 (prefix) + 2 content + 1 NUL + 1 padding
    /// assert_eq!(WlString::new("hi").unwrap().buffer_len(), 8);
    /// // "hello" -> 4 (prefix) + 5 content + 1 NUL + 2 padding
    /// assert_eq!(WlString::new("hello").unwrap().buffer_len(), 12);
    /// ```
    pub fn buffer_len(&self) -> usize {
        WL_WORD_LEN + roundup_4(self.wire_len() as usize)
    }

    /// Appends the wire representation to `buf`.
    pub fn encode_into(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.wire_len().to_ne_bytes());
        buf.extend_from_slice(&self.data);
        buf.push(WL_NUL);

        let padded_len = roundup_4(buf.len());
        buf.resize(padded_len, 0);
    }

    /// Parses a string that may be null.
    ///
    /// Returns the string (or `None` for a null string) and the number of
    /// bytes consumed from `buf`.
    ///
    /// # Errors
    /// Returns [`Error::Codec`] if:
    /// - Buffer is too short for the length prefix or the declared content
    /// - The NUL terminator is missing from the declared position
    /// - The content is not valid UTF-8
    pub fn decode_nullable(buf: &[u8]) -> Result<(Option<WlString>, usize)> {
        let wire_len = read_word(buf, "string length")? as usize;
        if wire_len == 0 {
            return Ok((None, WL_WORD_LEN));
        }

        let consumed = WL_WORD_LEN + roundup_4(wire_len);
        if buf.len() < consumed {
            return Err(Error::codec(format!(
                "string needs {consumed} bytes, only {} left",
                buf.len()
            )));
        }

        let content = &buf[WL_WORD_LEN..WL_WORD_LEN + wire_len];
        let (terminator, data) = content
            .split_last()
            .ok_or_else(|| Error::codec("empty string payload"))?;
        if *terminator != WL_NUL {
            return Err(Error::codec("missing NUL terminator in string"));
        }
        std::str::from_utf8(data)
            .map_err(|err| Error::codec(format!("string is not UTF-8: {err}")))?;

        Ok((
            Some(WlString {
                data: data.to_vec(),
            }),
            consumed,
        ))
    }

    pub fn as_str(&self) -> &str {
        // Constructors only accept UTF-8.
        std::str::from_utf8(&self.data).unwrap_or_default()
    }
}

impl From<WlString> for String {
    fn from(wls: WlString) -> String {
        String::from_utf8(wls.data).unwrap_or_default()
    }
}

impl Display for WlString {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "WlString {{ len: {}, data: \"{}\" }}",
            self.wire_len(),
            self.as_str()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_prefix_terminator_and_zero_padding() {
        let mut buf = Vec::new();
        WlString::new("hello").unwrap().encode_into(&mut buf);

        assert_eq!(buf.len(), 12);
        assert_eq!(&buf[..4], &6u32.to_ne_bytes());
        assert_eq!(&buf[4..9], b"hello");
        assert_eq!(&buf[9..], &[0, 0, 0]);
    }

    #[test]
    fn aligned_content_still_gets_a_terminator_word() {
        let mut buf = Vec::new();
        WlString::new("abcd").unwrap().encode_into(&mut buf);
        assert_eq!(buf.len(), 12);
        assert_eq!(&buf[8..], &[0, 0, 0, 0]);
    }

    #[test]
    fn rejects_embedded_nul() {
        assert!(WlString::new("bad\0title").is_err());
    }

    #[test]
    fn decode_ignores_padding_content() {
        let mut buf = 3u32.to_ne_bytes().to_vec();
        buf.extend_from_slice(&[b'o', b'k', 0, 0xAA]);
        let (s, consumed) = WlString::decode_nullable(&buf).unwrap();
        assert_eq!(s.unwrap().as_str(), "ok");
        assert_eq!(consumed, 8);
    }

    #[test]
    fn zero_length_is_null() {
        let (s, consumed) = WlString::decode_nullable(&0u32.to_ne_bytes()).unwrap();
        assert!(s.is_none());
        assert_eq!(consumed, 4);
    }

    #[test]
    fn truncated_string_is_a_codec_error() {
        let mut buf = 9u32.to_ne_bytes().to_vec();
        buf.extend_from_slice(b"short");
        assert!(matches!(
            WlString::decode_nullable(&buf),
            Err(Error::Codec(_))
        ));
    }

    #[test]
    fn missing_terminator_is_a_codec_error() {
        let mut buf = 4u32.to_ne_bytes().to_vec();
        buf.extend_from_slice(b"abcd");
        assert!(WlString::decode_nullable(&buf).is_err());
    }
}
