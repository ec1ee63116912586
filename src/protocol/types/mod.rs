pub mod argument;
pub mod wlarray;
pub mod wlstring;

pub use argument::{ArgKind, Argument, Arguments};
pub use wlarray::WlArray;
pub use wlstring::WlString;

use crate::error::{Error, Result};

/// Every fixed-size argument and every length prefix is one 32-bit word.
pub const WL_WORD_LEN: usize = size_of::<u32>();

/// Rounds a size up to the nearest multiple of 4 for 32-bit alignment.
///
/// ```text
/// roundup_4(5) == 8, roundup_4(8) == 8, roundup_4(9) == 12
/// ```
pub(crate) fn roundup_4(number: usize) -> usize {
    (number + 3) & !3
}

/// Reads the native-endian word at the start of `buf`.
pub(crate) fn read_word(buf: &[u8], what: &str) -> Result<u32> {
    let word: [u8; WL_WORD_LEN] = buf
        .get(..WL_WORD_LEN)
        .and_then(|bytes| bytes.try_into().ok())
        .ok_or_else(|| {
            Error::codec(format!(
                "{what} needs {WL_WORD_LEN} bytes, only {} left",
                buf.len()
            ))
        })?;
    Ok(u32::from_ne_bytes(word))
}
