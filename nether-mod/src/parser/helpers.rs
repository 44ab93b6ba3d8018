//! Helper functions for reading binary data

use std::io::{Cursor, Read};

use crate::error::ModError;

/// Read a single byte
pub(crate) fn read_u8(cursor: &mut Cursor<&[u8]>) -> Result<u8, ModError> {
    let mut buf = [0u8; 1];
    cursor
        .read_exact(&mut buf)
        .map_err(|_| ModError::UnexpectedEof)?;
    Ok(buf[0])
}

/// Read a 16-bit big-endian integer
pub(crate) fn read_u16_be(cursor: &mut Cursor<&[u8]>) -> Result<u16, ModError> {
    let mut buf = [0u8; 2];
    cursor
        .read_exact(&mut buf)
        .map_err(|_| ModError::UnexpectedEof)?;
    Ok(u16::from_be_bytes(buf))
}

/// Read a fixed number of bytes
pub(crate) fn read_array<const N: usize>(cursor: &mut Cursor<&[u8]>) -> Result<[u8; N], ModError> {
    let mut buf = [0u8; N];
    cursor
        .read_exact(&mut buf)
        .map_err(|_| ModError::UnexpectedEof)?;
    Ok(buf)
}

/// Bytes from the current position without consuming them (may be short near the end)
pub(crate) fn peek<'a>(cursor: &Cursor<&'a [u8]>, len: usize) -> &'a [u8] {
    let data = *cursor.get_ref();
    let start = (cursor.position() as usize).min(data.len());
    let end = start.saturating_add(len).min(data.len());
    &data[start..end]
}

/// Read up to `len` bytes, returning fewer only at the end of the data
pub(crate) fn read_up_to<'a>(cursor: &mut Cursor<&'a [u8]>, len: usize) -> &'a [u8] {
    let bytes = peek(cursor, len);
    cursor.set_position(cursor.position() + bytes.len() as u64);
    bytes
}

/// Move forward, stopping at the end of the data
pub(crate) fn skip(cursor: &mut Cursor<&[u8]>, len: usize) {
    let length = cursor.get_ref().len() as u64;
    cursor.set_position(cursor.position().saturating_add(len as u64).min(length));
}

/// Read a null-terminated or fixed-length string
pub(crate) fn read_string(bytes: &[u8]) -> String {
    // Find null terminator or end of slice
    let len = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    // Trim trailing spaces and convert
    String::from_utf8_lossy(&bytes[..len])
        .trim_end()
        .to_string()
}
