// src/decoder/read.rs

//! Raw-read helpers over the provider byte source.

use std::io::{ErrorKind, Read};

use crate::consts::FILE_HEADER_SIZE;
use crate::error::EncfsError;

/// Fill `buf` from `source`, looping across partial reads.
///
/// Returns the number of bytes placed in `buf`; anything short of
/// `buf.len()` means the source hit EOF.
pub(crate) fn read_full<R: Read>(source: &mut R, buf: &mut [u8]) -> Result<usize, EncfsError> {
    let mut filled = 0;
    while filled < buf.len() {
        match source.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(filled)
}

/// Read the 8-byte encrypted file header.
pub(crate) fn read_file_header<R: Read>(
    source: &mut R,
) -> Result<[u8; FILE_HEADER_SIZE], EncfsError> {
    let mut header = [0u8; FILE_HEADER_SIZE];
    let n = read_full(source, &mut header)?;
    if n != FILE_HEADER_SIZE {
        return Err(EncfsError::CorruptHeader(format!(
            "file header truncated: {n} of {FILE_HEADER_SIZE} bytes"
        )));
    }
    Ok(header)
}
