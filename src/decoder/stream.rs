// src/decoder/stream.rs

//! Byte-stream facade over the block reader.
//!
//! Buffers one decoded block at a time and exposes plaintext through
//! `std::io::Read` plus a forward-only [`skip`](EncfsInputStream::skip).
//! Positions handed to the consumer have nothing to do with cipher-block
//! boundaries; the cursor tracks where inside the buffered block the next
//! unread byte lives.

use std::io::Read;

use tracing::debug;

use crate::decoder::block::BlockReader;
use crate::error::EncfsError;
use crate::volume::Volume;

/// Sequential plaintext reader for one file on an EncFS volume.
///
/// Not safe for concurrent use; open one stream per reader. Dropping the
/// stream releases the underlying byte source.
pub struct EncfsInputStream<'v, R> {
    blocks: BlockReader<'v, R>,
    volume: &'v Volume,
    /// Currently decoded plaintext block, MAC + random header included.
    plain_buf: Vec<u8>,
    /// Offset into `plain_buf` of the next unread plaintext byte.
    cursor: usize,
}

impl<'v, R: Read> EncfsInputStream<'v, R> {
    /// Open a decrypted stream over the raw (encrypted) contents of a file.
    ///
    /// Consumes the 8-byte file header immediately when the volume uses
    /// unique IVs.
    ///
    /// # Errors
    ///
    /// [`EncfsError::CorruptHeader`] when the header is truncated or fails to
    /// decode; [`EncfsError::Io`] when the provider does.
    pub fn new(volume: &'v Volume, source: R) -> Result<Self, EncfsError> {
        let config = volume.config();
        debug!(
            block_size = config.block_size,
            unique_iv = config.unique_iv,
            mac_bytes = config.block_mac_bytes,
            rand_bytes = config.block_mac_rand_bytes,
            "opening encrypted stream"
        );

        Ok(EncfsInputStream {
            blocks: BlockReader::new(volume, source)?,
            volume,
            plain_buf: Vec::new(),
            cursor: 0,
        })
    }

    /// Ensure at least one unread plaintext byte is buffered.
    ///
    /// Returns `false` at end of stream. Blocks whose payload is empty (a
    /// tail no longer than the block header) are consumed transparently.
    fn fill(&mut self) -> Result<bool, EncfsError> {
        while self.cursor >= self.plain_buf.len() {
            match self.blocks.read_block()? {
                Some(plain) => {
                    // First plaintext byte lies past the MAC + random header.
                    self.cursor = self.volume.config().block_header_size().min(plain.len());
                    self.plain_buf = plain;
                }
                None => return Ok(false),
            }
        }
        Ok(true)
    }

    /// Skip forward `n` plaintext bytes.
    ///
    /// Returns the number of bytes actually skipped, which is less than `n`
    /// only when EOF intervenes (and `0` when the stream is already at EOF).
    /// Whole buffered blocks are skipped by cursor arithmetic; no plaintext
    /// is copied.
    pub fn skip(&mut self, n: u64) -> Result<u64, EncfsError> {
        let mut skipped = 0u64;
        while skipped < n {
            if !self.fill()? {
                break;
            }
            let available = (self.plain_buf.len() - self.cursor) as u64;
            let step = available.min(n - skipped);
            self.cursor += step as usize;
            skipped += step;
        }
        Ok(skipped)
    }

    /// Release the stream and hand back the underlying byte source.
    pub fn into_inner(self) -> R {
        self.blocks.into_source()
    }
}

impl<R: Read> Read for EncfsInputStream<'_, R> {
    /// Fill `buf` with decrypted plaintext.
    ///
    /// Returns `Ok(0)` only at end of stream (for a non-empty `buf`); a
    /// mid-stream read always produces at least one byte, and a short count
    /// means EOF was hit inside this request.
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let mut written = 0;
        while written < buf.len() {
            match self.fill() {
                Ok(true) => {}
                Ok(false) => break,
                Err(e) => return Err(e.into()),
            }
            let available = &self.plain_buf[self.cursor..];
            let n = available.len().min(buf.len() - written);
            buf[written..written + n].copy_from_slice(&available[..n]);
            self.cursor += n;
            written += n;
        }
        Ok(written)
    }
}
