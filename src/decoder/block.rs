// src/decoder/block.rs

//! The block reader: the per-file decryption state machine.
//!
//! Pulls one ciphertext block at a time from the raw byte source, classifies
//! it (full CBC block, final stream block, sparse hole), decodes it and
//! verifies its MAC header. Block indices increase strictly monotonically;
//! there is no way back.

use std::io::Read;

use subtle::ConstantTimeEq;
use tracing::{debug, trace};

use crate::consts::MAC_BYTES;
use crate::crypto::block::block_decode;
use crate::crypto::iv::{block_iv, ZERO_IV};
use crate::crypto::mac::mac64;
use crate::crypto::stream::stream_decode;
use crate::decoder::read::{read_file_header, read_full};
use crate::error::EncfsError;
use crate::volume::Volume;

pub(crate) struct BlockReader<'v, R> {
    volume: &'v Volume,
    source: R,
    /// Per-file IV; zero when the volume does not use unique IVs.
    file_iv: [u8; 8],
    /// Ciphertext blocks consumed so far.
    block_index: u64,
    eof: bool,
}

impl<'v, R: Read> BlockReader<'v, R> {
    /// Open a block reader over a raw byte source, recovering the file IV
    /// from the encrypted header when the volume uses unique IVs.
    ///
    /// In non-unique-IV mode the source is not touched at all here: the first
    /// ciphertext block starts at byte 0.
    pub(crate) fn new(volume: &'v Volume, mut source: R) -> Result<Self, EncfsError> {
        let file_iv = if volume.config().unique_iv {
            let header = read_file_header(&mut source)?;
            let decoded = stream_decode(volume.keys(), &ZERO_IV, &header)?;
            let mut iv = [0u8; 8];
            iv.copy_from_slice(&decoded);
            iv
        } else {
            [0u8; 8]
        };

        Ok(BlockReader {
            volume,
            source,
            file_iv,
            block_index: 0,
            eof: false,
        })
    }

    /// Read and decode the next block.
    ///
    /// Returns the full decoded plaintext (MAC + random header included) or
    /// `None` at end of stream. A short provider fill is always the final
    /// block; the source is never read again after one.
    pub(crate) fn read_block(&mut self) -> Result<Option<Vec<u8>>, EncfsError> {
        if self.eof {
            return Ok(None);
        }

        let config = self.volume.config();
        let keys = self.volume.keys();

        let mut cipher_buf = vec![0u8; config.block_size];
        let n = read_full(&mut self.source, &mut cipher_buf)?;
        if n < config.block_size {
            self.eof = true;
        }
        if n == 0 {
            debug!(blocks = self.block_index, "end of stream");
            return Ok(None);
        }

        let seed = block_iv(&self.file_iv, self.block_index);
        let (plain, hole) = if n == config.block_size {
            if config.holes_allowed && cipher_buf.iter().all(|&byte| byte == 0) {
                trace!(block = self.block_index, "sparse hole block");
                // All-zero plaintext without running the cipher; the MAC
                // header is zero too, so verification is skipped outright.
                (cipher_buf, true)
            } else {
                trace!(block = self.block_index, "full block");
                (block_decode(keys, &seed, &cipher_buf, config.block_size)?, false)
            }
        } else {
            trace!(block = self.block_index, len = n, "final stream block");
            (stream_decode(keys, &seed, &cipher_buf[..n])?, false)
        };

        if !hole && config.block_mac_bytes > 0 && plain.len() >= config.block_header_size() {
            self.verify_mac(&plain)?;
        }

        self.block_index += 1;
        Ok(Some(plain))
    }

    /// Compare the stored MAC header against the MAC of the payload. Stored
    /// byte `i` carries folded-MAC byte `7 - i`.
    fn verify_mac(&self, plain: &[u8]) -> Result<(), EncfsError> {
        let config = self.volume.config();
        let expected = mac64(
            self.volume.keys().mac_key(),
            &plain[config.block_header_size()..],
        );

        let mut reversed = [0u8; MAC_BYTES];
        for (i, byte) in reversed.iter_mut().enumerate() {
            *byte = expected[MAC_BYTES - 1 - i];
        }

        let stored = &plain[..config.block_mac_bytes];
        if !bool::from(stored.ct_eq(&reversed[..config.block_mac_bytes])) {
            return Err(EncfsError::BlockMacMismatch {
                block: self.block_index,
            });
        }
        Ok(())
    }

    pub(crate) fn into_source(self) -> R {
        self.source
    }
}
