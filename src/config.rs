// src/config.rs

//! Volume configuration.
//!
//! `VolumeConfig` is the flat, immutable record of parameters an EncFS volume
//! is created with (normally read out of `.encfs6.xml` by a layer above this
//! crate). The decoder treats it as read-only for the lifetime of the volume.

use crate::consts::{CIPHER_BLOCK_SIZE, DEFAULT_BLOCK_SIZE, MAC_BYTES};
use crate::error::EncfsError;

/// Immutable parameters of an EncFS volume.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeConfig {
    /// Bytes per ciphertext block. Must be a positive multiple of the cipher
    /// block width.
    pub block_size: usize,

    /// Whether each file carries an 8-byte encrypted header used to derive a
    /// per-file IV. Without it, the file IV is all zero.
    pub unique_iv: bool,

    /// Number of MAC bytes prepended to each block's plaintext (0 or 8).
    pub block_mac_bytes: usize,

    /// Number of random bytes following the MAC in each block's plaintext.
    /// Discarded after MAC verification.
    pub block_mac_rand_bytes: usize,

    /// Whether all-zero ciphertext blocks are treated as sparse holes and
    /// decoded as all-zero plaintext without running the cipher.
    pub holes_allowed: bool,

    /// External IV chaining for file data. Volumes enabling this are rejected
    /// by [`validate`](VolumeConfig::validate) rather than decoded wrongly.
    pub external_iv_chaining: bool,
}

impl Default for VolumeConfig {
    /// The stock EncFS "standard" geometry: 1024-byte blocks, per-file IVs,
    /// no block MACs, holes allowed.
    fn default() -> Self {
        VolumeConfig {
            block_size: DEFAULT_BLOCK_SIZE,
            unique_iv: true,
            block_mac_bytes: 0,
            block_mac_rand_bytes: 0,
            holes_allowed: true,
            external_iv_chaining: false,
        }
    }
}

impl VolumeConfig {
    /// Bytes of each decoded block taken up by the MAC + random header.
    #[inline(always)]
    pub fn block_header_size(&self) -> usize {
        self.block_mac_bytes + self.block_mac_rand_bytes
    }

    /// Check that this configuration describes a volume the decoder can
    /// actually read.
    ///
    /// # Errors
    ///
    /// - [`EncfsError::UnsupportedConfig`] for external IV chaining on file
    ///   data or a MAC width other than 0/8.
    /// - [`EncfsError::InvalidArgument`] for block geometry that is not a
    ///   positive multiple of the cipher width or cannot hold its own header.
    pub fn validate(&self) -> Result<(), EncfsError> {
        if self.external_iv_chaining {
            return Err(EncfsError::UnsupportedConfig(
                "external IV chaining for file data is not implemented".into(),
            ));
        }
        if self.block_mac_bytes != 0 && self.block_mac_bytes != MAC_BYTES {
            return Err(EncfsError::UnsupportedConfig(format!(
                "blockMACBytes must be 0 or {MAC_BYTES}, got {}",
                self.block_mac_bytes
            )));
        }
        if self.block_size == 0 || self.block_size % CIPHER_BLOCK_SIZE != 0 {
            return Err(EncfsError::InvalidArgument(format!(
                "block size {} is not a positive multiple of {CIPHER_BLOCK_SIZE}",
                self.block_size
            )));
        }
        if self.block_header_size() >= self.block_size {
            return Err(EncfsError::InvalidArgument(format!(
                "block header ({} bytes) leaves no payload in a {}-byte block",
                self.block_header_size(),
                self.block_size
            )));
        }
        Ok(())
    }
}
