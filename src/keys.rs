// src/keys.rs

//! Volume key material.
//!
//! Derived from the password and salt when the volume is opened (derivation
//! itself lives above this crate). Bound read-only to the volume for its
//! lifetime and wiped on drop.

use zeroize::{Zeroize, ZeroizeOnDrop};

/// Key material for one volume: cipher key, IV seed and MAC key.
///
/// Shared read-only by every stream opened on the volume; all three buffers
/// are zeroized when the keys are dropped.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct VolumeKeys {
    cipher_key: [u8; 32],
    iv_seed: [u8; 16],
    mac_key: Vec<u8>,
}

impl VolumeKeys {
    /// Bind derived key material to a volume.
    pub fn new(cipher_key: [u8; 32], iv_seed: [u8; 16], mac_key: Vec<u8>) -> Self {
        VolumeKeys {
            cipher_key,
            iv_seed,
            mac_key,
        }
    }

    /// AES-256 key for both the block (CBC) and stream (CFB) modes.
    #[inline(always)]
    pub fn cipher_key(&self) -> &[u8; 32] {
        &self.cipher_key
    }

    /// 16-byte IV base mixed with every per-file / per-block IV seed.
    #[inline(always)]
    pub fn iv_seed(&self) -> &[u8; 16] {
        &self.iv_seed
    }

    /// HMAC-SHA1 key for block MACs and stream-mode IV derivation.
    #[inline(always)]
    pub fn mac_key(&self) -> &[u8] {
        &self.mac_key
    }
}

// Key material never appears in logs or panic messages.
impl core::fmt::Debug for VolumeKeys {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("VolumeKeys { .. }")
    }
}
