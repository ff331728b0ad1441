// src/crypto/iv.rs

//! IV derivation.
//!
//! Every cipher invocation is parameterised by an 8-byte IV seed. The actual
//! 16-byte cipher IV mixes that seed into the volume's IV base; per-block
//! seeds fold the block index into the per-file IV.

use crate::consts::{CIPHER_IV_SIZE, FILE_HEADER_SIZE, MAC_BYTES};
use crate::crypto::mac::mac64;
use crate::keys::VolumeKeys;

/// Zero IV seed, used to decode the file header itself (the outer file-level
/// IV chain is disabled for file contents).
pub const ZERO_IV: [u8; FILE_HEADER_SIZE] = [0u8; FILE_HEADER_SIZE];

/// Build the 16-byte cipher IV for an 8-byte seed: the volume IV base XORed
/// with the seed repeated out to cipher IV width.
#[inline(always)]
pub fn build_iv(keys: &VolumeKeys, seed: &[u8; FILE_HEADER_SIZE]) -> [u8; CIPHER_IV_SIZE] {
    let mut iv = *keys.iv_seed();
    for (i, byte) in iv.iter_mut().enumerate() {
        *byte ^= seed[i % FILE_HEADER_SIZE];
    }
    iv
}

/// Per-block IV seed: the file IV interpreted as a big-endian integer, XORed
/// with the block index.
#[inline(always)]
pub fn block_iv(file_iv: &[u8; FILE_HEADER_SIZE], block_index: u64) -> [u8; FILE_HEADER_SIZE] {
    (u64::from_be_bytes(*file_iv) ^ block_index).to_be_bytes()
}

/// The two cipher IVs used by one dual-pass stream decode: the first built
/// straight from `seed`, the second from the [`mac64`] fold of the seed bytes
/// under the MAC key.
#[inline(always)]
pub fn stream_iv_pair(
    keys: &VolumeKeys,
    seed: &[u8; FILE_HEADER_SIZE],
) -> ([u8; CIPHER_IV_SIZE], [u8; CIPHER_IV_SIZE]) {
    let second_seed: [u8; MAC_BYTES] = mac64(keys.mac_key(), seed);
    (build_iv(keys, seed), build_iv(keys, &second_seed))
}
