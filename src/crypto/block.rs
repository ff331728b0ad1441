// src/crypto/block.rs

//! CBC block codec.
//!
//! Full volume blocks are AES-256-CBC without padding: a block is always a
//! whole multiple of the cipher width, so CBC is composed directly from the
//! block cipher plus the previous-ciphertext XOR.

use aes::cipher::{BlockDecrypt, BlockEncrypt, KeyInit};
use aes::{Aes256Dec, Aes256Enc, Block as AesBlock};

use crate::consts::{CIPHER_BLOCK_SIZE, FILE_HEADER_SIZE};
use crate::crypto::iv::build_iv;
use crate::error::EncfsError;
use crate::keys::VolumeKeys;

/// XOR two cipher-width slices into `out`.
#[inline(always)]
fn xor_into(out: &mut [u8], lhs: &[u8], rhs: &[u8]) {
    for (dst, (a, b)) in out.iter_mut().zip(lhs.iter().zip(rhs)) {
        *dst = a ^ b;
    }
}

/// Full blocks are exactly one volume block, nothing shorter or longer.
fn check_block_len(len: usize, block_size: usize) -> Result<(), EncfsError> {
    if len != block_size {
        return Err(EncfsError::CorruptBlock(format!(
            "length {len} does not fill a {block_size}-byte block"
        )));
    }
    if len == 0 || len % CIPHER_BLOCK_SIZE != 0 {
        return Err(EncfsError::CorruptBlock(format!(
            "length {len} is not a positive multiple of {CIPHER_BLOCK_SIZE}"
        )));
    }
    Ok(())
}

/// Decrypt one full volume block in CBC mode under the IV built from `seed`.
///
/// # Errors
///
/// [`EncfsError::CorruptBlock`] when `cipher_text` is anything other than
/// exactly `block_size` bytes, a positive multiple of the cipher width. Data
/// corruption, not a programmer error: block geometry is validated up front,
/// so a mis-sized ciphertext means the file itself is bad.
pub fn block_decode(
    keys: &VolumeKeys,
    seed: &[u8; FILE_HEADER_SIZE],
    cipher_text: &[u8],
    block_size: usize,
) -> Result<Vec<u8>, EncfsError> {
    check_block_len(cipher_text.len(), block_size)?;

    let cipher = Aes256Dec::new(keys.cipher_key().into());
    let mut prev: [u8; CIPHER_BLOCK_SIZE] = build_iv(keys, seed);
    let mut plain = vec![0u8; cipher_text.len()];

    for (i, chunk) in cipher_text.chunks_exact(CIPHER_BLOCK_SIZE).enumerate() {
        let mut block = *AesBlock::from_slice(chunk);
        cipher.decrypt_block(&mut block);
        xor_into(
            &mut plain[i * CIPHER_BLOCK_SIZE..(i + 1) * CIPHER_BLOCK_SIZE],
            block.as_slice(),
            &prev,
        );
        prev.copy_from_slice(chunk);
    }

    Ok(plain)
}

/// Encrypt one full volume block in CBC mode under the IV built from `seed`.
/// Exact inverse of [`block_decode`].
pub fn block_encode(
    keys: &VolumeKeys,
    seed: &[u8; FILE_HEADER_SIZE],
    plain_text: &[u8],
    block_size: usize,
) -> Result<Vec<u8>, EncfsError> {
    check_block_len(plain_text.len(), block_size)?;

    let cipher = Aes256Enc::new(keys.cipher_key().into());
    let mut prev: [u8; CIPHER_BLOCK_SIZE] = build_iv(keys, seed);
    let mut cipher_text = vec![0u8; plain_text.len()];

    for (i, chunk) in plain_text.chunks_exact(CIPHER_BLOCK_SIZE).enumerate() {
        let mut xored = [0u8; CIPHER_BLOCK_SIZE];
        xor_into(&mut xored, chunk, &prev);

        let mut block = AesBlock::from(xored);
        cipher.encrypt_block(&mut block);

        prev.copy_from_slice(block.as_slice());
        cipher_text[i * CIPHER_BLOCK_SIZE..(i + 1) * CIPHER_BLOCK_SIZE]
            .copy_from_slice(block.as_slice());
    }

    Ok(cipher_text)
}
