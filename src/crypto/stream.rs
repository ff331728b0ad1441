// src/crypto/stream.rs

//! Dual-pass CFB stream codec.
//!
//! The final short block of a file (and the 8-byte file header) is decoded
//! with AES-256-CFB run twice: once under the IV built from the given seed,
//! once under the IV built from the seed's `mac64` fold, with a full byte
//! reversal between and after the passes. The reversal makes a single-byte
//! change propagate through the whole short block, which plain CFB would not.

use aes::cipher::{AsyncStreamCipher, KeyIvInit};
use aes::Aes256;
use cfb_mode::{Decryptor, Encryptor};

use crate::consts::FILE_HEADER_SIZE;
use crate::crypto::iv::stream_iv_pair;
use crate::error::EncfsError;
use crate::keys::VolumeKeys;

type Aes256CfbEnc = Encryptor<Aes256>;
type Aes256CfbDec = Decryptor<Aes256>;

/// Decode a stream-mode block of 1..=blockSize bytes.
///
/// Passes: CFB-decrypt under the first IV, byte-reverse, CFB-decrypt under
/// the derived second IV, byte-reverse.
///
/// # Errors
///
/// [`EncfsError::CorruptBlock`] on an empty input; stream blocks are never
/// empty on disk.
pub fn stream_decode(
    keys: &VolumeKeys,
    seed: &[u8; FILE_HEADER_SIZE],
    cipher_text: &[u8],
) -> Result<Vec<u8>, EncfsError> {
    if cipher_text.is_empty() {
        return Err(EncfsError::CorruptBlock("empty stream block".into()));
    }

    let (first_iv, second_iv) = stream_iv_pair(keys, seed);
    let mut buf = cipher_text.to_vec();

    Aes256CfbDec::new(keys.cipher_key().into(), (&first_iv).into()).decrypt(&mut buf);
    buf.reverse();
    Aes256CfbDec::new(keys.cipher_key().into(), (&second_iv).into()).decrypt(&mut buf);
    buf.reverse();

    Ok(buf)
}

/// Encode a stream-mode block. Exact inverse of [`stream_decode`]: the same
/// passes in the opposite order, encrypting instead of decrypting.
pub fn stream_encode(
    keys: &VolumeKeys,
    seed: &[u8; FILE_HEADER_SIZE],
    plain_text: &[u8],
) -> Result<Vec<u8>, EncfsError> {
    if plain_text.is_empty() {
        return Err(EncfsError::CorruptBlock("empty stream block".into()));
    }

    let (first_iv, second_iv) = stream_iv_pair(keys, seed);
    let mut buf = plain_text.to_vec();

    buf.reverse();
    Aes256CfbEnc::new(keys.cipher_key().into(), (&second_iv).into()).encrypt(&mut buf);
    buf.reverse();
    Aes256CfbEnc::new(keys.cipher_key().into(), (&first_iv).into()).encrypt(&mut buf);

    Ok(buf)
}
