//! tests/common.rs
//! Shared fixtures: deterministic volume keys, config presets and an
//! in-memory encoder that assembles encrypted files for the decoder to read.

use encfs_rs::crypto::block::block_encode;
use encfs_rs::crypto::iv::{block_iv, ZERO_IV};
use encfs_rs::crypto::mac::mac64;
use encfs_rs::crypto::stream::stream_encode;
use encfs_rs::{Volume, VolumeConfig, VolumeKeys};
use std::io::Read;

/// Canonical single-block plaintext.
#[allow(dead_code)] // Used across multiple test files
pub const TEST_TEXT: &[u8] = b"This is a test file.\n";

/// Plaintext for the non-unique-IV cases.
#[allow(dead_code)]
pub const TEST_TEXT_PLAIN_IV: &[u8] = b"Test file for non-unique-IV file.\n";

/// Small block size so multi-block behaviour shows up with tiny fixtures.
#[allow(dead_code)]
pub const SMALL_BLOCK: usize = 64;

/// Fixed, arbitrary key material; password-based derivation is out of scope.
#[allow(dead_code)]
pub fn test_keys() -> VolumeKeys {
    let mut cipher_key = [0u8; 32];
    for (i, byte) in cipher_key.iter_mut().enumerate() {
        *byte = (i as u8).wrapping_mul(7).wrapping_add(3);
    }
    let mut iv_seed = [0u8; 16];
    for (i, byte) in iv_seed.iter_mut().enumerate() {
        *byte = (i as u8).wrapping_mul(13).wrapping_add(11);
    }
    let mac_key: Vec<u8> = (0..20u8).map(|i| i.wrapping_mul(29).wrapping_add(5)).collect();
    VolumeKeys::new(cipher_key, iv_seed, mac_key)
}

/// Unique IVs, no MAC headers, holes allowed — the stock geometry, shrunk.
#[allow(dead_code)]
pub fn standard_config() -> VolumeConfig {
    VolumeConfig {
        block_size: SMALL_BLOCK,
        unique_iv: true,
        block_mac_bytes: 0,
        block_mac_rand_bytes: 0,
        holes_allowed: true,
        external_iv_chaining: false,
    }
}

/// Standard geometry plus 8-byte block MACs.
#[allow(dead_code)]
pub fn mac_config() -> VolumeConfig {
    VolumeConfig {
        block_mac_bytes: 8,
        ..standard_config()
    }
}

/// MACs plus random header padding.
#[allow(dead_code)]
pub fn padded_mac_config() -> VolumeConfig {
    VolumeConfig {
        block_mac_bytes: 8,
        block_mac_rand_bytes: 4,
        ..standard_config()
    }
}

/// No per-file header at all.
#[allow(dead_code)]
pub fn plain_iv_config() -> VolumeConfig {
    VolumeConfig {
        unique_iv: false,
        ..mac_config()
    }
}

#[allow(dead_code)]
pub fn volume(config: VolumeConfig) -> Volume {
    Volume::new(config, test_keys()).expect("test config is valid")
}

/// Encode one block: MAC + random header + payload, CBC for a full block,
/// stream mode for a short tail.
#[allow(dead_code)]
pub fn encode_block(volume: &Volume, file_iv: &[u8; 8], index: u64, payload: &[u8]) -> Vec<u8> {
    let config = volume.config();
    let keys = volume.keys();

    let mut plain = Vec::with_capacity(config.block_header_size() + payload.len());
    plain.resize(config.block_mac_bytes, 0);
    for i in 0..config.block_mac_rand_bytes {
        // Deterministic stand-ins for the random filler; discarded on decode.
        plain.push((index as u8).wrapping_mul(31).wrapping_add(i as u8 + 1));
    }
    plain.extend_from_slice(payload);

    if config.block_mac_bytes > 0 {
        let tag = mac64(keys.mac_key(), payload);
        for i in 0..config.block_mac_bytes {
            plain[i] = tag[7 - i];
        }
    }

    let seed = block_iv(file_iv, index);
    if plain.len() == config.block_size {
        block_encode(keys, &seed, &plain, config.block_size).expect("full block encodes")
    } else {
        stream_encode(keys, &seed, &plain).expect("tail block encodes")
    }
}

/// Assemble a complete encrypted file: optional encrypted header carrying
/// `file_iv`, then one block per payload-sized plaintext chunk.
#[allow(dead_code)]
pub fn encrypt_file(volume: &Volume, file_iv: [u8; 8], plaintext: &[u8]) -> Vec<u8> {
    let config = volume.config();
    let keys = volume.keys();

    let mut out = Vec::new();
    if config.unique_iv {
        out.extend(stream_encode(keys, &ZERO_IV, &file_iv).expect("header encodes"));
    }

    let payload_len = config.block_size - config.block_header_size();
    for (index, chunk) in plaintext.chunks(payload_len).enumerate() {
        out.extend(encode_block(volume, &file_iv, index as u64, chunk));
    }
    out
}

/// Decode a whole in-memory file.
#[allow(dead_code)]
pub fn decrypt_all(volume: &Volume, cipher_text: &[u8]) -> Vec<u8> {
    let mut stream = volume
        .decode_stream(std::io::Cursor::new(cipher_text.to_vec()))
        .expect("stream opens");
    let mut plain = Vec::new();
    stream.read_to_end(&mut plain).expect("stream decodes");
    plain
}

/// Reader that returns at most `max` bytes per call — simulates a provider
/// that fills requests in fragments.
#[allow(dead_code)]
pub struct Chunked<R> {
    inner: R,
    max: usize,
}

#[allow(dead_code)]
impl<R> Chunked<R> {
    pub fn new(inner: R, max: usize) -> Self {
        Chunked { inner, max }
    }
}

impl<R: Read> Read for Chunked<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let len = buf.len().min(self.max);
        self.inner.read(&mut buf[..len])
    }
}

/// Reader that counts every byte handed out.
#[allow(dead_code)]
pub struct Counting<R> {
    inner: R,
    pub consumed: u64,
}

#[allow(dead_code)]
impl<R> Counting<R> {
    pub fn new(inner: R) -> Self {
        Counting { inner, consumed: 0 }
    }
}

impl<R: Read> Read for Counting<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.consumed += n as u64;
        Ok(n)
    }
}
