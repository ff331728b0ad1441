// src/crypto/mac.rs

//! HMAC-SHA1 folded to 64 bits.
//!
//! EncFS authenticates block payloads with HMAC-SHA1 reduced to 8 bytes by
//! XOR-folding the 20-byte digest. The same fold also derives the second-pass
//! IV seed for the stream cipher.

use hmac::{Hmac, Mac};
use sha1::Sha1;

use crate::consts::MAC_BYTES;

/// HMAC-SHA1, the MAC primitive underneath [`mac64`].
pub type HmacSha1 = Hmac<Sha1>;

/// Compute HMAC-SHA1 over `data` under `mac_key` and fold the 20-byte digest
/// down to 8: digest byte `i` is XORed into `out[i % 8]`, so the final four
/// digest bytes land in the first half of the result.
///
/// Block MAC headers are compared byte-reversed against this value: stored
/// byte `i` must equal `mac64(payload)[7 - i]`.
pub fn mac64(mac_key: &[u8], data: &[u8]) -> [u8; MAC_BYTES] {
    let mut mac = <HmacSha1 as Mac>::new_from_slice(mac_key)
        .expect("HMAC-SHA1 accepts keys of any length");
    mac.update(data);
    let digest = mac.finalize().into_bytes();

    let mut folded = [0u8; MAC_BYTES];
    for (i, byte) in digest.iter().enumerate() {
        folded[i % MAC_BYTES] ^= byte;
    }
    folded
}
