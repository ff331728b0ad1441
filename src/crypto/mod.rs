// src/crypto/mod.rs

//! Low-level crypto primitives.
//!
//! Pure functions over key material + IV + bytes: the CBC block codec, the
//! dual-pass CFB stream codec, the folded HMAC-SHA1 MAC and IV derivation.
//! Nothing in here touches I/O or stream state.

pub mod block;
pub mod iv;
pub mod mac;
pub mod stream;
