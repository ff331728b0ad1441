// src/consts.rs

/// Size of the encrypted per-file header that carries the file IV seed.
pub const FILE_HEADER_SIZE: usize = 8;

/// Width of a folded block MAC.
pub const MAC_BYTES: usize = 8;

/// AES block width. Volume blocks are always a whole multiple of this.
pub const CIPHER_BLOCK_SIZE: usize = 16;

/// AES-CBC / AES-CFB initialisation vector width.
pub const CIPHER_IV_SIZE: usize = 16;

/// Block size EncFS volumes ship with unless configured otherwise.
pub const DEFAULT_BLOCK_SIZE: usize = 1024;
