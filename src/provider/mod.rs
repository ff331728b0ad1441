// src/provider/mod.rs

//! The file-provider boundary.
//!
//! The decoder depends on a narrow contract for raw ciphertext bytes and
//! metadata; any backing store that satisfies it plugs in, be it local disk,
//! an object store or plain memory. The read path itself uses only `open_input`
//! and `file_info`; the management operations exist for the layers above.

use std::io::{Read, Write};
use std::time::SystemTime;

use crate::error::EncfsError;

pub mod local;
pub mod memory;

pub use local::LocalFileProvider;
pub use memory::MemoryProvider;

/// Metadata for one file or directory under a provider root.
///
/// `parent_path` encoding is provider-defined; `name`, `is_dir`, `size` and
/// `mtime` are faithful everywhere.
#[derive(Debug, Clone)]
pub struct FileInfo {
    pub name: String,
    pub parent_path: String,
    pub is_dir: bool,
    pub mtime: SystemTime,
    pub size: u64,
    pub can_read: bool,
    pub can_write: bool,
    pub can_execute: bool,
}

/// Byte storage underneath a volume.
///
/// All paths are relative to the provider's root. Errors surface as
/// [`EncfsError::Io`] and abort whatever stream or operation raised them.
pub trait FileProvider {
    /// Sequential byte source returned by [`open_input`](Self::open_input).
    type Source: Read;
    /// Byte sink returned by [`open_output`](Self::open_output).
    type Sink: Write;

    /// Open a sequential source over a file's raw bytes.
    fn open_input(&self, path: &str) -> Result<Self::Source, EncfsError>;

    /// Open a sink over a file, creating it if needed. `expected_len` is the
    /// length the caller intends to write; providers may use it to
    /// preallocate and are free to ignore it.
    fn open_output(&self, path: &str, expected_len: u64) -> Result<Self::Sink, EncfsError>;

    fn file_info(&self, path: &str) -> Result<FileInfo, EncfsError>;

    fn list_children(&self, path: &str) -> Result<Vec<FileInfo>, EncfsError>;

    fn exists(&self, path: &str) -> Result<bool, EncfsError>;

    fn is_directory(&self, path: &str) -> Result<bool, EncfsError>;

    /// Create an empty file. Fails if the path already exists.
    fn create_file(&self, path: &str) -> Result<FileInfo, EncfsError>;

    /// Move a file or directory. The source must exist.
    fn rename(&self, src: &str, dst: &str) -> Result<(), EncfsError>;

    fn delete(&self, path: &str) -> Result<(), EncfsError>;

    /// Create one directory; the parent must already exist.
    fn mkdir(&self, path: &str) -> Result<(), EncfsError>;

    /// Create a directory and any missing parents.
    fn mkdirs(&self, path: &str) -> Result<(), EncfsError>;

    /// Copy a file's bytes to a new path, creating the destination if needed.
    fn copy(&self, src: &str, dst: &str) -> Result<(), EncfsError>;
}
