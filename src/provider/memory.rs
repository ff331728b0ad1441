// src/provider/memory.rs

//! In-memory provider.
//!
//! The smallest conforming [`FileProvider`]: a path-keyed map of byte
//! buffers. Useful as a test double and for decoding volumes that were
//! fetched into memory from somewhere else entirely.

use std::collections::BTreeMap;
use std::io::{self, Cursor, Write};
use std::sync::{Arc, Mutex};
use std::time::SystemTime;

use crate::error::EncfsError;
use crate::provider::{FileInfo, FileProvider};

#[derive(Debug, Clone)]
enum Entry {
    Dir { mtime: SystemTime },
    File { data: Vec<u8>, mtime: SystemTime },
}

/// [`FileProvider`] backed by an in-memory map. Cloning is shallow; clones
/// share the same tree.
#[derive(Debug, Default, Clone)]
pub struct MemoryProvider {
    entries: Arc<Mutex<BTreeMap<String, Entry>>>,
}

/// Normalise to `/`-separated absolute form; the root is `/`.
fn normalize(path: &str) -> String {
    let mut out = String::from("/");
    for segment in path.split(['/', '\\']).filter(|s| !s.is_empty() && *s != ".") {
        if !out.ends_with('/') {
            out.push('/');
        }
        out.push_str(segment);
    }
    out
}

fn parent_of(key: &str) -> &str {
    match key.rsplit_once('/') {
        Some(("", _)) | None => "/",
        Some((parent, _)) => parent,
    }
}

fn name_of(key: &str) -> &str {
    key.rsplit_once('/').map(|(_, name)| name).unwrap_or("")
}

fn not_found(path: &str) -> EncfsError {
    io::Error::new(io::ErrorKind::NotFound, format!("path '{path}' doesn't exist")).into()
}

impl MemoryProvider {
    pub fn new() -> Self {
        MemoryProvider::default()
    }

    /// Store a file, creating missing parent directories. Test-friendly
    /// shortcut around `mkdirs` + `open_output`.
    pub fn insert(&self, path: &str, data: impl Into<Vec<u8>>) {
        let key = normalize(path);
        let mut entries = self.lock();
        let mut dir = parent_of(&key).to_string();
        while dir != "/" {
            entries.entry(dir.clone()).or_insert(Entry::Dir {
                mtime: SystemTime::now(),
            });
            dir = parent_of(&dir).to_string();
        }
        entries.insert(
            key,
            Entry::File {
                data: data.into(),
                mtime: SystemTime::now(),
            },
        );
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, Entry>> {
        self.entries.lock().expect("provider lock poisoned")
    }

    fn info_for(&self, key: &str, entry: Option<&Entry>) -> Result<FileInfo, EncfsError> {
        let (is_dir, size, mtime) = match entry {
            None if key == "/" => (true, 0, SystemTime::UNIX_EPOCH),
            None => return Err(not_found(key)),
            Some(Entry::Dir { mtime }) => (true, 0, *mtime),
            Some(Entry::File { data, mtime }) => (false, data.len() as u64, *mtime),
        };
        Ok(FileInfo {
            name: name_of(key).to_string(),
            parent_path: parent_of(key).to_string(),
            is_dir,
            mtime,
            size,
            can_read: true,
            can_write: true,
            can_execute: false,
        })
    }

    fn dir_exists(entries: &BTreeMap<String, Entry>, key: &str) -> bool {
        key == "/" || matches!(entries.get(key), Some(Entry::Dir { .. }))
    }
}

impl FileProvider for MemoryProvider {
    type Source = Cursor<Vec<u8>>;
    type Sink = MemoryWriter;

    fn open_input(&self, path: &str) -> Result<Cursor<Vec<u8>>, EncfsError> {
        let key = normalize(path);
        match self.lock().get(&key) {
            Some(Entry::File { data, .. }) => Ok(Cursor::new(data.clone())),
            _ => Err(not_found(path)),
        }
    }

    fn open_output(&self, path: &str, _expected_len: u64) -> Result<MemoryWriter, EncfsError> {
        let key = normalize(path);
        if matches!(self.lock().get(&key), Some(Entry::Dir { .. })) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("path '{path}' is a directory"),
            )
            .into());
        }
        Ok(MemoryWriter {
            provider: self.clone(),
            key,
            buf: Vec::new(),
        })
    }

    fn file_info(&self, path: &str) -> Result<FileInfo, EncfsError> {
        let key = normalize(path);
        self.info_for(&key, self.lock().get(&key))
    }

    fn list_children(&self, path: &str) -> Result<Vec<FileInfo>, EncfsError> {
        let key = normalize(path);
        let entries = self.lock();
        if !Self::dir_exists(&entries, &key) {
            return Err(not_found(path));
        }
        let mut children = Vec::new();
        for (child, entry) in entries.iter() {
            if parent_of(child) == key {
                children.push(self.info_for(child, Some(entry))?);
            }
        }
        Ok(children)
    }

    fn exists(&self, path: &str) -> Result<bool, EncfsError> {
        let key = normalize(path);
        Ok(key == "/" || self.lock().contains_key(&key))
    }

    fn is_directory(&self, path: &str) -> Result<bool, EncfsError> {
        let key = normalize(path);
        Ok(Self::dir_exists(&self.lock(), &key))
    }

    fn create_file(&self, path: &str) -> Result<FileInfo, EncfsError> {
        let key = normalize(path);
        let mut entries = self.lock();
        if entries.contains_key(&key) {
            return Err(
                io::Error::new(io::ErrorKind::AlreadyExists, "file already exists").into(),
            );
        }
        if !Self::dir_exists(&entries, parent_of(&key)) {
            return Err(not_found(parent_of(&key)));
        }
        let entry = Entry::File {
            data: Vec::new(),
            mtime: SystemTime::now(),
        };
        entries.insert(key.clone(), entry);
        self.info_for(&key, entries.get(&key))
    }

    fn rename(&self, src: &str, dst: &str) -> Result<(), EncfsError> {
        let src_key = normalize(src);
        let dst_key = normalize(dst);
        let mut entries = self.lock();
        let entry = entries.remove(&src_key).ok_or_else(|| not_found(src))?;

        // A directory takes its subtree along.
        if matches!(entry, Entry::Dir { .. }) {
            let subtree_prefix = format!("{src_key}/");
            let moved: Vec<(String, Entry)> = entries
                .range(subtree_prefix.clone()..)
                .take_while(|(k, _)| k.starts_with(&subtree_prefix))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect();
            for (old_key, value) in moved {
                entries.remove(&old_key);
                let new_key = format!("{dst_key}{}", &old_key[src_key.len()..]);
                entries.insert(new_key, value);
            }
        }
        entries.insert(dst_key, entry);
        Ok(())
    }

    fn delete(&self, path: &str) -> Result<(), EncfsError> {
        let key = normalize(path);
        let mut entries = self.lock();
        if matches!(entries.get(&key), Some(Entry::Dir { .. })) {
            let child_prefix = format!("{key}/");
            if entries.keys().any(|k| k.starts_with(&child_prefix)) {
                return Err(io::Error::new(
                    io::ErrorKind::Other,
                    format!("directory '{path}' is not empty"),
                )
                .into());
            }
        }
        entries.remove(&key).ok_or_else(|| not_found(path))?;
        Ok(())
    }

    fn mkdir(&self, path: &str) -> Result<(), EncfsError> {
        let key = normalize(path);
        let mut entries = self.lock();
        if entries.contains_key(&key) {
            return Err(
                io::Error::new(io::ErrorKind::AlreadyExists, "path already exists").into(),
            );
        }
        if !Self::dir_exists(&entries, parent_of(&key)) {
            return Err(not_found(parent_of(&key)));
        }
        entries.insert(
            key,
            Entry::Dir {
                mtime: SystemTime::now(),
            },
        );
        Ok(())
    }

    fn mkdirs(&self, path: &str) -> Result<(), EncfsError> {
        let key = normalize(path);
        let mut entries = self.lock();
        let mut ancestors = Vec::new();
        let mut cursor = key.as_str();
        while cursor != "/" {
            ancestors.push(cursor.to_string());
            cursor = parent_of(cursor);
        }
        for dir in ancestors.into_iter().rev() {
            if !entries.contains_key(&dir) {
                entries.insert(
                    dir,
                    Entry::Dir {
                        mtime: SystemTime::now(),
                    },
                );
            }
        }
        Ok(())
    }

    fn copy(&self, src: &str, dst: &str) -> Result<(), EncfsError> {
        let src_key = normalize(src);
        let dst_key = normalize(dst);
        let mut entries = self.lock();
        match entries.get(&src_key) {
            Some(Entry::File { data, .. }) => {
                let copied = data.clone();
                entries.insert(
                    dst_key,
                    Entry::File {
                        data: copied,
                        mtime: SystemTime::now(),
                    },
                );
                Ok(())
            }
            _ => Err(not_found(src)),
        }
    }
}

/// Byte sink handed out by [`MemoryProvider::open_output`]. Contents are
/// committed to the tree on flush and on drop.
#[derive(Debug)]
pub struct MemoryWriter {
    provider: MemoryProvider,
    key: String,
    buf: Vec<u8>,
}

impl MemoryWriter {
    fn commit(&mut self) {
        self.provider.lock().insert(
            self.key.clone(),
            Entry::File {
                data: self.buf.clone(),
                mtime: SystemTime::now(),
            },
        );
    }
}

impl Write for MemoryWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.commit();
        Ok(())
    }
}

impl Drop for MemoryWriter {
    fn drop(&mut self) {
        self.commit();
    }
}
