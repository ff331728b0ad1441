// src/provider/local.rs

//! Local-filesystem provider.
//!
//! Roots every relative path under a configured directory: a provider rooted
//! at `/home/jdoe` refers to `/home/jdoe/dir/file` as `dir/file`.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::error::EncfsError;
use crate::provider::{FileInfo, FileProvider};

/// Path separator used in provider-relative paths.
pub const SEPARATOR: &str = "/";

/// [`FileProvider`] over a directory tree on the local filesystem.
#[derive(Debug, Clone)]
pub struct LocalFileProvider {
    root: PathBuf,
}

impl LocalFileProvider {
    /// Create a provider rooted at `root`. All paths handed to the provider
    /// are resolved beneath it.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        LocalFileProvider { root: root.into() }
    }

    /// Root path in provider-relative terms.
    pub fn root_path(&self) -> &str {
        SEPARATOR
    }

    fn resolve(&self, path: &str) -> PathBuf {
        let relative = path.trim_start_matches(['/', '\\']);
        self.root.join(relative)
    }

    fn to_file_info(&self, path: &Path) -> Result<FileInfo, EncfsError> {
        let metadata = fs::metadata(path)?;

        // The root itself and entries directly under it both report the bare
        // separator as their parent.
        let parent_path = match path.parent() {
            Some(parent) if path != self.root && parent != self.root => {
                let relative = parent
                    .strip_prefix(&self.root)
                    .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "path escapes root"))?;
                format!("{SEPARATOR}{}", relative.to_string_lossy())
            }
            _ => SEPARATOR.to_string(),
        };

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        #[cfg(unix)]
        let can_execute = {
            use std::os::unix::fs::PermissionsExt;
            metadata.permissions().mode() & 0o111 != 0
        };
        #[cfg(not(unix))]
        let can_execute = false;

        Ok(FileInfo {
            name,
            parent_path,
            is_dir: metadata.is_dir(),
            mtime: metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH),
            size: metadata.len(),
            can_read: true,
            can_write: !metadata.permissions().readonly(),
            can_execute,
        })
    }
}

impl FileProvider for LocalFileProvider {
    type Source = File;
    type Sink = File;

    fn open_input(&self, path: &str) -> Result<File, EncfsError> {
        Ok(File::open(self.resolve(path))?)
    }

    fn open_output(&self, path: &str, _expected_len: u64) -> Result<File, EncfsError> {
        Ok(File::create(self.resolve(path))?)
    }

    fn file_info(&self, path: &str) -> Result<FileInfo, EncfsError> {
        self.to_file_info(&self.resolve(path))
    }

    fn list_children(&self, path: &str) -> Result<Vec<FileInfo>, EncfsError> {
        let mut children = Vec::new();
        for entry in fs::read_dir(self.resolve(path))? {
            children.push(self.to_file_info(&entry?.path())?);
        }
        Ok(children)
    }

    fn exists(&self, path: &str) -> Result<bool, EncfsError> {
        Ok(self.resolve(path).exists())
    }

    fn is_directory(&self, path: &str) -> Result<bool, EncfsError> {
        Ok(self.resolve(path).is_dir())
    }

    fn create_file(&self, path: &str) -> Result<FileInfo, EncfsError> {
        let target = self.resolve(path);
        if target.exists() {
            return Err(
                io::Error::new(io::ErrorKind::AlreadyExists, "file already exists").into(),
            );
        }
        File::create(&target)?;
        self.to_file_info(&target)
    }

    fn rename(&self, src: &str, dst: &str) -> Result<(), EncfsError> {
        let source = self.resolve(src);
        if !source.exists() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("path '{src}' doesn't exist"),
            )
            .into());
        }
        Ok(fs::rename(source, self.resolve(dst))?)
    }

    fn delete(&self, path: &str) -> Result<(), EncfsError> {
        let target = self.resolve(path);
        if target.is_dir() {
            Ok(fs::remove_dir(target)?)
        } else {
            Ok(fs::remove_file(target)?)
        }
    }

    fn mkdir(&self, path: &str) -> Result<(), EncfsError> {
        let target = self.resolve(path);
        match target.parent() {
            Some(parent) if parent.exists() => Ok(fs::create_dir(target)?),
            _ => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("parent of '{path}' doesn't exist"),
            )
            .into()),
        }
    }

    fn mkdirs(&self, path: &str) -> Result<(), EncfsError> {
        Ok(fs::create_dir_all(self.resolve(path))?)
    }

    fn copy(&self, src: &str, dst: &str) -> Result<(), EncfsError> {
        let source = self.resolve(src);
        if !source.exists() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("source file '{src}' doesn't exist"),
            )
            .into());
        }
        fs::copy(source, self.resolve(dst))?;
        Ok(())
    }
}
