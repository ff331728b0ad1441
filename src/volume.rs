// src/volume.rs

//! A volume binds configuration and key material together.

use std::io::Read;

use crate::config::VolumeConfig;
use crate::decoder::EncfsInputStream;
use crate::error::EncfsError;
use crate::keys::VolumeKeys;
use crate::provider::FileProvider;

/// An opened EncFS volume: validated configuration plus derived keys.
///
/// Immutable once constructed. Streams borrow the volume, so any number of
/// them can decode files in parallel on independent sources.
#[derive(Debug)]
pub struct Volume {
    config: VolumeConfig,
    keys: VolumeKeys,
}

impl Volume {
    /// Bind a configuration and key set into a volume.
    ///
    /// # Errors
    ///
    /// Whatever [`VolumeConfig::validate`] reports; an invalid or unsupported
    /// configuration never produces a volume.
    pub fn new(config: VolumeConfig, keys: VolumeKeys) -> Result<Self, EncfsError> {
        config.validate()?;
        Ok(Volume { config, keys })
    }

    #[inline(always)]
    pub fn config(&self) -> &VolumeConfig {
        &self.config
    }

    #[inline(always)]
    pub fn keys(&self) -> &VolumeKeys {
        &self.keys
    }

    /// Open a decrypted stream over a file stored on `provider`.
    pub fn open_read<'v, P: FileProvider>(
        &'v self,
        provider: &P,
        path: &str,
    ) -> Result<EncfsInputStream<'v, P::Source>, EncfsError> {
        let source = provider.open_input(path)?;
        EncfsInputStream::new(self, source)
    }

    /// Open a decrypted stream over any raw byte source.
    pub fn decode_stream<'v, R: Read>(
        &'v self,
        source: R,
    ) -> Result<EncfsInputStream<'v, R>, EncfsError> {
        EncfsInputStream::new(self, source)
    }
}
