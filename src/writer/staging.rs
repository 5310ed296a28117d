//! Isolated build location for a dataset.
//!
//! A run writes into a temporary file beside the destination and renames it
//! into place only after loading and verification succeed. Dropping a
//! [`Staging`] without publishing deletes the file.

use std::io;
use std::path::{Path, PathBuf};

use tempfile::{Builder, NamedTempFile};
use tracing::debug;

use crate::error::{Error, Result};

pub struct Staging {
    file: NamedTempFile,
}

impl Staging {
    /// Create an empty staging file in the destination's directory, so the
    /// final rename stays on one filesystem.
    pub fn beside(dest: &Path) -> Result<Self> {
        let dir = match dest.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let file = Builder::new()
            .prefix(".nimby-dataset-")
            .suffix(".db")
            .tempfile_in(&dir)
            .map_err(|e| Error::io(&dir, e))?;

        debug!(path = ?file.path(), "staging dataset");
        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Atomically move the staged dataset to `dest`.
    ///
    /// Without `overwrite` an existing destination is left untouched and the
    /// staged file is discarded.
    pub fn publish(self, dest: &Path, overwrite: bool) -> Result<()> {
        self.file
            .as_file()
            .sync_all()
            .map_err(|e| Error::io(self.file.path(), e))?;

        let persisted = if overwrite {
            self.file.persist(dest)
        } else {
            self.file.persist_noclobber(dest)
        };

        persisted.map(drop).map_err(|err| match err.error.kind() {
            io::ErrorKind::AlreadyExists => Error::DestinationExists(dest.to_path_buf()),
            _ => Error::io(dest, err.error),
        })
    }
}
