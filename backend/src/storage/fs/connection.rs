//! File store connection: owns the base data directory and the atomic
//! write primitive every repository uses.

use anyhow::Result;
use log::debug;
use std::path::{Path, PathBuf};

/// Handle to the on-disk data directory. Cheap to clone; repositories hold
/// their own copy.
#[derive(Debug, Clone)]
pub struct FsConnection {
    base_directory: PathBuf,
}

impl FsConnection {
    /// Open (creating if needed) the data directory at `base_directory`
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Result<Self> {
        let base_directory = base_directory.as_ref().to_path_buf();
        std::fs::create_dir_all(&base_directory)?;
        debug!("Opened data directory: {:?}", base_directory);
        Ok(Self { base_directory })
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    /// Directory holding one user's documents
    pub fn user_directory(&self, directory_name: &str) -> PathBuf {
        self.base_directory.join(directory_name)
    }

    /// Write a file atomically: temp file in the same directory, then rename.
    pub fn write_atomic(&self, path: &Path, contents: &[u8]) -> Result<()> {
        let temp_path = path.with_extension("tmp");
        std::fs::write(&temp_path, contents)?;
        std::fs::rename(&temp_path, path)?;
        Ok(())
    }
}
