//! Upload file sources

use std::io;
use std::path::{Path, PathBuf};

/// A candidate upload: a name plus an asynchronous full read
#[allow(async_fn_in_trait)]
pub trait FontSource {
    /// File name as picked by the user
    fn name(&self) -> &str;

    /// Read the whole file
    async fn read(&self) -> io::Result<Vec<u8>>;
}

/// A font file on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiskFile {
    path: PathBuf,
    name: String,
}

impl DiskFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        Self { path, name }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FontSource for DiskFile {
    fn name(&self) -> &str {
        &self.name
    }

    async fn read(&self) -> io::Result<Vec<u8>> {
        smol::fs::read(&self.path).await
    }
}

/// An upload already held in memory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryFile {
    name: String,
    bytes: Vec<u8>,
}

impl MemoryFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }
}

impl FontSource for MemoryFile {
    fn name(&self) -> &str {
        &self.name
    }

    async fn read(&self) -> io::Result<Vec<u8>> {
        Ok(self.bytes.clone())
    }
}

/// One entry of a file-picker result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickedFile {
    Disk(DiskFile),
    Memory(MemoryFile),
}

impl From<DiskFile> for PickedFile {
    fn from(file: DiskFile) -> Self {
        PickedFile::Disk(file)
    }
}

impl From<MemoryFile> for PickedFile {
    fn from(file: MemoryFile) -> Self {
        PickedFile::Memory(file)
    }
}

impl FontSource for PickedFile {
    fn name(&self) -> &str {
        match self {
            PickedFile::Disk(file) => file.name(),
            PickedFile::Memory(file) => file.name(),
        }
    }

    async fn read(&self) -> io::Result<Vec<u8>> {
        match self {
            PickedFile::Disk(file) => file.read().await,
            PickedFile::Memory(file) => file.read().await,
        }
    }
}
