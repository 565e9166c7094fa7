//! Target file handle for a single transfer.
//!
//! The file at the final path is written in place: its size on disk is the
//! only resume signal, so there is no temp file and no rename. Each chunk is
//! written as soon as it arrives; the handle closes when dropped on every
//! exit path.

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::resume::WriteMode;

/// Open target file of one transfer.
#[derive(Debug)]
pub struct TargetFile {
    file: File,
    path: PathBuf,
}

impl TargetFile {
    /// Open `path` in `mode`: `CreateTruncate` discards existing content,
    /// `Append` keeps it and writes after it (creating the file if missing).
    pub fn open(path: &Path, mode: WriteMode) -> io::Result<Self> {
        let mut options = File::options();
        match mode {
            WriteMode::CreateTruncate => options.write(true).create(true).truncate(true),
            WriteMode::Append => options.append(true).create(true),
        };
        let file = options.open(path)?;
        Ok(Self {
            file,
            path: path.to_path_buf(),
        })
    }

    /// Write one received chunk in full.
    pub fn write_chunk(&mut self, data: &[u8]) -> io::Result<()> {
        self.file.write_all(data)
    }

    /// Flush file data to disk.
    pub fn sync(&self) -> io::Result<()> {
        self.file.sync_data()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_truncate_discards_existing_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.bin");
        std::fs::write(&path, b"stale partial content").unwrap();

        let mut f = TargetFile::open(&path, WriteMode::CreateTruncate).unwrap();
        f.write_chunk(b"fresh").unwrap();
        f.sync().unwrap();
        drop(f);

        assert_eq!(std::fs::read(&path).unwrap(), b"fresh");
    }

    #[test]
    fn append_keeps_existing_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.bin");
        std::fs::write(&path, b"hello ").unwrap();

        let mut f = TargetFile::open(&path, WriteMode::Append).unwrap();
        f.write_chunk(b"wor").unwrap();
        f.write_chunk(b"ld").unwrap();
        assert_eq!(f.path(), path.as_path());
        drop(f);

        assert_eq!(std::fs::read(&path).unwrap(), b"hello world");
    }

    #[test]
    fn append_creates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("new.bin");
        let mut f = TargetFile::open(&path, WriteMode::Append).unwrap();
        f.write_chunk(b"abc").unwrap();
        drop(f);
        assert_eq!(std::fs::read(&path).unwrap(), b"abc");
    }
}
