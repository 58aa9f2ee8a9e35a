//! Exclusively created output file that deletes itself unless committed.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Output file for one download.
///
/// Created with `create_new`, so an existing file is never truncated. If the
/// value is dropped before [`PartialFile::commit`] the handle is closed and
/// the file removed, which covers every early-return and abort path.
#[derive(Debug)]
pub struct PartialFile {
    writer: Option<BufWriter<File>>,
    path: PathBuf,
    written: u64,
    committed: bool,
}

impl PartialFile {
    /// Fails with `ErrorKind::AlreadyExists` if `path` exists.
    pub fn create_new(path: &Path) -> io::Result<Self> {
        let file = File::options().write(true).create_new(true).open(path)?;
        Ok(Self {
            writer: Some(BufWriter::new(file)),
            path: path.to_path_buf(),
            written: 0,
            committed: false,
        })
    }

    pub fn write_chunk(&mut self, data: &[u8]) -> io::Result<()> {
        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "output file already closed"))?;
        writer.write_all(data)?;
        self.written += data.len() as u64;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Flush and close the file, keeping it on disk. Returns path and size.
    /// On error the file is removed like any uncommitted file.
    pub fn commit(mut self) -> io::Result<(PathBuf, u64)> {
        if let Some(writer) = self.writer.take() {
            let file = writer.into_inner().map_err(|e| e.into_error())?;
            file.sync_all()?;
        }
        self.committed = true;
        Ok((self.path.clone(), self.written))
    }
}

impl Drop for PartialFile {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        drop(self.writer.take());
        match fs::remove_file(&self.path) {
            Ok(()) => tracing::debug!(path = %self.path.display(), "removed partial file"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(path = %self.path.display(), "could not remove partial file: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commit_keeps_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.png");
        let mut f = PartialFile::create_new(&path).unwrap();
        f.write_chunk(b"abc").unwrap();
        f.write_chunk(b"def").unwrap();
        let (saved, n) = f.commit().unwrap();
        assert_eq!(saved, path);
        assert_eq!(n, 6);
        assert_eq!(fs::read(&path).unwrap(), b"abcdef");
    }

    #[test]
    fn drop_without_commit_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("b.png");
        {
            let mut f = PartialFile::create_new(&path).unwrap();
            f.write_chunk(b"partial").unwrap();
            assert!(path.exists());
        }
        assert!(!path.exists());
    }

    #[test]
    fn refuses_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("c.png");
        fs::write(&path, b"keep me").unwrap();
        let err = PartialFile::create_new(&path).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
        assert_eq!(fs::read(&path).unwrap(), b"keep me");
    }

    #[test]
    fn empty_commit_creates_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.gif");
        let (saved, n) = PartialFile::create_new(&path).unwrap().commit().unwrap();
        assert_eq!(n, 0);
        assert_eq!(fs::metadata(saved).unwrap().len(), 0);
    }
}
