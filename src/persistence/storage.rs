use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::error;

use crate::error::PersistenceError;

/// Named text files, read whole and written either by appending or by
/// replacing the full contents.
///
/// A write either lands completely or fails with the previous contents left
/// in place.
pub trait TextStorage {
    /// Full contents of `name`, or `None` if it has never been written.
    fn read(&self, name: &str) -> Result<Option<String>, PersistenceError>;

    fn append(&mut self, name: &str, text: &str) -> Result<(), PersistenceError>;

    fn replace(&mut self, name: &str, text: &str) -> Result<(), PersistenceError>;
}

/// Files inside one directory on disk.
#[derive(Debug, Clone)]
pub struct FsStorage {
    dir: PathBuf,
}

impl FsStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, PersistenceError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| PersistenceError::Io {
            path: dir.clone(),
            source,
        })?;
        Ok(FsStorage { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }
}

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> PersistenceError + '_ {
    move |source| PersistenceError::Io {
        path: path.to_path_buf(),
        source,
    }
}

impl TextStorage for FsStorage {
    fn read(&self, name: &str) -> Result<Option<String>, PersistenceError> {
        let path = self.path(name);
        match fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(&path)(e)),
        }
    }

    fn append(&mut self, name: &str, text: &str) -> Result<(), PersistenceError> {
        let path = self.path(name);
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(io_error(&path))?;
        append_whole(&mut file, text).map_err(io_error(&path))
    }

    fn replace(&mut self, name: &str, text: &str) -> Result<(), PersistenceError> {
        let path = self.path(name);
        let tmp = self.path(&format!("{name}.tmp"));
        fs::write(&tmp, text).map_err(io_error(&tmp))?;
        // Atomic rename
        fs::rename(&tmp, &path).map_err(io_error(&path))
    }
}

/// An append target that can be cut back to an earlier length.
trait Truncate: Write {
    fn current_len(&self) -> io::Result<u64>;

    fn truncate(&mut self, len: u64) -> io::Result<()>;

    fn sync(&mut self) -> io::Result<()>;
}

impl Truncate for File {
    fn current_len(&self) -> io::Result<u64> {
        Ok(self.metadata()?.len())
    }

    fn truncate(&mut self, len: u64) -> io::Result<()> {
        self.set_len(len)
    }

    fn sync(&mut self) -> io::Result<()> {
        self.sync_data()
    }
}

/// Write all of `text` or none of it. A failed write or sync truncates the
/// sink back to its length before the call.
fn append_whole<W: Truncate>(sink: &mut W, text: &str) -> io::Result<()> {
    let len = sink.current_len()?;
    let written = sink
        .write_all(text.as_bytes())
        .and_then(|()| sink.flush())
        .and_then(|()| sink.sync());
    if let Err(e) = written {
        if let Err(rollback) = sink.truncate(len) {
            error!(error = %rollback, len, "failed to roll back partial append");
        }
        return Err(e);
    }
    Ok(())
}

/// In-memory stand-in for [`FsStorage`].
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    files: HashMap<String, String>,
    read_only: bool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// A storage whose writes all fail, for exercising error paths.
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    pub fn insert(&mut self, name: &str, text: &str) {
        self.files.insert(name.to_string(), text.to_string());
    }

    pub fn contents(&self, name: &str) -> Option<&str> {
        self.files.get(name).map(String::as_str)
    }

    fn check_writable(&self, name: &str) -> Result<(), PersistenceError> {
        if self.read_only {
            return Err(PersistenceError::Io {
                path: PathBuf::from(name),
                source: io::Error::new(ErrorKind::PermissionDenied, "storage is read-only"),
            });
        }
        Ok(())
    }
}

impl TextStorage for MemoryStorage {
    fn read(&self, name: &str) -> Result<Option<String>, PersistenceError> {
        Ok(self.files.get(name).cloned())
    }

    fn append(&mut self, name: &str, text: &str) -> Result<(), PersistenceError> {
        self.check_writable(name)?;
        self.files.entry(name.to_string()).or_default().push_str(text);
        Ok(())
    }

    fn replace(&mut self, name: &str, text: &str) -> Result<(), PersistenceError> {
        self.check_writable(name)?;
        self.files.insert(name.to_string(), text.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fs_missing_file_reads_none() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FsStorage::new(dir.path()).unwrap();
        assert!(storage.read("nothing.txt").unwrap().is_none());
    }

    #[test]
    fn test_fs_append_and_replace() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = FsStorage::new(dir.path().join("nested")).unwrap();

        storage.append("log.txt", "one\n").unwrap();
        storage.append("log.txt", "two\n").unwrap();
        assert_eq!(storage.read("log.txt").unwrap().as_deref(), Some("one\ntwo\n"));

        storage.replace("log.txt", "fresh\n").unwrap();
        assert_eq!(storage.read("log.txt").unwrap().as_deref(), Some("fresh\n"));
        assert!(!storage.dir().join("log.txt.tmp").exists());
    }

    /// Accepts `room` more bytes, then fails every write.
    struct ShortSink {
        data: Vec<u8>,
        room: usize,
        synced: bool,
    }

    impl Write for ShortSink {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.room == 0 {
                return Err(io::Error::new(ErrorKind::Other, "disk full"));
            }
            let n = buf.len().min(self.room);
            self.data.extend_from_slice(&buf[..n]);
            self.room -= n;
            Ok(n)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Truncate for ShortSink {
        fn current_len(&self) -> io::Result<u64> {
            Ok(self.data.len() as u64)
        }

        fn truncate(&mut self, len: u64) -> io::Result<()> {
            self.data.truncate(len as usize);
            Ok(())
        }

        fn sync(&mut self) -> io::Result<()> {
            self.synced = true;
            Ok(())
        }
    }

    #[test]
    fn test_short_write_rolls_back_append() {
        let mut sink = ShortSink {
            data: b"Ana:1\n".to_vec(),
            room: 4,
            synced: false,
        };
        let err = append_whole(&mut sink, "---NEW_SAVE---\n").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Other);
        assert_eq!(sink.data, b"Ana:1\n");
        assert!(!sink.synced);

        sink.room = 64;
        append_whole(&mut sink, "Ben:2\n").unwrap();
        assert_eq!(sink.data, b"Ana:1\nBen:2\n");
        assert!(sink.synced);
    }

    #[test]
    fn test_fs_append_to_directory_fails_cleanly() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = FsStorage::new(dir.path()).unwrap();
        fs::create_dir(dir.path().join("taken")).unwrap();
        assert!(matches!(
            storage.append("taken", "text"),
            Err(PersistenceError::Io { .. })
        ));
    }

    #[test]
    fn test_memory_read_only_keeps_contents() {
        let mut storage = MemoryStorage::new();
        storage.insert("scores.txt", "Ana:1\n");
        let mut storage = storage.read_only();

        assert!(storage.append("scores.txt", "Ben:2\n").is_err());
        assert!(storage.replace("scores.txt", "").is_err());
        assert_eq!(storage.contents("scores.txt"), Some("Ana:1\n"));
    }
}
