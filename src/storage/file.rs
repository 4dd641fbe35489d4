//! Directory-backed storage.

use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use log::trace;

use crate::error::{Result, SentindexError};
use crate::storage::traits::{Storage, StorageConfig, StorageError, StorageInput, StorageOutput};

/// One directory holding one stored object.
#[derive(Debug)]
pub struct FileStorage {
    directory: PathBuf,
    config: StorageConfig,
}

impl FileStorage {
    /// Open a storage directory, creating it (and its parents) if needed.
    pub fn new<P: AsRef<Path>>(directory: P, config: StorageConfig) -> Result<Self> {
        let directory = directory.as_ref().to_path_buf();

        if !directory.exists() {
            std::fs::create_dir_all(&directory).map_err(|e| {
                SentindexError::storage(format!(
                    "Failed to create {}: {e}",
                    directory.display()
                ))
            })?;
        }
        if !directory.is_dir() {
            return Err(SentindexError::storage(format!(
                "Path is not a directory: {}",
                directory.display()
            )));
        }

        Ok(FileStorage { directory, config })
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn path_of(&self, name: &str) -> PathBuf {
        self.directory.join(name)
    }
}

impl Storage for FileStorage {
    fn open_input(&self, name: &str) -> Result<Box<dyn StorageInput>> {
        let file = File::open(self.path_of(name)).map_err(|e| StorageError::from_io(name, e))?;
        let size = file
            .metadata()
            .map_err(|e| StorageError::from_io(name, e))?
            .len();

        Ok(Box::new(FileInput {
            reader: BufReader::with_capacity(self.config.buffer_size, file),
            size,
        }))
    }

    fn create_output(&self, name: &str) -> Result<Box<dyn StorageOutput>> {
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(self.path_of(name))
            .map_err(|e| StorageError::from_io(name, e))?;
        trace!("writing {}", self.path_of(name).display());

        Ok(Box::new(FileOutput {
            name: name.to_string(),
            writer: BufWriter::with_capacity(self.config.buffer_size, file),
            sync_on_close: self.config.sync_on_close,
        }))
    }

    fn list_files(&self) -> Result<Vec<String>> {
        let entries = std::fs::read_dir(&self.directory)
            .map_err(|e| StorageError::from_io(&self.directory.to_string_lossy(), e))?;

        let mut names = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| StorageError::Io(e.to_string()))?.path();
            if path.is_file()
                && let Some(name) = path.file_name().and_then(|n| n.to_str())
            {
                names.push(name.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    fn rename_file(&self, old_name: &str, new_name: &str) -> Result<()> {
        std::fs::rename(self.path_of(old_name), self.path_of(new_name))
            .map_err(|e| StorageError::from_io(old_name, e))?;
        Ok(())
    }
}

/// Buffered reader over a stored file.
#[derive(Debug)]
pub struct FileInput {
    reader: BufReader<File>,
    size: u64,
}

impl Read for FileInput {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.reader.read(buf)
    }
}

impl StorageInput for FileInput {
    fn size(&self) -> Result<u64> {
        Ok(self.size)
    }
}

/// Buffered writer over a stored file.
#[derive(Debug)]
pub struct FileOutput {
    name: String,
    writer: BufWriter<File>,
    sync_on_close: bool,
}

impl Write for FileOutput {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.writer.flush()
    }
}

impl StorageOutput for FileOutput {
    fn close(&mut self) -> Result<()> {
        self.writer
            .flush()
            .map_err(|e| StorageError::from_io(&self.name, e))?;
        if self.sync_on_close {
            self.writer
                .get_ref()
                .sync_all()
                .map_err(|e| StorageError::from_io(&self.name, e))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, FileStorage) {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path(), StorageConfig::default()).unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_creates_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("shards").join("a");
        let storage = FileStorage::new(&nested, StorageConfig::default()).unwrap();
        assert!(nested.is_dir());
        assert_eq!(storage.directory(), nested.as_path());
    }

    #[test]
    fn test_rejects_plain_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("not_a_dir");
        std::fs::write(&path, b"x").unwrap();
        assert!(FileStorage::new(&path, StorageConfig::default()).is_err());
    }

    #[test]
    fn test_write_then_read() {
        let (_temp_dir, storage) = create_test_storage();

        let mut output = storage.create_output("manifest.json").unwrap();
        output.write_all(b"{\"kind\":1}").unwrap();
        output.close().unwrap();

        let mut input = storage.open_input("manifest.json").unwrap();
        let mut buffer = Vec::new();
        input.read_to_end(&mut buffer).unwrap();

        assert_eq!(buffer, b"{\"kind\":1}");
        assert_eq!(input.size().unwrap(), 10);
    }

    #[test]
    fn test_rename_replaces_target() {
        let (temp_dir, storage) = create_test_storage();
        std::fs::write(temp_dir.path().join("documents.bin"), b"old").unwrap();
        std::fs::write(temp_dir.path().join("documents.bin.tmp"), b"new").unwrap();
        std::fs::create_dir(temp_dir.path().join("nested")).unwrap();

        storage
            .rename_file("documents.bin.tmp", "documents.bin")
            .unwrap();

        assert_eq!(storage.list_files().unwrap(), vec!["documents.bin"]);
        assert_eq!(
            std::fs::read(temp_dir.path().join("documents.bin")).unwrap(),
            b"new"
        );
    }

    #[test]
    fn test_missing_file() {
        let (_temp_dir, storage) = create_test_storage();

        let err = storage.open_input("manifest.json").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Storage error: File not found: manifest.json"
        );
        assert!(storage.rename_file("a", "b").is_err());
    }
}
