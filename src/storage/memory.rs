//! In-memory storage, for tests and for corpora that never touch disk.

use std::io::{Cursor, Read, Write};
use std::sync::Arc;

use ahash::AHashMap;
use parking_lot::Mutex;

use crate::error::Result;
use crate::storage::traits::{Storage, StorageError, StorageInput, StorageOutput};

type FileMap = Arc<Mutex<AHashMap<String, Box<[u8]>>>>;

/// Files kept in a shared map.
///
/// Written data becomes visible when the output is closed or dropped.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    files: FileMap,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file_count(&self) -> usize {
        self.files.lock().len()
    }

    /// Overwrite a stored file's bytes directly.
    pub fn put_file(&self, name: &str, data: Vec<u8>) {
        self.files
            .lock()
            .insert(name.to_string(), data.into_boxed_slice());
    }

    /// Copy out a stored file's bytes.
    pub fn file_bytes(&self, name: &str) -> Result<Vec<u8>> {
        self.files
            .lock()
            .get(name)
            .map(|data| data.to_vec())
            .ok_or_else(|| StorageError::FileNotFound(name.to_string()).into())
    }
}

impl Storage for MemoryStorage {
    fn open_input(&self, name: &str) -> Result<Box<dyn StorageInput>> {
        let data = self.file_bytes(name)?;
        let size = data.len() as u64;
        Ok(Box::new(MemoryInput {
            cursor: Cursor::new(data),
            size,
        }))
    }

    fn create_output(&self, name: &str) -> Result<Box<dyn StorageOutput>> {
        Ok(Box::new(MemoryOutput {
            name: name.to_string(),
            buffer: Vec::new(),
            files: Arc::clone(&self.files),
            committed: false,
        }))
    }

    fn list_files(&self) -> Result<Vec<String>> {
        let mut names: Vec<String> = self.files.lock().keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    fn rename_file(&self, old_name: &str, new_name: &str) -> Result<()> {
        let mut files = self.files.lock();
        let data = files
            .remove(old_name)
            .ok_or_else(|| StorageError::FileNotFound(old_name.to_string()))?;
        files.insert(new_name.to_string(), data);
        Ok(())
    }
}

#[derive(Debug)]
pub struct MemoryInput {
    cursor: Cursor<Vec<u8>>,
    size: u64,
}

impl Read for MemoryInput {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.cursor.read(buf)
    }
}

impl StorageInput for MemoryInput {
    fn size(&self) -> Result<u64> {
        Ok(self.size)
    }
}

#[derive(Debug)]
pub struct MemoryOutput {
    name: String,
    buffer: Vec<u8>,
    files: FileMap,
    committed: bool,
}

impl MemoryOutput {
    fn commit(&mut self) {
        let data = std::mem::take(&mut self.buffer).into_boxed_slice();
        self.files.lock().insert(self.name.clone(), data);
        self.committed = true;
    }
}

impl Write for MemoryOutput {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        if self.committed {
            return Err(std::io::Error::other(format!(
                "{} is already closed",
                self.name
            )));
        }
        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl StorageOutput for MemoryOutput {
    fn close(&mut self) -> Result<()> {
        if !self.committed {
            self.commit();
        }
        Ok(())
    }
}

impl Drop for MemoryOutput {
    fn drop(&mut self) {
        if !self.committed {
            self.commit();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_visible_after_close() {
        let storage = MemoryStorage::new();

        let mut output = storage.create_output("a.bin").unwrap();
        output.write_all(&[1, 2, 3]).unwrap();
        assert_eq!(storage.file_count(), 0);
        output.close().unwrap();

        assert_eq!(storage.file_bytes("a.bin").unwrap(), vec![1, 2, 3]);

        let mut input = storage.open_input("a.bin").unwrap();
        assert_eq!(input.size().unwrap(), 3);
        let mut buffer = Vec::new();
        input.read_to_end(&mut buffer).unwrap();
        assert_eq!(buffer, vec![1, 2, 3]);
    }

    #[test]
    fn test_write_after_close_fails() {
        let storage = MemoryStorage::new();
        let mut output = storage.create_output("a.bin").unwrap();
        output.close().unwrap();
        assert!(output.write_all(b"late").is_err());
    }

    #[test]
    fn test_drop_commits() {
        let storage = MemoryStorage::new();
        {
            let mut output = storage.create_output("dropped.txt").unwrap();
            output.write_all(b"kept").unwrap();
        }
        assert_eq!(storage.file_bytes("dropped.txt").unwrap(), b"kept".to_vec());
    }

    #[test]
    fn test_rename_and_list() {
        let storage = MemoryStorage::new();
        storage.put_file("b", vec![0]);
        storage.put_file("a", vec![0, 0]);

        assert_eq!(storage.list_files().unwrap(), vec!["a", "b"]);

        storage.rename_file("a", "b").unwrap();
        assert_eq!(storage.list_files().unwrap(), vec!["b"]);
        assert_eq!(storage.file_bytes("b").unwrap(), vec![0, 0]);
        assert!(storage.rename_file("missing", "d").is_err());
    }
}
