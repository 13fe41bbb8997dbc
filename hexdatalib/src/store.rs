//! The `store` module provides the [`ByteStore`] struct, the in-memory owner of the raw
//! file bytes.
//!
//! The whole file is read into one contiguous `Vec<u8>`. Reads are permissive (out-of-range
//! offsets read as `0`) so that rendering code can probe past the end of a partial last line,
//! while writes are strict and reject any offset outside of `[0, size)`.

use crate::error::HexDataError;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

#[derive(Debug, Clone, Default)]
pub struct ByteStore {
    /// Path of the file the bytes were loaded from (empty if loaded from memory)
    pub filepath: PathBuf,
    /// Last modification time of the file on disk when it was loaded / saved
    pub last_modified: Option<SystemTime>,
    /// Raw file bytes
    data: Vec<u8>,
    /// Is there any unsaved change
    modified: bool,
}

impl ByteStore {
    /// Creates an empty `ByteStore`.
    ///
    /// # Example
    /// ```
    /// use hexdatalib::ByteStore;
    ///
    /// let store = ByteStore::new();
    /// assert_eq!(store.size(), 0);
    /// assert!(!store.is_modified());
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self {
            filepath: PathBuf::new(),
            last_modified: None,
            data: Vec::new(),
            modified: false,
        }
    }

    /// Creates a `ByteStore` that owns the provided bytes. The store is not bound to a file.
    #[must_use]
    pub fn from_bytes(data: Vec<u8>) -> Self {
        Self {
            filepath: PathBuf::new(),
            last_modified: None,
            data,
            modified: false,
        }
    }

    /// Resets the store to the empty state (0 bytes, unmodified, no file path).
    pub fn clear(&mut self) {
        self.filepath.clear();
        self.last_modified = None;
        self.data.clear();
        self.modified = false;
    }

    /// Reads the whole file into memory. On failure the store is left empty.
    ///
    /// # Errors
    /// Returns [`HexDataError::Read`] if the file is missing, unreadable or truncated.
    pub fn load_file<P: AsRef<Path>>(&mut self, filepath: P) -> Result<(), HexDataError> {
        let path = filepath.as_ref();

        let data = std::fs::read(path).map_err(|source| {
            self.clear();
            HexDataError::Read {
                path: path.to_path_buf(),
                source,
            }
        })?;

        self.data = data;
        self.filepath = path.to_path_buf();
        self.last_modified = get_last_modified(path).ok();
        self.modified = false;
        Ok(())
    }

    /// Writes the full buffer to `filepath`, overwriting the target. The modified flag is
    /// cleared on success only.
    ///
    /// # Errors
    /// Returns [`HexDataError::Write`] if the file cannot be created or written.
    pub fn save_file<P: AsRef<Path>>(&mut self, filepath: P) -> Result<(), HexDataError> {
        let path = filepath.as_ref();

        std::fs::write(path, &self.data).map_err(|source| HexDataError::Write {
            path: path.to_path_buf(),
            source,
        })?;

        self.filepath = path.to_path_buf();
        self.last_modified = get_last_modified(path).ok();
        self.modified = false;
        Ok(())
    }

    /// Writes the buffer back to the file it was loaded from.
    ///
    /// # Errors
    /// Returns [`HexDataError::NoFilePath`] if the store is not bound to a file, or
    /// [`HexDataError::Write`] if writing fails.
    pub fn save(&mut self) -> Result<(), HexDataError> {
        if self.filepath.as_os_str().is_empty() {
            return Err(HexDataError::NoFilePath);
        }
        let path = self.filepath.clone();
        self.save_file(path)
    }

    /// Replaces the content with bytes from memory. The file binding is kept.
    pub fn replace(&mut self, data: Vec<u8>) {
        self.data = data;
        self.modified = false;
    }

    /// Overwrites the byte at `offset`.
    ///
    /// # Errors
    /// Returns [`HexDataError::OutOfBounds`] (and does not touch the buffer) if
    /// `offset >= size()`.
    ///
    /// # Example
    /// ```
    /// use hexdatalib::ByteStore;
    ///
    /// let mut store = ByteStore::from_bytes(vec![0x00, 0x11]);
    /// assert!(store.edit_byte(1, 0xAB).is_ok());
    /// assert!(store.edit_byte(2, 0xAB).is_err());
    /// assert_eq!(store.read_byte(1), 0xAB);
    /// ```
    pub fn edit_byte(&mut self, offset: usize, value: u8) -> Result<(), HexDataError> {
        let size = self.data.len();
        let byte = self
            .data
            .get_mut(offset)
            .ok_or(HexDataError::OutOfBounds { offset, size })?;
        *byte = value;
        self.modified = true;
        Ok(())
    }

    /// Reads the byte at `offset`. Out-of-range reads return `0`.
    #[must_use]
    pub fn read_byte(&self, offset: usize) -> u8 {
        self.data.get(offset).copied().unwrap_or(0)
    }

    /// Reads up to `len` bytes starting at `offset`. The returned slice is shorter than
    /// `len` (or empty) when the range runs past the end of the buffer.
    #[must_use]
    pub fn read_range(&self, offset: usize, len: usize) -> &[u8] {
        let start = offset.min(self.data.len());
        let end = offset.saturating_add(len).min(self.data.len());
        &self.data[start..end]
    }

    /// Number of bytes held by the store
    #[must_use]
    pub fn size(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[must_use]
    pub const fn is_modified(&self) -> bool {
        self.modified
    }

    pub const fn set_modified(&mut self, modified: bool) {
        self.modified = modified;
    }

    /// Raw bytes of the store
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Check whether the bound file was modified on disk since it was loaded or saved.
    /// Returns `false` for stores that are not bound to a file.
    #[must_use]
    pub fn changed_on_disk(&self) -> bool {
        if self.filepath.as_os_str().is_empty() {
            return false;
        }
        match (get_last_modified(&self.filepath), self.last_modified) {
            (Ok(on_disk), Some(known)) => on_disk != known,
            _ => false,
        }
    }
}

/// Get the last modified time of the file
///
/// # Errors
/// Returns an error if the file metadata cannot be read.
pub fn get_last_modified(path: &Path) -> std::io::Result<SystemTime> {
    std::fs::metadata(path).map(|meta| meta.modified().unwrap_or(SystemTime::UNIX_EPOCH))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edit_byte_valid() {
        // Arrange
        let mut store = ByteStore::from_bytes(vec![0u8; 32]);

        // Act
        let res = store.edit_byte(31, 0x7F);

        // Assert
        assert!(res.is_ok());
        assert_eq!(store.read_byte(31), 0x7F);
        assert!(store.is_modified());
    }

    #[test]
    fn test_edit_byte_out_of_bounds() {
        // Arrange
        let mut store = ByteStore::from_bytes(vec![1, 2, 3]);

        // Act
        let res = store.edit_byte(3, 0xFF);

        // Assert
        assert!(res.as_ref().is_err_and(HexDataError::is_out_of_bounds));
        assert_eq!(store.data(), &[1, 2, 3]);
        assert!(!store.is_modified());
    }

    #[test]
    fn test_edit_byte_empty_store() {
        // Arrange
        let mut store = ByteStore::new();

        // Act & Assert
        for offset in [0, 1, 100, usize::MAX] {
            assert!(store.edit_byte(offset, 0x55).is_err());
        }
        assert_eq!(store.size(), 0);
    }

    #[test]
    fn test_read_byte_out_of_range_is_zero() {
        // Arrange
        let store = ByteStore::from_bytes(vec![0xAA, 0xBB]);

        // Act & Assert
        assert_eq!(store.read_byte(1), 0xBB);
        assert_eq!(store.read_byte(2), 0);
        assert_eq!(store.read_byte(usize::MAX), 0);
    }

    #[test]
    fn test_read_range_is_clamped() {
        // Arrange
        let store = ByteStore::from_bytes((0u8..10).collect());

        // Act & Assert
        assert_eq!(store.read_range(8, 5), &[8, 9]);
        assert!(store.read_range(20, 5).is_empty());
        assert_eq!(store.read_range(0, usize::MAX).len(), 10);
    }

    #[test]
    fn test_clear() {
        // Arrange
        let mut store = ByteStore::from_bytes(vec![1, 2, 3]);
        let _ = store.edit_byte(0, 9);

        // Act
        store.clear();

        // Assert
        assert_eq!(store.size(), 0);
        assert!(!store.is_modified());
        assert!(store.filepath.as_os_str().is_empty());
    }

    #[test]
    fn test_save_without_path() {
        // Arrange
        let mut store = ByteStore::from_bytes(vec![1]);

        // Act
        let res = store.save();

        // Assert
        assert!(matches!(res, Err(HexDataError::NoFilePath)));
    }

    #[test]
    fn test_load_missing_file() {
        // Arrange
        let mut store = ByteStore::from_bytes(vec![1, 2, 3]);

        // Act
        let res = store.load_file("build/does/not/exist.bin");

        // Assert
        assert!(matches!(res, Err(HexDataError::Read { .. })));
        assert!(store.is_empty());
    }
}
