//! The `hexdata` module provides the [`HexData`] struct, the byte-buffer / line-model engine
//! consumed by the editor session and the renderer.
//!
//! `HexData` owns a [`ByteStore`] and a [`LineModel`] and keeps them consistent: every
//! successful mutation (load, edit, width change) regenerates the lines in full.

use crate::decoder::{Architecture, InstructionDecoder, builtin_decoder};
use crate::error::HexDataError;
use crate::lines::{LOAD_ERROR_LINE, LineModel};
use crate::store::ByteStore;
use std::path::{Path, PathBuf};

#[derive(Default)]
pub struct HexData {
    /// Raw bytes
    store: ByteStore,
    /// Display lines generated from `store`
    lines: LineModel,
    /// Decoder used for the annotation column
    decoder: Option<Box<dyn InstructionDecoder>>,
    /// Is the annotation column filled
    disassembly: bool,
}

impl std::fmt::Debug for HexData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HexData")
            .field("store", &self.store)
            .field("lines", &self.lines)
            .field("decoder", &self.decoder.is_some())
            .field("disassembly", &self.disassembly)
            .finish()
    }
}

impl HexData {
    /// Creates an empty `HexData` with no lines, 16 bytes per line and disassembly disabled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a `HexData` from bytes in memory and generates its lines.
    ///
    /// # Example
    /// ```
    /// use hexdatalib::HexData;
    ///
    /// let hd = HexData::from_bytes((0u8..20).collect());
    /// assert_eq!(hd.file_size(), 20);
    /// assert_eq!(hd.hex_lines().len(), 2);
    /// ```
    #[must_use]
    pub fn from_bytes(data: Vec<u8>) -> Self {
        let mut hd = Self::new();
        hd.load_bytes(data);
        hd
    }

    /// Loads the whole file and regenerates all lines at the current width.
    ///
    /// On failure the buffer is emptied and the display shows the single line
    /// `"Error: Failed to open or read file"`.
    ///
    /// # Errors
    /// Returns [`HexDataError::Read`] if the file cannot be read.
    pub fn load_file<P: AsRef<Path>>(&mut self, filepath: P) -> Result<(), HexDataError> {
        let path = filepath.as_ref();

        if let Err(err) = self.store.load_file(path) {
            log::error!("{err}");
            self.lines.set_message(LOAD_ERROR_LINE);
            return Err(err);
        }

        log::info!("Loaded '{}' ({} bytes)", path.display(), self.store.size());
        self.regenerate_all();
        Ok(())
    }

    /// Populates the buffer from memory. The file binding (if any) is kept.
    pub fn load_bytes(&mut self, data: Vec<u8>) {
        self.store.replace(data);
        self.regenerate_all();
    }

    /// Writes the whole buffer to `filepath`.
    ///
    /// # Errors
    /// Returns [`HexDataError::Write`] if the file cannot be written.
    pub fn save_file<P: AsRef<Path>>(&mut self, filepath: P) -> Result<(), HexDataError> {
        let path = filepath.as_ref();
        self.store.save_file(path).inspect_err(|err| log::error!("{err}"))?;
        log::info!("Saved '{}' ({} bytes)", path.display(), self.store.size());
        Ok(())
    }

    /// Writes the buffer back to the file it was loaded from.
    ///
    /// # Errors
    /// Returns [`HexDataError::NoFilePath`] if there is no such file, or
    /// [`HexDataError::Write`] if writing fails.
    pub fn save(&mut self) -> Result<(), HexDataError> {
        self.store.save().inspect_err(|err| log::error!("{err}"))?;
        log::info!("Saved '{}'", self.store.filepath.display());
        Ok(())
    }

    /// Drops the buffer and all lines.
    pub fn clear(&mut self) {
        self.store.clear();
        self.lines.clear();
    }

    /// Overwrites one byte and regenerates all lines.
    ///
    /// # Errors
    /// Returns [`HexDataError::OutOfBounds`] if `offset >= file_size()`. Nothing changes then.
    pub fn edit_byte(&mut self, offset: usize, value: u8) -> Result<(), HexDataError> {
        self.store
            .edit_byte(offset, value)
            .inspect_err(|err| log::warn!("Rejected edit: {err}"))?;
        self.regenerate_all();
        Ok(())
    }

    /// Overwrites several bytes and regenerates all lines once.
    ///
    /// # Errors
    /// Returns [`HexDataError::OutOfBounds`] for the first offset past the end. The edits
    /// before it are kept.
    pub fn edit_bytes<I>(&mut self, edits: I) -> Result<(), HexDataError>
    where
        I: IntoIterator<Item = (usize, u8)>,
    {
        let res = edits
            .into_iter()
            .try_for_each(|(offset, value)| self.store.edit_byte(offset, value));
        self.regenerate_all();
        res.inspect_err(|err| log::warn!("Rejected edit: {err}"))
    }

    /// Reads one byte, `0` if `offset` is out of range.
    #[must_use]
    pub fn read_byte(&self, offset: usize) -> u8 {
        self.store.read_byte(offset)
    }

    #[must_use]
    pub fn read_range(&self, offset: usize, len: usize) -> &[u8] {
        self.store.read_range(offset, len)
    }

    #[must_use]
    pub fn data(&self) -> &[u8] {
        self.store.data()
    }

    #[must_use]
    pub const fn is_modified(&self) -> bool {
        self.store.is_modified()
    }

    /// Overrides the modified flag (e.g. after all edits were reverted)
    pub const fn set_modified(&mut self, modified: bool) {
        self.store.set_modified(modified);
    }

    #[must_use]
    pub fn file_size(&self) -> usize {
        self.store.size()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    #[must_use]
    pub fn filepath(&self) -> &Path {
        &self.store.filepath
    }

    #[must_use]
    pub fn has_file(&self) -> bool {
        !self.store.filepath.as_os_str().is_empty()
    }

    /// Check whether the backing file was changed on disk since load / save
    #[must_use]
    pub fn changed_on_disk(&self) -> bool {
        self.store.changed_on_disk()
    }

    /// Re-reads the backing file. Any unsaved change is lost.
    ///
    /// # Errors
    /// Returns [`HexDataError::NoFilePath`] if not bound to a file, or
    /// [`HexDataError::Read`] if reading fails.
    pub fn reload(&mut self) -> Result<(), HexDataError> {
        let path: PathBuf = self.store.filepath.clone();
        if path.as_os_str().is_empty() {
            return Err(HexDataError::NoFilePath);
        }
        self.load_file(path)
    }

    #[must_use]
    pub fn hex_lines(&self) -> &[String] {
        self.lines.hex_lines()
    }

    #[must_use]
    pub fn disassembly_lines(&self) -> &[String] {
        self.lines.disassembly_lines()
    }

    #[must_use]
    pub fn instruction_lengths(&self) -> &[usize] {
        self.lines.instruction_lengths()
    }

    #[must_use]
    pub fn header_line(&self) -> &str {
        self.lines.header_line()
    }

    #[must_use]
    pub const fn bytes_per_line(&self) -> usize {
        self.lines.bytes_per_line()
    }

    /// Number of rows of the dump (0 for an empty buffer)
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.lines.row_count(self.store.size())
    }

    /// Sets the number of bytes per line, clamped to `[8, 48]`. Lines are regenerated only
    /// if the width actually changes.
    pub fn set_bytes_per_line(&mut self, n: usize) {
        if self.lines.set_bytes_per_line(n) {
            self.regenerate_all();
        }
    }

    /// Forces a full rebuild of the header, annotations and hex lines.
    pub fn regenerate_all(&mut self) {
        let decoder = if self.disassembly {
            self.decoder.as_deref()
        } else {
            None
        };
        self.lines.regenerate(self.store.data(), decoder);
    }

    /// Installs a custom decoder (or removes it with `None`).
    pub fn set_decoder(&mut self, decoder: Option<Box<dyn InstructionDecoder>>) {
        self.decoder = decoder;
        if self.disassembly && !self.store.is_empty() {
            self.regenerate_all();
        }
    }

    /// Installs the built-in decoder for `arch`, if available.
    pub fn set_architecture(&mut self, arch: Architecture) {
        let decoder = builtin_decoder(arch);
        if decoder.is_none() {
            log::warn!("No built-in decoder for {}", arch.label());
        }
        self.set_decoder(decoder);
    }

    /// Enables or disables the annotation column.
    pub fn set_disassembly(&mut self, enabled: bool) {
        if self.disassembly != enabled {
            self.disassembly = enabled;
            if !self.store.is_empty() {
                self.regenerate_all();
            }
        }
    }

    #[must_use]
    pub const fn disassembly(&self) -> bool {
        self.disassembly
    }

    #[must_use]
    pub const fn has_decoder(&self) -> bool {
        self.decoder.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::DecodedInstruction;
    use crate::lines::NO_DATA_LINE;

    struct OneByteDecoder;

    impl InstructionDecoder for OneByteDecoder {
        fn decode(&self, bytes: &[u8], _offset: u64) -> Option<DecodedInstruction> {
            bytes.first().map(|b| DecodedInstruction {
                text: format!("db 0x{b:02x}"),
                length: 1,
            })
        }
    }

    #[test]
    fn test_new_has_no_lines() {
        // Arrange & Act
        let hd = HexData::new();

        // Assert
        assert!(hd.hex_lines().is_empty());
        assert_eq!(hd.bytes_per_line(), 16);
        assert!(!hd.disassembly());
    }

    #[test]
    fn test_edit_byte_regenerates() {
        // Arrange
        let mut hd = HexData::from_bytes(vec![0u8; 4]);

        // Act
        let res = hd.edit_byte(2, 0xAB);

        // Assert
        assert!(res.is_ok());
        assert_eq!(hd.read_byte(2), 0xAB);
        assert!(hd.is_modified());
        assert!(hd.hex_lines()[0].starts_with("00000000  00 00 AB 00 "));
    }

    #[test]
    fn test_edit_bytes_stops_at_first_bad_offset() {
        // Arrange
        let mut hd = HexData::from_bytes(vec![0u8; 4]);

        // Act
        let res = hd.edit_bytes([(0, 0x11), (3, 0x44), (9, 0x99), (1, 0x22)]);

        // Assert
        assert!(res.is_err_and(|e| e.is_out_of_bounds()));
        assert_eq!(hd.data(), &[0x11, 0x00, 0x00, 0x44]);
        assert!(hd.hex_lines()[0].starts_with("00000000  11 00 00 44 "));
    }

    #[test]
    fn test_edit_byte_rejected_keeps_lines() {
        // Arrange
        let mut hd = HexData::from_bytes(vec![1, 2]);
        let before = hd.hex_lines().to_vec();

        // Act
        let res = hd.edit_byte(2, 0xFF);

        // Assert
        assert!(res.is_err());
        assert_eq!(hd.hex_lines(), before.as_slice());
        assert!(!hd.is_modified());
    }

    #[test]
    fn test_edit_on_empty_always_fails() {
        // Arrange
        let mut hd = HexData::new();

        // Act & Assert
        assert!(hd.edit_byte(0, 1).is_err());
        assert_eq!(hd.file_size(), 0);
    }

    #[test]
    fn test_load_error_line() {
        // Arrange
        let mut hd = HexData::from_bytes(vec![1, 2, 3]);

        // Act
        let res = hd.load_file("build/missing/nothing-here.bin");

        // Assert
        assert!(res.is_err());
        assert_eq!(hd.file_size(), 0);
        assert_eq!(hd.hex_lines(), &[LOAD_ERROR_LINE.to_string()]);
    }

    #[test]
    fn test_clear_drops_lines() {
        // Arrange
        let mut hd = HexData::from_bytes(vec![1, 2, 3]);

        // Act
        hd.clear();

        // Assert
        assert_eq!(hd.file_size(), 0);
        assert!(hd.hex_lines().is_empty());
        assert!(hd.header_line().is_empty());
    }

    #[test]
    fn test_empty_bytes_sentinel() {
        // Arrange & Act
        let hd = HexData::from_bytes(Vec::new());

        // Assert
        assert_eq!(hd.hex_lines(), &[NO_DATA_LINE.to_string()]);
    }

    #[test]
    fn test_set_bytes_per_line() {
        // Arrange
        let mut hd = HexData::from_bytes(vec![0u8; 100]);

        // Act
        hd.set_bytes_per_line(32);

        // Assert
        assert_eq!(hd.bytes_per_line(), 32);
        assert_eq!(hd.hex_lines().len(), 4);

        // Act
        hd.set_bytes_per_line(3);

        // Assert
        assert_eq!(hd.bytes_per_line(), 8);
        assert_eq!(hd.hex_lines().len(), 13);
    }

    #[test]
    fn test_disassembly_toggle() {
        // Arrange
        let mut hd = HexData::from_bytes(vec![0x90u8; 20]);
        hd.set_decoder(Some(Box::new(OneByteDecoder)));
        assert_eq!(hd.disassembly_lines(), &["", ""]);

        // Act
        hd.set_disassembly(true);

        // Assert
        assert_eq!(hd.disassembly_lines(), &["db 0x90", "db 0x90"]);

        // Act
        hd.set_disassembly(false);

        // Assert
        assert_eq!(hd.disassembly_lines(), &["", ""]);
    }
}
