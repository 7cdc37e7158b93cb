//! Fixed-layout binary encoding shared by the index artifacts.
//!
//! Every integer is fixed-width little-endian and every string is a `u32`
//! byte length followed by the raw UTF-8 bytes, with no terminator, padding
//! or checksum.

use std::io;

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::error::{IndexError, Result};
use crate::storage::{StorageInput, StorageOutput};

/// A binary writer over a storage output.
pub struct BinaryWriter<W: StorageOutput> {
    writer: W,
    position: u64,
}

impl<W: StorageOutput> BinaryWriter<W> {
    /// Create a new binary writer.
    pub fn new(writer: W) -> Self {
        BinaryWriter {
            writer,
            position: 0,
        }
    }

    /// Write a u32 value (little-endian).
    pub fn write_u32(&mut self, value: u32) -> Result<()> {
        self.writer.write_u32::<LittleEndian>(value)?;
        self.position += 4;
        Ok(())
    }

    /// Write a u64 value (little-endian).
    pub fn write_u64(&mut self, value: u64) -> Result<()> {
        self.writer.write_u64::<LittleEndian>(value)?;
        self.position += 8;
        Ok(())
    }

    /// Write a collection length as a u32.
    pub fn write_len(&mut self, len: usize) -> Result<()> {
        let len = u32::try_from(len)
            .map_err(|_| IndexError::invalid_argument(format!("length {len} exceeds u32")))?;
        self.write_u32(len)
    }

    /// Write a string with a u32 byte-length prefix.
    pub fn write_string(&mut self, value: &str) -> Result<()> {
        let bytes = value.as_bytes();
        self.write_len(bytes.len())?;
        self.writer.write_all(bytes)?;
        self.position += bytes.len() as u64;
        Ok(())
    }

    /// Bytes written so far.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Flush and close the writer.
    pub fn close(mut self) -> Result<()> {
        self.writer.close()
    }
}

impl<W: StorageOutput> std::fmt::Debug for BinaryWriter<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BinaryWriter")
            .field("position", &self.position)
            .finish()
    }
}

/// A binary reader over a storage input.
pub struct BinaryReader<R: StorageInput> {
    reader: R,
    position: u64,
    file_size: u64,
}

impl<R: StorageInput> BinaryReader<R> {
    /// Create a new binary reader.
    pub fn new(reader: R) -> Result<Self> {
        let file_size = reader.size()?;
        Ok(BinaryReader {
            reader,
            position: 0,
            file_size,
        })
    }

    /// Read a u32 value (little-endian).
    pub fn read_u32(&mut self) -> Result<u32> {
        let value = self
            .reader
            .read_u32::<LittleEndian>()
            .map_err(|e| self.truncated(e, "u32"))?;
        self.position += 4;
        Ok(value)
    }

    /// Read a u64 value (little-endian).
    pub fn read_u64(&mut self) -> Result<u64> {
        let value = self
            .reader
            .read_u64::<LittleEndian>()
            .map_err(|e| self.truncated(e, "u64"))?;
        self.position += 8;
        Ok(value)
    }

    /// Read a u32-length-prefixed UTF-8 string.
    pub fn read_string(&mut self) -> Result<String> {
        let length = self.read_u32()? as u64;
        if length > self.remaining() {
            return Err(IndexError::corrupt(format!(
                "string of {length} bytes at offset {} runs past end of input",
                self.position
            )));
        }

        let mut bytes = vec![0u8; length as usize];
        self.reader
            .read_exact(&mut bytes)
            .map_err(|e| self.truncated(e, "string"))?;
        self.position += length;

        String::from_utf8(bytes)
            .map_err(|e| IndexError::corrupt(format!("invalid UTF-8 in string: {e}")))
    }

    /// Current read offset.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Bytes left before the end of the input.
    pub fn remaining(&self) -> u64 {
        self.file_size.saturating_sub(self.position)
    }

    /// Check if at end of input.
    pub fn is_eof(&self) -> bool {
        self.position >= self.file_size
    }

    fn truncated(&self, error: io::Error, what: &str) -> IndexError {
        if error.kind() == io::ErrorKind::UnexpectedEof {
            IndexError::corrupt(format!(
                "unexpected end of input reading {what} at offset {}",
                self.position
            ))
        } else {
            IndexError::Io(error)
        }
    }
}

impl<R: StorageInput> std::fmt::Debug for BinaryReader<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BinaryReader")
            .field("position", &self.position)
            .field("file_size", &self.file_size)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Read, Write};

    use super::*;
    use crate::storage::{MemoryStorage, Storage};

    #[test]
    fn test_layout_is_little_endian_without_terminator() {
        let storage = MemoryStorage::new();
        let mut writer = BinaryWriter::new(storage.create_output("t.bin").unwrap());
        writer.write_u32(1).unwrap();
        writer.write_u64(2).unwrap();
        writer.write_string("ab").unwrap();
        assert_eq!(writer.position(), 4 + 8 + 4 + 2);
        writer.close().unwrap();

        let mut input = storage.open_input("t.bin").unwrap();
        let mut bytes = Vec::new();
        input.read_to_end(&mut bytes).unwrap();
        assert_eq!(
            bytes,
            vec![1, 0, 0, 0, 2, 0, 0, 0, 0, 0, 0, 0, 2, 0, 0, 0, b'a', b'b']
        );
    }

    #[test]
    fn test_read_back() {
        let storage = MemoryStorage::new();
        let mut writer = BinaryWriter::new(storage.create_output("t.bin").unwrap());
        writer.write_u32(42).unwrap();
        writer.write_u64(u64::MAX).unwrap();
        writer.write_string("").unwrap();
        writer.write_string("héllo").unwrap();
        writer.close().unwrap();

        let mut reader = BinaryReader::new(storage.open_input("t.bin").unwrap()).unwrap();
        assert_eq!(reader.read_u32().unwrap(), 42);
        assert_eq!(reader.read_u64().unwrap(), u64::MAX);
        assert_eq!(reader.read_string().unwrap(), "");
        assert_eq!(reader.read_string().unwrap(), "héllo");
        assert!(reader.is_eof());
    }

    #[test]
    fn test_truncated_input_is_corrupt() {
        let storage = MemoryStorage::new();
        storage.put("short.bin", vec![1, 0]);

        let mut reader = BinaryReader::new(storage.open_input("short.bin").unwrap()).unwrap();
        let err = reader.read_u32().unwrap_err();
        assert!(matches!(err, IndexError::Corrupt(_)));
    }

    #[test]
    fn test_oversized_string_length_is_corrupt() {
        let storage = MemoryStorage::new();
        storage.put("bad.bin", vec![0xff, 0xff, 0, 0, b'x']);

        let mut reader = BinaryReader::new(storage.open_input("bad.bin").unwrap()).unwrap();
        let err = reader.read_string().unwrap_err();
        assert!(matches!(err, IndexError::Corrupt(_)));
    }
}
