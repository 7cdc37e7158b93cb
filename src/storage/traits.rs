//! Storage abstraction trait and common types.

use std::io::{Read, Write};

use thiserror::Error;

use crate::error::{IndexError, Result};

/// A flat namespace of named files.
pub trait Storage: Send + Sync + std::fmt::Debug {
    /// Open a file for reading.
    fn open_input(&self, name: &str) -> Result<Box<dyn StorageInput>>;

    /// Create (or truncate) a file for writing.
    fn create_output(&self, name: &str) -> Result<Box<dyn StorageOutput>>;

    /// Check if a file exists.
    fn file_exists(&self, name: &str) -> bool;

    /// Delete a file. Deleting a missing file is not an error.
    fn delete_file(&self, name: &str) -> Result<()>;

    /// List all files in the storage, sorted by name.
    fn list_files(&self) -> Result<Vec<String>>;

    /// Get the size of a file in bytes.
    fn file_size(&self, name: &str) -> Result<u64>;
}

/// A trait for reading data from storage.
pub trait StorageInput: Read + Send + std::fmt::Debug {
    /// Get the size of the input stream.
    fn size(&self) -> Result<u64>;
}

/// A trait for writing data to storage.
pub trait StorageOutput: Write + Send + std::fmt::Debug {
    /// Flush and sync the output to storage.
    fn flush_and_sync(&mut self) -> Result<()>;

    /// Bytes written so far.
    fn position(&self) -> u64;

    /// Flush, sync and finish the output. The file is complete only after
    /// this returns `Ok`.
    fn close(&mut self) -> Result<()>;
}

impl StorageOutput for Box<dyn StorageOutput> {
    fn flush_and_sync(&mut self) -> Result<()> {
        self.as_mut().flush_and_sync()
    }

    fn position(&self) -> u64 {
        self.as_ref().position()
    }

    fn close(&mut self) -> Result<()> {
        self.as_mut().close()
    }
}

impl StorageInput for Box<dyn StorageInput> {
    fn size(&self) -> Result<u64> {
        self.as_ref().size()
    }
}

/// Storage-specific error types.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// File not found.
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// Directory could not be created or is not a directory.
    #[error("Invalid directory: {0}")]
    InvalidDirectory(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    IoError(String),
}

impl From<StorageError> for IndexError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::FileNotFound(name) => IndexError::missing_file(name),
            other => IndexError::storage(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_error_conversion() {
        let err: IndexError = StorageError::FileNotFound("barrel_0.bin".to_string()).into();
        assert!(matches!(err, IndexError::MissingFile(ref name) if name == "barrel_0.bin"));

        let err: IndexError = StorageError::IoError("disk full".to_string()).into();
        assert!(matches!(err, IndexError::Storage(_)));
    }

    #[test]
    fn test_storage_error_display() {
        assert_eq!(
            StorageError::FileNotFound("x".to_string()).to_string(),
            "File not found: x"
        );
    }
}
