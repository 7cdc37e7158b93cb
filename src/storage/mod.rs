//! Storage abstraction for index artifacts.
//!
//! Every artifact (lexicon snapshot, forward index, inverted index, barrel
//! files and barrel metadata) is a named file inside a [`Storage`]. Handles are
//! opened per operation and dropped before the operation returns.
//!
//! ## FileStorage
//! - A directory on disk, created on demand
//!
//! ## MemoryStorage
//! - In-memory storage for testing
//!
//! # Example
//!
//! ```
//! use std::io::{Read, Write};
//!
//! use barrel_index::storage::{MemoryStorage, Storage, StorageOutput};
//!
//! # fn main() -> barrel_index::error::Result<()> {
//! let storage = MemoryStorage::new();
//! let mut output = storage.create_output("notes.txt")?;
//! output.write_all(b"hello")?;
//! output.close()?;
//!
//! let mut text = String::new();
//! storage.open_input("notes.txt")?.read_to_string(&mut text)?;
//! assert_eq!(text, "hello");
//! # Ok(())
//! # }
//! ```

pub mod file;
pub mod memory;
pub mod traits;

pub use file::FileStorage;
pub use memory::MemoryStorage;
pub use traits::*;
