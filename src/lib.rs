//! # Barrel Index
//!
//! Builds a disk-resident, term-addressable index from a document corpus.
//!
//! ## Features
//!
//! - Text normalization with stop words, validity filtering and a Porter stemmer
//! - Sequential term ids with corpus frequencies and a CSV snapshot
//! - Per-document forward index with binary persistence
//! - Inverted index partitioned into term-id range barrels for lazy loading
//! - Pluggable storage backends
//!
//! ## Example
//!
//! ```
//! use barrel_index::prelude::*;
//!
//! # fn main() -> barrel_index::error::Result<()> {
//! let storage = MemoryStorage::new();
//! let barrels = MemoryStorage::new();
//! let builder = IndexBuilder::new(IndexConfig::default())?;
//! let built = builder.build(
//!     vec![
//!         SourceDocument::new("p1", "", "", "Spike proteins bind host receptors"),
//!         SourceDocument::new("p2", "", "", "Host cells express receptors"),
//!     ],
//!     &storage,
//!     Some(&barrels as &dyn Storage),
//! )?;
//!
//! let receptor = built.lexicon.get_word_id("receptor");
//! assert_eq!(built.inverted.get_terms(receptor).map(|p| p.len()), Some(2));
//! # Ok(())
//! # }
//! ```

pub mod analysis;
pub mod codec;
pub mod config;
pub mod error;
pub mod forward;
pub mod inverted;
pub mod lexicon;
pub mod pipeline;
pub mod storage;

pub mod prelude {
    pub use crate::config::{IndexConfig, PreprocessConfig};
    pub use crate::error::{IndexError, Result};
    pub use crate::forward::{DocumentRecord, ForwardIndex, NumericDocId, TermPosting};
    pub use crate::inverted::{BarrelMetadata, InvertedIndex, Posting};
    pub use crate::lexicon::{Lexicon, NOT_FOUND, ReverseLexicon, TermId};
    pub use crate::pipeline::{BuildReport, IndexBuilder, SourceDocument};
    pub use crate::storage::{FileStorage, MemoryStorage, Storage};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
