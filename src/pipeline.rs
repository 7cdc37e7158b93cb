//! Single-pass index construction from an ordered document sequence.
//!
//! [`IndexBuilder::build`] turns the documents handed over by an ingestion
//! layer into the four artifacts: lexicon snapshot, forward index, full
//! inverted index and, when enabled, a barrel partition of the inverted
//! index.
//!
//! Numeric doc ids are assigned once, by the forward index, and the inverted
//! index is built from the forward index using exactly those ids.
//!
//! # Examples
//!
//! ```
//! use barrel_index::config::IndexConfig;
//! use barrel_index::pipeline::{IndexBuilder, SourceDocument};
//! use barrel_index::storage::MemoryStorage;
//!
//! let storage = MemoryStorage::new();
//! let builder = IndexBuilder::new(IndexConfig::default()).unwrap();
//! let built = builder
//!     .build(
//!         vec![SourceDocument::new("d1", "Title", "", "Viral infections spread quickly")],
//!         &storage,
//!         None,
//!     )
//!     .unwrap();
//!
//! assert_eq!(built.report.documents_indexed, 1);
//! assert!(built.lexicon.contains("infect"));
//! ```

use serde::{Deserialize, Serialize};

use crate::analysis::preprocessor::TextPreprocessor;
use crate::config::IndexConfig;
use crate::error::Result;
use crate::forward::{ForwardIndex, ForwardIndexStats};
use crate::inverted::{BarrelMetadata, InvertedIndex, InvertedIndexStats};
use crate::lexicon::{Lexicon, NOT_FOUND, TermId};
use crate::storage::Storage;

/// One input document as supplied by the ingestion layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDocument {
    pub doc_id: String,
    pub title: String,
    pub abstract_text: String,
    /// Text that is tokenized and indexed.
    pub raw_text: String,
}

impl SourceDocument {
    pub fn new(
        doc_id: impl Into<String>,
        title: impl Into<String>,
        abstract_text: impl Into<String>,
        raw_text: impl Into<String>,
    ) -> Self {
        SourceDocument {
            doc_id: doc_id.into(),
            title: title.into(),
            abstract_text: abstract_text.into(),
            raw_text: raw_text.into(),
        }
    }
}

/// What a build did.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildReport {
    pub documents_indexed: usize,
    pub duplicates_skipped: usize,
    pub empty_skipped: usize,
    pub lexicon_size: usize,
    pub forward: ForwardIndexStats,
    pub inverted: InvertedIndexStats,
    /// Retained barrels, empty when no partition was written.
    pub barrels: Vec<BarrelMetadata>,
}

/// The in-memory structures of a finished build.
#[derive(Debug, Clone)]
pub struct BuiltIndex {
    pub lexicon: Lexicon,
    pub forward: ForwardIndex,
    pub inverted: InvertedIndex,
    pub report: BuildReport,
}

/// Drives preprocessing, id assignment and persistence.
#[derive(Debug)]
pub struct IndexBuilder {
    config: IndexConfig,
    preprocessor: TextPreprocessor,
}

impl IndexBuilder {
    /// Create a builder. The configuration is validated first.
    pub fn new(config: IndexConfig) -> Result<Self> {
        config.validate()?;
        let preprocessor = TextPreprocessor::new(config.preprocess.clone());
        Ok(IndexBuilder {
            config,
            preprocessor,
        })
    }

    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    /// Build with a fresh lexicon.
    ///
    /// Artifacts are written to `storage`; barrels go to `barrel_storage`
    /// when one is given and barrel creation is enabled.
    pub fn build<I>(
        &self,
        documents: I,
        storage: &dyn Storage,
        barrel_storage: Option<&dyn Storage>,
    ) -> Result<BuiltIndex>
    where
        I: IntoIterator<Item = SourceDocument>,
    {
        self.build_from(Lexicon::new(), documents, storage, barrel_storage)
    }

    /// Build on top of an existing lexicon, e.g. one reloaded from a
    /// snapshot. Known words keep their ids and new words continue the
    /// numbering.
    pub fn build_from<I>(
        &self,
        mut lexicon: Lexicon,
        documents: I,
        storage: &dyn Storage,
        barrel_storage: Option<&dyn Storage>,
    ) -> Result<BuiltIndex>
    where
        I: IntoIterator<Item = SourceDocument>,
    {
        let limit = self.config.max_documents.unwrap_or(usize::MAX);
        let mut forward = ForwardIndex::new();
        let mut duplicates_skipped = 0;
        let mut empty_skipped = 0;

        for document in documents.into_iter().take(limit) {
            if forward.numeric_id(&document.doc_id).is_some() {
                log::warn!("document {} already indexed, skipping", document.doc_id);
                duplicates_skipped += 1;
                continue;
            }

            let tokens = self.preprocessor.process(&document.raw_text);
            if tokens.is_empty() {
                log::warn!("document {} has no indexable tokens, skipping", document.doc_id);
                empty_skipped += 1;
                continue;
            }

            let term_ids: Vec<TermId> = tokens
                .iter()
                .map(|token| lexicon.add_word(token, 1))
                .filter(|id| *id != NOT_FOUND)
                .collect();

            match forward.add_document(
                &document.doc_id,
                &document.title,
                &document.abstract_text,
                &term_ids,
            ) {
                Ok(_) => {}
                Err(e) if e.is_skippable() => duplicates_skipped += 1,
                Err(e) => return Err(e),
            }
        }

        let inverted = InvertedIndex::from_forward(&forward)?;
        let reverse = lexicon.build_reverse()?;

        lexicon.save(storage, &self.config.lexicon_file)?;
        forward.save_to_binary(storage, &self.config.forward_index_file)?;
        inverted.save_to_binary(storage, &self.config.inverted_index_file, &reverse)?;

        let barrels = match barrel_storage {
            Some(barrel_storage) if self.config.create_barrels && !inverted.is_empty() => {
                inverted.create_barrels(barrel_storage, &reverse, self.config.barrel_count)?
            }
            Some(_) if self.config.create_barrels => {
                log::warn!("no terms were indexed, skipping barrel creation");
                Vec::new()
            }
            _ => Vec::new(),
        };

        let report = BuildReport {
            documents_indexed: forward.len(),
            duplicates_skipped,
            empty_skipped,
            lexicon_size: lexicon.len(),
            forward: forward.statistics(),
            inverted: inverted.statistics(),
            barrels,
        };
        log::info!(
            "indexed {} documents ({} duplicates, {} empty skipped), {} words",
            report.documents_indexed,
            report.duplicates_skipped,
            report.empty_skipped,
            report.lexicon_size
        );

        Ok(BuiltIndex {
            lexicon,
            forward,
            inverted,
            report,
        })
    }
}
