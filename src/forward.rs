//! Per-document term frequency index.
//!
//! Documents are kept in insertion order. A document's position in that
//! order is its numeric doc id, the key used inside inverted-index posting
//! lists. The binary artifact stores documents in the same order so a
//! reload reproduces every numeric id.
//!
//! # Binary layout
//!
//! ```text
//! total_documents: u32, total_terms: u64, next_numeric_id: u32
//! doc_count: u32
//! per document:
//!     doc_id: string, title: string, abstract: string
//!     doc_length: u32, term_count: u32
//!     term_count × (term_id: u32, frequency: u32)
//! ```

use std::collections::BTreeMap;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::codec::{BinaryReader, BinaryWriter};
use crate::error::{IndexError, Result};
use crate::lexicon::TermId;
use crate::storage::Storage;

/// Sequential document number assigned in insertion order.
pub type NumericDocId = u32;

/// Occurrences of one term in one document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermPosting {
    pub term_id: TermId,
    pub frequency: u32,
}

/// A stored document with its aggregated terms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRecord {
    pub doc_id: String,
    pub title: String,
    pub abstract_text: String,
    /// Term occurrences including repeats.
    pub doc_length: u32,
    /// Unique per term id, ascending by term id.
    pub terms: Vec<TermPosting>,
}

impl DocumentRecord {
    /// Frequency of `term_id` in this document, 0 when absent.
    pub fn term_frequency(&self, term_id: TermId) -> u32 {
        self.terms
            .binary_search_by_key(&term_id, |posting| posting.term_id)
            .map_or(0, |i| self.terms[i].frequency)
    }

    pub fn unique_terms(&self) -> usize {
        self.terms.len()
    }
}

/// Summary numbers for a forward index.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForwardIndexStats {
    pub total_documents: u32,
    pub total_terms: u64,
    pub average_doc_length: f64,
    pub average_unique_terms: f64,
}

/// Append-only forward index keyed by string doc id.
#[derive(Debug, Clone, Default)]
pub struct ForwardIndex {
    documents: Vec<DocumentRecord>,
    numeric_ids: AHashMap<String, NumericDocId>,
    total_terms: u64,
}

impl ForwardIndex {
    pub fn new() -> Self {
        ForwardIndex::default()
    }

    /// Aggregate `term_ids` into sorted postings and store the document under
    /// the next numeric doc id, which is returned.
    ///
    /// A `doc_id` already present is rejected with [`IndexError::DuplicateKey`]
    /// and leaves the index untouched.
    pub fn add_document(
        &mut self,
        doc_id: &str,
        title: &str,
        abstract_text: &str,
        term_ids: &[TermId],
    ) -> Result<NumericDocId> {
        if self.numeric_ids.contains_key(doc_id) {
            log::warn!("document {doc_id} already exists, skipping");
            return Err(IndexError::duplicate_key(doc_id));
        }

        let numeric_id = self.next_numeric_id();
        if numeric_id == NumericDocId::MAX {
            return Err(IndexError::invalid_operation("numeric doc id space exhausted"));
        }
        let doc_length = u32::try_from(term_ids.len()).map_err(|_| {
            IndexError::invalid_argument(format!("document {doc_id} has too many terms"))
        })?;

        let mut counts: BTreeMap<TermId, u32> = BTreeMap::new();
        for &term_id in term_ids {
            *counts.entry(term_id).or_insert(0) += 1;
        }
        let terms = counts
            .into_iter()
            .map(|(term_id, frequency)| TermPosting { term_id, frequency })
            .collect();

        self.documents.push(DocumentRecord {
            doc_id: doc_id.to_string(),
            title: title.to_string(),
            abstract_text: abstract_text.to_string(),
            doc_length,
            terms,
        });
        self.numeric_ids.insert(doc_id.to_string(), numeric_id);
        self.total_terms += u64::from(doc_length);

        Ok(numeric_id)
    }

    pub fn get_document(&self, doc_id: &str) -> Option<&DocumentRecord> {
        let numeric_id = *self.numeric_ids.get(doc_id)?;
        self.documents.get(numeric_id as usize)
    }

    pub fn get_document_terms(&self, doc_id: &str) -> Option<&[TermPosting]> {
        self.get_document(doc_id).map(|doc| doc.terms.as_slice())
    }

    /// Length of the document, 0 when absent.
    pub fn get_document_length(&self, doc_id: &str) -> u32 {
        self.get_document(doc_id).map_or(0, |doc| doc.doc_length)
    }

    /// Frequency of `term_id` in `doc_id`, 0 when either is absent.
    pub fn get_term_frequency(&self, doc_id: &str, term_id: TermId) -> u32 {
        self.get_document(doc_id)
            .map_or(0, |doc| doc.term_frequency(term_id))
    }

    /// Numeric doc id assigned to `doc_id`.
    pub fn numeric_id(&self, doc_id: &str) -> Option<NumericDocId> {
        self.numeric_ids.get(doc_id).copied()
    }

    pub fn document_by_numeric_id(&self, numeric_id: NumericDocId) -> Option<&DocumentRecord> {
        self.documents.get(numeric_id as usize)
    }

    /// Documents with their numeric ids, ascending.
    pub fn documents(&self) -> impl Iterator<Item = (NumericDocId, &DocumentRecord)> {
        (0..).zip(self.documents.iter())
    }

    /// Copy of the string doc id → numeric doc id mapping.
    pub fn doc_id_map(&self) -> AHashMap<String, NumericDocId> {
        self.numeric_ids.clone()
    }

    /// The numeric id the next added document will receive.
    pub fn next_numeric_id(&self) -> NumericDocId {
        self.documents.len() as NumericDocId
    }

    pub fn total_documents(&self) -> u32 {
        self.documents.len() as u32
    }

    /// Term occurrences over all documents.
    pub fn total_terms(&self) -> u64 {
        self.total_terms
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn average_doc_length(&self) -> f64 {
        if self.documents.is_empty() {
            0.0
        } else {
            self.total_terms as f64 / self.documents.len() as f64
        }
    }

    pub fn statistics(&self) -> ForwardIndexStats {
        let unique: usize = self.documents.iter().map(DocumentRecord::unique_terms).sum();
        let average_unique_terms = if self.documents.is_empty() {
            0.0
        } else {
            unique as f64 / self.documents.len() as f64
        };

        ForwardIndexStats {
            total_documents: self.total_documents(),
            total_terms: self.total_terms,
            average_doc_length: self.average_doc_length(),
            average_unique_terms,
        }
    }

    pub fn clear(&mut self) {
        self.documents.clear();
        self.numeric_ids.clear();
        self.total_terms = 0;
    }

    /// Write the binary artifact.
    pub fn save_to_binary(&self, storage: &dyn Storage, name: &str) -> Result<()> {
        let mut writer = BinaryWriter::new(storage.create_output(name)?);

        writer.write_u32(self.total_documents())?;
        writer.write_u64(self.total_terms)?;
        writer.write_u32(self.next_numeric_id())?;
        writer.write_len(self.documents.len())?;

        for doc in &self.documents {
            writer.write_string(&doc.doc_id)?;
            writer.write_string(&doc.title)?;
            writer.write_string(&doc.abstract_text)?;
            writer.write_u32(doc.doc_length)?;
            writer.write_len(doc.terms.len())?;
            for posting in &doc.terms {
                writer.write_u32(posting.term_id)?;
                writer.write_u32(posting.frequency)?;
            }
        }

        let bytes = writer.position();
        writer.close()?;

        log::info!(
            "saved forward index with {} documents to {name} ({bytes} bytes)",
            self.documents.len()
        );
        Ok(())
    }

    /// Replace the contents with a binary artifact.
    pub fn load_from_binary(&mut self, storage: &dyn Storage, name: &str) -> Result<()> {
        let mut reader = BinaryReader::new(storage.open_input(name)?)?;
        self.clear();

        let header_documents = reader.read_u32()?;
        let header_terms = reader.read_u64()?;
        let header_next_id = reader.read_u32()?;
        let doc_count = reader.read_u32()?;

        for _ in 0..doc_count {
            let doc_id = reader.read_string()?;
            let title = reader.read_string()?;
            let abstract_text = reader.read_string()?;
            let doc_length = reader.read_u32()?;
            let term_count = reader.read_u32()?;

            let mut terms: Vec<TermPosting> = Vec::with_capacity(term_count.min(1 << 16) as usize);
            for _ in 0..term_count {
                let term_id = reader.read_u32()?;
                let frequency = reader.read_u32()?;
                if terms
                    .last()
                    .is_some_and(|prev| prev.term_id >= term_id)
                {
                    return Err(IndexError::corrupt(format!(
                        "terms of document {doc_id} are not strictly ascending"
                    )));
                }
                terms.push(TermPosting { term_id, frequency });
            }

            let numeric_id = self.next_numeric_id();
            if self.numeric_ids.insert(doc_id.clone(), numeric_id).is_some() {
                return Err(IndexError::corrupt(format!(
                    "document {doc_id} appears twice in {name}"
                )));
            }
            self.total_terms += u64::from(doc_length);
            self.documents.push(DocumentRecord {
                doc_id,
                title,
                abstract_text,
                doc_length,
                terms,
            });
        }

        if header_documents != doc_count
            || header_next_id != doc_count
            || header_terms != self.total_terms
        {
            log::warn!(
                "forward index header of {name} disagrees with its contents \
                 ({header_documents} documents, {header_terms} terms, next id {header_next_id}), \
                 using recomputed totals"
            );
        }

        log::info!(
            "loaded forward index with {} documents from {name}",
            self.documents.len()
        );
        Ok(())
    }
}
