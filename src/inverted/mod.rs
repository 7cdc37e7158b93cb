//! Term id → posting list index, whole or partitioned into barrels.
//!
//! An index is either *full*, holding every term built from the forward
//! index or loaded from the full binary artifact, or *partitioned*, holding
//! only barrel metadata plus at most one resident barrel. Partitioned lookups
//! never fetch on a miss: resolve the owning barrel with
//! [`InvertedIndex::load_barrel_for_word`] before calling
//! [`InvertedIndex::get_terms`].
//!
//! # Binary layout
//!
//! ```text
//! word_count: u32
//! per term:
//!     term_id: u32, word: string, posting_count: u32
//!     posting_count × (doc_id: u32, frequency: u32)
//! ```
//!
//! # Examples
//!
//! ```
//! use barrel_index::forward::TermPosting;
//! use barrel_index::inverted::InvertedIndex;
//!
//! let mut index = InvertedIndex::new();
//! index.add_document(0, &[TermPosting { term_id: 3, frequency: 2 }]).unwrap();
//! index.add_document(1, &[TermPosting { term_id: 3, frequency: 1 }]).unwrap();
//!
//! let postings = index.get_terms(3).unwrap();
//! assert_eq!(postings.len(), 2);
//! assert_eq!(postings[0].doc_id, 0);
//! ```

pub mod barrel;

use std::sync::Arc;

use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};

use crate::codec::{BinaryReader, BinaryWriter};
use crate::error::{IndexError, Result};
use crate::forward::{ForwardIndex, NumericDocId, TermPosting};
use crate::lexicon::{ReverseLexicon, TermId};
use crate::storage::{Storage, StorageInput, StorageOutput};

pub use barrel::{BarrelCatalog, BarrelMetadata, METADATA_FILE, barrel_file_name, partition_ranges};

/// Occurrences of a term in one document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Posting {
    pub doc_id: NumericDocId,
    pub frequency: u32,
}

/// Term id → posting list.
pub type PostingMap = AHashMap<TermId, Vec<Posting>>;

/// Summary numbers over the resident postings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InvertedIndexStats {
    pub unique_terms: usize,
    pub total_postings: usize,
    pub average_docs_per_term: f64,
    pub min_docs_per_term: usize,
    pub max_docs_per_term: usize,
}

/// What a partitioned index currently holds in memory.
#[derive(Debug, Clone, Default)]
enum BarrelSlot {
    #[default]
    Empty,
    Loaded {
        barrel_id: u32,
        postings: PostingMap,
    },
}

#[derive(Debug, Clone)]
enum IndexSource {
    Full {
        postings: PostingMap,
        documents: AHashSet<NumericDocId>,
    },
    Barrels {
        storage: Arc<dyn Storage>,
        catalog: BarrelCatalog,
        slot: BarrelSlot,
    },
}

impl Default for IndexSource {
    fn default() -> Self {
        IndexSource::Full {
            postings: PostingMap::default(),
            documents: AHashSet::default(),
        }
    }
}

/// The inverted index.
#[derive(Debug, Clone, Default)]
pub struct InvertedIndex {
    source: IndexSource,
}

impl InvertedIndex {
    /// Create an empty full index.
    pub fn new() -> Self {
        InvertedIndex::default()
    }

    /// Invert `forward`, feeding documents in numeric-id order with the ids
    /// the forward index assigned.
    pub fn from_forward(forward: &ForwardIndex) -> Result<Self> {
        let mut index = InvertedIndex::new();
        for (numeric_id, doc) in forward.documents() {
            index.add_document(numeric_id, &doc.terms)?;
        }
        Ok(index)
    }

    /// Append `(numeric_doc_id, frequency)` to the list of every term in
    /// `terms`, in call order.
    ///
    /// A numeric doc id seen before, or a term repeated within `terms`, is
    /// rejected with [`IndexError::DuplicateKey`] before anything is appended.
    pub fn add_document(&mut self, numeric_doc_id: NumericDocId, terms: &[TermPosting]) -> Result<()> {
        let IndexSource::Full { postings, documents } = &mut self.source else {
            return Err(IndexError::invalid_operation(
                "cannot add documents to a barrel-partitioned index",
            ));
        };

        if documents.contains(&numeric_doc_id) {
            log::warn!("numeric doc id {numeric_doc_id} already inverted, skipping");
            return Err(IndexError::duplicate_key(format!("numeric doc id {numeric_doc_id}")));
        }
        let mut seen = AHashSet::with_capacity(terms.len());
        if let Some(repeat) = terms.iter().find(|term| !seen.insert(term.term_id)) {
            log::warn!(
                "term {} listed twice for numeric doc id {numeric_doc_id}, skipping",
                repeat.term_id
            );
            return Err(IndexError::duplicate_key(format!(
                "term {} in numeric doc id {numeric_doc_id}",
                repeat.term_id
            )));
        }

        documents.insert(numeric_doc_id);
        for term in terms {
            postings.entry(term.term_id).or_default().push(Posting {
                doc_id: numeric_doc_id,
                frequency: term.frequency,
            });
        }
        Ok(())
    }

    /// Posting list of `term_id` if it is resident.
    pub fn get_terms(&self, term_id: TermId) -> Option<&[Posting]> {
        match &self.source {
            IndexSource::Full { postings, .. } => postings.get(&term_id).map(Vec::as_slice),
            IndexSource::Barrels { slot, .. } => match slot {
                BarrelSlot::Loaded {
                    barrel_id,
                    postings,
                } => {
                    let found = postings.get(&term_id).map(Vec::as_slice);
                    if found.is_none() {
                        log::debug!("term {term_id} not in resident barrel {barrel_id}");
                    }
                    found
                }
                BarrelSlot::Empty => {
                    log::debug!("term {term_id} requested with no barrel loaded");
                    None
                }
            },
        }
    }

    fn resident(&self) -> Option<&PostingMap> {
        match &self.source {
            IndexSource::Full { postings, .. } => Some(postings),
            IndexSource::Barrels {
                slot: BarrelSlot::Loaded { postings, .. },
                ..
            } => Some(postings),
            IndexSource::Barrels {
                slot: BarrelSlot::Empty,
                ..
            } => None,
        }
    }

    /// Number of resident terms.
    pub fn term_count(&self) -> usize {
        self.resident().map_or(0, |postings| postings.len())
    }

    pub fn is_empty(&self) -> bool {
        self.term_count() == 0
    }

    /// Resident term ids, ascending.
    pub fn term_ids(&self) -> Vec<TermId> {
        let mut ids: Vec<TermId> = self
            .resident()
            .map(|postings| postings.keys().copied().collect())
            .unwrap_or_default();
        ids.sort_unstable();
        ids
    }

    pub fn statistics(&self) -> InvertedIndexStats {
        let mut stats = InvertedIndexStats {
            unique_terms: 0,
            total_postings: 0,
            average_docs_per_term: 0.0,
            min_docs_per_term: 0,
            max_docs_per_term: 0,
        };
        let Some(postings) = self.resident().filter(|postings| !postings.is_empty()) else {
            return stats;
        };

        stats.unique_terms = postings.len();
        stats.min_docs_per_term = usize::MAX;
        for list in postings.values() {
            stats.total_postings += list.len();
            stats.min_docs_per_term = stats.min_docs_per_term.min(list.len());
            stats.max_docs_per_term = stats.max_docs_per_term.max(list.len());
        }
        stats.average_docs_per_term = stats.total_postings as f64 / postings.len() as f64;
        stats
    }

    /// Drop every posting and any barrel state, leaving an empty full index.
    pub fn clear(&mut self) {
        self.source = IndexSource::default();
    }

    /// True once barrel metadata has been loaded.
    pub fn is_partitioned(&self) -> bool {
        matches!(self.source, IndexSource::Barrels { .. })
    }

    /// Metadata of the known barrels; empty for a full index.
    pub fn barrels(&self) -> &[BarrelMetadata] {
        match &self.source {
            IndexSource::Barrels { catalog, .. } => catalog.barrels(),
            IndexSource::Full { .. } => &[],
        }
    }

    /// Id of the resident barrel.
    pub fn loaded_barrel(&self) -> Option<u32> {
        match &self.source {
            IndexSource::Barrels {
                slot: BarrelSlot::Loaded { barrel_id, .. },
                ..
            } => Some(*barrel_id),
            _ => None,
        }
    }

    /// The barrel whose range holds `term_id`.
    pub fn find_barrel_index(&self, term_id: TermId) -> Option<&BarrelMetadata> {
        match &self.source {
            IndexSource::Barrels { catalog, .. } => catalog.find(term_id),
            IndexSource::Full { .. } => None,
        }
    }

    /// Write every term in the full-index layout, ascending by id. Every term
    /// must have a word in `reverse`. A partitioned index holds at most one
    /// barrel and cannot be saved this way.
    pub fn save_to_binary(&self, storage: &dyn Storage, name: &str, reverse: &ReverseLexicon) -> Result<()> {
        let IndexSource::Full { postings, .. } = &self.source else {
            return Err(IndexError::invalid_operation(
                "only a full index can be saved as a single artifact",
            ));
        };
        let term_ids = self.term_ids();

        let mut writer = BinaryWriter::new(storage.create_output(name)?);
        write_terms(&mut writer, &term_ids, postings, reverse)?;
        let bytes = writer.position();
        writer.close()?;

        log::info!(
            "saved inverted index with {} terms to {name} ({bytes} bytes)",
            term_ids.len()
        );
        Ok(())
    }

    /// Replace the contents with a full-index artifact, returning the id →
    /// word mapping stored alongside the postings.
    pub fn load_from_binary(&mut self, storage: &dyn Storage, name: &str) -> Result<ReverseLexicon> {
        let mut reader = BinaryReader::new(storage.open_input(name)?)?;
        self.clear();

        let mut reverse = ReverseLexicon::new();
        let postings = read_terms(&mut reader, &mut reverse)?;
        let documents = postings
            .values()
            .flat_map(|list| list.iter().map(|posting| posting.doc_id))
            .collect();

        log::info!("loaded inverted index with {} terms from {name}", postings.len());
        self.source = IndexSource::Full {
            postings,
            documents,
        };
        Ok(reverse)
    }

    /// Split the full index into `n` range barrels written to `storage`,
    /// followed by the metadata file. Returns the retained barrels.
    ///
    /// Any previous metadata in `storage` is removed first, and barrel files
    /// written by a failed call are deleted again, so a failure never leaves
    /// a loadable partition behind. The index itself is left unchanged.
    pub fn create_barrels(
        &self,
        storage: &dyn Storage,
        reverse: &ReverseLexicon,
        n: u32,
    ) -> Result<Vec<BarrelMetadata>> {
        if n == 0 {
            return Err(IndexError::invalid_argument("barrel count must be at least 1"));
        }
        let IndexSource::Full { postings, .. } = &self.source else {
            return Err(IndexError::invalid_operation(
                "barrels can only be created from a full index",
            ));
        };
        let term_ids = self.term_ids();
        let (Some(&min_id), Some(&max_id)) = (term_ids.first(), term_ids.last()) else {
            return Err(IndexError::invalid_operation(
                "cannot create barrels from an empty inverted index",
            ));
        };
        if let Some(&orphan) = term_ids.iter().find(|id| !reverse.contains(**id)) {
            return Err(IndexError::inconsistent_state(format!(
                "term {orphan} has no word in the reverse lexicon"
            )));
        }

        storage.delete_file(METADATA_FILE)?;

        let mut written: Vec<BarrelMetadata> = Vec::new();
        let result = (|| {
            for (barrel_id, start_id, end_id) in partition_ranges(min_id, max_id, n)? {
                let barrel = BarrelMetadata::new(barrel_id, start_id, end_id);
                let lo = term_ids.partition_point(|id| *id < start_id);
                let hi = term_ids.partition_point(|id| *id <= end_id);
                let members = &term_ids[lo..hi];

                if members.is_empty() {
                    log::debug!("barrel {barrel_id} [{start_id}, {end_id}] holds no terms, skipping");
                    storage.delete_file(&barrel.filename)?;
                    continue;
                }

                written.push(barrel.clone());
                barrel::write_barrel(storage, &barrel, members, postings, reverse)?;
                log::debug!(
                    "wrote barrel {barrel_id} [{start_id}, {end_id}] with {} terms",
                    members.len()
                );
            }
            BarrelCatalog::new(written.clone()).save(storage)
        })();

        if let Err(e) = result {
            for barrel in &written {
                if let Err(cleanup) = storage.delete_file(&barrel.filename) {
                    log::warn!("could not remove partial barrel {}: {cleanup}", barrel.filename);
                }
            }
            return Err(e);
        }

        log::info!(
            "created {} of {n} barrels over term ids [{min_id}, {max_id}]",
            written.len()
        );
        Ok(written)
    }

    /// Switch to partitioned mode using the metadata in `storage`. Only the
    /// metadata file is read; no barrel is resident afterwards.
    pub fn load_barrel_metadata(&mut self, storage: Arc<dyn Storage>) -> Result<()> {
        let catalog = BarrelCatalog::load(storage.as_ref())?;
        log::info!("loaded metadata for {} barrels", catalog.len());

        self.source = IndexSource::Barrels {
            storage,
            catalog,
            slot: BarrelSlot::Empty,
        };
        Ok(())
    }

    /// Make the barrel owning `term_id` the resident one, replacing whatever
    /// was loaded before, and record its words into `reverse`. Does nothing
    /// when that barrel is already resident.
    pub fn load_barrel_for_word(&mut self, term_id: TermId, reverse: &mut ReverseLexicon) -> Result<()> {
        let IndexSource::Barrels {
            storage,
            catalog,
            slot,
        } = &mut self.source
        else {
            return Err(IndexError::invalid_operation(
                "barrel metadata has not been loaded",
            ));
        };

        let barrel = catalog
            .find(term_id)
            .ok_or_else(|| IndexError::not_found(format!("no barrel covers term id {term_id}")))?;

        if let BarrelSlot::Loaded { barrel_id, .. } = slot {
            if *barrel_id == barrel.barrel_id {
                log::debug!("barrel {barrel_id} already resident for term {term_id}");
                return Ok(());
            }
        }

        *slot = BarrelSlot::Empty;
        let postings = barrel::read_barrel(&**storage, barrel, reverse)?;
        log::debug!(
            "loaded barrel {} with {} terms for term {term_id}",
            barrel.barrel_id,
            postings.len()
        );
        *slot = BarrelSlot::Loaded {
            barrel_id: barrel.barrel_id,
            postings,
        };
        Ok(())
    }
}

/// Write `word_count` then each of `term_ids` in the per-term layout.
pub(crate) fn write_terms<W: StorageOutput>(
    writer: &mut BinaryWriter<W>,
    term_ids: &[TermId],
    postings: &PostingMap,
    reverse: &ReverseLexicon,
) -> Result<()> {
    writer.write_len(term_ids.len())?;
    for &term_id in term_ids {
        let word = reverse.get(term_id).ok_or_else(|| {
            IndexError::inconsistent_state(format!("term {term_id} has no word in the reverse lexicon"))
        })?;
        let list = postings.get(&term_id).map(Vec::as_slice).unwrap_or_default();

        writer.write_u32(term_id)?;
        writer.write_string(word)?;
        writer.write_len(list.len())?;
        for posting in list {
            writer.write_u32(posting.doc_id)?;
            writer.write_u32(posting.frequency)?;
        }
    }
    Ok(())
}

/// Read `word_count` terms in the per-term layout, recording each word into
/// `reverse`.
pub(crate) fn read_terms<R: StorageInput>(
    reader: &mut BinaryReader<R>,
    reverse: &mut ReverseLexicon,
) -> Result<PostingMap> {
    let word_count = reader.read_u32()?;
    let mut postings = PostingMap::with_capacity(word_count.min(1 << 16) as usize);

    for _ in 0..word_count {
        let term_id = reader.read_u32()?;
        let word = reader.read_string()?;
        let posting_count = reader.read_u32()?;

        let mut list = Vec::with_capacity(posting_count.min(1 << 16) as usize);
        for _ in 0..posting_count {
            list.push(Posting {
                doc_id: reader.read_u32()?,
                frequency: reader.read_u32()?,
            });
        }

        if postings.insert(term_id, list).is_some() {
            return Err(IndexError::corrupt(format!("term {term_id} stored twice")));
        }
        reverse.insert(term_id, word);
    }
    Ok(postings)
}
