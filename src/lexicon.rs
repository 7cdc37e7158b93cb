//! Word ↔ term id ↔ corpus frequency mapping.
//!
//! Term ids are handed out sequentially from 0 in order of first encounter.
//! A lexicon reloaded from a snapshot resumes numbering after the largest
//! loaded id, so gaps in the snapshot are never reused.
//!
//! # Examples
//!
//! ```
//! use barrel_index::lexicon::{Lexicon, NOT_FOUND};
//!
//! let mut lexicon = Lexicon::new();
//! let virus = lexicon.add_word("virus", 1);
//! assert_eq!(lexicon.add_word("virus", 2), virus);
//! assert_eq!(lexicon.get_frequency("virus"), 3);
//! assert_eq!(lexicon.get_word_id("bacteria"), NOT_FOUND);
//! ```

use ahash::AHashMap;

use crate::error::{IndexError, Result};
use crate::storage::{Storage, StorageOutput};

/// Identifier of a vocabulary term.
pub type TermId = u32;

/// Returned by lookups for absent words. Never assigned as a real id.
pub const NOT_FOUND: TermId = u32::MAX;

/// Header row of the lexicon snapshot.
pub const SNAPSHOT_HEADER: &str = "word,word_id,frequency";

/// Id and accumulated corpus frequency of one word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LexiconEntry {
    pub id: TermId,
    pub frequency: u32,
}

/// The term-id assigner. The id counter belongs to this instance alone.
#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    words: AHashMap<String, LexiconEntry>,
    next_id: TermId,
}

impl Lexicon {
    /// Create an empty lexicon whose first id is 0.
    pub fn new() -> Self {
        Lexicon::default()
    }

    /// Record `count` occurrences of `word`, allocating the next id on first
    /// sight. Returns the word's id.
    pub fn add_word(&mut self, word: &str, count: u32) -> TermId {
        if let Some(entry) = self.words.get_mut(word) {
            entry.frequency = entry.frequency.saturating_add(count);
            return entry.id;
        }

        if self.next_id == NOT_FOUND {
            log::warn!("term id space exhausted, cannot add {word:?}");
            return NOT_FOUND;
        }

        let id = self.next_id;
        self.next_id += 1;
        self.words.insert(
            word.to_string(),
            LexiconEntry {
                id,
                frequency: count,
            },
        );
        id
    }

    /// Id of `word`, or [`NOT_FOUND`].
    pub fn get_word_id(&self, word: &str) -> TermId {
        self.words.get(word).map_or(NOT_FOUND, |entry| entry.id)
    }

    /// Corpus frequency of `word`, or [`NOT_FOUND`].
    pub fn get_frequency(&self, word: &str) -> u32 {
        self.words.get(word).map_or(NOT_FOUND, |entry| entry.frequency)
    }

    /// Id and frequency of `word`.
    pub fn get_word_details(&self, word: &str) -> Option<LexiconEntry> {
        self.words.get(word).copied()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains_key(word)
    }

    /// The id the next new word will receive.
    pub fn next_id(&self) -> TermId {
        self.next_id
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Remove every word and restart numbering at 0.
    pub fn clear(&mut self) {
        self.words.clear();
        self.next_id = 0;
    }

    /// Iterate over all words in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, LexiconEntry)> {
        self.words.iter().map(|(word, entry)| (word.as_str(), *entry))
    }

    /// Entries sorted by descending frequency, ties broken by ascending id.
    pub fn sorted_by_frequency(&self) -> Vec<(&str, LexiconEntry)> {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort_by(|(_, a), (_, b)| b.frequency.cmp(&a.frequency).then(a.id.cmp(&b.id)));
        entries
    }

    /// Build the id → word mapping. Two words sharing an id is a consistency
    /// failure.
    pub fn build_reverse(&self) -> Result<ReverseLexicon> {
        let mut reverse = ReverseLexicon::with_capacity(self.words.len());
        for (word, entry) in &self.words {
            if let Some(existing) = reverse.insert(entry.id, word.clone()) {
                return Err(IndexError::inconsistent_state(format!(
                    "term id {} claimed by both {existing:?} and {word:?}",
                    entry.id
                )));
            }
        }
        Ok(reverse)
    }

    /// Write the snapshot: header row, then one `word,id,frequency` row per
    /// word by descending frequency. Every field is quoted.
    pub fn save(&self, storage: &dyn Storage, name: &str) -> Result<()> {
        let output = storage.create_output(name)?;
        let mut writer = csv::WriterBuilder::new()
            .quote_style(csv::QuoteStyle::Always)
            .from_writer(output);

        writer.write_record(SNAPSHOT_HEADER.split(','))?;
        for (word, entry) in self.sorted_by_frequency() {
            writer.write_record([
                word.to_string(),
                entry.id.to_string(),
                entry.frequency.to_string(),
            ])?;
        }
        writer.flush()?;

        let mut output = writer
            .into_inner()
            .map_err(|e| IndexError::from(e.into_error()))?;
        output.close()?;

        log::info!("saved lexicon with {} words to {name}", self.words.len());
        Ok(())
    }

    /// Replace the contents with a snapshot. Malformed rows are skipped.
    /// Numbering resumes at the largest loaded id plus one.
    pub fn load(&mut self, storage: &dyn Storage, name: &str) -> Result<()> {
        let input = storage.open_input(name)?;
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(input);

        self.clear();
        let mut max_id: Option<TermId> = None;
        let mut skipped = 0usize;

        for (row, record) in reader.records().enumerate() {
            let record = match record {
                Ok(record) => record,
                Err(e) => {
                    log::warn!("skipping unreadable lexicon row {}: {e}", row + 1);
                    skipped += 1;
                    continue;
                }
            };

            let Some((word, entry)) = parse_row(&record) else {
                log::warn!("skipping malformed lexicon row {}: {record:?}", row + 1);
                skipped += 1;
                continue;
            };

            // A repeated word keeps its first row; the later id is not reserved.
            if self.words.contains_key(word) {
                log::warn!("word {word:?} appears twice in lexicon snapshot, keeping the first row");
                skipped += 1;
                continue;
            }
            self.words.insert(word.to_string(), entry);
            max_id = Some(max_id.map_or(entry.id, |max| max.max(entry.id)));
        }

        self.next_id = max_id.map_or(0, |max| max + 1);

        log::info!(
            "loaded lexicon with {} words from {name} ({skipped} rows skipped), next id {}",
            self.words.len(),
            self.next_id
        );
        Ok(())
    }
}

fn parse_row(record: &csv::StringRecord) -> Option<(&str, LexiconEntry)> {
    if record.len() != 3 {
        return None;
    }

    let word = record.get(0)?;
    let id: TermId = record.get(1)?.trim().parse().ok()?;
    let frequency: u32 = record.get(2)?.trim().parse().ok()?;
    if word.is_empty() || id == NOT_FOUND {
        return None;
    }

    Some((word, LexiconEntry { id, frequency }))
}

/// The id → word mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReverseLexicon {
    words: AHashMap<TermId, String>,
}

impl ReverseLexicon {
    pub fn new() -> Self {
        ReverseLexicon::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        ReverseLexicon {
            words: AHashMap::with_capacity(capacity),
        }
    }

    /// Associate `word` with `id`, returning the word it replaced.
    pub fn insert(&mut self, id: TermId, word: String) -> Option<String> {
        self.words.insert(id, word)
    }

    pub fn get(&self, id: TermId) -> Option<&str> {
        self.words.get(&id).map(String::as_str)
    }

    pub fn contains(&self, id: TermId) -> bool {
        self.words.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
