//! Range-partitioned barrels of the inverted index.
//!
//! The term-id span `[min, max]` is cut into `n` contiguous ranges of
//! `ceil((max - min + 1) / n)` ids each, the last range ending at `max`.
//! Terms go to whichever range holds their id, so barrel sizes follow term-id
//! density rather than posting volume. Ranges holding no term are not written
//! and do not appear in the metadata.
//!
//! A barrel file starts with `barrel_id: u32, start_id: u32, end_id: u32`
//! followed by the per-term layout of the full index. The metadata file holds
//! `count: u32` then `count × (barrel_id: u32, start_id: u32, end_id: u32,
//! filename: string)`.

use serde::{Deserialize, Serialize};

use crate::codec::{BinaryReader, BinaryWriter};
use crate::error::{IndexError, Result};
use crate::inverted::{PostingMap, read_terms, write_terms};
use crate::lexicon::{ReverseLexicon, TermId};
use crate::storage::Storage;

/// Name of the barrel metadata file.
pub const METADATA_FILE: &str = "barrel_metadata.bin";

/// File name of the barrel with the given id.
pub fn barrel_file_name(barrel_id: u32) -> String {
    format!("barrel_{barrel_id}.bin")
}

/// One retained barrel: an inclusive term-id range and the file holding it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarrelMetadata {
    pub barrel_id: u32,
    pub start_id: TermId,
    pub end_id: TermId,
    pub filename: String,
}

impl BarrelMetadata {
    pub fn new(barrel_id: u32, start_id: TermId, end_id: TermId) -> Self {
        BarrelMetadata {
            barrel_id,
            start_id,
            end_id,
            filename: barrel_file_name(barrel_id),
        }
    }

    pub fn contains(&self, term_id: TermId) -> bool {
        (self.start_id..=self.end_id).contains(&term_id)
    }
}

/// Compute the `(barrel_id, start, end)` ranges splitting `[min_id, max_id]`
/// into `n` barrels. Ranges starting past `max_id` are dropped.
pub fn partition_ranges(min_id: TermId, max_id: TermId, n: u32) -> Result<Vec<(u32, TermId, TermId)>> {
    if n == 0 {
        return Err(IndexError::invalid_argument("barrel count must be at least 1"));
    }
    if min_id > max_id {
        return Err(IndexError::invalid_argument(format!(
            "empty term id span [{min_id}, {max_id}]"
        )));
    }

    let (min, max) = (u64::from(min_id), u64::from(max_id));
    let range = (max - min + 1).div_ceil(u64::from(n));

    let mut ranges = Vec::with_capacity(n as usize);
    for i in 0..n {
        let start = min + u64::from(i) * range;
        if start > max {
            break;
        }
        let end = if i == n - 1 {
            max
        } else {
            (start + range - 1).min(max)
        };
        // start and end are bounded by max, which came from a u32
        ranges.push((i, start as TermId, end as TermId));
    }
    Ok(ranges)
}

/// The ordered barrel metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BarrelCatalog {
    barrels: Vec<BarrelMetadata>,
}

impl BarrelCatalog {
    pub fn new(barrels: Vec<BarrelMetadata>) -> Self {
        BarrelCatalog { barrels }
    }

    /// The barrel whose range holds `term_id`, by linear scan.
    pub fn find(&self, term_id: TermId) -> Option<&BarrelMetadata> {
        self.barrels.iter().find(|barrel| barrel.contains(term_id))
    }

    pub fn barrels(&self) -> &[BarrelMetadata] {
        &self.barrels
    }

    pub fn len(&self) -> usize {
        self.barrels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.barrels.is_empty()
    }

    /// Write the metadata file.
    pub fn save(&self, storage: &dyn Storage) -> Result<()> {
        let mut writer = BinaryWriter::new(storage.create_output(METADATA_FILE)?);
        writer.write_len(self.barrels.len())?;
        for barrel in &self.barrels {
            writer.write_u32(barrel.barrel_id)?;
            writer.write_u32(barrel.start_id)?;
            writer.write_u32(barrel.end_id)?;
            writer.write_string(&barrel.filename)?;
        }
        writer.close()
    }

    /// Read the metadata file. Touches nothing but that file.
    pub fn load(storage: &dyn Storage) -> Result<Self> {
        let mut reader = BinaryReader::new(storage.open_input(METADATA_FILE)?)?;
        let count = reader.read_u32()?;

        let mut barrels: Vec<BarrelMetadata> = Vec::with_capacity(count.min(1024) as usize);
        for _ in 0..count {
            let barrel = BarrelMetadata {
                barrel_id: reader.read_u32()?,
                start_id: reader.read_u32()?,
                end_id: reader.read_u32()?,
                filename: reader.read_string()?,
            };
            if barrel.start_id > barrel.end_id {
                return Err(IndexError::corrupt(format!(
                    "barrel {} has inverted range [{}, {}]",
                    barrel.barrel_id, barrel.start_id, barrel.end_id
                )));
            }
            if barrels
                .last()
                .is_some_and(|prev| prev.end_id >= barrel.start_id)
            {
                return Err(IndexError::corrupt(format!(
                    "barrel {} overlaps or precedes its predecessor",
                    barrel.barrel_id
                )));
            }
            barrels.push(barrel);
        }

        Ok(BarrelCatalog { barrels })
    }
}

/// Write one barrel file holding `term_ids` (ascending, all inside the range).
pub(crate) fn write_barrel(
    storage: &dyn Storage,
    barrel: &BarrelMetadata,
    term_ids: &[TermId],
    postings: &PostingMap,
    reverse: &ReverseLexicon,
) -> Result<()> {
    let mut writer = BinaryWriter::new(storage.create_output(&barrel.filename)?);
    writer.write_u32(barrel.barrel_id)?;
    writer.write_u32(barrel.start_id)?;
    writer.write_u32(barrel.end_id)?;
    write_terms(&mut writer, term_ids, postings, reverse)?;
    writer.close()
}

/// Read one barrel file, checking its header against `barrel`. Every term's
/// word is recorded into `reverse`.
pub(crate) fn read_barrel(
    storage: &dyn Storage,
    barrel: &BarrelMetadata,
    reverse: &mut ReverseLexicon,
) -> Result<PostingMap> {
    let mut reader = BinaryReader::new(storage.open_input(&barrel.filename)?)?;

    let header = (reader.read_u32()?, reader.read_u32()?, reader.read_u32()?);
    if header != (barrel.barrel_id, barrel.start_id, barrel.end_id) {
        return Err(IndexError::corrupt(format!(
            "{} has header {header:?}, metadata expects ({}, {}, {})",
            barrel.filename, barrel.barrel_id, barrel.start_id, barrel.end_id
        )));
    }

    let postings = read_terms(&mut reader, reverse)?;
    if let Some(stray) = postings.keys().find(|term_id| !barrel.contains(**term_id)) {
        return Err(IndexError::corrupt(format!(
            "{} holds term {stray} outside [{}, {}]",
            barrel.filename, barrel.start_id, barrel.end_id
        )));
    }
    Ok(postings)
}
