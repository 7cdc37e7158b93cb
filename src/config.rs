//! Configuration for text preprocessing and index construction.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{IndexError, Result};

/// Options controlling the token validity filter and optional stages of
/// [`preprocess`](crate::analysis::preprocessor::preprocess).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessConfig {
    /// Tokens shorter than this (in characters) are dropped.
    pub min_token_length: usize,

    /// Whether to drop English stop words.
    pub remove_stop_words: bool,

    /// Whether to apply the Porter stemmer.
    pub stem: bool,

    /// Whether to drop tokens made only of digits, `.` and `,`.
    pub reject_numeric: bool,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            min_token_length: 2,
            remove_stop_words: true,
            stem: true,
            reject_numeric: true,
        }
    }
}

impl PreprocessConfig {
    /// Set the minimum token length.
    pub fn with_min_token_length(mut self, min_token_length: usize) -> Self {
        self.min_token_length = min_token_length;
        self
    }

    /// Enable or disable stop word removal.
    pub fn with_stop_words(mut self, remove: bool) -> Self {
        self.remove_stop_words = remove;
        self
    }

    /// Enable or disable stemming.
    pub fn with_stemming(mut self, stem: bool) -> Self {
        self.stem = stem;
        self
    }

    /// Enable or disable numeric token rejection.
    pub fn with_numeric_rejection(mut self, reject: bool) -> Self {
        self.reject_numeric = reject;
        self
    }
}

/// Configuration for a full index build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Text preprocessing options.
    pub preprocess: PreprocessConfig,

    /// Number of barrels the inverted index is split into.
    pub barrel_count: u32,

    /// Whether the build partitions the inverted index into barrels.
    pub create_barrels: bool,

    /// Stop after this many input documents. `None` indexes everything.
    pub max_documents: Option<usize>,

    /// File name of the lexicon snapshot.
    pub lexicon_file: String,

    /// File name of the forward index binary.
    pub forward_index_file: String,

    /// File name of the full inverted index binary.
    pub inverted_index_file: String,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            preprocess: PreprocessConfig::default(),
            barrel_count: 4,
            create_barrels: true,
            max_documents: None,
            lexicon_file: "lexicon.csv".to_string(),
            forward_index_file: "forward_index.bin".to_string(),
            inverted_index_file: "inverted_index.bin".to_string(),
        }
    }
}

impl IndexConfig {
    /// Load a configuration from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                IndexError::missing_file(path.display().to_string())
            } else {
                IndexError::Io(e)
            }
        })?;
        Self::from_json(&text)
    }

    /// Parse a configuration from a JSON string.
    pub fn from_json(text: &str) -> Result<Self> {
        let config: IndexConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize this configuration as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write this configuration to a JSON file.
    pub fn save_json_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Check the configuration for values no build can honor.
    pub fn validate(&self) -> Result<()> {
        if self.barrel_count == 0 {
            return Err(IndexError::invalid_config("barrel_count must be at least 1"));
        }
        if self.lexicon_file.is_empty()
            || self.forward_index_file.is_empty()
            || self.inverted_index_file.is_empty()
        {
            return Err(IndexError::invalid_config("artifact file names must not be empty"));
        }
        Ok(())
    }

    /// Set the preprocessing options.
    pub fn with_preprocess(mut self, preprocess: PreprocessConfig) -> Self {
        self.preprocess = preprocess;
        self
    }

    /// Set the barrel count.
    pub fn with_barrel_count(mut self, barrel_count: u32) -> Self {
        self.barrel_count = barrel_count;
        self
    }

    /// Limit the number of documents read from the input.
    pub fn with_max_documents(mut self, max_documents: usize) -> Self {
        self.max_documents = Some(max_documents);
        self
    }
}
