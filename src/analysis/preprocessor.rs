//! Preprocessing pipeline turning raw text into index tokens.
//!
//! # Pipeline
//!
//! 1. NormalizingTokenizer (lowercase, special-character removal, whitespace split)
//! 2. StopFilter (optional)
//! 3. StemFilter with the Porter stemmer (optional)
//! 4. ValidityFilter (length, numeric and alphabetic checks)
//!
//! # Examples
//!
//! ```
//! use barrel_index::analysis::preprocessor::preprocess;
//! use barrel_index::config::PreprocessConfig;
//!
//! let tokens = preprocess("The patients were infected in 2020.", &PreprocessConfig::default());
//! assert_eq!(tokens, vec!["patient", "infect"]);
//! ```

use std::sync::Arc;

use crate::analysis::token::{TokenStream, into_strings};
use crate::analysis::token_filter::{Filter, StemFilter, StopFilter, ValidityFilter};
use crate::analysis::tokenizer::{NormalizingTokenizer, Tokenizer};
use crate::config::PreprocessConfig;
use crate::error::Result;

/// Tokenize `text` without any filtering: lowercase, replace special-character
/// runs with a separator and split on whitespace.
pub fn tokenize(text: &str) -> Vec<String> {
    NormalizingTokenizer::new().split(text)
}

/// Run the full preprocessing pipeline configured by `config`.
pub fn preprocess(text: &str, config: &PreprocessConfig) -> Vec<String> {
    TextPreprocessor::new(config.clone()).process(text)
}

/// A configured tokenizer plus filter chain.
pub struct TextPreprocessor {
    config: PreprocessConfig,
    tokenizer: Arc<dyn Tokenizer>,
    filters: Vec<Arc<dyn Filter>>,
}

impl TextPreprocessor {
    /// Build the pipeline for the given options.
    pub fn new(config: PreprocessConfig) -> Self {
        let mut filters: Vec<Arc<dyn Filter>> = Vec::new();
        if config.remove_stop_words {
            filters.push(Arc::new(StopFilter::new()));
        }
        if config.stem {
            filters.push(Arc::new(StemFilter::new()));
        }
        filters.push(Arc::new(ValidityFilter::from_config(&config)));

        TextPreprocessor {
            config,
            tokenizer: Arc::new(NormalizingTokenizer::new()),
            filters,
        }
    }

    /// The options this pipeline was built with.
    pub fn config(&self) -> &PreprocessConfig {
        &self.config
    }

    /// Names of the pipeline stages, tokenizer first.
    pub fn stage_names(&self) -> Vec<&'static str> {
        std::iter::once(self.tokenizer.name())
            .chain(self.filters.iter().map(|f| f.name()))
            .collect()
    }

    /// Analyze text into a token stream.
    pub fn analyze(&self, text: &str) -> Result<TokenStream> {
        let mut tokens = self.tokenizer.tokenize(text)?;
        for filter in &self.filters {
            tokens = filter.filter(tokens)?;
        }
        Ok(tokens)
    }

    /// Analyze text into the ordered list of surviving token strings.
    pub fn process(&self, text: &str) -> Vec<String> {
        match self.analyze(text) {
            Ok(tokens) => into_strings(tokens),
            Err(e) => {
                log::warn!("preprocessing failed, dropping text: {e}");
                Vec::new()
            }
        }
    }
}

impl Default for TextPreprocessor {
    fn default() -> Self {
        Self::new(PreprocessConfig::default())
    }
}

impl std::fmt::Debug for TextPreprocessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextPreprocessor")
            .field("config", &self.config)
            .field("stages", &self.stage_names())
            .finish()
    }
}
