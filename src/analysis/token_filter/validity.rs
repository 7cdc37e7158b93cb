//! Validity filter: drops tokens too short, numeric, or without letters.

use std::sync::{Arc, LazyLock};

use regex::Regex;

use crate::analysis::token::{Token, TokenStream};
use crate::analysis::token_filter::Filter;
use crate::config::PreprocessConfig;
use crate::error::Result;

/// Tokens made only of digits, `.` and `,`.
static NUMERIC_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9.,]+$").expect("numeric token pattern should be valid"));

/// A filter that keeps only tokens worth indexing.
///
/// A token survives when it is at least `min_length` characters long, is not
/// numeric (when numeric rejection is on), and contains at least one
/// alphabetic character.
#[derive(Clone, Debug)]
pub struct ValidityFilter {
    min_length: usize,
    reject_numeric: bool,
    numeric: Arc<Regex>,
}

impl ValidityFilter {
    /// Create a validity filter.
    pub fn new(min_length: usize, reject_numeric: bool) -> Self {
        ValidityFilter {
            min_length,
            reject_numeric,
            numeric: Arc::new(NUMERIC_TOKEN.clone()),
        }
    }

    /// Create a validity filter from preprocessing options.
    pub fn from_config(config: &PreprocessConfig) -> Self {
        Self::new(config.min_token_length, config.reject_numeric)
    }

    /// Check a single token text.
    pub fn is_valid(&self, text: &str) -> bool {
        if text.chars().count() < self.min_length {
            return false;
        }
        if self.reject_numeric && self.numeric.is_match(text) {
            return false;
        }
        text.chars().any(char::is_alphabetic)
    }
}

impl Default for ValidityFilter {
    fn default() -> Self {
        Self::from_config(&PreprocessConfig::default())
    }
}

impl Filter for ValidityFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        let kept: Vec<Token> = tokens.filter(|token| self.is_valid(&token.text)).collect();
        Ok(Box::new(kept.into_iter()))
    }

    fn name(&self) -> &'static str {
        "validity"
    }
}
