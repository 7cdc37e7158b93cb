//! Lowercasing tokenizer that strips special characters.
//!
//! Every run of characters that is neither alphanumeric nor whitespace is
//! replaced by a single space before splitting on whitespace, so
//! `"SARS-CoV-2"` yields `["sars", "cov", "2"]`.

use std::sync::{Arc, LazyLock};

use regex::Regex;

use super::Tokenizer;
use crate::analysis::token::{Token, TokenStream};
use crate::error::Result;

/// Matches one or more characters that are neither alphanumeric nor whitespace.
static SPECIAL_CHARS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^\p{Alphabetic}\p{N}\s]+").expect("special character pattern should be valid")
});

/// A tokenizer that lowercases, removes special characters and splits on
/// whitespace.
#[derive(Clone, Debug)]
pub struct NormalizingTokenizer {
    pattern: Arc<Regex>,
}

impl NormalizingTokenizer {
    /// Create a new tokenizer with the default special-character pattern.
    pub fn new() -> Self {
        NormalizingTokenizer {
            pattern: Arc::new(SPECIAL_CHARS.clone()),
        }
    }

    /// Lowercase `text` and replace special-character runs with a space.
    pub fn normalize(&self, text: &str) -> String {
        let lowered = text.to_lowercase();
        self.pattern.replace_all(&lowered, " ").into_owned()
    }

    /// Tokenize into plain strings.
    pub fn split(&self, text: &str) -> Vec<String> {
        self.normalize(text)
            .split_whitespace()
            .map(str::to_string)
            .collect()
    }
}

impl Default for NormalizingTokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Tokenizer for NormalizingTokenizer {
    fn tokenize(&self, text: &str) -> Result<TokenStream> {
        let tokens: Vec<Token> = self
            .split(text)
            .into_iter()
            .enumerate()
            .map(|(position, text)| Token::new(text, position))
            .collect();

        Ok(Box::new(tokens.into_iter()))
    }

    fn name(&self) -> &'static str {
        "normalizing"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercase_and_split() {
        let tokenizer = NormalizingTokenizer::new();
        let tokens: Vec<Token> = tokenizer.tokenize("Hello  World\tagain").unwrap().collect();

        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0].text, "hello");
        assert_eq!(tokens[1].text, "world");
        assert_eq!(tokens[2].text, "again");
        assert_eq!(tokens[2].position, 2);
    }

    #[test]
    fn test_special_runs_become_separators() {
        let tokenizer = NormalizingTokenizer::new();
        assert_eq!(tokenizer.split("SARS-CoV-2 (COVID-19)!"), vec!["sars", "cov", "2", "covid", "19"]);
        assert_eq!(tokenizer.split("e.g.,well...done"), vec!["e", "g", "well", "done"]);
        assert_eq!(tokenizer.split("snake_case"), vec!["snake", "case"]);
    }

    #[test]
    fn test_empty_and_punctuation_only() {
        let tokenizer = NormalizingTokenizer::new();
        assert!(tokenizer.split("").is_empty());
        assert!(tokenizer.split("  -- ?! ").is_empty());
    }

    #[test]
    fn test_non_ascii_letters_kept() {
        let tokenizer = NormalizingTokenizer::new();
        assert_eq!(tokenizer.split("Café Über"), vec!["café", "über"]);
    }

    #[test]
    fn test_tokenizer_name() {
        assert_eq!(NormalizingTokenizer::new().name(), "normalizing");
    }
}
