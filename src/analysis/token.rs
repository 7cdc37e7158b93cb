//! Token types for text analysis.
//!
//! A [`Token`] is the unit that flows through the analysis pipeline. Filters
//! consume a [`TokenStream`] and produce a new one, so stages can be chained
//! without materializing intermediate vectors.
//!
//! ```
//! use barrel_index::analysis::token::Token;
//!
//! let token = Token::new("virus", 0);
//! assert_eq!(token.text, "virus");
//! assert_eq!(token.position, 0);
//! ```

/// A single normalized token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    /// The text content of the token
    pub text: String,

    /// The position of the token in the tokenizer output (0-based)
    pub position: usize,
}

impl Token {
    /// Create a new token with the given text and position.
    pub fn new<S: Into<String>>(text: S, position: usize) -> Self {
        Token {
            text: text.into(),
            position,
        }
    }

    /// Length of the token in characters.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Check if the token is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Replace the text, keeping the position.
    pub fn with_text<S: Into<String>>(mut self, text: S) -> Self {
        self.text = text.into();
        self
    }
}

/// A stream of tokens flowing between pipeline stages.
pub type TokenStream = Box<dyn Iterator<Item = Token>>;

/// Collect a token stream into plain strings, preserving order.
pub fn into_strings(tokens: TokenStream) -> Vec<String> {
    tokens.map(|token| token.text).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_creation() {
        let token = Token::new("protein", 3);
        assert_eq!(token.text, "protein");
        assert_eq!(token.position, 3);
        assert_eq!(token.char_len(), 7);
        assert!(!token.is_empty());
    }

    #[test]
    fn test_with_text_keeps_position() {
        let token = Token::new("infections", 5).with_text("infect");
        assert_eq!(token.text, "infect");
        assert_eq!(token.position, 5);
    }

    #[test]
    fn test_into_strings() {
        let stream: TokenStream = Box::new(vec![Token::new("a", 0), Token::new("b", 1)].into_iter());
        assert_eq!(into_strings(stream), vec!["a", "b"]);
    }
}
