//! Text normalization for indexing.
//!
//! Raw text flows through a tokenizer that lowercases it and strips special
//! characters, then through a chain of token filters (stop words, stemming,
//! validity). [`preprocessor::preprocess`] runs the whole chain and returns the
//! surviving token strings.

pub mod preprocessor;
pub mod token;
pub mod token_filter;
pub mod tokenizer;

// Re-export commonly used types
pub use preprocessor::{TextPreprocessor, preprocess, tokenize};
pub use token::*;
pub use token_filter::*;
pub use tokenizer::*;
