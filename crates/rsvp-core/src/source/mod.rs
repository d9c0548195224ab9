//! Document word sources.
//!
//! A source turns a document id into the ordered token list a reading
//! session plays. It is consulted once per load and the resulting list is
//! never mutated afterwards.

mod http;
mod memory;
mod text_file;

pub use http::{AUTH_HEADER, HttpWordSource};
pub use memory::MemoryWordSource;
pub use text_file::TextFileWordSource;

use crate::error::LoadError;
use crate::text_utils::retain_words;

/// Ordered, immutable, non-empty words of one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenList {
    tokens: Box<[String]>,
}

impl TokenList {
    /// Build a list from raw words, trimming them and skipping blanks.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tokens: retain_words(words).into_boxed_slice(),
        }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.tokens.get(index).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(String::as_str)
    }

    /// `EmptyContent` when nothing survived parsing.
    pub fn require_content(self) -> Result<Self, LoadError> {
        if self.is_empty() {
            Err(LoadError::EmptyContent)
        } else {
            Ok(self)
        }
    }
}

/// External collaborator that yields the words of a document.
///
/// Loads run on a blocking worker thread, so implementations may perform
/// synchronous I/O.
pub trait DocumentWordSource: Send + Sync {
    fn load(&self, document_id: &str) -> Result<TokenList, LoadError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_list_skips_blank_words() {
        let tokens = TokenList::from_words(["The", "", "fox."]);
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens.get(1), Some("fox."));
        assert_eq!(tokens.get(2), None);
    }

    #[test]
    fn empty_list_is_rejected_as_empty_content() {
        assert_eq!(
            TokenList::from_words(["  "]).require_content(),
            Err(LoadError::EmptyContent)
        );
        assert!(TokenList::from_words(["hi"]).require_content().is_ok());
    }
}
