use super::{DocumentWordSource, TokenList};
use crate::error::LoadError;
use std::collections::HashMap;

/// Fixed set of in-memory documents.
#[derive(Debug, Clone, Default)]
pub struct MemoryWordSource {
    documents: HashMap<String, Vec<String>>,
    locked: bool,
}

impl MemoryWordSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document<I, S>(mut self, document_id: impl Into<String>, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.documents.insert(
            document_id.into(),
            words.into_iter().map(Into::into).collect(),
        );
        self
    }

    /// Every load fails with `Unauthorized`, as with an expired login.
    pub fn locked(mut self) -> Self {
        self.locked = true;
        self
    }
}

impl DocumentWordSource for MemoryWordSource {
    fn load(&self, document_id: &str) -> Result<TokenList, LoadError> {
        if self.locked {
            return Err(LoadError::Unauthorized);
        }
        let words = self
            .documents
            .get(document_id)
            .ok_or_else(|| LoadError::NotFound(document_id.to_string()))?;
        TokenList::from_words(words.iter().cloned()).require_content()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_known_documents_and_reports_missing_ones() {
        let source = MemoryWordSource::new()
            .with_document("doc-1", ["The", "quick", "brown", "fox."])
            .with_document("blank", [" ", ""]);

        assert_eq!(source.load("doc-1").map(|t| t.len()), Ok(4));
        assert_eq!(
            source.load("doc-2"),
            Err(LoadError::NotFound("doc-2".to_string()))
        );
        assert_eq!(source.load("blank"), Err(LoadError::EmptyContent));
    }

    #[test]
    fn locked_source_rejects_every_load() {
        let source = MemoryWordSource::new()
            .with_document("doc-1", ["hi"])
            .locked();
        assert_eq!(source.load("doc-1"), Err(LoadError::Unauthorized));
    }
}
