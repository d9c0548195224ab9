use super::{DocumentWordSource, TokenList};
use crate::error::LoadError;
use crate::text_utils::split_words;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Reads plain UTF-8 text files; the document id is a path, optionally
/// relative to a library directory.
#[derive(Debug, Clone, Default)]
pub struct TextFileWordSource {
    root: Option<PathBuf>,
}

impl TextFileWordSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    fn resolve(&self, document_id: &str) -> PathBuf {
        match &self.root {
            Some(root) => root.join(document_id),
            None => Path::new(document_id).to_path_buf(),
        }
    }
}

impl DocumentWordSource for TextFileWordSource {
    fn load(&self, document_id: &str) -> Result<TokenList, LoadError> {
        let path = self.resolve(document_id);
        info!(path = %path.display(), "Loading plain text document");
        let data = fs::read_to_string(&path).map_err(|err| match err.kind() {
            ErrorKind::NotFound => LoadError::NotFound(document_id.to_string()),
            _ => LoadError::Transport(format!("failed to read {}: {err}", path.display())),
        })?;
        let tokens = TokenList::from_words(split_words(&data));
        debug!(
            path = %path.display(),
            total_chars = data.len(),
            words = tokens.len(),
            "Finished splitting document"
        );
        tokens.require_content()
    }
}
