//! Word splitting helpers shared by the word sources.

use unicode_normalization::UnicodeNormalization;

/// Split plain text into whitespace-delimited words, NFC-normalised so that
/// decomposed accents count as a single character when pacing.
pub(crate) fn split_words(text: &str) -> Vec<String> {
    let normalized: String = text.nfc().collect();
    normalized.split_whitespace().map(str::to_string).collect()
}

/// Trim each word and drop the ones that end up empty.
pub(crate) fn retain_words<I, S>(words: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    words
        .into_iter()
        .filter_map(|word| {
            let word = word.into();
            let trimmed = word.trim();
            if trimmed.is_empty() {
                None
            } else if trimmed.len() == word.len() {
                Some(word)
            } else {
                Some(trimmed.to_string())
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_any_whitespace() {
        assert_eq!(
            split_words("The quick\tbrown\n\nfox."),
            vec!["The", "quick", "brown", "fox."]
        );
        assert!(split_words(" \n\t ").is_empty());
    }

    #[test]
    fn composes_decomposed_accents() {
        let words = split_words("cafe\u{301} au lait");
        assert_eq!(words[0], "caf\u{e9}");
        assert_eq!(words[0].chars().count(), 4);
    }

    #[test]
    fn retain_drops_blank_entries_and_trims() {
        let words = retain_words(["hi", "", "  ", " world! "]);
        assert_eq!(words, vec!["hi".to_string(), "world!".to_string()]);
    }
}
