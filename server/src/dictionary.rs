//! Word selection for new rounds.

use crate::error::DictionaryError;
use log::{info, warn};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::fs;
use std::path::Path;

/// Supplies the hidden word for each new round.
pub trait WordSource: Send {
    /// Returns a non-empty lowercase ASCII word.
    fn next_word(&mut self) -> String;
}

/// Word list loaded from a newline-separated file, sampled uniformly.
#[derive(Debug)]
pub struct Dictionary {
    words: Vec<String>,
    rng: StdRng,
}

impl Dictionary {
    /// Loads every usable word in `path`.
    ///
    /// Lines are trimmed; anything that is not purely lowercase ASCII
    /// letters is skipped.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DictionaryError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| DictionaryError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let dictionary = Self::from_words(contents.lines(), StdRng::from_entropy());
        if dictionary.is_empty() {
            return Err(DictionaryError::Empty {
                path: path.to_path_buf(),
            });
        }

        info!("Loaded {} words from {}", dictionary.len(), path.display());
        Ok(dictionary)
    }

    /// Builds a dictionary with a fixed seed so word order is reproducible.
    pub fn with_seed<'a>(words: impl IntoIterator<Item = &'a str>, seed: u64) -> Self {
        Self::from_words(words, StdRng::seed_from_u64(seed))
    }

    fn from_words<'a>(words: impl IntoIterator<Item = &'a str>, rng: StdRng) -> Self {
        let mut skipped = 0;
        let words = words
            .into_iter()
            .map(str::trim)
            .filter(|word| !word.is_empty())
            .filter(|word| {
                let usable = word.bytes().all(|b| b.is_ascii_lowercase());
                if !usable {
                    skipped += 1;
                }
                usable
            })
            .map(str::to_string)
            .collect();

        if skipped > 0 {
            warn!("Skipped {} dictionary entries that are not lowercase words", skipped);
        }
        Self { words, rng }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl WordSource for Dictionary {
    fn next_word(&mut self) -> String {
        self.words
            .choose(&mut self.rng)
            .cloned()
            .unwrap_or_else(|| "word".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("wordsrv-{}-{}", std::process::id(), name))
    }

    #[test]
    fn test_filters_unusable_entries() {
        let dictionary = Dictionary::with_seed(["cat", " dog ", "", "Bird", "e-mail", "x1"], 7);

        assert_eq!(dictionary.len(), 2);
        assert_eq!(dictionary.words, ["cat", "dog"]);
    }

    #[test]
    fn test_next_word_comes_from_list() {
        let mut dictionary = Dictionary::with_seed(["cat", "dog", "owl"], 42);

        for _ in 0..20 {
            let word = dictionary.next_word();
            assert!(dictionary.words.contains(&word));
        }
    }

    #[test]
    fn test_seeded_dictionaries_agree() {
        let mut first = Dictionary::with_seed(["cat", "dog", "owl", "yak"], 3);
        let mut second = Dictionary::with_seed(["cat", "dog", "owl", "yak"], 3);

        for _ in 0..10 {
            assert_eq!(first.next_word(), second.next_word());
        }
    }

    #[test]
    fn test_load_from_file() {
        let path = temp_path("words.txt");
        let mut file = fs::File::create(&path).unwrap();
        write!(file, "apple\r\nbanana\nCherry\n\n").unwrap();
        drop(file);

        let dictionary = Dictionary::load(&path).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(dictionary.len(), 2);
        assert_eq!(dictionary.words, ["apple", "banana"]);
    }

    #[test]
    fn test_load_missing_file() {
        let result = Dictionary::load(temp_path("does-not-exist.txt"));
        assert!(matches!(result, Err(DictionaryError::Io { .. })));
    }

    #[test]
    fn test_load_file_without_words() {
        let path = temp_path("empty.txt");
        fs::write(&path, "UPPER\n123\n").unwrap();

        let result = Dictionary::load(&path);
        fs::remove_file(&path).unwrap();

        assert!(matches!(result, Err(DictionaryError::Empty { .. })));
    }
}
