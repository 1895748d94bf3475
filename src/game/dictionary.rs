//! Dictionary for word validation and bonus-word selection
//!
//! Embeds the bundled word list at build time. Each line is a lowercase
//! word followed by an optional frequency weight (`word 0.42`); a missing
//! weight counts as 1.0. Higher weights mark more familiar words, which is
//! what the bonus-word picker filters on.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use once_cell::sync::Lazy;
use rand::seq::IndexedRandom;
use rand::Rng;
use tracing::debug;

/// Embedded word list, one `word weight` pair per line
static WORDS_DATA: &str = include_str!("../../data/words.txt");

/// Pre-built dictionary from the embedded list
static DEFAULT: Lazy<Arc<Dictionary>> = Lazy::new(|| Arc::new(Dictionary::parse(WORDS_DATA)));

/// Word set with frequency weights. Lookups are case-insensitive.
#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    words: HashMap<String, f64>,
}

impl Dictionary {
    /// The embedded dictionary, shared.
    pub fn embedded() -> Arc<Dictionary> {
        Arc::clone(&DEFAULT)
    }

    /// Build from bare words, all weighted 1.0.
    pub fn from_list<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .map(|w| (w, 1.0))
            .collect();
        Self { words }
    }

    /// Read a word list file in the embedded format.
    pub fn load(path: &Path) -> std::io::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let dictionary = Self::parse(&content);
        debug!(path = %path.display(), words = dictionary.len(), "dictionary loaded");
        Ok(dictionary)
    }

    /// The word list at `path`, or the embedded one when no path is given.
    /// A file with no words is an error.
    pub fn load_or_embedded(path: Option<&Path>) -> std::io::Result<Arc<Dictionary>> {
        let Some(path) = path else {
            return Ok(Self::embedded());
        };
        let dictionary = Self::load(path)?;
        if dictionary.is_empty() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("{} holds no words", path.display()),
            ));
        }
        Ok(Arc::new(dictionary))
    }

    fn parse(content: &str) -> Self {
        let words = content
            .lines()
            .filter_map(|line| {
                let mut parts = line.split_whitespace();
                let word = parts.next()?.to_lowercase();
                let weight = parts.next().and_then(|w| w.parse().ok()).unwrap_or(1.0);
                Some((word, weight))
            })
            .collect();
        Self { words }
    }

    /// Check if a word is in the dictionary.
    pub fn contains(&self, word: &str) -> bool {
        self.words.contains_key(&word.to_lowercase())
    }

    /// Frequency weight of a word, if present.
    pub fn weight(&self, word: &str) -> Option<f64> {
        self.words.get(&word.to_lowercase()).copied()
    }

    /// All words of exactly `length` letters with their weights.
    pub fn words_of_length(&self, length: usize) -> impl Iterator<Item = (&str, f64)> {
        self.words
            .iter()
            .filter(move |(w, _)| w.chars().count() == length)
            .map(|(w, weight)| (w.as_str(), *weight))
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Pick a bonus word of `length` letters, uppercase.
    ///
    /// Prefers words weighted above `threshold`; falls back to any word of
    /// that length. `None` when the dictionary has no word that long.
    pub fn choose_bonus_word<R: Rng + ?Sized>(
        &self,
        length: usize,
        threshold: f64,
        rng: &mut R,
    ) -> Option<String> {
        let mut all: Vec<(&str, f64)> = self.words_of_length(length).collect();
        // HashMap order is unstable; sort so a seeded rng picks the same word.
        all.sort_by(|a, b| a.0.cmp(b.0));
        let familiar: Vec<&str> = all
            .iter()
            .filter(|(_, weight)| *weight > threshold)
            .map(|(w, _)| *w)
            .collect();
        let pool: Vec<&str> = if familiar.is_empty() {
            all.iter().map(|(w, _)| *w).collect()
        } else {
            familiar
        };
        pool.choose(rng).map(|w| w.to_uppercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn write_list(name: &str, content: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("booksnek-{}-{}", std::process::id(), name));
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_word_list_file() {
        let path = write_list("words.txt", "zebra 4.5\nyak\n\n");
        let dict = Dictionary::load_or_embedded(Some(&path)).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(dict.len(), 2);
        assert!(dict.contains("ZEBRA"));
        assert_eq!(dict.weight("zebra"), Some(4.5));
        assert_eq!(dict.weight("yak"), Some(1.0));
        assert!(!dict.contains("cat"));
    }

    #[test]
    fn test_empty_word_list_is_an_error() {
        let path = write_list("empty.txt", "\n\n");
        let result = Dictionary::load_or_embedded(Some(&path));
        std::fs::remove_file(&path).unwrap();
        assert_eq!(result.unwrap_err().kind(), std::io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_missing_path_falls_back_to_embedded() {
        let dict = Dictionary::load_or_embedded(None).unwrap();
        assert!(dict.contains("cat"));
        assert!(Dictionary::load(std::path::Path::new("/nonexistent/booksnek/words")).is_err());
    }

    #[test]
    fn test_valid_words() {
        let dict = Dictionary::embedded();
        assert!(dict.contains("cat"));
        assert!(dict.contains("quiz"));
        assert!(dict.contains("squid"));
        assert!(dict.contains("east"));
    }

    #[test]
    fn test_case_insensitive() {
        let dict = Dictionary::embedded();
        assert!(dict.contains("Cat"));
        assert!(dict.contains("CAT"));
        assert!(dict.contains("cAt"));
    }

    #[test]
    fn test_invalid_words() {
        let dict = Dictionary::embedded();
        assert!(!dict.contains("xyzzyplugh"));
        assert!(!dict.contains("cta"));
        assert!(!dict.contains(""));
    }

    #[test]
    fn test_word_count() {
        let count = Dictionary::embedded().len();
        assert!(count > 3000, "Expected 3K+ words, got {}", count);
    }

    #[test]
    fn test_weights_parsed() {
        let dict = Dictionary::parse("cat 1.29\ndog\n\n");
        assert_eq!(dict.len(), 2);
        assert_eq!(dict.weight("cat"), Some(1.29));
        assert_eq!(dict.weight("DOG"), Some(1.0));
        assert_eq!(dict.weight("cow"), None);
    }

    #[test]
    fn test_words_of_length() {
        let dict = Dictionary::from_list(["cat", "dog", "bird", "  "]);
        assert_eq!(dict.len(), 3);
        let mut three: Vec<&str> = dict.words_of_length(3).map(|(w, _)| w).collect();
        three.sort();
        assert_eq!(three, vec!["cat", "dog"]);
    }

    #[test]
    fn test_bonus_word_prefers_familiar() {
        let dict = Dictionary::parse("cat 1.2\ncow 0.1\nbird 0.9\n");
        let mut rng = rand::rngs::StdRng::seed_from_u64(1);
        for _ in 0..20 {
            assert_eq!(dict.choose_bonus_word(3, 0.5, &mut rng).as_deref(), Some("CAT"));
        }
    }

    #[test]
    fn test_bonus_word_falls_back() {
        let dict = Dictionary::parse("cow 0.1\n");
        let mut rng = rand::rngs::StdRng::seed_from_u64(1);
        assert_eq!(dict.choose_bonus_word(3, 0.5, &mut rng).as_deref(), Some("COW"));
        assert_eq!(dict.choose_bonus_word(9, 0.5, &mut rng), None);
    }

    #[test]
    fn test_bonus_word_from_embedded() {
        let dict = Dictionary::embedded();
        let mut rng = rand::rngs::StdRng::seed_from_u64(8);
        for length in 3..=8 {
            let word = dict.choose_bonus_word(length, 0.16, &mut rng).unwrap();
            assert_eq!(word.len(), length);
            assert!(dict.contains(&word));
        }
    }
}
