use rand::seq::SliceRandom;
use rand::thread_rng;
use std::fs::File;
use std::io::{BufRead, BufReader};

pub trait WordProvider: Send + Sync {
    fn next_word(&self) -> String;
}

/// Picks uniformly from a fixed vocabulary. Words may repeat between rounds.
pub struct RandomWords {
    words: Vec<String>,
}

impl RandomWords {
    pub fn new(words: Vec<String>) -> Self {
        let words = if words.is_empty() {
            log::error!("Word list created without words, defaulting to the built-in list of words.");
            RandomWords::default_words()
        } else {
            words
        };
        RandomWords { words }
    }

    /// Loads one word per line; falls back to the built-in list when the file can't be read.
    pub fn from_file(file_path: &str) -> Self {
        match RandomWords::read_words_from_file(file_path) {
            Ok(words) => {
                log::info!(
                    "Words loaded. File: '{}', Words: '{}'.",
                    file_path,
                    words.join(",")
                );
                RandomWords::new(words)
            }
            Err(error) => {
                log::error!("Could not load words file, using the built-in list. File: '{file_path}', Error: '{error}'.");
                RandomWords::new(RandomWords::default_words())
            }
        }
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    fn default_words() -> Vec<String> {
        [
            "apple", "car", "computer", "dog", "mountain", "city", "book", "tree", "sea", "star",
        ]
        .iter()
        .map(|word| word.to_string())
        .collect()
    }

    fn read_words_from_file(file_path: &str) -> std::io::Result<Vec<String>> {
        let file = File::open(file_path)?;
        let mut words = Vec::new();
        for line in BufReader::new(file).lines() {
            let word = line?.trim().to_string();
            if !word.is_empty() {
                words.push(word);
            }
        }
        Ok(words)
    }
}

impl WordProvider for RandomWords {
    fn next_word(&self) -> String {
        // `new` guarantees the list is never empty
        self.words
            .choose(&mut thread_rng())
            .cloned()
            .unwrap_or_default()
    }
}
