use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::model::{Feature, WordSource};

/// Characters splitting feature names and descriptions into words.
/// The last three are keyboard-locale punctuation seen in feature lists.
pub const FEATURE_DELIMITERS: &[char] = &[
    ' ', ':', '!', '?', '*', '+', '&', '~', '"', '#', '\'', '{', '}', '(', ')', '[', ']', '-',
    '|', '`', '_', '\\', '^', ',', '.', ';', '/', '²', '°', '§',
];

/// Split a text on `FEATURE_DELIMITERS`, dropping empty pieces
pub fn tokenize(text: &str) -> impl Iterator<Item = &str> {
    text.split(FEATURE_DELIMITERS).filter(|w| !w.is_empty())
}

///  WordBag
/// Lower-cased word -> occurrence count.
/// Iteration order is first-insertion order, so anything built from it
/// is reproducible.
///
/// # Examples
/// ```
/// use feature_locator::WordBag;
/// let mut bag = WordBag::new();
/// bag.add_words(&["Gold", "silver", "gold"]);
/// assert_eq!(bag.count("gold"), 2);
/// assert_eq!(bag.total(), 3);
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct WordBag {
    #[serde(with = "indexmap::map::serde_seq")]
    word_count: IndexMap<String, u32>,
    total_word_count: u64,
}

impl WordBag {
    pub fn new() -> Self {
        WordBag {
            word_count: IndexMap::new(),
            total_word_count: 0,
        }
    }

    /// Add one occurrence of a word
    ///
    /// # Arguments
    /// * `word` - the word, any case
    #[inline]
    pub fn add_word(&mut self, word: &str) -> &mut Self {
        let count = self.word_count.entry(word.to_lowercase()).or_insert(0);
        *count += 1;
        self.total_word_count += 1;
        self
    }

    #[inline]
    pub fn add_words<T>(&mut self, words: &[T]) -> &mut Self
    where
        T: AsRef<str>,
    {
        for word in words {
            self.add_word(word.as_ref());
        }
        self
    }

    /// Merge the counts of another bag into this one
    pub fn add_bag(&mut self, other: &WordBag) -> &mut Self {
        for (word, &count) in other.word_count.iter() {
            *self.word_count.entry(word.clone()).or_insert(0) += count;
            self.total_word_count += count as u64;
        }
        self
    }

    /// Bag of a feature: words of the name, then of the description
    pub fn from_feature(feature: &Feature) -> Self {
        let mut bag = WordBag::new();
        for text in [&feature.name, &feature.description].into_iter().flatten() {
            for word in tokenize(text) {
                bag.add_word(word);
            }
        }
        bag
    }

    /// Bag of anything exposing words (an element, a raw token list)
    pub fn from_source<S>(source: &S) -> Self
    where
        S: WordSource + ?Sized,
    {
        let mut bag = WordBag::new();
        bag.add_words(&source.words());
        bag
    }

    /// Bag of a block: union of the bags of its elements
    pub fn from_elements<S>(elements: &[S]) -> Self
    where
        S: WordSource,
    {
        let mut bag = WordBag::new();
        for element in elements {
            bag.add_words(&element.words());
        }
        bag
    }
}

impl WordBag {
    /// Occurrences of a word, case-insensitive
    #[inline]
    pub fn count(&self, word: &str) -> u32 {
        match self.word_count.get(word) {
            Some(&count) => count,
            None => self
                .word_count
                .get(word.to_lowercase().as_str())
                .copied()
                .unwrap_or(0),
        }
    }

    #[inline]
    pub fn total(&self) -> u64 {
        self.total_word_count
    }

    /// Number of distinct words
    #[inline]
    pub fn distinct(&self) -> usize {
        self.word_count.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.total_word_count == 0
    }

    /// (word, count) in insertion order
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.word_count.iter().map(|(w, &c)| (w.as_str(), c))
    }

    #[inline]
    pub fn contains(&self, word: &str) -> bool {
        self.count(word) > 0
    }

    /// Flatten into a list, each word repeated by its count
    pub fn to_word_list(&self) -> Vec<String> {
        let mut list = Vec::with_capacity(self.total_word_count as usize);
        for (word, &count) in self.word_count.iter() {
            for _ in 0..count {
                list.push(word.clone());
            }
        }
        list
    }

    #[inline]
    pub fn clear(&mut self) {
        self.word_count.clear();
        self.total_word_count = 0;
    }
}
