use indexmap::IndexSet;
use num::{Bounded, Num, NumCast};
use serde::{Deserialize, Serialize};

use crate::{config::SortPolicy, vectorizer::token::WordBag};

/// Distinct terms of a document set, in a fixed order.
/// Position `i` of every vector built from it is term `i`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vocabulary {
    terms: IndexSet<Box<str>>,
    policy: SortPolicy,
}

impl Vocabulary {
    /// Collect the terms of the documents.
    /// `Predefined` keeps first-encountered order, `Alphabetical` sorts.
    pub fn from_documents(documents: &[WordBag], policy: SortPolicy) -> Self {
        let mut terms: IndexSet<Box<str>> = IndexSet::new();
        for doc in documents {
            for (word, _) in doc.iter() {
                if !terms.contains(word) {
                    terms.insert(Box::from(word));
                }
            }
        }
        let mut vocabulary = Self { terms, policy };
        vocabulary.apply_policy();
        vocabulary
    }

    /// Use an externally given term list instead of the documents' terms.
    /// Terms are lower-cased and deduplicated.
    pub fn from_terms<T>(terms: &[T], policy: SortPolicy) -> Self
    where
        T: AsRef<str>,
    {
        let terms: IndexSet<Box<str>> = terms
            .iter()
            .map(|t| t.as_ref().to_lowercase().into_boxed_str())
            .collect();
        let mut vocabulary = Self { terms, policy };
        vocabulary.apply_policy();
        vocabulary
    }

    fn apply_policy(&mut self) {
        match self.policy {
            SortPolicy::Alphabetical => self.terms.sort(),
            SortPolicy::Predefined => {}
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    #[inline]
    pub fn policy(&self) -> SortPolicy {
        self.policy
    }

    #[inline]
    pub fn index_of(&self, term: &str) -> Option<usize> {
        self.terms.get_index_of(term)
    }

    #[inline]
    pub fn term(&self, index: usize) -> Option<&str> {
        self.terms.get_index(index).map(|t| t.as_ref())
    }

    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.terms.iter().map(|t| t.as_ref())
    }

    /// Dense occurrence vector of a bag over this vocabulary.
    /// Words outside the vocabulary are ignored.
    /// Counts that do not fit in `N` saturate at `N::max_value()`.
    pub fn vectorize<N>(&self, bag: &WordBag) -> Vec<N>
    where
        N: Num + NumCast + Bounded + Copy,
    {
        let mut vec = vec![N::zero(); self.terms.len()];
        for (word, count) in bag.iter() {
            if let Some(idx) = self.terms.get_index_of(word) {
                vec[idx] = <N as NumCast>::from(count).unwrap_or_else(N::max_value);
            }
        }
        vec
    }
}
