use nalgebra::{DMatrix, DVector};

use crate::vectorizer::{token::WordBag, vocabulary::Vocabulary};

/// Term-document matrix
/// rows = vocabulary terms, columns = documents, cell = raw occurrence count
#[derive(Debug, Clone, PartialEq)]
pub struct TermDocumentMatrix {
    pub matrix: DMatrix<f64>,
}

impl TermDocumentMatrix {
    /// Build the m x n count matrix. Columns follow document order,
    /// rows follow vocabulary order.
    pub fn build(vocabulary: &Vocabulary, documents: &[WordBag]) -> Self {
        let mut matrix = DMatrix::<f64>::zeros(vocabulary.len(), documents.len());
        for (col, doc) in documents.iter().enumerate() {
            for (word, count) in doc.iter() {
                if let Some(row) = vocabulary.index_of(word) {
                    matrix[(row, col)] += count as f64;
                }
            }
        }
        Self { matrix }
    }

    /// Query vector of a bag over the same vocabulary
    pub fn query_vector(vocabulary: &Vocabulary, bag: &WordBag) -> DVector<f64> {
        DVector::from_vec(vocabulary.vectorize::<f64>(bag))
    }

    #[inline]
    pub fn terms(&self) -> usize {
        self.matrix.nrows()
    }

    #[inline]
    pub fn documents(&self) -> usize {
        self.matrix.ncols()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.matrix.nrows() == 0 || self.matrix.ncols() == 0
    }

    /// Column of a document
    pub fn document(&self, index: usize) -> Option<Vec<f64>> {
        (index < self.matrix.ncols()).then(|| self.matrix.column(index).iter().copied().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SortPolicy;

    fn bag(words: &[&str]) -> WordBag {
        let mut bag = WordBag::new();
        bag.add_words(words);
        bag
    }

    fn documents() -> Vec<WordBag> {
        vec![
            bag(&["a", "damaged", "fire", "gold", "in", "of", "shipment"]),
            bag(&["a", "arrived", "delivery", "in", "of", "silver", "silver", "truck"]),
            bag(&[]),
        ]
    }

    #[test]
    fn cells_hold_raw_counts() {
        let docs = documents();
        let vocab = Vocabulary::from_documents(&docs, SortPolicy::Alphabetical);
        let tdm = TermDocumentMatrix::build(&vocab, &docs);
        assert_eq!(tdm.terms(), vocab.len());
        assert_eq!(tdm.documents(), 3);
        let silver = vocab.index_of("silver").unwrap();
        assert_eq!(tdm.matrix[(silver, 0)], 0.0);
        assert_eq!(tdm.matrix[(silver, 1)], 2.0);
        let a = vocab.index_of("a").unwrap();
        assert_eq!(tdm.matrix[(a, 0)], 1.0);
        assert_eq!(tdm.matrix[(a, 1)], 1.0);
    }

    #[test]
    fn empty_document_gives_zero_column() {
        let docs = documents();
        let vocab = Vocabulary::from_documents(&docs, SortPolicy::Predefined);
        let tdm = TermDocumentMatrix::build(&vocab, &docs);
        assert!(tdm.document(2).unwrap().iter().all(|&v| v == 0.0));
        assert!(tdm.document(3).is_none());
    }

    #[test]
    fn rebuilding_is_bit_identical() {
        let docs = documents();
        for policy in [SortPolicy::Alphabetical, SortPolicy::Predefined] {
            let build = || {
                TermDocumentMatrix::build(&Vocabulary::from_documents(&docs, policy), &docs)
            };
            let bits = |m: &TermDocumentMatrix| {
                m.matrix.iter().map(|v| v.to_bits()).collect::<Vec<_>>()
            };
            let (first, second) = (build(), build());
            assert_eq!(bits(&first), bits(&second));
        }
    }

    #[test]
    fn query_vector_follows_vocabulary_order() {
        let docs = documents();
        let vocab = Vocabulary::from_documents(&docs, SortPolicy::Alphabetical);
        let q = TermDocumentMatrix::query_vector(&vocab, &bag(&["gold", "silver", "truck"]));
        assert_eq!(q.len(), vocab.len());
        assert_eq!(q.sum(), 3.0);
        assert_eq!(q[vocab.index_of("gold").unwrap()], 1.0);
    }
}
