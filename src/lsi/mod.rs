pub mod rank;

use nalgebra::{DMatrix, DVector};
use tracing::debug;

use crate::{
    config::LsiConfig,
    error::{LocationError, LocationResult},
    lsi::rank::RankPolicy,
    vectorizer::{
        evaluate::scoring::{cosine, Hits},
        matrix::TermDocumentMatrix,
        token::WordBag,
        vocabulary::Vocabulary,
    },
};

/// A = U * S * V^T
/// Singular values are non-increasing.
#[derive(Debug, Clone)]
pub struct Decomposition {
    u: DMatrix<f64>,
    singular_values: DVector<f64>,
    v_t: DMatrix<f64>,
}

impl Decomposition {
    /// Factor the term-document matrix.
    /// Fails on a matrix without rows or columns, or when the SVD does not converge.
    pub fn new(tdm: &TermDocumentMatrix) -> LocationResult<Self> {
        let (rows, cols) = tdm.matrix.shape();
        if tdm.is_empty() {
            return Err(LocationError::Decomposition {
                rows,
                cols,
                reason: "matrix has no rows or no columns",
            });
        }
        let svd = tdm
            .matrix
            .clone()
            .try_svd(true, true, f64::EPSILON, 0)
            .ok_or(LocationError::Decomposition {
                rows,
                cols,
                reason: "singular value decomposition did not converge",
            })?;
        let (u, v_t) = match (svd.u, svd.v_t) {
            (Some(u), Some(v_t)) => (u, v_t),
            _ => {
                return Err(LocationError::Decomposition {
                    rows,
                    cols,
                    reason: "singular vectors were not computed",
                })
            }
        };
        let singular_values = svd.singular_values;
        debug_assert!(
            singular_values.as_slice().windows(2).all(|w| w[0] >= w[1]),
            "singular values must come sorted in decreasing order"
        );
        debug!(
            rows,
            cols,
            singular_values = singular_values.len(),
            "term-document matrix decomposed"
        );
        Ok(Self {
            u,
            singular_values,
            v_t,
        })
    }

    /// rank(S): number of singular values
    #[inline]
    pub fn rank(&self) -> usize {
        self.singular_values.len()
    }

    #[inline]
    pub fn singular_values(&self) -> &[f64] {
        self.singular_values.as_slice()
    }

    /// Singular values at or below this are numerically zero.
    /// s_max * max(m, n) * eps
    pub fn tolerance(&self) -> f64 {
        let s_max = self.singular_values.iter().copied().fold(0.0, f64::max);
        let dim = self.u.nrows().max(self.v_t.ncols());
        s_max * dim as f64 * f64::EPSILON
    }

    /// Keep the k leading singular triplets.
    /// `k` is clamped to rank(S).
    pub fn reduce(&self, k: usize) -> LatentSpace {
        let k = k.min(self.rank());
        let u_k = self.u.columns(0, k).into_owned();
        let s_k = self.singular_values.rows(0, k).into_owned();
        let v_k_t = self.v_t.rows(0, k);
        let documents = (0..v_k_t.ncols())
            .map(|i| v_k_t.column(i).iter().copied().collect())
            .collect();
        LatentSpace {
            u_k,
            s_k,
            documents,
            tolerance: self.tolerance(),
        }
    }
}

/// Rank-reduced space: U_k, S_k and the document coordinates (columns of V_k^T)
#[derive(Debug, Clone)]
pub struct LatentSpace {
    u_k: DMatrix<f64>,
    s_k: DVector<f64>,
    documents: Vec<Vec<f64>>,
    tolerance: f64,
}

impl LatentSpace {
    /// k
    #[inline]
    pub fn rank(&self) -> usize {
        self.s_k.len()
    }

    #[inline]
    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    /// Latent coordinates of document `index`
    #[inline]
    pub fn document(&self, index: usize) -> Option<&[f64]> {
        self.documents.get(index).map(|d| d.as_slice())
    }

    /// q' = q^T * U_k * S_k^-1, a row of length k.
    /// Fails when a kept singular value is zero up to the decomposition's tolerance.
    pub fn project(&self, query: &DVector<f64>) -> LocationResult<Vec<f64>> {
        let k = self.rank();
        let singular = |s: f64| !s.is_finite() || s <= self.tolerance;
        if let Some(index) = self.s_k.iter().position(|&s| singular(s)) {
            return Err(LocationError::SingularMatrix { k, index });
        }
        let q_u = self.u_k.tr_mul(query);
        Ok(q_u.component_div(&self.s_k).as_slice().to_vec())
    }

    /// Cosine of a projected query against every document, in document order
    pub fn cosines(&self, projected: &[f64], scale: Option<i32>) -> Vec<f64> {
        self.documents
            .iter()
            .map(|doc| cosine(doc, projected, scale))
            .collect()
    }
}

/// LSI engine bound to one document set.
///
/// Holds the vocabulary, the decomposition and the reduced space so that
/// many queries can be answered without decomposing again.
/// Use a new engine, or `rebuild`, for another document set.
#[derive(Debug, Clone)]
pub struct LsiEngine {
    config: LsiConfig,
    vocabulary: Vocabulary,
    /// vocabulary supplied by the caller, kept across `rebuild`
    given_vocabulary: bool,
    decomposition: Decomposition,
    space: LatentSpace,
}

impl LsiEngine {
    /// Build vocabulary and matrix from the documents, decompose and reduce
    pub fn new(documents: &[WordBag], config: LsiConfig) -> LocationResult<Self> {
        config.validate()?;
        if documents.is_empty() {
            return Err(LocationError::EmptyInput("no documents"));
        }
        let vocabulary = Vocabulary::from_documents(documents, config.sort_policy);
        Self::assemble(documents, vocabulary, false, config)
    }

    /// Same as `new` over a given term list
    pub fn with_vocabulary(
        documents: &[WordBag],
        vocabulary: Vocabulary,
        config: LsiConfig,
    ) -> LocationResult<Self> {
        config.validate()?;
        if documents.is_empty() {
            return Err(LocationError::EmptyInput("no documents"));
        }
        Self::assemble(documents, vocabulary, true, config)
    }

    fn assemble(
        documents: &[WordBag],
        vocabulary: Vocabulary,
        given_vocabulary: bool,
        config: LsiConfig,
    ) -> LocationResult<Self> {
        if vocabulary.is_empty() {
            return Err(LocationError::EmptyInput("no vocabulary terms"));
        }
        let tdm = TermDocumentMatrix::build(&vocabulary, documents);
        let decomposition = Decomposition::new(&tdm)?;
        let k = RankPolicy::from(&config).effective_rank(decomposition.rank());
        debug!(
            terms = vocabulary.len(),
            documents = documents.len(),
            k,
            "latent space reduced"
        );
        let space = decomposition.reduce(k);
        Ok(Self {
            config,
            vocabulary,
            given_vocabulary,
            decomposition,
            space,
        })
    }

    /// Drop every cached matrix and start over with another document set.
    /// A vocabulary given through `with_vocabulary` is kept, otherwise the
    /// vocabulary is collected again from the new documents.
    pub fn rebuild(&mut self, documents: &[WordBag]) -> LocationResult<()> {
        let config = self.config.clone();
        *self = if self.given_vocabulary {
            Self::with_vocabulary(documents, self.vocabulary.clone(), config)?
        } else {
            Self::new(documents, config)?
        };
        Ok(())
    }

    /// Change the rank policy, reusing the cached decomposition
    pub fn set_rank_policy(&mut self, policy: RankPolicy) -> LocationResult<()> {
        let config = self.config.clone().with_rank(policy.mode, policy.value);
        config.validate()?;
        let k = policy.effective_rank(self.decomposition.rank());
        self.space = self.decomposition.reduce(k);
        self.config = config;
        Ok(())
    }

    #[inline]
    pub fn config(&self) -> &LsiConfig {
        &self.config
    }

    #[inline]
    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    #[inline]
    pub fn decomposition(&self) -> &Decomposition {
        &self.decomposition
    }

    #[inline]
    pub fn space(&self) -> &LatentSpace {
        &self.space
    }

    /// Effective k
    #[inline]
    pub fn rank(&self) -> usize {
        self.space.rank()
    }

    #[inline]
    pub fn document_count(&self) -> usize {
        self.space.document_count()
    }

    /// Raw cosine of the query against each document, in document order
    pub fn cosines(&self, query: &WordBag) -> LocationResult<Vec<f64>> {
        let q = TermDocumentMatrix::query_vector(&self.vocabulary, query);
        let projected = self.space.project(&q)?;
        Ok(self.space.cosines(&projected, self.config.noise_scale))
    }

    /// Cosine scores keyed by document index
    pub fn similarity(&self, query: &WordBag) -> LocationResult<Hits<usize>> {
        let scores = self.cosines(query)?;
        Ok(Hits::new(scores.into_iter().enumerate().collect()))
    }
}
