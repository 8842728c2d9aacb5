/// This crate is a statistical Feature Location Engine for software product lines.
/// Blocks of code elements are documents, features are queries.
pub mod vectorizer;
pub mod lsi;
pub mod location;
pub mod config;
pub mod error;
pub mod model;
pub mod monitor;

/// Word Bag
/// Lower-cased word -> occurrence count of a feature, an element or a block.
/// Feature text is split with `FEATURE_DELIMITERS`.
pub use vectorizer::token::{WordBag, FEATURE_DELIMITERS};

/// Vocabulary
/// Distinct terms of a document set in a reproducible order
/// (alphabetical or first-encountered, see `SortPolicy`).
pub use vectorizer::vocabulary::Vocabulary;

/// Term-Document Matrix
/// Raw occurrence counts, rows = vocabulary terms, columns = documents.
pub use vectorizer::matrix::TermDocumentMatrix;

/// Cosine similarity with SVD noise suppression, confidence remap and
/// ranked score lists
pub use vectorizer::evaluate::scoring::{confidence, cosine, noise_threshold, Hits};

/// LSI Engine
/// Decomposes the term-document matrix once, truncates it to rank k and
/// scores any number of queries against the documents.
///
/// The engine is bound to one document set. Build a new one, or call
/// `rebuild`, when the documents change.
///
/// # Projection
/// q' = q^T * U_k * S_k^-1, compared by cosine with the rows of V_k.
pub use lsi::{Decomposition, LatentSpace, LsiEngine};

/// Low-rank approximation policy
pub use lsi::rank::RankPolicy;

/// Configuration record of the LSI pipeline
pub use config::{LsiConfig, RankMode, SortPolicy};

/// Error taxonomy
pub use error::{LocationError, LocationResult};

/// Inputs: features and the block/element model
pub use model::{AdaptedModel, Block, BlockModel, Feature, WordSource};

/// Cooperative cancellation and status channel
pub use monitor::{CancelFlag, NoopMonitor, ProgressMonitor};

/// Feature location techniques
/// Both run behind `FeatureLocation::locate_features`:
/// - `LsiFeatureLocation`: one graded confidence per (feature, block)
/// - `TermFrequencyLocation`: features seeded in a block compete for its elements,
///   winners get confidence 1
pub use location::{
    lsi::LsiFeatureLocation,
    tf::{
        SeededStrictLocator, StrictLocator, TermFrequencyLocation, TermFrequencyScorer,
        WordOverlapScorer,
    },
    FeatureLocation, LocatedFeature, LocationFailure, LocationReport, Target,
};
