use serde::{Deserialize, Serialize};

use crate::error::{LocationError, LocationResult};

/// How the low-rank approximation parameter k is derived
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum RankMode {
    /// k = floor(value)
    Fixed,
    /// k = floor(value * rank(S))
    Percentage,
    /// k = rank(S), no reduction
    #[default]
    Full,
}

impl From<&str> for RankMode {
    fn from(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "fixed" => RankMode::Fixed,
            "percentage" => RankMode::Percentage,
            _ => RankMode::Full,
        }
    }
}

impl From<String> for RankMode {
    fn from(value: String) -> Self {
        RankMode::from(value.as_str())
    }
}

/// Order of the vocabulary terms (rows of the term-document matrix)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum SortPolicy {
    /// lexicographic order
    #[default]
    Alphabetical,
    /// first-encountered order across documents
    Predefined,
}

/// Anything that is not "predefined" falls back to alphabetical
impl From<&str> for SortPolicy {
    fn from(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "predefined" => SortPolicy::Predefined,
            _ => SortPolicy::Alphabetical,
        }
    }
}

impl From<String> for SortPolicy {
    fn from(value: String) -> Self {
        SortPolicy::from(value.as_str())
    }
}

/// Configuration record of the LSI pipeline
///
/// One record replaces the combinations of constructor arguments:
/// - `rank_mode` / `rank_value`: low-rank approximation policy
/// - `sort_policy`: vocabulary order
/// - `noise_scale`: decimal places used to suppress tiny negative SVD artifacts
///   before cosine scoring (`None` disables suppression)
/// - `parallel`: score features on the rayon pool
///
/// Defaults: full rank, alphabetical terms, noise scale 4, parallel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LsiConfig {
    pub rank_mode: RankMode,
    pub rank_value: f64,
    pub sort_policy: SortPolicy,
    pub noise_scale: Option<i32>,
    pub parallel: bool,
}

impl Default for LsiConfig {
    fn default() -> Self {
        Self {
            rank_mode: RankMode::Full,
            rank_value: 0.0,
            sort_policy: SortPolicy::Alphabetical,
            noise_scale: Some(4),
            parallel: true,
        }
    }
}

impl LsiConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rank(mut self, mode: RankMode, value: f64) -> Self {
        self.rank_mode = mode;
        self.rank_value = value;
        self
    }

    pub fn with_sort_policy(mut self, policy: SortPolicy) -> Self {
        self.sort_policy = policy;
        self
    }

    pub fn with_noise_scale(mut self, scale: Option<i32>) -> Self {
        self.noise_scale = scale;
        self
    }

    /// Score features one after another on the calling thread
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Reject combinations the pipeline cannot honour.
    /// Zero or negative rank values are accepted: they produce a rank-0 space.
    pub fn validate(&self) -> LocationResult<()> {
        if !self.rank_value.is_finite() {
            return Err(LocationError::InvalidConfiguration(format!(
                "rank value must be finite, got {}",
                self.rank_value
            )));
        }
        if self.rank_mode == RankMode::Full && self.rank_value != 0.0 {
            tracing::debug!(
                "rank value {} ignored in full rank mode",
                self.rank_value
            );
        }
        Ok(())
    }
}
