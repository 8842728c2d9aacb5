pub mod lsi;
pub mod tf;

use serde::{Deserialize, Serialize};

use crate::{
    error::{LocationError, LocationResult},
    model::{AdaptedModel, Feature},
    monitor::ProgressMonitor,
};

/// Code region a feature was located in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Target {
    Block { block: usize },
    /// element `element` of block `block`
    Element { block: usize, element: usize },
}

impl Target {
    /// Block containing the target
    #[inline]
    pub fn block(&self) -> usize {
        match *self {
            Target::Block { block } | Target::Element { block, .. } => block,
        }
    }
}

/// (feature, block or element, confidence)
/// `feature` is the position of the feature in the input list.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocatedFeature {
    pub feature: usize,
    pub target: Target,
    /// in [0, 1]
    pub confidence: f64,
}

impl LocatedFeature {
    pub fn new(feature: usize, target: Target, confidence: f64) -> Self {
        Self {
            feature,
            target,
            confidence,
        }
    }
}

/// A feature whose scoring failed. The rest of the run is unaffected.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationFailure {
    pub feature: usize,
    pub error: LocationError,
}

/// Outcome of one location run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocationReport {
    pub located: Vec<LocatedFeature>,
    pub failures: Vec<LocationFailure>,
    /// Set when the run stopped on a cancellation request.
    /// `located` then holds what was found before.
    pub cancelled: bool,
}

impl LocationReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Neither cancelled nor missing any feature
    pub fn is_complete(&self) -> bool {
        !self.cancelled && self.failures.is_empty()
    }

    /// Features located in `block`, first-seen order, without duplicates
    pub fn features_of_block(&self, block: usize) -> Vec<usize> {
        let mut features = Vec::new();
        for lf in self.located.iter().filter(|lf| lf.target.block() == block) {
            if !features.contains(&lf.feature) {
                features.push(lf.feature);
            }
        }
        features
    }

    /// Entries of one feature, in output order
    pub fn of_feature(&self, feature: usize) -> impl Iterator<Item = &LocatedFeature> {
        self.located.iter().filter(move |lf| lf.feature == feature)
    }
}

/// Feature location technique
///
/// Every technique answers the same question: which blocks (or elements)
/// implement which features, with which confidence.
///
/// # Arguments
/// * `features` - features to locate, addressed by position in the result
/// * `model` - block/element partition
/// * `monitor` - polled for cancellation, receives status text
pub trait FeatureLocation {
    fn locate_features<M>(
        &self,
        features: &[Feature],
        model: &M,
        monitor: &dyn ProgressMonitor,
    ) -> LocationResult<LocationReport>
    where
        M: AdaptedModel;
}
