use tracing::{debug, info};

use crate::{
    error::LocationResult,
    location::{FeatureLocation, LocatedFeature, LocationReport, Target},
    model::{AdaptedModel, Feature, WordSource},
    monitor::ProgressMonitor,
    vectorizer::token::WordBag,
};

/// Confident feature -> block associations seeding the competition.
/// Entries are expected to target blocks, with confidence 1.
pub trait StrictLocator {
    fn locate_strict<M>(
        &self,
        features: &[Feature],
        model: &M,
        monitor: &dyn ProgressMonitor,
    ) -> LocationResult<Vec<LocatedFeature>>
    where
        M: AdaptedModel;
}

/// Textual match strength of a feature against an element, higher is stronger
pub trait TermFrequencyScorer {
    fn term_frequency<E>(&self, feature: &Feature, element: &E) -> u64
    where
        E: WordSource;
}

/// Replays associations computed beforehand
#[derive(Debug, Clone, Default)]
pub struct SeededStrictLocator {
    pub associations: Vec<LocatedFeature>,
}

impl SeededStrictLocator {
    pub fn new(associations: Vec<LocatedFeature>) -> Self {
        Self { associations }
    }

    /// Shortcut for (feature, block) pairs
    pub fn from_pairs(pairs: &[(usize, usize)]) -> Self {
        Self::new(
            pairs
                .iter()
                .map(|&(feature, block)| LocatedFeature::new(feature, Target::Block { block }, 1.0))
                .collect(),
        )
    }
}

impl StrictLocator for SeededStrictLocator {
    /// Associations pointing outside the feature list or the model are dropped
    fn locate_strict<M>(
        &self,
        features: &[Feature],
        model: &M,
        _monitor: &dyn ProgressMonitor,
    ) -> LocationResult<Vec<LocatedFeature>>
    where
        M: AdaptedModel,
    {
        let blocks = model.block_count();
        Ok(self
            .associations
            .iter()
            .filter(|lf| lf.feature < features.len() && lf.target.block() < blocks)
            .copied()
            .collect())
    }
}

/// Sum, over the distinct words of the feature, of
/// (occurrences in the feature) * (occurrences in the element).
/// Exact match after lower-casing, no stemming.
#[derive(Debug, Clone, Copy, Default)]
pub struct WordOverlapScorer;

impl WordOverlapScorer {
    pub fn score_bags(feature: &WordBag, element: &WordBag) -> u64 {
        feature
            .iter()
            .map(|(word, count)| count as u64 * element.count(word) as u64)
            .sum()
    }
}

impl TermFrequencyScorer for WordOverlapScorer {
    fn term_frequency<E>(&self, feature: &Feature, element: &E) -> u64
    where
        E: WordSource,
    {
        Self::score_bags(&WordBag::from_feature(feature), &WordBag::from_source(element))
    }
}

/// Term-frequency competitive location
///
/// Inside every block the strict locator associated with some features,
/// those features compete for each element: the ones with the highest
/// term frequency win it, all with confidence 1.
/// The running maximum starts at 0, so when nobody matches every competitor
/// is tied and keeps the element.
#[derive(Debug, Clone, Default)]
pub struct TermFrequencyLocation<S, T> {
    pub strict: S,
    pub scorer: T,
}

impl<S, T> TermFrequencyLocation<S, T>
where
    S: StrictLocator,
    T: TermFrequencyScorer,
{
    pub fn new(strict: S, scorer: T) -> Self {
        Self { strict, scorer }
    }

    /// Features tied at the maximal score for one element, in competitor order
    pub fn winners<E>(&self, features: &[Feature], competing: &[usize], element: &E) -> Vec<usize>
    where
        E: WordSource,
    {
        let mut max_tf = 0_u64;
        let mut winners = Vec::new();
        for &f in competing {
            let Some(feature) = features.get(f) else {
                continue;
            };
            let tf = self.scorer.term_frequency(feature, element);
            if tf == max_tf {
                winners.push(f);
            } else if tf > max_tf {
                winners.clear();
                winners.push(f);
                max_tf = tf;
            }
        }
        winners
    }
}

impl<S, T> FeatureLocation for TermFrequencyLocation<S, T>
where
    S: StrictLocator,
    T: TermFrequencyScorer,
{
    fn locate_features<M>(
        &self,
        features: &[Feature],
        model: &M,
        monitor: &dyn ProgressMonitor,
    ) -> LocationResult<LocationReport>
    where
        M: AdaptedModel,
    {
        let seeds = LocationReport {
            located: self.strict.locate_strict(features, model, monitor)?,
            ..Default::default()
        };
        debug!(associations = seeds.located.len(), "strict associations");

        let mut report = LocationReport::new();
        // blocks-major, elements-minor
        for block in 0..model.block_count() {
            if monitor.is_cancelled() {
                report.cancelled = true;
                break;
            }
            monitor.set_status(&format!(
                "Term frequency feature location: features competing for elements at {}",
                model.block_name(block)
            ));
            let competing = seeds.features_of_block(block);
            if competing.is_empty() {
                continue;
            }
            for (element, e) in model.elements_of_block(block).iter().enumerate() {
                for feature in self.winners(features, &competing, e) {
                    report.located.push(LocatedFeature::new(
                        feature,
                        Target::Element { block, element },
                        1.0,
                    ));
                }
            }
        }

        info!(
            features = features.len(),
            blocks = model.block_count(),
            located = report.located.len(),
            cancelled = report.cancelled,
            "term frequency feature location finished"
        );
        Ok(report)
    }
}
