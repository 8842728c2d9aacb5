use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::{
    config::LsiConfig,
    error::{LocationError, LocationResult},
    location::{FeatureLocation, LocatedFeature, LocationFailure, LocationReport, Target},
    lsi::LsiEngine,
    model::{AdaptedModel, Feature},
    monitor::ProgressMonitor,
    vectorizer::{evaluate::scoring::confidence, token::WordBag},
};

/// LSI feature location
///
/// Blocks are the documents, features are the queries.
/// One engine is built per run and shared by every feature; each feature gets
/// one `LocatedFeature` per block, confidence = (cosine + 1) / 2.
#[derive(Debug, Clone, Default)]
pub struct LsiFeatureLocation {
    pub config: LsiConfig,
}

enum Outcome {
    Located(Vec<LocatedFeature>),
    Failed(LocationError),
    Skipped,
}

impl LsiFeatureLocation {
    pub fn new(config: LsiConfig) -> Self {
        Self { config }
    }

    /// One document per block, in block order
    pub fn documents<M>(model: &M) -> Vec<WordBag>
    where
        M: AdaptedModel,
    {
        (0..model.block_count())
            .map(|b| WordBag::from_elements(model.elements_of_block(b)))
            .collect()
    }

    fn score_feature(
        engine: &LsiEngine,
        index: usize,
        feature: &Feature,
        monitor: &dyn ProgressMonitor,
    ) -> Outcome {
        if monitor.is_cancelled() {
            return Outcome::Skipped;
        }
        monitor.set_status(&format!(
            "LSI feature location: {}",
            feature.name.as_deref().unwrap_or(&feature.id)
        ));
        let query = WordBag::from_feature(feature);
        match engine.cosines(&query) {
            Ok(cosines) => Outcome::Located(
                cosines
                    .into_iter()
                    .enumerate()
                    .map(|(block, cos)| {
                        LocatedFeature::new(index, Target::Block { block }, confidence(cos))
                    })
                    .collect(),
            ),
            Err(err) => Outcome::Failed(err),
        }
    }
}

impl FeatureLocation for LsiFeatureLocation {
    fn locate_features<M>(
        &self,
        features: &[Feature],
        model: &M,
        monitor: &dyn ProgressMonitor,
    ) -> LocationResult<LocationReport>
    where
        M: AdaptedModel,
    {
        self.config.validate()?;
        let mut report = LocationReport::new();
        let documents = Self::documents(model);
        let engine = match LsiEngine::new(&documents, self.config.clone()) {
            Ok(engine) => engine,
            Err(err) if err.is_empty_input() => {
                debug!("nothing to locate: {}", err);
                return Ok(report);
            }
            Err(err) => return Err(err),
        };

        let outcomes: Vec<Outcome> = if self.config.parallel {
            features
                .par_iter()
                .enumerate()
                .map(|(i, f)| Self::score_feature(&engine, i, f, monitor))
                .collect()
        } else {
            let mut outcomes = Vec::with_capacity(features.len());
            for (i, f) in features.iter().enumerate() {
                let outcome = Self::score_feature(&engine, i, f, monitor);
                let skipped = matches!(outcome, Outcome::Skipped);
                outcomes.push(outcome);
                if skipped {
                    break;
                }
            }
            outcomes
        };

        // features-major; a skipped feature ends the run
        for (feature, outcome) in outcomes.into_iter().enumerate() {
            match outcome {
                Outcome::Located(located) => report.located.extend(located),
                Outcome::Failed(error) => {
                    warn!(feature, %error, "feature could not be scored");
                    report.failures.push(LocationFailure { feature, error });
                }
                Outcome::Skipped => {
                    report.cancelled = true;
                    break;
                }
            }
        }

        info!(
            features = features.len(),
            blocks = documents.len(),
            k = engine.rank(),
            located = report.located.len(),
            failures = report.failures.len(),
            cancelled = report.cancelled,
            "LSI feature location finished"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::{RankMode, SortPolicy},
        model::{Block, BlockModel},
        monitor::{CancelFlag, NoopMonitor},
    };

    fn truck_model() -> BlockModel<Vec<&'static str>> {
        BlockModel::new(vec![
            Block::new(
                "fire",
                vec![vec!["a", "damaged", "fire"], vec!["gold", "in", "of", "shipment"]],
            ),
            Block::new(
                "delivery",
                vec![
                    vec!["a", "arrived", "delivery", "in"],
                    vec!["of", "Silver", "silver", "truck"],
                ],
            ),
            Block::new(
                "shipment",
                vec![vec!["a", "arrived", "gold", "in", "of", "shipment", "truck"]],
            ),
        ])
    }

    fn features() -> Vec<Feature> {
        vec![
            Feature::new("f1", "Gold Silver").with_description("truck"),
            Feature::new("f2", "fire-damaged"),
            Feature::new("f3", "print"),
        ]
    }

    fn rank_two() -> LsiConfig {
        LsiConfig::new()
            .with_rank(RankMode::Fixed, 2.0)
            .with_sort_policy(SortPolicy::Alphabetical)
    }

    #[test]
    fn golden_truck_confidences() {
        let technique = LsiFeatureLocation::new(rank_two().sequential());
        let report = technique
            .locate_features(&features()[..1], &truck_model(), &NoopMonitor)
            .unwrap();
        assert_eq!(report.located.len(), 3);
        let expected = [-0.054, 0.991, 0.448];
        for (lf, cos) in report.located.iter().zip(expected) {
            assert_eq!(lf.feature, 0);
            assert!((lf.confidence - (cos + 1.0) / 2.0).abs() < 0.001);
        }
        assert_eq!(report.located[1].target, Target::Block { block: 1 });
        assert!(report.is_complete());
    }

    #[test]
    fn output_is_features_major_and_in_range() {
        let technique = LsiFeatureLocation::new(LsiConfig::default().sequential());
        let report = technique
            .locate_features(&features(), &truck_model(), &NoopMonitor)
            .unwrap();
        assert_eq!(report.located.len(), 9);
        for (i, lf) in report.located.iter().enumerate() {
            assert_eq!(lf.feature, i / 3);
            assert_eq!(lf.target, Target::Block { block: i % 3 });
            assert!((0.0..=1.0).contains(&lf.confidence));
        }
        // no shared word with any block
        assert!(report.of_feature(2).all(|lf| lf.confidence == 0.0));
    }

    #[test]
    fn parallel_and_sequential_agree() {
        let model = truck_model();
        let sequential = LsiFeatureLocation::new(rank_two().sequential())
            .locate_features(&features(), &model, &NoopMonitor)
            .unwrap();
        let parallel = LsiFeatureLocation::new(rank_two())
            .locate_features(&features(), &model, &NoopMonitor)
            .unwrap();
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn no_blocks_gives_empty_result() {
        let model: BlockModel<Vec<&str>> = BlockModel::new(vec![]);
        let report = LsiFeatureLocation::default()
            .locate_features(&features(), &model, &NoopMonitor)
            .unwrap();
        assert!(report.located.is_empty());
        assert!(report.failures.is_empty());
    }

    #[test]
    fn blocks_without_words_give_empty_result() {
        let model: BlockModel<Vec<&str>> =
            BlockModel::new(vec![Block::new("empty", vec![vec![]])]);
        let report = LsiFeatureLocation::default()
            .locate_features(&features(), &model, &NoopMonitor)
            .unwrap();
        assert!(report.located.is_empty());
    }

    #[test]
    fn empty_block_makes_full_rank_singular() {
        let model = BlockModel::new(vec![
            Block::new("history", vec![vec!["undo", "stack"]]),
            Block::new("empty", vec![]),
            Block::new("printing", vec![vec!["print", "page"]]),
        ]);
        let features = vec![Feature::new("undo", "undo")];
        let report = LsiFeatureLocation::default()
            .locate_features(&features, &model, &NoopMonitor)
            .unwrap();
        assert!(report.located.is_empty());
        assert_eq!(
            report.failures,
            vec![LocationFailure {
                feature: 0,
                error: LocationError::SingularMatrix { k: 3, index: 2 },
            }]
        );
        assert!(!report.cancelled);

        let report = LsiFeatureLocation::new(rank_two())
            .locate_features(&features, &model, &NoopMonitor)
            .unwrap();
        assert!(report.failures.is_empty());
        assert!((report.located[0].confidence - 1.0).abs() < 1e-9);
    }

    #[test]
    fn invalid_configuration_is_a_failure() {
        let technique =
            LsiFeatureLocation::new(LsiConfig::new().with_rank(RankMode::Percentage, f64::NAN));
        let err = technique
            .locate_features(&features(), &truck_model(), &NoopMonitor)
            .unwrap_err();
        assert!(matches!(err, LocationError::InvalidConfiguration(_)));
    }

    #[test]
    fn cancelled_run_returns_partial_result() {
        let flag = CancelFlag::new();
        flag.cancel();
        let report = LsiFeatureLocation::new(LsiConfig::default().sequential())
            .locate_features(&features(), &truck_model(), &flag)
            .unwrap();
        assert!(report.cancelled);
        assert!(report.located.is_empty());
        assert!(!report.is_complete());
    }

    #[test]
    fn status_names_the_feature() {
        let flag = CancelFlag::new();
        LsiFeatureLocation::new(LsiConfig::default().sequential())
            .locate_features(&features(), &truck_model(), &flag)
            .unwrap();
        assert_eq!(flag.status(), "LSI feature location: print");
    }
}
