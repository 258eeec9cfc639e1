//! Aggregate classification-quality metrics.
//!
//! Scores follow the usual definitions: precision is `TP / (TP + FP)`,
//! recall is `TP / (TP + FN)` and F1 is their harmonic mean, computed as
//! `2TP / (2TP + FP + FN)`. Any ratio whose denominator is zero is reported as
//! `0.0`, so a class that is never predicted, or never present, lowers the
//! macro average instead of making it undefined.
//!
//! Three averaging strategies are provided:
//! - [`Average::Macro`] takes the unweighted mean of per-class scores.
//! - [`Average::Micro`] pools the counts of every class before dividing.
//! - [`Average::Weighted`] weights per-class scores by their support.

mod errors;
mod tally;
mod threshold;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub use errors::MetricsError;
pub use tally::{ClassCounts, Indicator, Tally, Target};
pub use threshold::{DEFAULT_THRESHOLD, binarize};

/// Strategy for combining per-class scores into one value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Average {
    Macro,
    Micro,
    Weighted,
}

/// Precision, recall and F1 for one class or one average.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Scores {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

/// Scores and support for a single class.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClassReport<C> {
    pub class: C,
    #[serde(flatten)]
    pub scores: Scores,
    pub support: usize,
}

/// Accuracy plus precision, recall and F1 under every averaging strategy.
///
/// Serialises to a flat object whose keys match [`Metrics::KEYS`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub accuracy: f64,
    pub macro_precision: f64,
    pub macro_recall: f64,
    pub macro_f1: f64,
    pub micro_precision: f64,
    pub micro_recall: f64,
    pub micro_f1: f64,
    pub weighted_precision: f64,
    pub weighted_recall: f64,
    pub weighted_f1: f64,
}

impl Metrics {
    /// Metric names in reporting order.
    pub const KEYS: [&'static str; 10] = [
        "accuracy",
        "macro_precision",
        "macro_recall",
        "macro_f1",
        "micro_precision",
        "micro_recall",
        "micro_f1",
        "weighted_precision",
        "weighted_recall",
        "weighted_f1",
    ];

    fn from_tally<C>(tally: &Tally<C>) -> Self {
        let macro_avg = average(tally, Average::Macro);
        let micro_avg = average(tally, Average::Micro);
        let weighted_avg = average(tally, Average::Weighted);
        Self {
            accuracy: tally.accuracy(),
            macro_precision: macro_avg.precision,
            macro_recall: macro_avg.recall,
            macro_f1: macro_avg.f1,
            micro_precision: micro_avg.precision,
            micro_recall: micro_avg.recall,
            micro_f1: micro_avg.f1,
            weighted_precision: weighted_avg.precision,
            weighted_recall: weighted_avg.recall,
            weighted_f1: weighted_avg.f1,
        }
    }

    /// Scores for one averaging strategy.
    #[must_use]
    pub fn scores(&self, average: Average) -> Scores {
        match average {
            Average::Macro => Scores {
                precision: self.macro_precision,
                recall: self.macro_recall,
                f1: self.macro_f1,
            },
            Average::Micro => Scores {
                precision: self.micro_precision,
                recall: self.micro_recall,
                f1: self.micro_f1,
            },
            Average::Weighted => Scores {
                precision: self.weighted_precision,
                recall: self.weighted_recall,
                f1: self.weighted_f1,
            },
        }
    }

    /// Name-to-score mapping keyed by [`Metrics::KEYS`].
    #[must_use]
    pub fn to_map(&self) -> BTreeMap<&'static str, f64> {
        let values = [
            self.accuracy,
            self.macro_precision,
            self.macro_recall,
            self.macro_f1,
            self.micro_precision,
            self.micro_recall,
            self.micro_f1,
            self.weighted_precision,
            self.weighted_recall,
            self.weighted_f1,
        ];
        Self::KEYS.into_iter().zip(values).collect()
    }
}

/// Compute accuracy and every averaged precision, recall and F1 score.
///
/// # Examples
///
/// ```
/// use goemotions_korean::metrics::compute_metrics;
///
/// let metrics = compute_metrics(&[0_usize, 1, 1, 0], &[0, 1, 0, 0]).unwrap();
/// assert!((metrics.accuracy - 0.75).abs() < 1e-12);
/// assert!((metrics.micro_f1 - 0.75).abs() < 1e-12);
/// ```
///
/// # Errors
///
/// Returns [`MetricsError::LengthMismatch`] when `labels` and `preds` differ
/// in length, [`MetricsError::Empty`] when both are empty, and
/// [`MetricsError::WidthMismatch`] when indicator rows differ in width.
pub fn compute_metrics<T: Target>(labels: &[T], preds: &[T]) -> Result<Metrics, MetricsError> {
    Tally::from_pairs(labels, preds).map(|tally| Metrics::from_tally(&tally))
}

/// Precision, recall and F1 under a single averaging strategy.
///
/// # Errors
///
/// Fails under the same conditions as [`compute_metrics`].
pub fn precision_recall_fscore<T: Target>(
    labels: &[T],
    preds: &[T],
    strategy: Average,
) -> Result<Scores, MetricsError> {
    Tally::from_pairs(labels, preds).map(|tally| average(&tally, strategy))
}

/// Fraction of samples predicted exactly. Indicator rows must match in
/// every column.
///
/// # Errors
///
/// Fails under the same conditions as [`compute_metrics`].
pub fn accuracy<T: Target>(labels: &[T], preds: &[T]) -> Result<f64, MetricsError> {
    Tally::from_pairs(labels, preds).map(|tally| tally.accuracy())
}

/// Per-class scores in ascending class order.
///
/// # Errors
///
/// Fails under the same conditions as [`compute_metrics`].
pub fn per_class_scores<T: Target>(
    labels: &[T],
    preds: &[T],
) -> Result<Vec<ClassReport<T::Class>>, MetricsError> {
    let tally = Tally::from_pairs(labels, preds)?;
    Ok(tally
        .classes
        .into_iter()
        .map(|(class, counts)| ClassReport {
            class,
            scores: counts.scores(),
            support: counts.support,
        })
        .collect())
}

fn average<C>(tally: &Tally<C>, strategy: Average) -> Scores {
    match strategy {
        Average::Micro => tally.pooled().scores(),
        Average::Macro => weighted_mean(tally.classes.iter().map(|(_, c)| (c.scores(), 1))),
        Average::Weighted => {
            weighted_mean(tally.classes.iter().map(|(_, c)| (c.scores(), c.support)))
        }
    }
}

/// Mean of `scores` weighted by the paired counts. Zero total weight yields
/// all-zero scores.
#[expect(clippy::float_arithmetic, reason = "weighted mean of per-class scores")]
#[expect(
    clippy::cast_precision_loss,
    reason = "class supports stay far below 2^52"
)]
fn weighted_mean(entries: impl Iterator<Item = (Scores, usize)>) -> Scores {
    let mut total = 0_usize;
    let mut sum = Scores::default();
    for (scores, weight) in entries {
        let w = weight as f64;
        sum.precision += scores.precision * w;
        sum.recall += scores.recall * w;
        sum.f1 += scores.f1 * w;
        total += weight;
    }
    if total == 0 {
        return Scores::default();
    }
    let total = total as f64;
    Scores {
        precision: sum.precision / total,
        recall: sum.recall / total,
        f1: sum.f1 / total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::support::approx_eq;
    use rstest::rstest;

    const EPSILON: f64 = 1e-12;
    const ONE_THIRD: f64 = 0.333_333_333_333_333;
    const TWO_THIRDS: f64 = 0.666_666_666_666_667;
    const FOUR_NINTHS: f64 = 0.444_444_444_444_444;
    const FIVE_SIXTHS: f64 = 0.833_333_333_333_333;
    const ELEVEN_FIFTEENTHS: f64 = 0.733_333_333_333_333;

    fn assert_scores(actual: Scores, precision: f64, recall: f64, f1: f64) {
        assert!(
            approx_eq(actual.precision, precision, EPSILON),
            "precision {} != {precision}",
            actual.precision
        );
        assert!(
            approx_eq(actual.recall, recall, EPSILON),
            "recall {} != {recall}",
            actual.recall
        );
        assert!(
            approx_eq(actual.f1, f1, EPSILON),
            "f1 {} != {f1}",
            actual.f1
        );
    }

    #[rstest]
    fn binary_example_matches_hand_computation() {
        let Ok(metrics) = compute_metrics(&[0_usize, 1, 1, 0], &[0, 1, 0, 0]) else {
            panic!("equal-length input should score")
        };
        assert!(approx_eq(metrics.accuracy, 0.75, EPSILON));
        assert_scores(metrics.scores(Average::Macro), FIVE_SIXTHS, 0.75, ELEVEN_FIFTEENTHS);
        assert_scores(metrics.scores(Average::Micro), 0.75, 0.75, 0.75);
        assert_eq!(
            metrics.scores(Average::Weighted),
            metrics.scores(Average::Macro)
        );
    }

    #[rstest]
    fn zero_support_class_counts_in_macro_but_not_weighted() {
        let Ok(metrics) = compute_metrics(&[0_u32, 0], &[0, 1]) else {
            panic!("equal-length input should score")
        };
        assert!(approx_eq(metrics.accuracy, 0.5, EPSILON));
        assert_scores(metrics.scores(Average::Macro), 0.5, 0.25, ONE_THIRD);
        assert_scores(metrics.scores(Average::Weighted), 1.0, 0.5, TWO_THIRDS);
    }

    #[rstest]
    fn multilabel_weighted_differs_from_macro() {
        let labels = vec![vec![1_u8, 1], vec![1, 0], vec![0, 0]];
        let preds = vec![vec![1_u8, 0], vec![0, 0], vec![0, 1]];
        let Ok(metrics) = compute_metrics(&labels, &preds) else {
            panic!("rows share a width")
        };
        assert!(approx_eq(metrics.accuracy, 0.0, EPSILON));
        assert_scores(metrics.scores(Average::Macro), 0.5, 0.25, ONE_THIRD);
        assert_scores(metrics.scores(Average::Micro), 0.5, ONE_THIRD, 0.4);
        assert_scores(
            metrics.scores(Average::Weighted),
            TWO_THIRDS,
            ONE_THIRD,
            FOUR_NINTHS,
        );
    }

    #[rstest]
    fn no_positive_labels_scores_zero() {
        let labels = vec![vec![false, false]];
        let Ok(metrics) = compute_metrics(&labels, &labels) else {
            panic!("rows share a width")
        };
        assert!(approx_eq(metrics.accuracy, 1.0, EPSILON));
        for avg in [Average::Macro, Average::Micro, Average::Weighted] {
            assert_scores(metrics.scores(avg), 0.0, 0.0, 0.0);
        }
    }

    #[rstest]
    #[case(&[0_usize, 1, 2], &[0, 1], MetricsError::LengthMismatch { labels: 3, preds: 2 })]
    #[case(&[], &[1], MetricsError::LengthMismatch { labels: 0, preds: 1 })]
    #[case(&[], &[], MetricsError::Empty)]
    fn rejects_invalid_batches(
        #[case] labels: &[usize],
        #[case] preds: &[usize],
        #[case] expected: MetricsError,
    ) {
        assert_eq!(compute_metrics(labels, preds), Err(expected));
    }

    #[rstest]
    fn map_uses_every_key() {
        let Ok(metrics) = compute_metrics(&[1_usize], &[1]) else {
            panic!("single sample should score")
        };
        let map = metrics.to_map();
        assert_eq!(map.len(), Metrics::KEYS.len());
        assert!(map.values().all(|v| approx_eq(*v, 1.0, EPSILON)));
    }

    #[rstest]
    fn serialises_flat_keys() {
        let Ok(metrics) = compute_metrics(&[1_usize, 2], &[1, 2]) else {
            panic!("equal-length input should score")
        };
        #[expect(clippy::expect_used, reason = "test should fail loudly")]
        let value = serde_json::to_value(metrics).expect("serialise Metrics");
        let Some(object) = value.as_object() else {
            panic!("metrics should serialise as an object")
        };
        let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
        let mut expected = Metrics::KEYS.to_vec();
        keys.sort_unstable();
        expected.sort_unstable();
        assert_eq!(keys, expected);
    }

    #[rstest]
    fn per_class_reports_follow_class_order() {
        let Ok(reports) = per_class_scores(&[2_usize, 0, 2], &[2, 2, 2]) else {
            panic!("equal-length input should score")
        };
        let classes: Vec<usize> = reports.iter().map(|r| r.class).collect();
        assert_eq!(classes, vec![0, 2]);
        assert_eq!(reports[1].support, 2);
        assert_scores(reports[1].scores, TWO_THIRDS, 1.0, 0.8);
    }
}
