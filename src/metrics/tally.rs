//! Per-class confusion counts for class-id and indicator-row labels.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use super::{Scores, errors::MetricsError};

/// Confusion counts for a single class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ClassCounts {
    pub tp: usize,
    pub fp: usize,
    #[serde(rename = "fn")]
    pub fn_: usize,
    /// Number of samples whose gold label contains the class.
    pub support: usize,
}

impl ClassCounts {
    /// Precision, recall and F1 for this class. A zero denominator yields 0.
    #[must_use]
    pub fn scores(&self) -> Scores {
        Scores {
            precision: ratio(self.tp, self.tp + self.fp),
            recall: ratio(self.tp, self.tp + self.fn_),
            f1: ratio(2 * self.tp, 2 * self.tp + self.fp + self.fn_),
        }
    }

    fn merge(self, other: Self) -> Self {
        Self {
            tp: self.tp + other.tp,
            fp: self.fp + other.fp,
            fn_: self.fn_ + other.fn_,
            support: self.support + other.support,
        }
    }
}

/// Confusion counts for every class seen in a labelled batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tally<C> {
    /// Classes in ascending order with their counts.
    pub classes: Vec<(C, ClassCounts)>,
    /// Samples whose prediction equals the gold label exactly.
    pub exact_matches: usize,
    pub samples: usize,
}

impl<C> Tally<C> {
    /// Count a batch after checking the shared preconditions.
    ///
    /// # Errors
    ///
    /// Returns [`MetricsError::LengthMismatch`] if the sequences differ in
    /// length, [`MetricsError::Empty`] if they are empty, and any
    /// label-specific error raised by [`Target::confusion`].
    pub fn from_pairs<T>(labels: &[T], preds: &[T]) -> Result<Self, MetricsError>
    where
        T: Target<Class = C>,
    {
        if labels.len() != preds.len() {
            return Err(MetricsError::LengthMismatch {
                labels: labels.len(),
                preds: preds.len(),
            });
        }
        if labels.is_empty() {
            return Err(MetricsError::Empty);
        }
        let tally = T::confusion(labels, preds)?;
        tracing::debug!(
            samples = tally.samples,
            classes = tally.classes.len(),
            exact_matches = tally.exact_matches,
            "tallied predictions"
        );
        Ok(tally)
    }

    /// Counts summed over every class.
    #[must_use]
    pub fn pooled(&self) -> ClassCounts {
        self.classes
            .iter()
            .map(|(_, counts)| *counts)
            .fold(ClassCounts::default(), ClassCounts::merge)
    }

    #[must_use]
    pub fn accuracy(&self) -> f64 {
        ratio(self.exact_matches, self.samples)
    }
}

/// Label element accepted by the metrics functions.
///
/// Class ids (`usize`, `u32`) describe single-label problems; indicator rows
/// (`Vec<bool>`, `Vec<u8>`) describe multi-label problems with one column
/// per class.
pub trait Target: Sized {
    /// Identifier reported for each class.
    type Class: Copy + Ord + fmt::Debug;

    /// Build confusion counts for equally long, non-empty sequences.
    ///
    /// # Errors
    ///
    /// Returns an error when the labels are internally inconsistent, such as
    /// indicator rows of differing width.
    fn confusion(labels: &[Self], preds: &[Self]) -> Result<Tally<Self::Class>, MetricsError>;
}

macro_rules! class_id_target {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl Target for $ty {
                type Class = $ty;

                fn confusion(
                    labels: &[Self],
                    preds: &[Self],
                ) -> Result<Tally<Self::Class>, MetricsError> {
                    Ok(tally_class_ids(labels, preds))
                }
            }
        )+
    };
}

class_id_target!(usize, u32);

fn tally_class_ids<C: Copy + Ord>(labels: &[C], preds: &[C]) -> Tally<C> {
    let mut table: BTreeMap<C, ClassCounts> = BTreeMap::new();
    let mut exact_matches = 0;
    for (&truth, &pred) in labels.iter().zip(preds) {
        table.entry(truth).or_default().support += 1;
        if truth == pred {
            table.entry(truth).or_default().tp += 1;
            exact_matches += 1;
        } else {
            table.entry(pred).or_default().fp += 1;
            table.entry(truth).or_default().fn_ += 1;
        }
    }
    Tally {
        classes: table.into_iter().collect(),
        exact_matches,
        samples: labels.len(),
    }
}

/// Cell of a multi-label indicator row.
pub trait Indicator: Copy {
    fn is_set(self) -> bool;
}

impl Indicator for bool {
    fn is_set(self) -> bool {
        self
    }
}

impl Indicator for u8 {
    fn is_set(self) -> bool {
        self != 0
    }
}

impl<T: Indicator> Target for Vec<T> {
    type Class = usize;

    fn confusion(labels: &[Self], preds: &[Self]) -> Result<Tally<Self::Class>, MetricsError> {
        let width = labels.first().map_or(0, Vec::len);
        let mut counts = vec![ClassCounts::default(); width];
        let mut exact_matches = 0;
        for (row, (truth, pred)) in labels.iter().zip(preds).enumerate() {
            for actual in [truth.len(), pred.len()] {
                if actual != width {
                    return Err(MetricsError::WidthMismatch {
                        expected: width,
                        actual,
                        row,
                    });
                }
            }
            let mut matched = true;
            for (slot, (&t, &p)) in counts.iter_mut().zip(truth.iter().zip(pred)) {
                let (t, p) = (t.is_set(), p.is_set());
                match (t, p) {
                    (true, true) => slot.tp += 1,
                    (false, true) => slot.fp += 1,
                    (true, false) => slot.fn_ += 1,
                    (false, false) => {}
                }
                if t {
                    slot.support += 1;
                }
                matched &= t == p;
            }
            if matched {
                exact_matches += 1;
            }
        }
        Ok(Tally {
            classes: counts.into_iter().enumerate().collect(),
            exact_matches,
            samples: labels.len(),
        })
    }
}

/// `numerator / denominator`, or 0 when the denominator is zero.
#[expect(clippy::float_arithmetic, reason = "ratio of counts")]
#[expect(
    clippy::cast_precision_loss,
    reason = "label counts stay far below 2^52"
)]
pub(crate) fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}
