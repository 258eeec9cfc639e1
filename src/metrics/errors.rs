use thiserror::Error;

/// Precondition failures when scoring predictions against gold labels.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum MetricsError {
    #[error("labels and predictions differ in length: {labels} labels, {preds} predictions")]
    LengthMismatch { labels: usize, preds: usize },
    #[error("at least one labelled sample is required to compute metrics")]
    Empty,
    #[error("indicator row {row} has width {actual} but expected {expected}")]
    WidthMismatch {
        expected: usize,
        actual: usize,
        row: usize,
    },
}
