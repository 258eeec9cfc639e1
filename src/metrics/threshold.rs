//! Conversion of raw multi-label logits into indicator rows.

/// Probability at or above which a label counts as predicted.
pub const DEFAULT_THRESHOLD: f32 = 0.3;

/// Apply the logistic function to each logit and mark the labels whose
/// probability reaches `threshold`.
///
/// # Examples
///
/// ```
/// use goemotions_korean::metrics::{binarize, DEFAULT_THRESHOLD};
///
/// assert_eq!(binarize(&[-4.0, 0.0, 2.5], DEFAULT_THRESHOLD), vec![0, 1, 1]);
/// ```
#[must_use]
pub fn binarize(logits: &[f32], threshold: f32) -> Vec<u8> {
    logits
        .iter()
        .map(|&logit| u8::from(logistic(logit) >= threshold))
        .collect()
}

#[expect(clippy::float_arithmetic, reason = "sigmoid requires float operations")]
fn logistic(value: f32) -> f32 {
    1.0 / (1.0 + (-value).exp())
}
