//! Scoring of saved multi-label predictions.
//!
//! Predictions are stored as JSON Lines, one sample per line:
//!
//! ```text
//! {"labels": [0, 1, 0], "preds": [0, 1, 1]}
//! ```

use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::metrics::{Metrics, MetricsError, compute_metrics};

/// Gold and predicted indicator rows for one sample.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PredictionRecord {
    pub labels: Vec<u8>,
    pub preds: Vec<u8>,
}

/// Errors produced while scoring a predictions file.
#[derive(Debug, Error)]
pub enum EvaluationError {
    #[error("failed to read predictions at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed prediction record on line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("prediction record on line {line} has width {actual} but expected {expected}")]
    RaggedRecord {
        line: usize,
        expected: usize,
        actual: usize,
    },
    #[error(transparent)]
    Metrics(#[from] MetricsError),
}

/// Read every record from a JSON Lines file. Blank lines are skipped.
///
/// # Errors
///
/// Returns [`EvaluationError::Io`] if the file cannot be read and
/// [`EvaluationError::Parse`] for the first malformed line (1-based).
pub fn read_records(path: &Path) -> Result<Vec<PredictionRecord>, EvaluationError> {
    Ok(read_numbered(path)?
        .into_iter()
        .map(|(_, record)| record)
        .collect())
}

/// Records paired with their 1-based line in the file.
fn read_numbered(path: &Path) -> Result<Vec<(usize, PredictionRecord)>, EvaluationError> {
    let io_error = |source| EvaluationError::Io {
        path: path.to_path_buf(),
        source,
    };
    let reader = BufReader::new(File::open(path).map_err(io_error)?);
    let mut records = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line.map_err(io_error)?;
        if line.trim().is_empty() {
            continue;
        }
        let number = index + 1;
        let record = serde_json::from_str(&line).map_err(|source| EvaluationError::Parse {
            line: number,
            source,
        })?;
        records.push((number, record));
    }
    Ok(records)
}

/// Compute [`Metrics`] over the records in memory.
///
/// The `row` of a [`MetricsError::WidthMismatch`] is the 0-based index into
/// `records`.
///
/// # Errors
///
/// Propagates [`MetricsError`] for empty input or ragged indicator rows.
pub fn evaluate_records(records: Vec<PredictionRecord>) -> Result<Metrics, EvaluationError> {
    let (labels, preds): (Vec<_>, Vec<_>) = records
        .into_iter()
        .map(|record| (record.labels, record.preds))
        .unzip();
    Ok(compute_metrics(&labels, &preds)?)
}

/// Read a predictions file and score it.
///
/// # Errors
///
/// Fails if the file cannot be read or parsed, or if the records cannot be
/// scored. A record whose width differs from the first is reported as
/// [`EvaluationError::RaggedRecord`] with its line in the file.
pub fn evaluate_file(path: &Path) -> Result<Metrics, EvaluationError> {
    let (lines, records): (Vec<usize>, Vec<PredictionRecord>) =
        read_numbered(path)?.into_iter().unzip();
    tracing::info!(path = %path.display(), samples = records.len(), "scoring predictions");
    let metrics = evaluate_records(records).map_err(|err| match err {
        EvaluationError::Metrics(MetricsError::WidthMismatch {
            expected,
            actual,
            row,
        }) => EvaluationError::RaggedRecord {
            line: lines.get(row).copied().unwrap_or(row + 1),
            expected,
            actual,
        },
        other => other,
    })?;
    tracing::info!(
        accuracy = metrics.accuracy,
        macro_f1 = metrics.macro_f1,
        micro_f1 = metrics.micro_f1,
        weighted_f1 = metrics.weighted_f1,
        "evaluation finished"
    );
    Ok(metrics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::support::approx_eq;
    use rstest::{fixture, rstest};
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[fixture]
    fn predictions_file() -> NamedTempFile {
        NamedTempFile::new().unwrap_or_else(|e| panic!("create temp file: {e}"))
    }

    fn write_lines(file: &mut NamedTempFile, lines: &[&str]) {
        for line in lines {
            writeln!(file, "{line}").unwrap_or_else(|e| panic!("write predictions: {e}"));
        }
    }

    #[rstest]
    fn scores_file_and_skips_blank_lines(mut predictions_file: NamedTempFile) {
        write_lines(
            &mut predictions_file,
            &[
                r#"{"labels": [1, 0], "preds": [1, 0]}"#,
                "",
                r#"{"labels": [0, 1], "preds": [0, 0]}"#,
            ],
        );
        let metrics = evaluate_file(predictions_file.path())
            .unwrap_or_else(|e| panic!("unexpected evaluation error: {e}"));
        assert!(approx_eq(metrics.accuracy, 0.5, 1e-12));
        assert!(approx_eq(metrics.micro_precision, 1.0, 1e-12));
        assert!(approx_eq(metrics.micro_recall, 0.5, 1e-12));
    }

    #[rstest]
    fn reports_malformed_line_number(mut predictions_file: NamedTempFile) {
        write_lines(
            &mut predictions_file,
            &[r#"{"labels": [1], "preds": [1]}"#, r#"{"labels": [1]}"#],
        );
        let result = read_records(predictions_file.path());
        assert!(matches!(result, Err(EvaluationError::Parse { line: 2, .. })));
    }

    #[rstest]
    fn ragged_record_reports_file_line(mut predictions_file: NamedTempFile) {
        write_lines(
            &mut predictions_file,
            &[
                r#"{"labels": [1, 0], "preds": [1, 0]}"#,
                "",
                r#"{"labels": [1], "preds": [1]}"#,
            ],
        );
        let result = evaluate_file(predictions_file.path());
        assert!(
            matches!(
                result,
                Err(EvaluationError::RaggedRecord {
                    line: 3,
                    expected: 2,
                    actual: 1,
                })
            ),
            "{result:?}"
        );
    }

    #[rstest]
    fn in_memory_width_mismatch_uses_record_index() {
        let records = vec![
            PredictionRecord {
                labels: vec![1, 0],
                preds: vec![1, 0],
            },
            PredictionRecord {
                labels: vec![1],
                preds: vec![1],
            },
        ];
        assert!(matches!(
            evaluate_records(records),
            Err(EvaluationError::Metrics(MetricsError::WidthMismatch { row: 1, .. }))
        ));
    }

    #[rstest]
    fn empty_file_cannot_be_scored(predictions_file: NamedTempFile) {
        let result = evaluate_file(predictions_file.path());
        assert!(matches!(
            result,
            Err(EvaluationError::Metrics(MetricsError::Empty))
        ));
    }

    #[rstest]
    fn missing_file_reports_path() {
        let path = Path::new("/nonexistent/predictions.jsonl");
        let Err(EvaluationError::Io { path: reported, .. }) = read_records(path) else {
            panic!("expected an I/O error")
        };
        assert_eq!(reported, path);
    }
}
