//! Support library for multi-label emotion classification with Korean
//! ELECTRA encoders.
//! Re-exports the model registry, seeding, logging and metrics entry points.

#[cfg(feature = "cli")]
pub mod cli;
pub mod evaluation;
pub mod logging;
pub mod metrics;
pub mod registry;
pub mod seed;

#[cfg(feature = "cli")]
pub use cli::GoEmotionsArgs;
pub use evaluation::{EvaluationError, PredictionRecord, evaluate_file};
pub use logging::{DEFAULT_LOG_LEVEL, LoggingError, init_logger, resolve_filter};
pub use metrics::{Average, Metrics, MetricsError, Scores, compute_metrics};
pub use registry::{ModelSpec, ModelVariant, UnknownModelError};
pub use seed::{CpuOnly, DeviceProbe, SeedSource, SeededRngs, VisibleDevices, set_seed};

pub mod tests;
