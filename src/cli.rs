//! CLI argument types and layered configuration for the `goemotions` binary.
//! Loads from CLI args, environment (prefix `GOEMOTIONS_`), and optional
//! config files.

use figment::{
    Figment,
    providers::{Env, Format, Toml},
};
use ortho_config::OrthoError;
use serde::Deserialize;
use std::path::PathBuf;

use crate::{
    logging::DEFAULT_LOG_LEVEL,
    registry::ModelVariant,
    seed::SeedSource,
};

/// Seed used when none is configured.
pub const DEFAULT_SEED: u64 = 42;

/// Command-line arguments for the `goemotions` binary.
///
/// Values are loaded from command line arguments, environment variables
/// (prefixed with `GOEMOTIONS_`), and an optional configuration file, in
/// that order of precedence.
///
/// # Examples
///
/// Parse flags directly:
/// ```
/// use goemotions_korean::cli::GoEmotionsArgs;
/// use ortho_config::OrthoConfig;
///
/// let args = GoEmotionsArgs::load_from_iter(["goemotions", "--seed=7", "--no-cuda=true"])
///     .expect("load args from CLI iterator");
/// assert_eq!(args.seed, 7);
/// assert!(args.no_cuda);
/// ```
///
/// Load from a configuration file:
/// ```
/// use goemotions_korean::cli::GoEmotionsArgs;
/// use goemotions_korean::registry::ModelVariant;
/// use ortho_config::OrthoConfig;
/// use std::io::Write;
/// use tempfile::NamedTempFile;
///
/// let mut file = NamedTempFile::new().expect("create temp file");
/// writeln!(file, "model_type = \"kocharelectra-small\"").expect("write config");
/// let path = file.path().to_str().expect("path str");
/// let args = GoEmotionsArgs::load_from_iter(["goemotions", "--config-path", path])
///     .expect("load args from config path");
/// assert_eq!(args.model_variant(), ModelVariant::KocharelectraSmall);
/// ```
#[derive(Debug, Deserialize, ortho_config::OrthoConfig)]
#[ortho_config(prefix = "GOEMOTIONS")]
pub struct GoEmotionsArgs {
    /// Registry key of the encoder, e.g. `koelectra-base`. Unknown keys are
    /// rejected while loading.
    #[serde(default)]
    pub model_type: Option<ModelVariant>,

    /// Seed for every random-number stream.
    #[ortho_config(default = 42)]
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Leave GPU generators unseeded even when devices are visible.
    #[ortho_config(default = false)]
    #[serde(default)]
    pub no_cuda: bool,

    /// Log filter directive; `RUST_LOG` takes precedence.
    #[serde(default)]
    pub log_level: Option<String>,

    /// JSON Lines file of predictions to score.
    #[serde(default)]
    pub predictions: Option<PathBuf>,

    /// Optional path to a configuration file.
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

const fn default_seed() -> u64 {
    DEFAULT_SEED
}

impl GoEmotionsArgs {
    /// Configured model type, defaulting to `koelectra-base`.
    #[must_use]
    pub fn model_variant(&self) -> ModelVariant {
        self.model_type.unwrap_or_default()
    }

    /// Configured log filter, or [`DEFAULT_LOG_LEVEL`].
    #[must_use]
    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    /// Load configuration solely from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an [`OrthoError`] if any variable cannot be parsed.
    pub fn load_from_env() -> Result<Self, OrthoError> {
        Figment::new()
            .merge(Env::prefixed("GOEMOTIONS_"))
            .extract()
            .map_err(Into::into)
    }

    /// Load configuration from a file path.
    ///
    /// # Errors
    ///
    /// Returns an [`OrthoError`] if the file cannot be read or parsed.
    pub fn load_from_config(path: &str) -> Result<Self, OrthoError> {
        Figment::new()
            .merge(Toml::file(path))
            .extract()
            .map_err(Into::into)
    }

    /// Load configuration from environment variables and a file path.
    ///
    /// # Errors
    ///
    /// Returns an [`OrthoError`] if either source contains invalid values.
    pub fn load_from_env_and_config(path: &str) -> Result<Self, OrthoError> {
        Figment::new()
            .merge(Toml::file(path))
            .merge(Env::prefixed("GOEMOTIONS_"))
            .extract()
            .map_err(Into::into)
    }
}

impl SeedSource for GoEmotionsArgs {
    fn seed(&self) -> u64 {
        self.seed
    }

    fn no_cuda(&self) -> bool {
        self.no_cuda
    }
}
