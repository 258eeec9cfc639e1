//! Registry of supported Korean ELECTRA model variants.
//!
//! Each [`ModelVariant`] carries its configuration, tokenizer and model kinds
//! as static associations. Lookups by raw key go through [`FromStr`], so an
//! unknown key is rejected once at the boundary instead of at each use site.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Raised when a model key names no registered variant.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
#[error("unknown model type `{name}`; expected one of {}", ModelVariant::keys().join(", "))]
pub struct UnknownModelError {
    /// Key that failed to resolve.
    pub name: String,
}

/// Supported encoder checkpoints.
///
/// # Examples
///
/// ```
/// use goemotions_korean::registry::{ModelVariant, TokenizerKind};
///
/// let variant: ModelVariant = "kocharelectra-base".parse().unwrap();
/// assert_eq!(variant.tokenizer_kind(), TokenizerKind::KoCharElectra);
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModelVariant {
    KoelectraSmall,
    #[default]
    KoelectraBase,
    KocharelectraBase,
    KocharelectraSmall,
}

/// Configuration type shared by a family of checkpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigKind {
    Electra,
}

/// Tokenizer used to encode text for a checkpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenizerKind {
    /// WordPiece vocabulary.
    Electra,
    /// One token per character.
    KoCharElectra,
}

/// Model head built on top of the encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    /// ELECTRA discriminator with a sigmoid head per label.
    ElectraForMultiLabelClassification,
}

/// Everything a model loader needs to know about a variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ModelSpec {
    pub variant: ModelVariant,
    pub config: ConfigKind,
    pub tokenizer: TokenizerKind,
    pub model: ModelKind,
    /// Pretrained checkpoint used when no explicit path is configured.
    pub default_checkpoint: &'static str,
}

impl ModelSpec {
    /// Resolve a raw key into its spec.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownModelError`] if `name` is not a registered key.
    pub fn lookup(name: &str) -> Result<Self, UnknownModelError> {
        name.parse::<ModelVariant>().map(ModelVariant::spec)
    }
}

impl ModelVariant {
    /// Every registered variant in registry order.
    pub const ALL: [Self; 4] = [
        Self::KoelectraSmall,
        Self::KoelectraBase,
        Self::KocharelectraBase,
        Self::KocharelectraSmall,
    ];

    /// Lookup key for the variant.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::KoelectraSmall => "koelectra-small",
            Self::KoelectraBase => "koelectra-base",
            Self::KocharelectraBase => "kocharelectra-base",
            Self::KocharelectraSmall => "kocharelectra-small",
        }
    }

    /// Registered keys in registry order.
    #[must_use]
    pub fn keys() -> Vec<&'static str> {
        Self::ALL.iter().map(|v| v.as_str()).collect()
    }

    #[must_use]
    pub const fn config_kind(self) -> ConfigKind {
        match self {
            Self::KoelectraSmall
            | Self::KoelectraBase
            | Self::KocharelectraBase
            | Self::KocharelectraSmall => ConfigKind::Electra,
        }
    }

    #[must_use]
    pub const fn tokenizer_kind(self) -> TokenizerKind {
        match self {
            Self::KoelectraSmall | Self::KoelectraBase => TokenizerKind::Electra,
            Self::KocharelectraBase | Self::KocharelectraSmall => TokenizerKind::KoCharElectra,
        }
    }

    #[must_use]
    pub const fn model_kind(self) -> ModelKind {
        match self {
            Self::KoelectraSmall
            | Self::KoelectraBase
            | Self::KocharelectraBase
            | Self::KocharelectraSmall => ModelKind::ElectraForMultiLabelClassification,
        }
    }

    #[must_use]
    pub const fn default_checkpoint(self) -> &'static str {
        match self {
            Self::KoelectraSmall => "monologg/koelectra-small-v3-discriminator",
            Self::KoelectraBase => "monologg/koelectra-base-v3-discriminator",
            Self::KocharelectraBase => "monologg/kocharelectra-base-discriminator",
            Self::KocharelectraSmall => "monologg/kocharelectra-small-discriminator",
        }
    }

    /// Bundle the static associations for this variant.
    #[must_use]
    pub const fn spec(self) -> ModelSpec {
        ModelSpec {
            variant: self,
            config: self.config_kind(),
            tokenizer: self.tokenizer_kind(),
            model: self.model_kind(),
            default_checkpoint: self.default_checkpoint(),
        }
    }
}

impl fmt::Display for ModelVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelVariant {
    type Err = UnknownModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| UnknownModelError { name: s.to_owned() })
    }
}
