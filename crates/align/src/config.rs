use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::engine::{AlignOptions, DEFAULT_THRESHOLD};
use crate::error::AlignError;
use crate::scorer::ScorerKind;

pub const DEFAULT_CURATED_KEY: &str = "chembl_assay_description";
pub const DEFAULT_REFERENCE_KEY: &str = "Assay Description";
pub const DEFAULT_OUTPUT_PREFIX: &str = "demo_output";

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Alignment run described in TOML. Every field is optional so command-line
/// flags can fill or override any of them.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AlignConfig {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub threshold: Option<u32>,
    #[serde(default)]
    pub scorer: Option<ScorerKind>,
    /// File 1: rows to be reordered.
    #[serde(default)]
    pub curated: DatasetConfig,
    /// File 2: the order to follow.
    #[serde(default)]
    pub reference: DatasetConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatasetConfig {
    #[serde(default)]
    pub file: Option<PathBuf>,
    #[serde(default)]
    pub key: Option<String>,
    /// Worksheet name for Excel inputs. First sheet when unset.
    #[serde(default)]
    pub sheet: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    #[serde(default)]
    pub prefix: Option<String>,
}

impl AlignConfig {
    pub fn from_toml(input: &str) -> Result<Self, AlignError> {
        let config: AlignConfig =
            toml::from_str(input).map_err(|e| AlignError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and resolve relative file paths against `base_dir`.
    pub fn from_toml_in(input: &str, base_dir: &Path) -> Result<Self, AlignError> {
        let mut config = Self::from_toml(input)?;
        for ds in [&mut config.curated, &mut config.reference] {
            if let Some(file) = ds.file.take() {
                ds.file = Some(if file.is_relative() { base_dir.join(file) } else { file });
            }
        }
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AlignError> {
        if let Some(t) = self.threshold {
            if t > 100 {
                return Err(AlignError::InvalidThreshold(t));
            }
        }

        for (label, key) in [
            ("curated.key", &self.curated.key),
            ("reference.key", &self.reference.key),
        ] {
            if matches!(key, Some(k) if k.trim().is_empty()) {
                return Err(AlignError::ConfigValidation(format!("{label} must not be empty")));
            }
        }

        if matches!(&self.output.prefix, Some(p) if p.trim().is_empty()) {
            return Err(AlignError::ConfigValidation(
                "output.prefix must not be empty".into(),
            ));
        }

        Ok(())
    }

    pub fn curated_key(&self) -> &str {
        self.curated.key.as_deref().unwrap_or(DEFAULT_CURATED_KEY)
    }

    pub fn reference_key(&self) -> &str {
        self.reference.key.as_deref().unwrap_or(DEFAULT_REFERENCE_KEY)
    }

    pub fn output_prefix(&self) -> &str {
        self.output.prefix.as_deref().unwrap_or(DEFAULT_OUTPUT_PREFIX)
    }

    /// Engine options with defaults applied. Call after `validate`.
    pub fn options(&self) -> Result<AlignOptions, AlignError> {
        let threshold = match self.threshold {
            Some(t) => u8::try_from(t)
                .ok()
                .filter(|t| *t <= 100)
                .ok_or(AlignError::InvalidThreshold(t))?,
            None => DEFAULT_THRESHOLD,
        };
        Ok(AlignOptions {
            threshold,
            scorer: self.scorer.unwrap_or_default(),
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
