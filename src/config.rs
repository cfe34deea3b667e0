//! Pipeline configuration.
//!
//! Loaded from `config.toml` in the project root. Stock defaults are the
//! base layer; the user file only needs the keys it overrides.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! content_dir = "_posts"    # Markdown posts, one file per slug
//! asset_root = "public"     # Root-relative image paths resolve under here
//! output_dir = "out"        # Where `build` writes models and pages
//!
//! [front_matter]
//! fields = ["title", "date", "slug", "author", "content", "ogImage", "coverImage"]
//!
//! [processing]
//! max_processes = 4         # Max parallel document builds (omit for auto = CPU cores)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::types::Field;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CONFIG_FILE: &str = "config.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Pipeline configuration loaded from `config.toml`.
///
/// Directory settings are relative to the project root passed to
/// [`load_config`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Directory holding the markdown posts.
    pub content_dir: String,
    /// Base directory for root-relative image paths (`/assets/x.png`).
    pub asset_root: String,
    /// Destination for the `build` command.
    pub output_dir: String,
    /// Which front-matter attributes are loaded per document.
    pub front_matter: FrontMatterConfig,
    /// Parallel build settings.
    pub processing: ProcessingConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            content_dir: "_posts".to_string(),
            asset_root: "public".to_string(),
            output_dir: "out".to_string(),
            front_matter: FrontMatterConfig::default(),
            processing: ProcessingConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (key, value) in [
            ("content_dir", &self.content_dir),
            ("asset_root", &self.asset_root),
            ("output_dir", &self.output_dir),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::Validation(format!("{key} must not be empty")));
            }
        }
        if self.front_matter.fields.is_empty() {
            return Err(ConfigError::Validation(
                "front_matter.fields must not be empty".into(),
            ));
        }
        if self.processing.max_processes == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_processes must be at least 1".into(),
            ));
        }
        Ok(())
    }

    pub fn content_path(&self, project_root: &Path) -> PathBuf {
        project_root.join(&self.content_dir)
    }

    pub fn asset_path(&self, project_root: &Path) -> PathBuf {
        project_root.join(&self.asset_root)
    }

    pub fn output_path(&self, project_root: &Path) -> PathBuf {
        project_root.join(&self.output_dir)
    }
}

/// Front-matter field selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FrontMatterConfig {
    /// Attributes requested from the content store for every build.
    pub fields: Vec<Field>,
}

impl Default for FrontMatterConfig {
    fn default() -> Self {
        Self {
            fields: vec![
                Field::Title,
                Field::Date,
                Field::Slug,
                Field::Author,
                Field::Content,
                Field::OgImage,
                Field::CoverImage,
            ],
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of documents built concurrently.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_processes.map(|n| n.min(cores)).unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(PipelineConfig::default())?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join(CONFIG_FILE);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<PipelineConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: PipelineConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the project root.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(project_root: &Path) -> Result<PipelineConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(project_root)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# post-pipeline configuration
# ===========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Paths are relative to the project root.
# Unknown keys will cause an error.

# Directory holding the markdown posts. Each `<slug>.md` file is one post.
content_dir = "_posts"

# Base directory for image paths referenced from posts.
# `![alt](/assets/cat.png)` is probed at `<asset_root>/assets/cat.png`.
asset_root = "public"

# Where `build` writes paths.json, rendering models and HTML pages.
output_dir = "out"

# ---------------------------------------------------------------------------
# Front-matter
# ---------------------------------------------------------------------------
[front_matter]
# Attributes loaded for every post. `content` (the markdown body) is always
# loaded by the build, whether listed or not.
fields = ["title", "date", "slug", "author", "content", "ogImage", "coverImage"]

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum posts built in parallel.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}
