//! Pipeline configuration.
//!
//! Settings are layered: built-in defaults, then an optional TOML config
//! file (`./docsift.toml` or the user config directory), then command-line
//! overrides. The merged product is the [`PipelineConfig`] the pipeline
//! consumes.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{PipelineError, Result};

/// Local config file checked first.
pub const LOCAL_CONFIG_FILE: &str = "docsift.toml";

// ============================================================
// Pipeline configuration
// ============================================================

/// Fully-resolved settings consumed by the pipeline.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Rendering resolution; scale factor is `dpi / 72` over the PDF point
    /// baseline.
    pub dpi: u32,

    /// JPEG quality for rendered page images.
    pub jpeg_quality: u8,

    /// ONNX layout detection model artifact.
    pub model_path: PathBuf,

    /// Optional JSON label map beside the model; DocLayNet names are used
    /// when absent.
    pub labels_path: Option<PathBuf>,

    /// Directory for rendered page images.
    pub page_image_dir: PathBuf,

    /// Directory under which each page gets its own output directory.
    pub parsed_dir: PathBuf,

    /// OCR language code (Tesseract traineddata name).
    pub ocr_language: String,

    /// Optional override of the Tesseract trained-data directory.
    pub tessdata_dir: Option<PathBuf>,

    /// Minimum detector confidence for a region to be kept.
    pub confidence_threshold: f32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            dpi: 300,
            jpeg_quality: 90,
            model_path: PathBuf::from("models/doclayout.onnx"),
            labels_path: None,
            page_image_dir: PathBuf::from("out/page_images"),
            parsed_dir: PathBuf::from("out/parsed_pages"),
            ocr_language: "eng".to_string(),
            tessdata_dir: None,
            confidence_threshold: 0.25,
        }
    }
}

// ============================================================
// Config file layer
// ============================================================

/// On-disk configuration, all fields optional with defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub dpi: u32,
    pub jpeg_quality: u8,
    pub model_path: PathBuf,
    pub labels_path: Option<PathBuf>,
    pub page_image_dir: PathBuf,
    pub parsed_dir: PathBuf,
    pub ocr_language: String,
    pub tessdata_dir: Option<PathBuf>,
    pub confidence_threshold: f32,
}

impl Default for Config {
    fn default() -> Self {
        let defaults = PipelineConfig::default();
        Self {
            dpi: defaults.dpi,
            jpeg_quality: defaults.jpeg_quality,
            model_path: defaults.model_path,
            labels_path: defaults.labels_path,
            page_image_dir: defaults.page_image_dir,
            parsed_dir: defaults.parsed_dir,
            ocr_language: defaults.ocr_language,
            tessdata_dir: defaults.tessdata_dir,
            confidence_threshold: defaults.confidence_threshold,
        }
    }
}

impl Config {
    /// Load configuration from the standard locations.
    ///
    /// Checks `./docsift.toml` first, then the user config directory.
    /// Missing files fall back to defaults; a present but malformed file is
    /// an error.
    pub fn load() -> Result<Self> {
        let local = Path::new(LOCAL_CONFIG_FILE);
        if local.exists() {
            return Self::load_from_path(local);
        }

        if let Some(user) = Self::user_config_path() {
            if user.exists() {
                return Self::load_from_path(&user);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        toml::from_str(&raw)
            .map_err(|e| PipelineError::Config(format!("{}: {e}", path.display())))
    }

    /// The per-user config file location.
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("docsift").join("config.toml"))
    }

    /// Merge command-line overrides on top of this configuration.
    pub fn merge_with_cli(&self, overrides: &CliOverrides) -> PipelineConfig {
        let (page_image_dir, parsed_dir) = match &overrides.output_dir {
            Some(out) => (out.join("page_images"), out.join("parsed_pages")),
            None => (self.page_image_dir.clone(), self.parsed_dir.clone()),
        };

        PipelineConfig {
            dpi: overrides.dpi.unwrap_or(self.dpi),
            jpeg_quality: overrides.jpeg_quality.unwrap_or(self.jpeg_quality),
            model_path: overrides
                .model_path
                .clone()
                .unwrap_or_else(|| self.model_path.clone()),
            labels_path: overrides
                .labels_path
                .clone()
                .or_else(|| self.labels_path.clone()),
            page_image_dir,
            parsed_dir,
            ocr_language: overrides
                .ocr_language
                .clone()
                .unwrap_or_else(|| self.ocr_language.clone()),
            tessdata_dir: overrides
                .tessdata_dir
                .clone()
                .or_else(|| self.tessdata_dir.clone()),
            confidence_threshold: overrides
                .confidence_threshold
                .unwrap_or(self.confidence_threshold),
        }
    }
}

/// Command-line values that take precedence over the config file.
///
/// Only fields the user explicitly set are `Some`, so clap defaults do not
/// clobber config-file values.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub dpi: Option<u32>,
    pub jpeg_quality: Option<u8>,
    pub model_path: Option<PathBuf>,
    pub labels_path: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub ocr_language: Option<String>,
    pub tessdata_dir: Option<PathBuf>,
    pub confidence_threshold: Option<f32>,
}

impl CliOverrides {
    pub fn new() -> Self {
        Self::default()
    }
}

// ============================================================
// Tests
// ============================================================
