//! Error types for the extraction pipeline.

use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

/// Pipeline error taxonomy.
///
/// Document-level errors (format, conversion, rendering, engine
/// initialization) are fatal to the document being processed and surface to
/// the caller. Page- and region-level failures are contained inside the
/// pipeline and degrade to empty content instead of being raised.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The input file extension is not a supported document format.
    #[error("unsupported file type: .{0}")]
    UnsupportedFormat(String),

    /// The office-to-PDF conversion tool is not installed.
    #[error("{tool} not found on PATH; install it to convert office documents")]
    ConversionToolMissing { tool: &'static str },

    /// The conversion tool ran but exited with a failure status.
    #[error("{tool} failed ({status}): {stderr}")]
    ConversionToolFailed {
        tool: &'static str,
        status: ExitStatus,
        stderr: String,
    },

    /// The conversion tool reported success but the expected PDF is missing.
    #[error("conversion produced no output, expected {0}")]
    ConversionOutputMissing(PathBuf),

    /// Rasterizing PDF pages to images failed.
    #[error("failed to render page images: {0}")]
    RenderFailed(String),

    /// The layout detection model could not be loaded.
    #[error("failed to load layout model: {0}")]
    ModelLoad(String),

    /// A forward pass of the layout detection model failed.
    #[error("layout inference failed: {0}")]
    Inference(String),

    /// The OCR engine could not be initialized.
    #[error("failed to initialize OCR engine: {0}")]
    OcrInit(String),

    /// Extracting the content of a single region failed.
    #[error("region extraction failed: {0}")]
    Extraction(String),

    /// A configuration file could not be read or parsed.
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PipelineError>;

impl PipelineError {
    /// Whether this error points at the environment (missing tool, model, or
    /// OCR data) rather than at the input document.
    pub fn is_environment(&self) -> bool {
        matches!(
            self,
            PipelineError::ConversionToolMissing { .. }
                | PipelineError::ModelLoad(_)
                | PipelineError::OcrInit(_)
        )
    }
}

// ============================================================
// Tests
// ============================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_format_message() {
        let err = PipelineError::UnsupportedFormat("txt".to_string());
        assert_eq!(err.to_string(), "unsupported file type: .txt");
    }

    #[test]
    fn test_environment_classification() {
        assert!(PipelineError::ConversionToolMissing { tool: "libreoffice" }.is_environment());
        assert!(PipelineError::ModelLoad("missing".into()).is_environment());
        assert!(!PipelineError::UnsupportedFormat("txt".into()).is_environment());
        assert!(!PipelineError::RenderFailed("broken".into()).is_environment());
    }
}
