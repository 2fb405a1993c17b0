//! docsift - document layout extraction pipeline.
//!
//! Ingests PDF and PDF-convertible office documents, rasterizes each page,
//! detects semantic layout regions with a pretrained detection model, orders
//! them into reading order, extracts each region's content (OCR text or a
//! persisted image asset), and assembles a per-page structured content model
//! ready for JSON serialization.
//!
//! The typical entry point is [`DocumentPipeline`]:
//!
//! ```rust,no_run
//! use docsift::{DocumentPipeline, PipelineConfig};
//!
//! # fn main() -> docsift::Result<()> {
//! let mut pipeline = DocumentPipeline::new(PipelineConfig::default())?;
//! let pages = pipeline.process_document("lease.pdf".as_ref(), "lease.pdf")?;
//! println!("{}", serde_json::to_string_pretty(&pages).unwrap());
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod convert;
pub mod error;
pub mod extract;
pub mod layout;
pub mod pipeline;

pub use cli::{Cli, Commands, ParseArgs};
pub use config::{CliOverrides, Config, PipelineConfig};
pub use convert::{classify_format, page_image_name, DocumentFormat, FormatNormalizer};
pub use error::{PipelineError, Result};
pub use extract::{
    is_visual, system_font, ContentItem, ItemContent, PageAnnotator, PageExtractor, TesseractOcr,
    TextRecognizer, DEBUG_IMAGE_NAME, VISUAL_LABELS,
};
pub use layout::{
    sort_reading_order, BBox, LabelMap, OnnxLayoutDetector, Region, RegionDetector,
};
pub use pipeline::{DocumentPipeline, NoopProgress, PageReport, PageResult, ProgressCallback};

/// Process exit codes used by the CLI.
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL_ERROR: i32 = 1;
    pub const INPUT_NOT_FOUND: i32 = 2;
    /// Missing external tool, model artifact, or OCR data.
    pub const ENVIRONMENT_ERROR: i32 = 3;
}
