//! Format normalization: any supported input document becomes an ordered
//! sequence of page raster images on disk.
//!
//! Fixed-layout inputs (PDF) render directly; editable office documents are
//! first converted to PDF by an external tool inside a scratch directory
//! that is removed on every exit path.

mod office;
mod render;

use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::config::PipelineConfig;
use crate::error::{PipelineError, Result};

/// Office formats accepted for conversion, lowercase.
pub const OFFICE_EXTENSIONS: &[&str] = &["doc", "docx", "ppt", "pptx", "xls", "xlsx"];

/// How an input document will be normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// Already fixed-layout; render pages directly.
    Pdf,
    /// Editable office document; convert to PDF first.
    Office,
}

/// Classify an input file by extension.
///
/// Fails fast on unknown extensions, before any conversion work or
/// filesystem side effect.
pub fn classify_format(path: &Path) -> Result<DocumentFormat> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "pdf" => Ok(DocumentFormat::Pdf),
        ext if OFFICE_EXTENSIONS.contains(&ext) => Ok(DocumentFormat::Office),
        _ => Err(PipelineError::UnsupportedFormat(extension)),
    }
}

/// Page-image file name for a document base name and 1-based page number.
///
/// This naming is the page-ordering contract downstream components rely on.
pub fn page_image_name(base: &str, page_no: usize) -> String {
    format!("{base}_page_{page_no}.jpg")
}

// ============================================================
// Format normalizer
// ============================================================

/// Converts input documents into per-page raster images.
pub struct FormatNormalizer {
    dpi: u32,
    jpeg_quality: u8,
    page_image_dir: PathBuf,
}

impl FormatNormalizer {
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            dpi: config.dpi,
            jpeg_quality: config.jpeg_quality,
            page_image_dir: config.page_image_dir.clone(),
        }
    }

    /// Convert a document into page images, returned in page order.
    ///
    /// `original_name` is the document's display name; its stem becomes the
    /// base identifier for every generated artifact (the input path may be a
    /// temporary upload location with a meaningless name).
    pub fn convert_document_to_images(
        &self,
        input: &Path,
        original_name: &str,
    ) -> Result<Vec<PathBuf>> {
        let format = classify_format(input)?;
        let base = document_base_name(original_name);

        std::fs::create_dir_all(&self.page_image_dir)?;

        let paths = match format {
            DocumentFormat::Pdf => self.render_pdf(input, &base)?,
            DocumentFormat::Office => {
                debug!(input = %input.display(), "converting office document to PDF");
                // Scratch dir is dropped (and removed) on success and on
                // every error path out of this block.
                let scratch = tempfile::tempdir()?;
                let intermediate = office::convert_to_pdf(input, scratch.path())?;
                self.render_pdf(&intermediate, &base)?
            }
        };

        info!(
            document = base,
            pages = paths.len(),
            "document normalized to page images"
        );
        Ok(paths)
    }

    fn render_pdf(&self, pdf: &Path, base: &str) -> Result<Vec<PathBuf>> {
        render::render_pdf_pages(pdf, base, &self.page_image_dir, self.dpi, self.jpeg_quality)
    }
}

/// Base identifier derived from the original display name (extension
/// stripped).
fn document_base_name(original_name: &str) -> String {
    Path::new(original_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| original_name.to_string())
}

// ============================================================
// Tests
// ============================================================
