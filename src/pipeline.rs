//! Document processing pipeline.
//!
//! Ties the components together: format normalization, per-page layout
//! detection, reading-order resolution, region content extraction, and
//! assembly into the ordered [`PageResult`] sequence that forms the
//! JSON-serializable boundary of the system.

use ab_glyph::FontArc;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::config::PipelineConfig;
use crate::convert::FormatNormalizer;
use crate::error::Result;
use crate::extract::{self, ContentItem, PageAnnotator, PageExtractor, TesseractOcr, TextRecognizer};
use crate::layout::{sort_reading_order, LabelMap, OnnxLayoutDetector, RegionDetector};

// ============================================================
// Output contract
// ============================================================

/// The ordered content extracted from one document page.
///
/// Serialized with the wire key `"page no"` consumed by downstream
/// summarization tooling.
#[derive(Debug, Clone, Serialize)]
pub struct PageResult {
    #[serde(rename = "page no")]
    pub page_no: usize,
    pub content: Vec<ContentItem>,
}

/// Per-page processing outcome, including the diagnostics that make
/// fail-soft degradation observable.
#[derive(Debug, Default)]
pub struct PageReport {
    /// Content items in reading order.
    pub content: Vec<ContentItem>,

    /// Regions the detector proposed for this page.
    pub regions: usize,

    /// Regions whose extraction failed and was skipped.
    pub failed_regions: usize,
}

impl PageReport {
    fn empty() -> Self {
        Self::default()
    }
}

// ============================================================
// Progress reporting
// ============================================================

/// Callback interface for page-level progress.
pub trait ProgressCallback {
    fn on_page_start(&self, _page: usize, _total: usize) {}
    fn on_page_complete(&self, _page: usize, _total: usize) {}
}

/// No-op callback for callers that do not track progress.
pub struct NoopProgress;

impl ProgressCallback for NoopProgress {}

// ============================================================
// Pipeline
// ============================================================

/// The document layout extraction pipeline.
///
/// The detection model and OCR engine are loaded once at construction and
/// reused across pages and documents. Processing is sequential per document;
/// page order in the output always matches the source document.
pub struct DocumentPipeline {
    config: PipelineConfig,
    normalizer: FormatNormalizer,
    detector: Box<dyn RegionDetector>,
    recognizer: Box<dyn TextRecognizer>,
    font: Option<FontArc>,
}

impl DocumentPipeline {
    /// Build the pipeline with the production detector and OCR engine.
    pub fn new(config: PipelineConfig) -> Result<Self> {
        let labels = match &config.labels_path {
            Some(path) => LabelMap::from_json_file(path)?,
            None => LabelMap::doclaynet(),
        };

        let detector =
            OnnxLayoutDetector::load(&config.model_path, labels, config.confidence_threshold)?;
        let recognizer = TesseractOcr::new(&config.ocr_language, config.tessdata_dir.as_deref())?;

        Ok(Self::with_components(
            config,
            Box::new(detector),
            Box::new(recognizer),
        ))
    }

    /// Build the pipeline from caller-supplied components.
    ///
    /// This is the seam used by tests and by embedders that bring their own
    /// detection model or recognizer.
    pub fn with_components(
        config: PipelineConfig,
        detector: Box<dyn RegionDetector>,
        recognizer: Box<dyn TextRecognizer>,
    ) -> Self {
        let normalizer = FormatNormalizer::new(&config);
        Self {
            config,
            normalizer,
            detector,
            recognizer,
            font: extract::system_font(),
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Convert an input document into ordered page images (see
    /// [`FormatNormalizer::convert_document_to_images`]).
    pub fn convert_document_to_images(
        &self,
        input: &Path,
        original_name: &str,
    ) -> Result<Vec<PathBuf>> {
        self.normalizer
            .convert_document_to_images(input, original_name)
    }

    /// Extract the ordered content items of one page image.
    ///
    /// Page-level failures (unreadable image, detection failure) degrade to
    /// an empty item list; they never abort the document.
    pub fn parse_page(&mut self, image_path: &Path, output_dir: &Path) -> Result<Vec<ContentItem>> {
        self.parse_page_report(image_path, output_dir)
            .map(|report| report.content)
    }

    /// Like [`Self::parse_page`], returning the per-page diagnostics as well.
    pub fn parse_page_report(
        &mut self,
        image_path: &Path,
        output_dir: &Path,
    ) -> Result<PageReport> {
        std::fs::create_dir_all(output_dir)?;

        let source = match image::open(image_path) {
            Ok(image) => image,
            Err(e) => {
                warn!(page = %image_path.display(), error = %e, "page image failed to decode");
                return Ok(PageReport::empty());
            }
        };

        let regions = match self.detector.detect(&source) {
            Ok(regions) => regions,
            Err(e) => {
                warn!(page = %image_path.display(), error = %e, "layout detection failed");
                return Ok(PageReport::empty());
            }
        };

        let ordered = sort_reading_order(regions);
        let region_count = ordered.len();

        let mut annotator = PageAnnotator::new(&source, self.font.clone());
        let mut extractor = PageExtractor::new(&source, output_dir, self.recognizer.as_mut());

        let mut content = Vec::with_capacity(region_count);
        let mut failed_regions = 0;

        for region in &ordered {
            annotator.draw_region(region);
            match extractor.extract(region) {
                Ok(item) => content.push(item),
                Err(e) => {
                    warn!(
                        label = %region.label,
                        error = %e,
                        "region extraction failed, continuing with remaining regions"
                    );
                    failed_regions += 1;
                }
            }
        }

        if let Err(e) = annotator.save(output_dir) {
            warn!(error = %e, "failed to write debug layout image");
        }

        debug!(
            page = %image_path.display(),
            regions = region_count,
            items = content.len(),
            "page parsed"
        );

        Ok(PageReport {
            content,
            regions: region_count,
            failed_regions,
        })
    }

    /// Process a whole document: normalize to page images, then parse each
    /// page in order.
    pub fn process_document(&mut self, input: &Path, original_name: &str) -> Result<Vec<PageResult>> {
        self.process_with_progress(input, original_name, &NoopProgress)
    }

    /// [`Self::process_document`] with page-level progress callbacks.
    pub fn process_with_progress(
        &mut self,
        input: &Path,
        original_name: &str,
        progress: &dyn ProgressCallback,
    ) -> Result<Vec<PageResult>> {
        let images = self.convert_document_to_images(input, original_name)?;
        Ok(self.parse_pages(&images, progress))
    }

    /// Parse each page image and assemble the ordered result sequence.
    ///
    /// Page numbers are assigned by position (1-based), independent of the
    /// numbering embedded in the file names. A page that fails still
    /// occupies its position with empty content, so the output never has a
    /// gap or reordering.
    pub fn parse_pages(
        &mut self,
        images: &[PathBuf],
        progress: &dyn ProgressCallback,
    ) -> Vec<PageResult> {
        let total = images.len();
        let mut pages = Vec::with_capacity(total);
        let mut failed_pages = 0;

        for (index, image_path) in images.iter().enumerate() {
            let page_no = index + 1;
            progress.on_page_start(page_no, total);

            let output_dir = self.config.parsed_dir.join(page_output_stem(image_path));
            let report = match self.parse_page_report(image_path, &output_dir) {
                Ok(report) => report,
                Err(e) => {
                    warn!(page = page_no, error = %e, "page processing failed");
                    PageReport::empty()
                }
            };

            if report.content.is_empty() && report.regions == 0 {
                failed_pages += 1;
            }
            if report.failed_regions > 0 {
                warn!(
                    page = page_no,
                    failed = report.failed_regions,
                    of = report.regions,
                    "some regions were not extracted"
                );
            }

            pages.push(PageResult {
                page_no,
                content: report.content,
            });
            progress.on_page_complete(page_no, total);
        }

        info!(
            pages = total,
            empty_pages = failed_pages,
            "document assembly complete"
        );
        pages
    }
}

/// Per-page output directory name, derived from the page image's base name
/// so runs over different documents never collide.
fn page_output_stem(image_path: &Path) -> String {
    image_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("page")
        .to_string()
}

// ============================================================
// Tests
// ============================================================
