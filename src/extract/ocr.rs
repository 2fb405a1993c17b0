//! Optical character recognition for textual regions.
//!
//! Tesseract (through leptess) is the production engine; it is initialized
//! once per process with a fixed language and reused for every region of
//! every page.

use image::{DynamicImage, ImageFormat};
use leptess::LepTess;
use std::io::Cursor;
use std::path::Path;

use crate::error::{PipelineError, Result};

/// Narrow seam between the extractor and the OCR engine.
pub trait TextRecognizer {
    /// Recognize the text in a cropped region image.
    ///
    /// Empty output is a valid result, not an error.
    fn recognize(&mut self, region: &DynamicImage) -> Result<String>;
}

/// Tesseract-backed recognizer.
pub struct TesseractOcr {
    engine: LepTess,
    language: String,
}

impl TesseractOcr {
    /// Initialize Tesseract for a fixed language.
    ///
    /// `tessdata_dir` overrides the trained-data search path; when `None`,
    /// Tesseract's default locations (including `TESSDATA_PREFIX`) apply.
    pub fn new(language: &str, tessdata_dir: Option<&Path>) -> Result<Self> {
        let datapath = tessdata_dir.and_then(Path::to_str);
        let engine = LepTess::new(datapath, language).map_err(|e| {
            PipelineError::OcrInit(format!("tesseract init for language {language:?}: {e}"))
        })?;

        Ok(Self {
            engine,
            language: language.to_string(),
        })
    }

    /// The language this engine was initialized with.
    pub fn language(&self) -> &str {
        &self.language
    }
}

impl TextRecognizer for TesseractOcr {
    fn recognize(&mut self, region: &DynamicImage) -> Result<String> {
        let mut encoded = Vec::new();
        region
            .write_to(&mut Cursor::new(&mut encoded), ImageFormat::Png)
            .map_err(|e| PipelineError::Extraction(format!("encoding region for OCR: {e}")))?;

        self.engine
            .set_image_from_mem(&encoded)
            .map_err(|e| PipelineError::Extraction(format!("loading region into OCR: {e}")))?;

        let text = self
            .engine
            .get_utf8_text()
            .map_err(|e| PipelineError::Extraction(format!("decoding OCR output: {e}")))?;

        Ok(text)
    }
}
