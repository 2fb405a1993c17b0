//! Region content extraction.
//!
//! Each ordered region becomes one [`ContentItem`]: visual regions (pictures,
//! tables, formulas) are cropped and persisted as image assets; everything
//! else goes through OCR. A shared per-page debug image is accumulated
//! alongside (see [`annotate`]).

mod annotate;
mod ocr;

pub use annotate::{system_font, PageAnnotator, DEBUG_IMAGE_NAME};
pub use ocr::{TesseractOcr, TextRecognizer};

use image::{DynamicImage, GenericImageView};
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::layout::{BBox, Region};

/// Region classes whose content is preserved as an image asset instead of
/// recognized text.
pub const VISUAL_LABELS: [&str; 3] = ["Picture", "Table", "Formula"];

/// Whether a region class takes the asset-persistence path.
pub fn is_visual(label: &str) -> bool {
    VISUAL_LABELS.contains(&label)
}

// ============================================================
// Content items
// ============================================================

/// Extracted content of one region.
///
/// The variant is fixed by the region's class: textual regions always carry
/// recognized text (possibly empty), visual regions always carry the path of
/// a persisted asset.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ItemContent {
    Text(String),
    Asset(PathBuf),
}

impl ItemContent {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ItemContent::Text(text) => Some(text),
            ItemContent::Asset(_) => None,
        }
    }

    pub fn as_asset(&self) -> Option<&Path> {
        match self {
            ItemContent::Text(_) => None,
            ItemContent::Asset(path) => Some(path),
        }
    }
}

/// One unit of extracted page content: the region's class label plus its
/// content. Order within a page is reading order and is fixed at creation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentItem {
    pub tag: String,
    pub content: ItemContent,
}

// ============================================================
// Page extractor
// ============================================================

/// Extracts content items for the regions of a single page.
///
/// Holds the per-page state: the source image, the page's output directory,
/// and the per-label running counters that keep asset names unique
/// (`Picture_0.png`, `Picture_1.png`, ...).
pub struct PageExtractor<'a> {
    source: &'a DynamicImage,
    output_dir: &'a Path,
    recognizer: &'a mut dyn TextRecognizer,
    asset_counts: HashMap<String, usize>,
}

impl<'a> PageExtractor<'a> {
    pub fn new(
        source: &'a DynamicImage,
        output_dir: &'a Path,
        recognizer: &'a mut dyn TextRecognizer,
    ) -> Self {
        Self {
            source,
            output_dir,
            recognizer,
            asset_counts: HashMap::new(),
        }
    }

    /// Produce the content item for one region.
    pub fn extract(&mut self, region: &Region) -> Result<ContentItem> {
        let crop = crop_region(self.source, &region.bbox);

        let content = if is_visual(&region.label) {
            let index = self.next_asset_index(&region.label);
            let path = self
                .output_dir
                .join(format!("{}_{}.png", region.label, index));
            crop.save(&path)?;
            ItemContent::Asset(path)
        } else {
            let text = self.recognizer.recognize(&crop)?;
            ItemContent::Text(text.trim().to_string())
        };

        Ok(ContentItem {
            tag: region.label.clone(),
            content,
        })
    }

    fn next_asset_index(&mut self, label: &str) -> usize {
        let count = self.asset_counts.entry(label.to_string()).or_insert(0);
        let index = *count;
        *count += 1;
        index
    }
}

/// Crop a region out of the page image.
///
/// Degenerate boxes are widened to at least 1x1 and the crop window is kept
/// inside the image, so a bad detection can never abort page processing.
fn crop_region(source: &DynamicImage, bbox: &BBox) -> DynamicImage {
    let (width, height) = source.dimensions();
    let x = bbox.x1.min(width.saturating_sub(1));
    let y = bbox.y1.min(height.saturating_sub(1));
    let w = bbox.width().max(1).min(width - x);
    let h = bbox.height().max(1).min(height - y);

    source.crop_imm(x, y, w, h)
}

// ============================================================
// Tests
// ============================================================
