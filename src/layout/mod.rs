//! Layout analysis types: regions, bounding boxes, and the label vocabulary.

mod detector;
mod reading_order;

pub use detector::{OnnxLayoutDetector, RegionDetector};
pub use reading_order::sort_reading_order;

use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{PipelineError, Result};

// ============================================================
// Bounding box
// ============================================================

/// Axis-aligned bounding box in page-image pixel coordinates.
///
/// Stored as corner coordinates (`x1`,`y1`) top-left and (`x2`,`y2`)
/// bottom-right, matching the detector's output convention.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BBox {
    pub x1: u32,
    pub y1: u32,
    pub x2: u32,
    pub y2: u32,
}

impl BBox {
    /// Create a new bounding box, normalizing corner order.
    pub fn new(x1: u32, y1: u32, x2: u32, y2: u32) -> Self {
        Self {
            x1: x1.min(x2),
            y1: y1.min(y2),
            x2: x1.max(x2),
            y2: y1.max(y2),
        }
    }

    pub fn width(&self) -> u32 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> u32 {
        self.y2 - self.y1
    }

    /// Whether the box has zero area.
    pub fn is_degenerate(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Clamp the box so both corners lie within a `width` x `height` page.
    pub fn clamp_to(&self, width: u32, height: u32) -> Self {
        Self {
            x1: self.x1.min(width),
            y1: self.y1.min(height),
            x2: self.x2.min(width),
            y2: self.y2.min(height),
        }
    }
}

// ============================================================
// Region
// ============================================================

/// A detected layout element on a single page.
///
/// Regions are ephemeral: produced by the detector, ordered by the
/// reading-order sort, consumed by the extractor. They are never persisted.
#[derive(Debug, Clone)]
pub struct Region {
    /// Class name from the model's label vocabulary (e.g. "Text", "Picture").
    pub label: String,

    /// Location on the page image, always within the image bounds.
    pub bbox: BBox,

    /// Detector confidence (0.0-1.0).
    pub confidence: f32,
}

// ============================================================
// Label vocabulary
// ============================================================

/// Class-id to class-name mapping owned by the model artifact.
///
/// The pipeline hard-codes nothing about the vocabulary except the
/// visual/textual partition (see [`crate::extract::is_visual`]); the names
/// themselves come from a JSON map supplied alongside the model, or from the
/// built-in DocLayNet vocabulary when none is given.
#[derive(Debug, Clone)]
pub struct LabelMap {
    names: BTreeMap<usize, String>,
}

impl LabelMap {
    /// The DocLayNet vocabulary used by the default layout model.
    pub fn doclaynet() -> Self {
        let names = [
            "Caption",
            "Footnote",
            "Formula",
            "List-item",
            "Page-footer",
            "Page-header",
            "Picture",
            "Section-header",
            "Table",
            "Text",
            "Title",
        ]
        .iter()
        .enumerate()
        .map(|(id, name)| (id, (*name).to_string()))
        .collect();

        Self { names }
    }

    /// Load a vocabulary from a JSON file of the form `{"0": "Caption", ...}`.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let parsed: BTreeMap<String, String> = serde_json::from_str(&raw)
            .map_err(|e| PipelineError::Config(format!("label map {}: {e}", path.display())))?;

        let mut names = BTreeMap::new();
        for (id, name) in parsed {
            let id: usize = id.parse().map_err(|_| {
                PipelineError::Config(format!(
                    "label map {}: non-numeric class id {id:?}",
                    path.display()
                ))
            })?;
            names.insert(id, name);
        }

        if names.is_empty() {
            return Err(PipelineError::Config(format!(
                "label map {} defines no classes",
                path.display()
            )));
        }

        Ok(Self { names })
    }

    /// Look up the name for a class id.
    pub fn name(&self, id: usize) -> Option<&str> {
        self.names.get(&id).map(String::as_str)
    }

    /// Number of classes in the vocabulary.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

// ============================================================
// Tests
// ============================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_bbox_dimensions() {
        let bbox = BBox::new(10, 20, 110, 70);
        assert_eq!(bbox.width(), 100);
        assert_eq!(bbox.height(), 50);
        assert!(!bbox.is_degenerate());
    }

    #[test]
    fn test_bbox_normalizes_corners() {
        let bbox = BBox::new(110, 70, 10, 20);
        assert_eq!(bbox.x1, 10);
        assert_eq!(bbox.y1, 20);
        assert_eq!(bbox.x2, 110);
        assert_eq!(bbox.y2, 70);
    }

    #[test]
    fn test_bbox_degenerate() {
        assert!(BBox::new(5, 5, 5, 20).is_degenerate());
        assert!(BBox::new(5, 5, 20, 5).is_degenerate());
        assert!(BBox::default().is_degenerate());
    }

    #[test]
    fn test_bbox_clamp_to_page() {
        let bbox = BBox::new(50, 50, 2000, 3000).clamp_to(800, 600);
        assert_eq!(bbox.x2, 800);
        assert_eq!(bbox.y2, 600);
        assert_eq!(bbox.x1, 50);
    }

    #[test]
    fn test_doclaynet_vocabulary() {
        let labels = LabelMap::doclaynet();
        assert_eq!(labels.len(), 11);
        assert_eq!(labels.name(6), Some("Picture"));
        assert_eq!(labels.name(7), Some("Section-header"));
        assert_eq!(labels.name(9), Some("Text"));
        assert_eq!(labels.name(42), None);
    }

    #[test]
    fn test_label_map_from_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"0": "Header", "1": "Body"}}"#).unwrap();

        let labels = LabelMap::from_json_file(file.path()).unwrap();
        assert_eq!(labels.len(), 2);
        assert_eq!(labels.name(1), Some("Body"));
    }

    #[test]
    fn test_label_map_rejects_bad_ids() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"first": "Header"}}"#).unwrap();

        let result = LabelMap::from_json_file(file.path());
        assert!(matches!(result, Err(PipelineError::Config(_))));
    }

    #[test]
    fn test_label_map_rejects_empty() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{}}").unwrap();

        let result = LabelMap::from_json_file(file.path());
        assert!(matches!(result, Err(PipelineError::Config(_))));
    }
}
