//! Layout detection over page images.
//!
//! A single forward pass of a pretrained object-detection model produces the
//! unordered region candidates for a page. The model is a replaceable
//! dependency behind [`RegionDetector`]; the production implementation runs
//! an ONNX detection export through ONNX Runtime.

use image::{imageops::FilterType, DynamicImage, GenericImageView, Rgb, RgbImage};
use ndarray::{Array4, ArrayView2, Axis};
use ort::{
    inputs,
    session::{builder::GraphOptimizationLevel, Session},
    value::TensorRef,
};
use std::path::Path;
use tracing::debug;

use super::{BBox, LabelMap, Region};
use crate::error::{PipelineError, Result};

/// Square input size the page image is letterboxed to.
const DEFAULT_INPUT_SIZE: u32 = 1024;

/// Gray value used for letterbox padding.
const PAD_VALUE: u8 = 114;

/// Maximum pixel value for 8-bit images.
const PIXEL_MAX_VALUE_F32: f32 = 255.0;

/// Narrow seam between the pipeline and the detection model.
pub trait RegionDetector {
    /// Detect layout regions on one page image.
    ///
    /// Returns unordered candidates; ordering is the reading-order
    /// resolver's job.
    fn detect(&mut self, image: &DynamicImage) -> Result<Vec<Region>>;
}

// ============================================================
// Letterbox geometry
// ============================================================

/// Scale and padding applied when fitting a page into the square model input.
#[derive(Debug, Clone, Copy)]
struct Letterbox {
    scale: f32,
    pad_x: u32,
    pad_y: u32,
}

impl Letterbox {
    fn fit(width: u32, height: u32, size: u32) -> Self {
        let scale = (size as f32 / width as f32).min(size as f32 / height as f32);
        let scaled_w = ((width as f32 * scale).round() as u32).max(1).min(size);
        let scaled_h = ((height as f32 * scale).round() as u32).max(1).min(size);

        Self {
            scale,
            pad_x: (size - scaled_w) / 2,
            pad_y: (size - scaled_h) / 2,
        }
    }

    /// Map an x coordinate from model-input space back to page pixels.
    fn unmap_x(&self, x: f32) -> f32 {
        (x - self.pad_x as f32) / self.scale
    }

    fn unmap_y(&self, y: f32) -> f32 {
        (y - self.pad_y as f32) / self.scale
    }
}

// ============================================================
// ONNX detector
// ============================================================

/// Layout detector backed by an end-to-end ONNX detection export.
///
/// The model is loaded once at construction and reused for every page of
/// every document. Expected output: one tensor of shape `[1, N, 6]` with
/// rows `[x1, y1, x2, y2, score, class_id]` in letterboxed input
/// coordinates (non-maximum suppression inside the graph).
pub struct OnnxLayoutDetector {
    session: Session,
    labels: LabelMap,
    confidence_threshold: f32,
    input_size: u32,
}

impl OnnxLayoutDetector {
    /// Load the model from an ONNX artifact.
    pub fn load(model_path: &Path, labels: LabelMap, confidence_threshold: f32) -> Result<Self> {
        if !model_path.exists() {
            return Err(PipelineError::ModelLoad(format!(
                "model not found at {}",
                model_path.display()
            )));
        }

        let session = Session::builder()
            .and_then(|b| b.with_optimization_level(GraphOptimizationLevel::Level1))
            .and_then(|b| b.with_intra_threads(4))
            .and_then(|b| b.commit_from_file(model_path))
            .map_err(|e| PipelineError::ModelLoad(e.to_string()))?;

        Ok(Self {
            session,
            labels,
            confidence_threshold,
            input_size: DEFAULT_INPUT_SIZE,
        })
    }

    /// The vocabulary supplied with the model.
    pub fn labels(&self) -> &LabelMap {
        &self.labels
    }

    /// Letterbox the page into the square model input and normalize to
    /// `[0, 1]` CHW.
    fn preprocess(&self, image: &DynamicImage) -> (Array4<f32>, Letterbox) {
        let (width, height) = image.dimensions();
        let size = self.input_size;
        let letterbox = Letterbox::fit(width, height, size);

        let scaled_w = ((width as f32 * letterbox.scale).round() as u32)
            .max(1)
            .min(size);
        let scaled_h = ((height as f32 * letterbox.scale).round() as u32)
            .max(1)
            .min(size);

        let resized = image
            .resize_exact(scaled_w, scaled_h, FilterType::CatmullRom)
            .to_rgb8();

        let mut canvas = RgbImage::from_pixel(size, size, Rgb([PAD_VALUE; 3]));
        image::imageops::replace(
            &mut canvas,
            &resized,
            i64::from(letterbox.pad_x),
            i64::from(letterbox.pad_y),
        );

        let mut array = Array4::<f32>::zeros((1, 3, size as usize, size as usize));
        for (x, y, pixel) in canvas.enumerate_pixels() {
            for c in 0..3 {
                array[[0, c, y as usize, x as usize]] =
                    f32::from(pixel[c]) / PIXEL_MAX_VALUE_F32;
            }
        }

        (array, letterbox)
    }
}

impl RegionDetector for OnnxLayoutDetector {
    fn detect(&mut self, image: &DynamicImage) -> Result<Vec<Region>> {
        let (width, height) = image.dimensions();
        let (input, letterbox) = self.preprocess(image);

        let input_ref: TensorRef<f32> = TensorRef::from_array_view(&input)
            .map_err(|e| PipelineError::Inference(e.to_string()))?;
        let output = {
            let outputs = self
                .session
                .run(inputs![input_ref])
                .map_err(|e| PipelineError::Inference(e.to_string()))?;

            let tensor = outputs[0]
                .try_extract_array::<f32>()
                .map_err(|e| PipelineError::Inference(e.to_string()))?;
            tensor
                .into_owned()
                .into_dimensionality::<ndarray::Ix3>()
                .map_err(|e| PipelineError::Inference(format!("unexpected output shape: {e}")))?
        };

        let rows = output.index_axis(Axis(0), 0);
        let regions = decode_detections(
            rows,
            letterbox,
            &self.labels,
            self.confidence_threshold,
            (width, height),
        );

        debug!(regions = regions.len(), "layout detection complete");
        Ok(regions)
    }
}

/// Decode raw detection rows into regions in page-pixel coordinates.
///
/// Rows below the confidence threshold are dropped; surviving boxes are
/// mapped out of the letterbox and clamped to the page bounds. Class ids
/// outside the vocabulary keep a synthetic `class_<id>` name so an outdated
/// label map degrades visibly instead of dropping content.
fn decode_detections(
    rows: ArrayView2<f32>,
    letterbox: Letterbox,
    labels: &LabelMap,
    confidence_threshold: f32,
    page_size: (u32, u32),
) -> Vec<Region> {
    let (page_w, page_h) = page_size;
    let mut regions = Vec::new();

    if rows.shape()[1] < 6 {
        return regions;
    }

    for row in rows.axis_iter(Axis(0)) {
        let score = row[4];
        if !score.is_finite() || score < confidence_threshold {
            continue;
        }

        let class_id = row[5] as usize;
        let label = labels
            .name(class_id)
            .map(str::to_string)
            .unwrap_or_else(|| format!("class_{class_id}"));

        let x1 = letterbox.unmap_x(row[0]).round().clamp(0.0, page_w as f32);
        let y1 = letterbox.unmap_y(row[1]).round().clamp(0.0, page_h as f32);
        let x2 = letterbox.unmap_x(row[2]).round().clamp(0.0, page_w as f32);
        let y2 = letterbox.unmap_y(row[3]).round().clamp(0.0, page_h as f32);

        regions.push(Region {
            label,
            bbox: BBox::new(x1 as u32, y1 as u32, x2 as u32, y2 as u32),
            confidence: score,
        });
    }

    regions
}

// ============================================================
// Tests
// ============================================================
