//! Annotated debug image of a page's detected layout.
//!
//! [`PageAnnotator`] is an accumulator: initialized from the source page
//! image, updated once per region, persisted once after the page's regions
//! are processed. The resulting `boxed_layout.png` is diagnostic output that
//! downstream review tooling keys on.

use ab_glyph::{FontArc, PxScale};
use image::{DynamicImage, Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_rect_mut, draw_text_mut};
use imageproc::rect::Rect;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::Result;
use crate::layout::Region;

/// File name of the per-page debug image.
pub const DEBUG_IMAGE_NAME: &str = "boxed_layout.png";

const REGION_COLOR: Rgb<u8> = Rgb([255, 0, 255]);

const RECT_THICKNESS: u32 = 3;

const LABEL_SCALE: f32 = 20.0;

/// Vertical offset of the label text above a region's top edge.
const LABEL_OFFSET: u32 = 24;

/// Try to load a system font for label rendering.
///
/// When no font is found, rectangles are still drawn and label text is
/// skipped.
pub fn system_font() -> Option<FontArc> {
    let font_paths = [
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
        "/System/Library/Fonts/Supplemental/Arial.ttf",
        "C:\\Windows\\Fonts\\arial.ttf",
    ];

    for path in font_paths {
        if let Ok(data) = std::fs::read(path) {
            if let Ok(font) = FontArc::try_from_vec(data) {
                debug!(path, "loaded font for layout annotations");
                return Some(font);
            }
        }
    }

    debug!("no system font found, annotation labels will be skipped");
    None
}

/// Per-page debug image accumulator.
pub struct PageAnnotator {
    canvas: RgbImage,
    font: Option<FontArc>,
}

impl PageAnnotator {
    /// Start a debug image from the source page.
    pub fn new(source: &DynamicImage, font: Option<FontArc>) -> Self {
        Self {
            canvas: source.to_rgb8(),
            font,
        }
    }

    /// Draw one region as a labeled rectangle.
    pub fn draw_region(&mut self, region: &Region) {
        let (width, height) = self.canvas.dimensions();
        let bbox = region.bbox.clamp_to(width, height);
        let w = bbox.width().max(1);
        let h = bbox.height().max(1);

        for inset in 0..RECT_THICKNESS {
            if w <= inset * 2 || h <= inset * 2 {
                break;
            }
            let rect = Rect::at((bbox.x1 + inset) as i32, (bbox.y1 + inset) as i32)
                .of_size(w - inset * 2, h - inset * 2);
            draw_hollow_rect_mut(&mut self.canvas, rect, REGION_COLOR);
        }

        if let Some(font) = &self.font {
            let text_y = bbox.y1.saturating_sub(LABEL_OFFSET);
            draw_text_mut(
                &mut self.canvas,
                REGION_COLOR,
                bbox.x1 as i32,
                text_y as i32,
                PxScale::from(LABEL_SCALE),
                font,
                &region.label,
            );
        }
    }

    /// Persist the accumulated image into the page's output directory.
    pub fn save(&self, output_dir: &Path) -> Result<PathBuf> {
        let path = output_dir.join(DEBUG_IMAGE_NAME);
        self.canvas.save(&path)?;
        Ok(path)
    }
}

// ============================================================
// Tests
// ============================================================
