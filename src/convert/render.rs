//! PDF page rasterization through pdfium.

use image::codecs::jpeg::JpegEncoder;
use image::DynamicImage;
use pdfium_render::prelude::*;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::page_image_name;
use crate::error::{PipelineError, Result};

const PDF_POINTS_PER_INCH: f32 = 72.0;

fn bind_pdfium() -> Result<Pdfium> {
    let bindings = Pdfium::bind_to_system_library()
        .or_else(|_| {
            Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
        })
        .map_err(|e| PipelineError::RenderFailed(format!("pdfium library unavailable: {e}")))?;

    Ok(Pdfium::new(bindings))
}

/// Render every page of a PDF to a JPEG in `output_dir`.
///
/// Output files follow the `{base}_page_{n}.jpg` contract with 1-based page
/// numbers matching the document's physical page order. The render target
/// size is the page's point size scaled by `dpi` over the 72-point baseline.
pub(crate) fn render_pdf_pages(
    pdf_path: &Path,
    base: &str,
    output_dir: &Path,
    dpi: u32,
    jpeg_quality: u8,
) -> Result<Vec<PathBuf>> {
    let pdfium = bind_pdfium()?;
    let document = pdfium
        .load_pdf_from_file(pdf_path, None)
        .map_err(|e| PipelineError::RenderFailed(format!("failed to load PDF: {e}")))?;

    let scale = dpi as f32 / PDF_POINTS_PER_INCH;
    let mut paths = Vec::with_capacity(document.pages().len() as usize);

    for (index, page) in document.pages().iter().enumerate() {
        let page_no = index + 1;

        let render_config = PdfRenderConfig::new()
            .set_target_width((page.width().value * scale) as i32)
            .set_target_height((page.height().value * scale) as i32);

        let bitmap = page.render_with_config(&render_config).map_err(|e| {
            PipelineError::RenderFailed(format!("failed to render page {page_no}: {e}"))
        })?;

        let out_path = output_dir.join(page_image_name(base, page_no));
        write_jpeg(&bitmap.as_image(), &out_path, jpeg_quality)?;

        debug!(page = page_no, path = %out_path.display(), "page rendered");
        paths.push(out_path);
    }

    Ok(paths)
}

fn write_jpeg(image: &DynamicImage, path: &Path, quality: u8) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    let encoder = JpegEncoder::new_with_quality(&mut writer, quality);
    image.to_rgb8().write_with_encoder(encoder)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    #[test]
    fn test_write_jpeg_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.jpg");
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(40, 30, image::Rgb([200; 3])));

        write_jpeg(&image, &path, 90).unwrap();

        let reloaded = image::open(&path).unwrap();
        assert_eq!(reloaded.width(), 40);
        assert_eq!(reloaded.height(), 30);
    }
}
