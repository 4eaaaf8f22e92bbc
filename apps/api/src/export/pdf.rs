//! PDF export: rasterize the SVG preview at 2x and slice the bitmap onto A4 pages.

use std::io::BufWriter;
use std::sync::Arc;

use printpdf::image_crate::{DynamicImage, RgbaImage};
use printpdf::{Image, ImageTransform, Mm, PdfDocument};
use tiny_skia::{Pixmap, Transform};
use usvg::{fontdb, Options, Tree};

use crate::export::preview::{PreviewDocument, PAGE_HEIGHT_PX};
use crate::export::ExportError;

/// Raster scale relative to CSS pixels.
pub const RASTER_SCALE: u32 = 2;
/// Longest document the exporter will rasterize. Caps the bitmap at about 360 MiB.
pub const MAX_PDF_PAGES: u32 = 40;
const CSS_DPI: f32 = 96.0;
const A4_WIDTH_MM: f32 = 210.0;
const A4_HEIGHT_MM: f32 = 297.0;

fn pdf_err(e: impl std::fmt::Display) -> ExportError {
    ExportError::Pdf(e.to_string())
}

/// Top edge, in bitmap rows, of the slice shown on each page. Page `i` starts one page
/// height further down than page `i - 1`; there is always at least one page.
pub fn page_offsets(bitmap_height: u32, page_height: u32) -> Vec<u32> {
    if page_height == 0 {
        return vec![0];
    }
    let pages = bitmap_height.div_ceil(page_height).max(1);
    (0..pages).map(|i| i * page_height).collect()
}

fn px_to_mm(px: u32, dpi: f32) -> f32 {
    px as f32 / dpi * 25.4
}

/// Rasterizes the preview onto an opaque white bitmap at `RASTER_SCALE`.
///
/// Previews longer than `MAX_PDF_PAGES` pages are rejected before any bitmap is allocated.
pub fn rasterize(preview: &PreviewDocument, fonts: Arc<fontdb::Database>) -> Result<RgbaImage, ExportError> {
    let pages = preview.height.div_ceil(PAGE_HEIGHT_PX);
    if pages > MAX_PDF_PAGES {
        return Err(ExportError::Pdf(format!(
            "document needs {pages} pages, the limit is {MAX_PDF_PAGES}"
        )));
    }
    let options = Options {
        fontdb: fonts,
        ..Options::default()
    };
    let tree = Tree::from_str(&preview.svg, &options).map_err(pdf_err)?;
    let width = preview.width * RASTER_SCALE;
    let height = preview.height * RASTER_SCALE;
    let mut pixmap = Pixmap::new(width, height)
        .ok_or_else(|| ExportError::Pdf(format!("cannot allocate {width}x{height} bitmap")))?;
    pixmap.fill(tiny_skia::Color::WHITE);
    let scale = RASTER_SCALE as f32;
    resvg::render(&tree, Transform::from_scale(scale, scale), &mut pixmap.as_mut());
    RgbaImage::from_raw(width, height, pixmap.take())
        .ok_or_else(|| ExportError::Pdf("bitmap size mismatch".to_string()))
}

/// Builds the PDF from a rasterized preview.
pub fn bitmap_to_pdf(bitmap: RgbaImage, title: &str) -> Result<Vec<u8>, ExportError> {
    let dpi = CSS_DPI * RASTER_SCALE as f32;
    let page_height = PAGE_HEIGHT_PX * RASTER_SCALE;
    let (width, height) = bitmap.dimensions();
    let image = DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(bitmap).to_rgb8());

    let offsets = page_offsets(height, page_height);
    let (doc, first_page, first_layer) =
        PdfDocument::new(title, Mm(A4_WIDTH_MM), Mm(A4_HEIGHT_MM), "Layer 1");
    let mut pages = vec![(first_page, first_layer)];
    for i in 1..offsets.len() {
        pages.push(doc.add_page(Mm(A4_WIDTH_MM), Mm(A4_HEIGHT_MM), format!("Layer {}", i + 1)));
    }

    for ((page, layer), offset) in pages.into_iter().zip(offsets) {
        let slice_height = page_height.min(height - offset);
        let slice = image.crop_imm(0, offset, width, slice_height);
        let layer = doc.get_page(page).get_layer(layer);
        // printpdf places images from the bottom-left corner
        let transform = ImageTransform {
            translate_x: Some(Mm(0.0)),
            translate_y: Some(Mm(A4_HEIGHT_MM - px_to_mm(slice_height, dpi))),
            rotate: None,
            scale_x: Some(1.0),
            scale_y: Some(1.0),
            dpi: Some(dpi),
        };
        Image::from_dynamic_image(&slice).add_to_layer(layer, transform);
    }

    let mut buffer = Vec::new();
    {
        let mut writer = BufWriter::new(&mut buffer);
        doc.save(&mut writer).map_err(pdf_err)?;
    }
    Ok(buffer)
}

pub fn render_pdf(
    preview: &PreviewDocument,
    fonts: Arc<fontdb::Database>,
    title: &str,
) -> Result<Vec<u8>, ExportError> {
    let bitmap = rasterize(preview, fonts)?;
    bitmap_to_pdf(bitmap, title)
}
