use image::RgbImage;
use log::debug;
use printpdf::image_crate::DynamicImage;
use printpdf::path::{PaintMode, WindingOrder};
use printpdf::{
    Color, Image, ImageTransform, Line, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference,
    Point, Polygon, Rgb,
};
use std::path::PathBuf;

use crate::dimensions::{Size, Units};
use crate::error::{Error, Result};
use crate::layout::{BBox, CropLine};
use crate::render::PageRenderer;

const DPI: f32 = 300.0;
const MM_PER_INCH: f32 = 25.4;
const POINTS_PER_INCH: f32 = 72.0;

fn rgb(color: [u8; 3]) -> Color {
    let [r, g, b] = color.map(|c| c as f32 / 255.0);
    Color::Rgb(Rgb::new(r, g, b, None))
}

/// One PDF page per layout page.
pub struct PdfRenderer {
    doc: PdfDocumentReference,
    /// the page the document was created with, not yet drawn on
    first_layer: Option<PdfLayerReference>,
    layer: Option<PdfLayerReference>,
    paper_size: Size,
    units: Units,
    background_color: Option<[u8; 3]>,
    output: PathBuf,
}

impl PdfRenderer {
    pub fn new(
        output: PathBuf,
        paper_size: Size,
        units: Units,
        background_color: Option<[u8; 3]>,
    ) -> PdfRenderer {
        let width = Mm((paper_size.width * units.to_mm()) as f32);
        let height = Mm((paper_size.height * units.to_mm()) as f32);
        let (doc, page, layer) = PdfDocument::new("Proxies", width, height, "Layer 1");
        let first_layer = doc.get_page(page).get_layer(layer);
        PdfRenderer {
            doc,
            first_layer: Some(first_layer),
            layer: None,
            paper_size,
            units,
            background_color,
            output,
        }
    }

    fn mm(&self, value: f64) -> Mm {
        Mm((value * self.units.to_mm()) as f32)
    }

    /// PDF coordinates start at the bottom left.
    fn point(&self, x: f64, y: f64) -> Point {
        Point::new(self.mm(x), self.mm(self.paper_size.height - y))
    }

    fn current_layer(&self) -> Result<&PdfLayerReference> {
        self.layer
            .as_ref()
            .ok_or_else(|| Error::Pdf("drawing before the first page".to_string()))
    }
}

impl PageRenderer for PdfRenderer {
    fn begin_page(&mut self, _index: usize, _pages: usize) -> Result<()> {
        let layer = match self.first_layer.take() {
            Some(layer) => layer,
            None => {
                let (page, layer) = self.doc.add_page(
                    self.mm(self.paper_size.width),
                    self.mm(self.paper_size.height),
                    "Layer 1",
                );
                self.doc.get_page(page).get_layer(layer)
            }
        };
        if let Some(color) = self.background_color {
            let Size { width, height } = self.paper_size;
            let corners = [(0.0, 0.0), (width, 0.0), (width, height), (0.0, height)];
            layer.set_fill_color(rgb(color));
            layer.add_polygon(Polygon {
                rings: vec![corners.iter().map(|(x, y)| (self.point(*x, *y), false)).collect()],
                mode: PaintMode::Fill,
                winding_order: WindingOrder::NonZero,
            });
        }
        self.layer = Some(layer);
        Ok(())
    }

    fn draw_card(&mut self, image: &RgbImage, bbox: &BBox) -> Result<()> {
        let layer = self.current_layer()?;
        // natural size of the image at DPI
        let (width_px, height_px) = image.dimensions();
        let natural_width = width_px as f32 / DPI * MM_PER_INCH;
        let natural_height = height_px as f32 / DPI * MM_PER_INCH;
        let transform = ImageTransform {
            translate_x: Some(self.mm(bbox.x)),
            translate_y: Some(self.mm(self.paper_size.height - bbox.y - bbox.height)),
            scale_x: Some(self.mm(bbox.width).0 / natural_width),
            scale_y: Some(self.mm(bbox.height).0 / natural_height),
            dpi: Some(DPI),
            rotate: None,
        };
        debug!("placing a {}x{} image at {:?}", width_px, height_px, bbox);
        Image::from_dynamic_image(&DynamicImage::ImageRgb8(image.clone()))
            .add_to_layer(layer.clone(), transform);
        Ok(())
    }

    fn draw_crop_lines(&mut self, lines: &[CropLine], thickness: f64) -> Result<()> {
        let layer = self.current_layer()?;
        layer.set_outline_color(rgb([0, 0, 0]));
        layer.set_outline_thickness(self.mm(thickness).0 / MM_PER_INCH * POINTS_PER_INCH);
        let Size { width, height } = self.paper_size;
        for line in lines {
            let (start, end) = match *line {
                CropLine::Vertical(x) => (self.point(x, 0.0), self.point(x, height)),
                CropLine::Horizontal(y) => (self.point(0.0, y), self.point(width, y)),
            };
            layer.add_line(Line {
                points: vec![(start, false), (end, false)],
                is_closed: false,
            });
        }
        Ok(())
    }

    fn finish(self) -> Result<Vec<PathBuf>> {
        let bytes = self.doc.save_to_bytes().map_err(|e| Error::Pdf(format!("{:?}", e)))?;
        std::fs::write(&self.output, bytes)?;
        Ok(vec![self.output])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dimensions::paper_size;
    use crate::layout::PageLayoutGrid;
    use crate::render::tests::{settings, write_scans};
    use crate::render::{CardAssembler, RenderOptions};

    #[test]
    fn writes_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let scans = write_scans(dir.path(), 12);
        let grid = PageLayoutGrid::new(settings(Units::Mm, 5.0, 0.1)).unwrap();
        let options = RenderOptions {
            crop_mark_thickness: 0.5,
            background_color: Some([0, 0, 0]),
            filled_corners: true,
        };
        let output = dir.path().join("proxies.pdf");
        let renderer = PdfRenderer::new(
            output.clone(),
            paper_size("a4", Units::Mm).unwrap(),
            Units::Mm,
            options.background_color,
        );
        let written = CardAssembler::new(grid, options).assemble(&scans, renderer).unwrap();
        assert_eq!(written, vec![output.clone()]);
        let bytes = std::fs::read(&output).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn drawing_needs_a_page() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("x.pdf");
        let mut renderer = PdfRenderer::new(output, Size::new(8.3, 11.7), Units::In, None);
        assert!(matches!(
            renderer.draw_crop_lines(&[CropLine::Vertical(1.0)], 0.01),
            Err(Error::Pdf(_))
        ));
        renderer.begin_page(0, 1).unwrap();
        assert!(renderer.draw_crop_lines(&[CropLine::Vertical(1.0)], 0.01).is_ok());
    }
}
