use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;
use log::info;
use std::path::{Path, PathBuf};

use crate::dimensions::{Size, Units};
use crate::error::{Error, Result};
use crate::layout::{BBox, CropLine};
use crate::render::{PageRenderer, WHITE};

/// One image per layout page at a fixed resolution, a page is written to disk
/// as soon as the next one begins.
pub struct RasterRenderer {
    dpi: f64,
    paper_size: Size,
    units: Units,
    background_color: [u8; 3],
    current: Option<(RgbImage, PathBuf)>,
    written: Vec<PathBuf>,
    output: PathBuf,
}

/// The file page `index` of `pages` is written to, `deck.png` for a single page and
/// `deck_01.png` ... `deck_12.png` for 12 pages.
pub fn page_file_name(output: &Path, index: usize, pages: usize) -> PathBuf {
    if pages == 1 {
        return output.to_path_buf();
    }
    let stem = output.file_stem().map(|s| s.to_string_lossy()).unwrap_or_default();
    let extension = output
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    let width = pages.to_string().len();
    output.with_file_name(format!("{}_{:0width$}{}", stem, index + 1, extension, width = width))
}

impl RasterRenderer {
    pub fn new(
        output: PathBuf,
        paper_size: Size,
        units: Units,
        dpi: u32,
        background_color: Option<[u8; 3]>,
    ) -> RasterRenderer {
        RasterRenderer {
            dpi: dpi as f64,
            paper_size,
            units,
            background_color: background_color.unwrap_or(WHITE),
            current: None,
            written: Vec::new(),
            output,
        }
    }

    fn pixels(&self, value: f64) -> f64 {
        value * self.units.to_in() * self.dpi
    }

    fn current_page(&mut self) -> Result<&mut RgbImage> {
        self.current
            .as_mut()
            .map(|(page, _)| page)
            .ok_or_else(|| Error::Sizing("drawing before the first page".to_string()))
    }

    fn flush(&mut self) -> Result<()> {
        if let Some((page, path)) = self.current.take() {
            page.save(&path)?;
            info!("wrote {}", path.display());
            self.written.push(path);
        }
        Ok(())
    }
}

impl PageRenderer for RasterRenderer {
    fn begin_page(&mut self, index: usize, pages: usize) -> Result<()> {
        self.flush()?;
        let width = self.pixels(self.paper_size.width).round() as u32;
        let height = self.pixels(self.paper_size.height).round() as u32;
        if width == 0 || height == 0 {
            return Err(Error::Sizing(format!(
                "a page of size {} has no pixels at {} dpi",
                self.paper_size, self.dpi
            )));
        }
        let page = RgbImage::from_pixel(width, height, Rgb(self.background_color));
        self.current = Some((page, page_file_name(&self.output, index, pages)));
        Ok(())
    }

    fn draw_card(&mut self, image: &RgbImage, bbox: &BBox) -> Result<()> {
        let x = self.pixels(bbox.x).round() as i64;
        let y = self.pixels(bbox.y).round() as i64;
        let width = (self.pixels(bbox.width).round() as u32).max(1);
        let height = (self.pixels(bbox.height).round() as u32).max(1);
        let resized = imageops::resize(image, width, height, FilterType::Lanczos3);
        imageops::overlay(self.current_page()?, &resized, x, y);
        Ok(())
    }

    fn draw_crop_lines(&mut self, lines: &[CropLine], thickness: f64) -> Result<()> {
        let thickness = (self.pixels(thickness).round() as u32).max(1);
        let half = thickness as f64 / 2.0;
        let rects: Vec<Rect> = lines
            .iter()
            .map(|line| match *line {
                CropLine::Vertical(x) => Rect::at((self.pixels(x) - half).round() as i32, 0)
                    .of_size(thickness, self.pixels(self.paper_size.height).round().max(1.0) as u32),
                CropLine::Horizontal(y) => Rect::at(0, (self.pixels(y) - half).round() as i32)
                    .of_size(self.pixels(self.paper_size.width).round().max(1.0) as u32, thickness),
            })
            .collect();
        let page = self.current_page()?;
        for rect in rects {
            draw_filled_rect_mut(page, rect, Rgb([0, 0, 0]));
        }
        Ok(())
    }

    fn finish(mut self) -> Result<Vec<PathBuf>> {
        self.flush()?;
        Ok(self.written)
    }
}
