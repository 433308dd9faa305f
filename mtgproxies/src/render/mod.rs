//! Drawing laid out pages, shared by the PDF and the raster backend.

use image::{Rgb, RgbImage, imageops};
use itertools::Itertools;
use log::{debug, info};
use std::path::{Path, PathBuf};

use crate::corners::fill_corners;
use crate::dimensions::pixels_per_unit;
use crate::error::{Error, Result};
use crate::layout::{BBox, CropLine, PageLayoutGrid};

pub mod pdf;
pub mod raster;

pub use self::pdf::PdfRenderer;
pub use self::raster::RasterRenderer;

pub const WHITE: [u8; 3] = [255, 255, 255];

const COLOR_NAMES: [(&str, [u8; 3]); 30] = [
    ("black", [0, 0, 0]),
    ("white", [255, 255, 255]),
    ("red", [255, 0, 0]),
    ("green", [0, 128, 0]),
    ("lime", [0, 255, 0]),
    ("blue", [0, 0, 255]),
    ("yellow", [255, 255, 0]),
    ("cyan", [0, 255, 255]),
    ("aqua", [0, 255, 255]),
    ("magenta", [255, 0, 255]),
    ("fuchsia", [255, 0, 255]),
    ("gray", [128, 128, 128]),
    ("grey", [128, 128, 128]),
    ("lightgray", [211, 211, 211]),
    ("lightgrey", [211, 211, 211]),
    ("darkgray", [169, 169, 169]),
    ("darkgrey", [169, 169, 169]),
    ("silver", [192, 192, 192]),
    ("maroon", [128, 0, 0]),
    ("olive", [128, 128, 0]),
    ("teal", [0, 128, 128]),
    ("navy", [0, 0, 128]),
    ("purple", [128, 0, 128]),
    ("orange", [255, 165, 0]),
    ("pink", [255, 192, 203]),
    ("brown", [165, 42, 42]),
    ("gold", [255, 215, 0]),
    ("beige", [245, 245, 220]),
    ("ivory", [255, 255, 240]),
    ("khaki", [240, 230, 140]),
];

fn parse_hex(hex: &str) -> Option<[u8; 3]> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        3 => {
            let mut rgb = [0; 3];
            for (c, digit) in rgb.iter_mut().zip(hex.chars()) {
                *c = channel(&format!("{digit}{digit}"))?;
            }
            Some(rgb)
        }
        6 => Some([channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?]),
        _ => None,
    }
}

/// A color name like "black" or a hex color like "#ff8800" / "#f80".
pub fn parse_color(spec: &str) -> Result<[u8; 3]> {
    let spec = spec.trim();
    let parsed = match spec.strip_prefix('#') {
        Some(hex) => parse_hex(hex),
        None => COLOR_NAMES
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(spec))
            .map(|(_, rgb)| *rgb),
    };
    parsed.ok_or_else(|| Error::InvalidArgument(format!("unknown color: {}", spec)))
}

#[derive(Debug, PartialEq, Clone, Copy, Default)]
pub struct RenderOptions {
    /// 0 disables crop marks
    pub crop_mark_thickness: f64,
    pub background_color: Option<[u8; 3]>,
    pub filled_corners: bool,
}

/// A drawing backend, all coordinates are in the units of the layout.
pub trait PageRenderer {
    /// Starts page `index` of `pages`, the previous page is complete.
    fn begin_page(&mut self, index: usize, pages: usize) -> Result<()>;
    fn draw_card(&mut self, image: &RgbImage, bbox: &BBox) -> Result<()>;
    fn draw_crop_lines(&mut self, lines: &[CropLine], thickness: f64) -> Result<()>;
    /// Writes the document, returns the written files.
    fn finish(self) -> Result<Vec<PathBuf>>;
}

pub struct CardAssembler {
    pub grid: PageLayoutGrid,
    pub options: RenderOptions,
}

impl CardAssembler {
    pub fn new(grid: PageLayoutGrid, options: RenderOptions) -> CardAssembler {
        CardAssembler { grid, options }
    }

    /// Loads a scan, fills its corners if asked to, crops the border and flattens it
    /// onto the background.
    pub fn prepare_image(&self, path: &Path) -> Result<RgbImage> {
        let mut image = image::open(path)?.to_rgba8();
        if self.options.filled_corners {
            image = fill_corners(&image);
        }

        let border_crop = self.grid.settings.border_crop;
        if border_crop > 0.0 {
            let (width, height) = image.dimensions();
            let ppu = pixels_per_unit((width, height), self.grid.settings.card_size);
            let crop = (border_crop * ppu).round() as u32;
            if 2 * crop >= width || 2 * crop >= height {
                return Err(Error::Sizing(format!(
                    "cropping {} pixels from {} leaves nothing",
                    crop,
                    path.display()
                )));
            }
            image = imageops::crop_imm(&image, crop, crop, width - 2 * crop, height - 2 * crop).to_image();
        }

        let background = self.options.background_color.unwrap_or(WHITE);
        let (width, height) = image.dimensions();
        Ok(RgbImage::from_fn(width, height, |x, y| {
            let pixel = image.get_pixel(x, y);
            let alpha = pixel[3] as u16;
            let mut rgb = [0u8; 3];
            for (c, value) in rgb.iter_mut().enumerate() {
                *value = ((pixel[c] as u16 * alpha + background[c] as u16 * (255 - alpha)) / 255) as u8;
            }
            Rgb(rgb)
        }))
    }

    /// Lays out all images page by page and hands them to the renderer.
    pub fn assemble<R: PageRenderer>(&self, images: &[PathBuf], mut renderer: R) -> Result<Vec<PathBuf>> {
        let pages = self.grid.pages(images.len());
        info!("assembling {} cards on {} pages", images.len(), pages);
        let crop_lines = self.grid.crop_lines();
        for (page, chunk) in images.chunks(self.grid.cards_per_page()).enumerate() {
            debug!("page {} of {}", page + 1, pages);
            renderer.begin_page(page, pages)?;
            for (i, path) in chunk.iter().enumerate() {
                let image = self.prepare_image(path)?;
                renderer.draw_card(&image, &self.grid.card_bbox(i))?;
            }
            if self.options.crop_mark_thickness > 0.0 {
                renderer.draw_crop_lines(&crop_lines, self.options.crop_mark_thickness)?;
            }
        }
        let written = renderer.finish()?;
        info!("wrote {}", written.iter().map(|p| p.display()).join(", "));
        Ok(written)
    }
}
