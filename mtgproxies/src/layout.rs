use log::debug;

use crate::dimensions::Size;
use crate::error::{Error, Result};

/// Physical dimensions of a sheet, all in the same unit.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct LayoutSettings {
    pub paper_size: Size,
    pub card_size: Size,
    /// cut from every edge of a card
    pub border_crop: f64,
    /// space between neighboring cards
    pub cut_spacing: f64,
    /// unprintable margin at the paper edges
    pub safe_margin: f64,
}

/// Axis aligned box, the origin is the top left corner of the page.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct BBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum CropLine {
    /// across the whole page at this x
    Vertical(f64),
    /// across the whole page at this y
    Horizontal(f64),
}

/// Placement of cards on a page.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct PageLayoutGrid {
    pub settings: LayoutSettings,
    pub cols: usize,
    pub rows: usize,
    pub card_bbox_size: Size,
    /// of the grid inside the safe area
    pub offset: Size,
}

impl PageLayoutGrid {
    pub fn new(settings: LayoutSettings) -> Result<PageLayoutGrid> {
        let cut = settings.cut_spacing;
        let card_bbox_size = settings.card_size.map(|s| s - 2.0 * settings.border_crop);
        let safe_area = settings.paper_size.map(|s| s - 2.0 * settings.safe_margin);
        if card_bbox_size.width <= 0.0 || card_bbox_size.height <= 0.0 {
            return Err(Error::Sizing(format!(
                "cropping {} from a card of size {} leaves nothing",
                settings.border_crop, settings.card_size
            )));
        }

        let dims = safe_area.zip(card_bbox_size, |safe, card| ((safe + cut) / (card + cut)).floor().max(0.0));
        if dims.width < 1.0 || dims.height < 1.0 {
            return Err(Error::Sizing(format!(
                "a card of size {} does not fit on paper of size {} with a margin of {}",
                card_bbox_size, settings.paper_size, settings.safe_margin
            )));
        }

        let grid_bbox_size = card_bbox_size.zip(dims, |card, n| card * n + cut * (n - 1.0));
        let offset = safe_area.zip(grid_bbox_size, |safe, grid| (safe - grid) / 2.0);
        let grid = PageLayoutGrid {
            settings,
            cols: dims.width as usize,
            rows: dims.height as usize,
            card_bbox_size,
            offset,
        };
        debug!("{} x {} cards per page, grid offset {}", grid.cols, grid.rows, offset);
        Ok(grid)
    }

    pub fn cards_per_page(&self) -> usize {
        self.cols * self.rows
    }

    pub fn pages(&self, cards: usize) -> usize {
        cards.div_ceil(self.cards_per_page())
    }

    /// (column, row) of the `index`-th card on a page, row-major.
    pub fn position(&self, index: usize) -> (usize, usize) {
        let index = index % self.cards_per_page();
        (index % self.cols, index / self.cols)
    }

    fn grid_origin(&self) -> (f64, f64) {
        (
            self.settings.safe_margin + self.offset.width,
            self.settings.safe_margin + self.offset.height,
        )
    }

    pub fn card_bbox(&self, index: usize) -> BBox {
        let (col, row) = self.position(index);
        let (x0, y0) = self.grid_origin();
        let cut = self.settings.cut_spacing;
        BBox {
            x: x0 + (cut + self.card_bbox_size.width) * col as f64,
            y: y0 + (cut + self.card_bbox_size.height) * row as f64,
            width: self.card_bbox_size.width,
            height: self.card_bbox_size.height,
        }
    }

    /// Lines at all grid boundaries, shared edges of neighboring cards are cut in the middle
    /// of the spacing between them.
    pub fn crop_lines(&self) -> Vec<CropLine> {
        let (x0, y0) = self.grid_origin();
        let cut = self.settings.cut_spacing;
        let boundary = |origin: f64, card: f64, i: usize, n: usize| {
            let shift = match i {
                0 => 0.0,
                i if i == n => cut,
                _ => cut / 2.0,
            };
            origin + (card + cut) * i as f64 - shift
        };
        let vertical = (0..=self.cols)
            .map(|i| CropLine::Vertical(boundary(x0, self.card_bbox_size.width, i, self.cols)));
        let horizontal = (0..=self.rows)
            .map(|i| CropLine::Horizontal(boundary(y0, self.card_bbox_size.height, i, self.rows)));
        vertical.chain(horizontal).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dimensions::{Units, mtg_card_size, paper_size};

    fn a4_mm(border_crop: f64, cut_spacing: f64, safe_margin: f64) -> LayoutSettings {
        LayoutSettings {
            paper_size: paper_size("a4", Units::Mm).unwrap(),
            card_size: mtg_card_size(Units::Mm),
            border_crop,
            cut_spacing,
            safe_margin,
        }
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn a4_fits_nine_cards() {
        let grid = PageLayoutGrid::new(a4_mm(0.0, 0.0, 0.0)).unwrap();
        assert_eq!((grid.cols, grid.rows), (3, 3));
        assert_eq!(grid.cards_per_page(), 9);
        assert!(close(grid.offset.width, (210.0 - 3.0 * 63.1) / 2.0));
        assert!(close(grid.offset.height, (297.0 - 3.0 * 88.0) / 2.0));
        assert_eq!(grid.pages(24), 3);
        assert_eq!(grid.pages(9), 1);
        assert_eq!(grid.pages(0), 0);
    }

    #[test]
    fn card_positions() {
        let grid = PageLayoutGrid::new(a4_mm(1.0, 2.0, 5.0)).unwrap();
        assert_eq!(grid.position(0), (0, 0));
        assert_eq!(grid.position(4), (1, 1));
        assert_eq!(grid.position(9), (0, 0));
        let first = grid.card_bbox(0);
        let second = grid.card_bbox(1);
        assert!(close(first.width, 61.1));
        assert!(close(first.height, 86.0));
        assert!(close(second.x - first.x, 61.1 + 2.0));
        assert!(close(first.x, 5.0 + grid.offset.width));
        // grid is centered in the safe area
        let last = grid.card_bbox(8);
        assert!(close(210.0 - (last.x + last.width), first.x));
        assert!(close(297.0 - (last.y + last.height), first.y));
    }

    #[test]
    fn spacing_reduces_grid() {
        // 3 * 63.1 + 2 * 15 > 210
        let grid = PageLayoutGrid::new(a4_mm(0.0, 15.0, 0.0)).unwrap();
        assert_eq!((grid.cols, grid.rows), (2, 3));
    }

    #[test]
    fn crop_lines_at_boundaries() {
        let grid = PageLayoutGrid::new(a4_mm(0.0, 2.0, 0.0)).unwrap();
        let lines = grid.crop_lines();
        let vertical: Vec<f64> = lines
            .iter()
            .filter_map(|l| match l {
                CropLine::Vertical(x) => Some(*x),
                CropLine::Horizontal(_) => None,
            })
            .collect();
        assert_eq!(vertical.len(), grid.cols + 1);
        assert_eq!(lines.len(), grid.cols + grid.rows + 2);
        let first = grid.card_bbox(0);
        let second = grid.card_bbox(1);
        let last = grid.card_bbox(2);
        assert!(close(vertical[0], first.x));
        assert!(close(vertical[1], first.x + first.width + 1.0));
        assert!(close(vertical[1], second.x - 1.0));
        assert!(close(vertical[3], last.x + last.width));
    }

    #[test]
    fn oversized_card_is_a_sizing_error() {
        let mut settings = a4_mm(0.0, 0.0, 0.0);
        settings.card_size = Size::new(220.0, 88.0);
        assert!(matches!(PageLayoutGrid::new(settings), Err(Error::Sizing(_))));
        settings.card_size = Size::new(63.1, 300.0);
        assert!(matches!(PageLayoutGrid::new(settings), Err(Error::Sizing(_))));
        let settings = a4_mm(0.0, 0.0, 100.0);
        assert!(matches!(PageLayoutGrid::new(settings), Err(Error::Sizing(_))));
    }

    #[test]
    fn inches_with_spacing() {
        let grid = PageLayoutGrid::new(LayoutSettings {
            paper_size: paper_size("a4", Units::In).unwrap(),
            card_size: mtg_card_size(Units::In),
            border_crop: 0.0,
            cut_spacing: 0.2,
            safe_margin: 0.0,
        })
        .unwrap();
        assert_eq!(grid.cards_per_page(), 9);
        assert_eq!(grid.pages(24), 3);
    }
}
